mod auth_commands;

use {
    clap::{Parser, Subcommand},
    slackgate_gateway::GatewayState,
    tracing::info,
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
    url::Url,
};

use auth_commands::{ProviderArgs, SessionArgs};

#[derive(Parser)]
#[command(name = "slackgate", about = "slackgate — sign in with Slack")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server.
    Serve {
        #[arg(long, default_value = "127.0.0.1")]
        bind: String,
        #[arg(long, default_value_t = 8080)]
        port: u16,
        #[command(flatten)]
        provider: ProviderArgs,
        #[command(flatten)]
        session: SessionArgs,
    },
    /// Print the Slack authorization URL for a callback URL.
    AuthorizeUrl {
        /// Absolute URL Slack should redirect back to.
        #[arg(long)]
        callback: Url,
        #[command(flatten)]
        provider: ProviderArgs,
    },
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    if cli.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_target(true).with_thread_ids(false))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_telemetry(&cli);

    info!(version = env!("CARGO_PKG_VERSION"), "slackgate starting");

    match cli.command {
        Commands::Serve {
            bind,
            port,
            provider,
            session,
        } => {
            let flow = auth_commands::flow(provider)?;
            let state = GatewayState::new(flow, session.gateway_config());
            slackgate_gateway::start_gateway(&bind, port, state).await
        },
        Commands::AuthorizeUrl { callback, provider } => {
            auth_commands::print_authorize_url(provider, &callback)
        },
    }
}
