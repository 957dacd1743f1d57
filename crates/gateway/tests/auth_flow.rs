use std::{collections::HashMap, sync::Arc};

use {
    axum_extra::extract::cookie::{Cookie, CookieJar},
    mockito::{Matcher, Server, ServerGuard},
    reqwest::{StatusCode, header},
    secrecy::Secret,
    slackgate_gateway::{CookieCredentialStore, GatewayConfig, GatewayState, build_router},
    slackgate_oauth::{CredentialStore, OAuthConfig, OAuthFlow},
    tokio::net::TcpListener,
    url::Url,
};

const FORWARDED: [(&str, &str); 2] = [
    ("x-forwarded-host", "app.example"),
    ("x-forwarded-proto", "https"),
];

struct Harness {
    base: String,
    client: reqwest::Client,
    provider: ServerGuard,
}

impl Harness {
    async fn start() -> Self {
        let provider = Server::new_async().await;
        let config = OAuthConfig::slack("CID", Secret::new("SECRET".into()))
            .with_base_url(&provider.url())
            .with_scopes(["a", "b"]);
        let flow = OAuthFlow::new(Arc::new(config)).unwrap();
        let gateway = GatewayConfig {
            trust_forwarded_headers: true,
            ..GatewayConfig::default()
        };
        let state = GatewayState::new(flow, gateway);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, build_router(state)).await });

        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap();
        Self {
            base: format!("http://{addr}"),
            client,
            provider,
        }
    }

    async fn get(&self, path: &str, token: Option<&str>) -> reqwest::Response {
        let cookie = token.map(|t| format!("slackgate_slacktoken={t}"));
        self.get_with_cookie(path, cookie.as_deref()).await
    }

    /// `cookie` is sent verbatim as the `Cookie` header.
    async fn get_with_cookie(&self, path: &str, cookie: Option<&str>) -> reqwest::Response {
        let mut req = self.client.get(format!("{}{path}", self.base));
        for (k, v) in FORWARDED {
            req = req.header(k, v);
        }
        if let Some(cookie) = cookie {
            req = req.header(header::COOKIE, cookie);
        }
        req.send().await.unwrap()
    }
}

fn location(resp: &reqwest::Response) -> String {
    resp.headers()[header::LOCATION].to_str().unwrap().to_string()
}

fn set_cookie(resp: &reqwest::Response) -> Option<&str> {
    resp.headers()
        .get(header::SET_COOKIE)
        .map(|v| v.to_str().unwrap())
}

/// Rebuild the client-side store from the response's `Set-Cookie`, decoding
/// the value the way the server's cookie jar does.
fn store_from(resp: &reqwest::Response) -> Option<CookieCredentialStore> {
    let raw = set_cookie(resp)?;
    let cookie = Cookie::parse_encoded(raw.to_string()).unwrap();
    let jar = CookieJar::new().add(cookie);
    Some(CookieCredentialStore::new(jar, &GatewayConfig::default()))
}

#[tokio::test]
async fn test_initiate_redirects_to_provider() {
    let h = Harness::start().await;

    let resp = h.get("/auth/start", None).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    let url = Url::parse(&location(&resp)).unwrap();
    assert!(
        url.as_str()
            .starts_with(&format!("{}/oauth/authorize?", h.provider.url()))
    );
    let query: HashMap<_, _> = url.query_pairs().into_owned().collect();
    assert_eq!(query["client_id"], "CID");
    assert_eq!(query["scope"], "a,b");
    assert_eq!(query["redirect_uri"], "https://app.example/auth/complete");
}

#[tokio::test]
async fn test_complete_with_valid_code() {
    let mut h = Harness::start().await;
    let exchange = h
        .provider
        .mock("POST", "/api/oauth.access")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("code".into(), "valid123".into()),
            Matcher::UrlEncoded(
                "redirect_uri".into(),
                "https://app.example/auth/complete".into(),
            ),
        ]))
        .with_header("content-type", "application/json")
        .with_body(r#"{"ok":true,"access_token":"tok-xyz"}"#)
        .expect(1)
        .create_async()
        .await;

    let resp = h.get("/auth/complete?code=valid123", None).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/");
    let raw_cookie = resp.headers()[header::SET_COOKIE].to_str().unwrap();
    assert!(raw_cookie.contains("HttpOnly"));
    assert!(raw_cookie.contains("Secure"));
    assert!(raw_cookie.contains("Max-Age=86400"));
    assert!(raw_cookie.contains("Path=/"));

    let store = store_from(&resp).unwrap();
    assert!(store.is_authorized());
    assert_eq!(store.get().unwrap().as_str(), "tok-xyz");
    exchange.assert_async().await;
}

#[tokio::test]
async fn test_complete_with_bad_code() {
    let mut h = Harness::start().await;
    h.provider
        .mock("POST", "/api/oauth.access")
        .with_header("content-type", "application/json")
        .with_body(r#"{"ok":false,"error":"invalid_code"}"#)
        .create_async()
        .await;

    let resp = h.get("/auth/complete?code=bad", None).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(store_from(&resp).is_none());
}

#[tokio::test]
async fn test_complete_without_code_is_unauthorized() {
    let h = Harness::start().await;

    let resp = h.get("/auth/complete", None).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = h.get("/auth/complete?error=access_denied", None).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(store_from(&resp).is_none());
}

#[tokio::test]
async fn test_complete_provider_down_is_bad_gateway() {
    let mut h = Harness::start().await;
    h.provider
        .mock("POST", "/api/oauth.access")
        .with_status(502)
        .create_async()
        .await;

    let resp = h.get("/auth/complete?code=valid123", None).await;
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    assert!(store_from(&resp).is_none());
}

#[tokio::test]
async fn test_logout_clears_token() {
    let h = Harness::start().await;

    let resp = h.get("/auth/logout", Some("tok-xyz")).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/");
    let store = store_from(&resp).unwrap();
    assert!(store.get().is_none());
    assert!(!store.is_authorized());
}

#[tokio::test]
async fn test_gate_redirects_unauthorized() {
    let h = Harness::start().await;

    let resp = h.get("/me", None).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/auth/start");

    let resp = h.get("/me", Some("")).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_gate_passes_token_to_api_client() {
    let mut h = Harness::start().await;
    h.provider
        .mock("POST", "/api/auth.test")
        .match_header("authorization", "Bearer tok-xyz")
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"ok":true,"url":"https://acme.slack.com/","team":"Acme","user":"ada","team_id":"T1","user_id":"U1"}"#,
        )
        .create_async()
        .await;

    let resp = h.get("/me", Some("tok-xyz")).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["user"], "ada");
}

#[tokio::test]
async fn test_home_reflects_auth_state() {
    let h = Harness::start().await;

    let signed_out = h.get("/", None).await.text().await.unwrap();
    assert!(signed_out.contains("Not signed in"));

    let signed_in = h.get("/", Some("tok-xyz")).await.text().await.unwrap();
    assert!(signed_in.contains("Signed in"));
}

#[tokio::test]
async fn test_token_needing_encoding_round_trips() {
    let mut h = Harness::start().await;
    h.provider
        .mock("POST", "/api/oauth.access")
        .with_header("content-type", "application/json")
        .with_body(r#"{"ok":true,"access_token":"tok xyz;extra=1"}"#)
        .create_async()
        .await;
    let identity = h
        .provider
        .mock("POST", "/api/auth.test")
        .match_header("authorization", "Bearer tok xyz;extra=1")
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"ok":true,"url":"https://acme.slack.com/","team":"Acme","user":"ada","team_id":"T1","user_id":"U1"}"#,
        )
        .expect(1)
        .create_async()
        .await;

    let resp = h.get("/auth/complete?code=valid123", None).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let store = store_from(&resp).unwrap();
    assert_eq!(store.get().unwrap().as_str(), "tok xyz;extra=1");

    // Send the cookie back exactly as the browser received it.
    let pair = set_cookie(&resp)
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string();
    assert_ne!(pair, "slackgate_slacktoken=tok xyz;extra=1");
    let resp = h.get_with_cookie("/me", Some(&pair)).await;

    assert_eq!(resp.status(), StatusCode::OK);
    identity.assert_async().await;
}
