//! Shared helpers for the API integration tests

#![allow(dead_code)]

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::body::Body;
use http::{header::AUTHORIZATION, header::CONTENT_TYPE, Method, Request, StatusCode};
use axum::Router;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use casting_agency::config::AuthConfig;
use casting_agency::{create_router, AppState, Authorizer, CastingStore, MemoryStore};

pub const DOMAIN: &str = "casting.eu.auth0.test";
pub const AUDIENCE: &str = "casting";
pub const SIGNING_KID: &str = "signing-key";

pub const SIGNING_KEY_PEM: &str = include_str!("../fixtures/signing_key.pem");
pub const PREVIOUS_KEY_PEM: &str = include_str!("../fixtures/previous_key.pem");
const JWKS: &str = include_str!("../fixtures/jwks.json");

/// A router wired to a mock identity provider
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub provider: MockServer,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let provider = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/.well-known/jwks.json"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(JWKS, "application/json"),
            )
            .mount(&provider)
            .await;
        Self::with_provider(provider, false).await
    }

    pub async fn with_provider(provider: MockServer, excited: bool) -> Self {
        let auth = AuthConfig {
            domain: DOMAIN.to_string(),
            audience: AUDIENCE.to_string(),
            jwks_url: Some(format!("{}/.well-known/jwks.json", provider.uri())),
            jwks_timeout_secs: 2,
            ..AuthConfig::default()
        };
        let authorizer = Arc::new(Authorizer::from_config(&auth).unwrap());
        let store = Arc::new(MemoryStore::new());
        let state = AppState::new(store.clone(), authorizer).with_excited(excited);

        Self {
            router: create_router(Arc::new(state)),
            store,
            provider,
        }
    }

    /// Send a request and decode the JSON body (or `Null` for non-JSON bodies)
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    pub async fn store_is_empty(&self) -> bool {
        self.store.list_films().await.unwrap().is_empty()
            && self.store.list_actors().await.unwrap().is_empty()
    }

    pub async fn send_text(&self, request: Request<Body>) -> (StatusCode, String) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }
}

pub fn now() -> i64 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_secs() as i64
}

pub fn claims(permissions: &[&str]) -> Value {
    json!({
        "iss": format!("https://{}/", DOMAIN),
        "sub": "auth0|executive-producer",
        "aud": AUDIENCE,
        "iat": now(),
        "exp": now() + 3600,
        "permissions": permissions,
    })
}

pub fn sign(claims: &Value, kid: Option<&str>, pem: &str) -> String {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = kid.map(str::to_string);
    encode(&header, claims, &EncodingKey::from_rsa_pem(pem.as_bytes()).unwrap()).unwrap()
}

pub fn token(permissions: &[&str]) -> String {
    sign(&claims(permissions), Some(SIGNING_KID), SIGNING_KEY_PEM)
}

pub fn request(method: Method, uri: &str, authorization: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(value) = authorization {
        builder = builder.header(AUTHORIZATION, value);
    }
    match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}
