//! Signing keys and token builders shared by the auth unit tests

use std::time::{SystemTime, UNIX_EPOCH};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::{json, Value};

pub const SIGNING_KID: &str = "signing-key";
pub const PREVIOUS_KID: &str = "previous-key";
pub const DOMAIN: &str = "casting.eu.auth0.test";
pub const AUDIENCE: &str = "casting";

pub const SIGNING_KEY_PEM: &str = include_str!("../../tests/fixtures/signing_key.pem");
pub const PREVIOUS_KEY_PEM: &str = include_str!("../../tests/fixtures/previous_key.pem");
const JWKS: &str = include_str!("../../tests/fixtures/jwks.json");

pub fn jwks_json() -> Value {
    serde_json::from_str(JWKS).unwrap()
}

pub fn issuer() -> String {
    format!("https://{}/", DOMAIN)
}

pub fn now() -> i64 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_secs() as i64
}

/// Valid claims granting `permissions`, expiring in an hour
pub fn claims(permissions: &[&str]) -> Value {
    json!({
        "iss": issuer(),
        "sub": "auth0|casting-director",
        "aud": AUDIENCE,
        "iat": now(),
        "exp": now() + 3600,
        "permissions": permissions,
    })
}

pub fn sign(claims: &Value, kid: Option<&str>, pem: &str) -> String {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = kid.map(str::to_string);
    let key = EncodingKey::from_rsa_pem(pem.as_bytes()).unwrap();
    encode(&header, claims, &key).unwrap()
}

pub fn token(claims: &Value) -> String {
    sign(claims, Some(SIGNING_KID), SIGNING_KEY_PEM)
}

pub fn token_with_kid(claims: &Value, kid: &str) -> String {
    sign(claims, Some(kid), SIGNING_KEY_PEM)
}

pub fn token_without_kid(claims: &Value) -> String {
    sign(claims, None, SIGNING_KEY_PEM)
}
