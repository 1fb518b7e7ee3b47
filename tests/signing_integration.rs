//! Integration tests for the signed HTTP transport.
//!
//! Requests are prepared (signed) but never sent; the signature is checked
//! against the fixture key's public half.

use std::path::PathBuf;

use base64::{engine::general_purpose, Engine};
use chrono::{TimeZone, Utc};
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs1v15::{Signature, VerifyingKey};
use rsa::signature::Verifier;
use rsa::RsaPrivateKey;
use serde_json::json;
use sha2::Sha256;

use intersight_gateway::auth::canonical_string;
use intersight_gateway::prelude::*;

const KEY_ID: &str = "5f0c/5f0d/5f0e";

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn client() -> IntersightClient<IntersightHttp> {
    IntersightClient::builder()
        .base_url("https://intersight.com")
        .api_prefix("/api/v1")
        .api_key_id(KEY_ID)
        .private_key_path(fixture("test_rsa_key.pem"))
        .build()
        .unwrap()
}

fn verifier() -> VerifyingKey<Sha256> {
    let pem = std::fs::read_to_string(fixture("test_rsa_key.pem")).unwrap();
    let key = RsaPrivateKey::from_pkcs1_pem(&pem).unwrap();
    VerifyingKey::<Sha256>::new(key.to_public_key())
}

fn signature_of(authorization: &str) -> Vec<u8> {
    let b64 = authorization
        .split("signature=\"")
        .nth(1)
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap();
    general_purpose::STANDARD.decode(b64).unwrap()
}

#[test]
fn prepared_get_is_verifiable() {
    let at = Utc.with_ymd_and_hms(2025, 9, 9, 12, 0, 0).unwrap();
    let prepared = client()
        .transport()
        .prepare_at(at, HttpMethod::Get, "ucs/Profiles?$top=1", None)
        .unwrap();

    assert_eq!(prepared.url.as_str(), "https://intersight.com/api/v1/ucs/Profiles?$top=1");
    assert_eq!(prepared.path_with_query, "/api/v1/ucs/Profiles?$top=1");
    assert!(prepared.body.is_empty());
    assert_eq!(prepared.headers.date, "Tue, 09 Sep 2025 12:00:00 GMT");
    assert_eq!(
        prepared.headers.digest,
        "SHA-256=47DEQpj8HBSa+/TImW+5JCeuQeRkm5NMpJWZG3hSuFU="
    );
    assert!(prepared.headers.authorization.starts_with(&format!(
        "Signature keyId=\"ApiKey {}\",algorithm=\"rsa-sha256\",headers=\"(request-target) host date digest\",signature=\"",
        KEY_ID
    )));

    let canonical = canonical_string(
        "GET",
        "/api/v1/ucs/Profiles?$top=1",
        "intersight.com",
        &prepared.headers.date,
        b"",
    );
    let signature = Signature::try_from(signature_of(&prepared.headers.authorization).as_slice()).unwrap();
    verifier()
        .verify(canonical.signing_string.as_bytes(), &signature)
        .unwrap();
}

#[test]
fn prepared_body_matches_digest() {
    let body = json!({"Name": "pool-a"});
    let prepared = client()
        .transport()
        .prepare(HttpMethod::Post, "ucs/Pools", Some(&body))
        .unwrap();

    assert_eq!(prepared.body, serde_json::to_vec(&body).unwrap());
    let expected = format!(
        "SHA-256={}",
        intersight_gateway::auth::sha256_base64(&prepared.body)
    );
    assert_eq!(prepared.headers.digest, expected);

    let canonical = canonical_string(
        "POST",
        "/api/v1/ucs/Pools",
        "intersight.com",
        &prepared.headers.date,
        &prepared.body,
    );
    let signature = Signature::try_from(signature_of(&prepared.headers.authorization).as_slice()).unwrap();
    verifier()
        .verify(canonical.signing_string.as_bytes(), &signature)
        .unwrap();
}

#[test]
fn absolute_route_bypasses_prefix() {
    let prepared = client()
        .transport()
        .prepare(HttpMethod::Get, "/api/v1/iam/Users?$top=1", None)
        .unwrap();
    assert_eq!(prepared.path_with_query, "/api/v1/iam/Users?$top=1");
}

#[test]
fn pkcs8_key_signs_identically() {
    let at = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    let pkcs8 = IntersightClient::builder()
        .api_key_id(KEY_ID)
        .private_key_path(fixture("test_rsa_key_pkcs8.pem"))
        .build()
        .unwrap();

    let a = client()
        .transport()
        .prepare_at(at, HttpMethod::Delete, "ucs/Profiles/xxx", None)
        .unwrap();
    let b = pkcs8
        .transport()
        .prepare_at(at, HttpMethod::Delete, "ucs/Profiles/xxx", None)
        .unwrap();
    assert_eq!(a.headers, b.headers);
}

#[test]
fn missing_key_file_fails_build() {
    let err = IntersightClient::builder()
        .api_key_id(KEY_ID)
        .private_key_path(fixture("does_not_exist.pem"))
        .build()
        .unwrap_err();
    assert!(matches!(err, GatewayError::Auth(AuthError::KeyNotFound(_))));
    assert!(err.to_string().contains("Private key file not found"));
}
