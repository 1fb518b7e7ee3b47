//! Request signing — HTTP Signature (draft-cavage) with RSA-SHA256.
//!
//! Every outbound request carries three derived headers:
//!
//! - `Digest: SHA-256=<base64>` over the exact body bytes (the empty byte
//!   sequence when there is no body, never omitted).
//! - `Date`, an HTTP-date captured once and used both in the signing string and
//!   the header.
//! - `Authorization: Signature keyId="ApiKey <id>",algorithm="rsa-sha256",...`
//!
//! The canonical signing string is four newline-joined lines:
//!
//! ```text
//! (request-target): <lowercased method> <path+query>
//! host: <host>
//! date: <date>
//! digest: SHA-256=<digest>
//! ```
//!
//! Any mutation of method, path, host, date, or body after signing
//! invalidates the signature.

pub mod identity;

pub use identity::SigningIdentity;

use base64::{engine::general_purpose, Engine};
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

/// Signature algorithm label sent in the `Authorization` header.
pub const SIGNATURE_ALGORITHM: &str = "rsa-sha256";

/// Ordered list of signed header names.
pub const SIGNED_HEADERS: &str = "(request-target) host date digest";

/// Headers produced by signing one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedHeaders {
    pub authorization: String,
    pub date: String,
    /// Full header value, `SHA-256=<base64>`.
    pub digest: String,
    pub host: String,
}

/// The signing string plus the body digest it embeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalString {
    pub signing_string: String,
    pub digest_b64: String,
}

/// Base64 (standard alphabet, padded) SHA-256 of `input`.
pub fn sha256_base64(input: &[u8]) -> String {
    general_purpose::STANDARD.encode(Sha256::digest(input))
}

/// Format an instant as an RFC 7231 HTTP-date, e.g. `Tue, 09 Sep 2025 00:00:00 GMT`.
pub fn http_date(at: DateTime<Utc>) -> String {
    at.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Build the canonical signing string for a request.
pub fn canonical_string(
    method: &str,
    path_with_query: &str,
    host: &str,
    date: &str,
    body: &[u8],
) -> CanonicalString {
    let digest_b64 = sha256_base64(body);
    let signing_string = [
        format!(
            "(request-target): {} {}",
            method.to_lowercase(),
            path_with_query
        ),
        format!("host: {}", host),
        format!("date: {}", date),
        format!("digest: SHA-256={}", digest_b64),
    ]
    .join("\n");

    CanonicalString {
        signing_string,
        digest_b64,
    }
}

/// Assemble the `Authorization` header value.
pub fn authorization_header(key_id: &str, signature_b64: &str) -> String {
    format!(
        "Signature keyId=\"ApiKey {}\",algorithm=\"{}\",headers=\"{}\",signature=\"{}\"",
        key_id, SIGNATURE_ALGORITHM, SIGNED_HEADERS, signature_b64
    )
}
