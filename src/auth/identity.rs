//! Signing identity — API key id plus RSA private key.
//!
//! Loaded once at startup and shared read-only by every request.

use std::fmt;
use std::path::Path;

use base64::{engine::general_purpose, Engine};
use chrono::{DateTime, Utc};
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs1v15::{Signature, SigningKey};
use rsa::pkcs8::DecodePrivateKey;
use rsa::signature::{SignatureEncoding, Signer};
use rsa::RsaPrivateKey;
use sha2::Sha256;

use crate::auth::{authorization_header, canonical_string, http_date, SignedHeaders};
use crate::error::AuthError;

pub struct SigningIdentity {
    key_id: String,
    key: SigningKey<Sha256>,
}

impl SigningIdentity {
    /// Parse a PEM-encoded RSA private key (PKCS#1 or PKCS#8).
    pub fn from_pem(key_id: impl Into<String>, pem: &str) -> Result<Self, AuthError> {
        let private_key = RsaPrivateKey::from_pkcs1_pem(pem)
            .or_else(|_| RsaPrivateKey::from_pkcs8_pem(pem))
            .map_err(|e| AuthError::InvalidKey(e.to_string()))?;

        Ok(Self {
            key_id: key_id.into(),
            key: SigningKey::<Sha256>::new(private_key),
        })
    }

    /// Read and parse the private key file at `path`.
    pub fn load(key_id: impl Into<String>, path: impl AsRef<Path>) -> Result<Self, AuthError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(AuthError::KeyNotFound(path.to_path_buf()));
        }
        let pem = std::fs::read_to_string(path).map_err(|source| AuthError::KeyRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_pem(key_id, &pem)
    }

    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    /// Sign a request using the current wall-clock time.
    pub fn sign(
        &self,
        method: &str,
        path_with_query: &str,
        host: &str,
        body: &[u8],
    ) -> Result<SignedHeaders, AuthError> {
        self.sign_at(Utc::now(), method, path_with_query, host, body)
    }

    /// Sign a request as of `at`.
    pub fn sign_at(
        &self,
        at: DateTime<Utc>,
        method: &str,
        path_with_query: &str,
        host: &str,
        body: &[u8],
    ) -> Result<SignedHeaders, AuthError> {
        let date = http_date(at);
        let canonical = canonical_string(method, path_with_query, host, &date, body);

        let signature: Signature = self
            .key
            .try_sign(canonical.signing_string.as_bytes())
            .map_err(|e| AuthError::Signing(e.to_string()))?;
        let signature_b64 = general_purpose::STANDARD.encode(signature.to_bytes());

        Ok(SignedHeaders {
            authorization: authorization_header(&self.key_id, &signature_b64),
            date,
            digest: format!("SHA-256={}", canonical.digest_b64),
            host: host.to_string(),
        })
    }

    #[cfg(test)]
    pub(crate) fn verifying_key(&self) -> rsa::pkcs1v15::VerifyingKey<Sha256> {
        use rsa::signature::Keypair;
        self.key.verifying_key()
    }
}

impl fmt::Debug for SigningIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningIdentity")
            .field("key_id", &self.key_id)
            .field("key", &"<redacted>")
            .finish()
    }
}
