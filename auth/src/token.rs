//! Identity token codec
//!
//! Tokens travel as three base64url parts joined by `.`: a header, a
//! payload, and an opaque signature. Decoding is strict: anything other
//! than exactly three non-empty parts is rejected, and a part that does
//! not parse as JSON is rejected. Signature verification is the backend's
//! job; the client only reads claims.

use base64::Engine as _;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// base64url without padding on encode; tolerant of padding on decode,
/// since token issuers differ on whether they pad.
const TOKEN_B64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Errors produced by the token codec
///
/// Both variants are fatal to the decode call: a malformed token never
/// yields a partial [`IdToken`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// The raw string did not split into exactly three non-empty parts
    #[error("Invalid token format: expected three dot-separated parts")]
    InvalidFormat,

    /// A header or payload part was not well-formed structured data
    #[error("Invalid token payload: {0}")]
    InvalidPayload(String),
}

/// Token header claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// Signing algorithm identifier
    pub alg: String,

    /// Identifier of the key that signed this token
    pub kid: String,
}

/// Token payload claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payload {
    /// Unique token identifier
    pub jti: String,

    /// Issuer
    pub iss: String,

    /// Subject (the authenticated user)
    pub sub: String,

    /// Audience
    pub aud: String,

    /// Expiry, epoch seconds
    pub exp: i64,

    /// Issued-at, epoch seconds
    pub iat: i64,

    /// Time of the original authentication event, epoch seconds
    pub auth_time: i64,

    /// Replay-protection nonce, present only on some flows
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonce: Option<String>,
}

/// A decoded identity token
///
/// Immutable once constructed. `raw` is the exact wire form the backend
/// issued; it is what goes into `Authorization` headers, so the decoded
/// claims are never re-encoded on the request path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdToken {
    /// Decoded header claims
    pub header: Header,

    /// Decoded payload claims
    pub payload: Payload,

    /// Opaque signature part, never decoded client-side
    pub signature: String,

    /// The exact three-part encoded string used for wire transmission
    pub raw: String,
}

impl IdToken {
    /// Decode a raw three-part token string
    ///
    /// # Errors
    ///
    /// - [`TokenError::InvalidFormat`] unless the string splits on `.` into
    ///   exactly three non-empty parts
    /// - [`TokenError::InvalidPayload`] when the header or payload part is
    ///   not base64url-encoded JSON of the expected shape
    pub fn decode(raw: &str) -> Result<Self, TokenError> {
        let parts: Vec<&str> = raw.split('.').collect();
        let [header, payload, signature] = parts.as_slice() else {
            return Err(TokenError::InvalidFormat);
        };
        if header.is_empty() || payload.is_empty() || signature.is_empty() {
            return Err(TokenError::InvalidFormat);
        }

        Ok(Self {
            header: decode_part(header)?,
            payload: decode_part(payload)?,
            signature: (*signature).to_string(),
            raw: raw.to_string(),
        })
    }

    /// Construct a token from structured parts, computing its wire form
    ///
    /// Used for building well-formed tokens in tests and tooling; the
    /// network response path always goes through [`IdToken::decode`].
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::InvalidPayload`] if a part fails to serialize.
    pub fn encode(header: Header, payload: Payload, signature: String) -> Result<Self, TokenError> {
        let encoded_header = encode_part(&header)?;
        let encoded_payload = encode_part(&payload)?;
        let raw = format!("{encoded_header}.{encoded_payload}.{signature}");

        Ok(Self {
            header,
            payload,
            signature,
            raw,
        })
    }

    /// Whether the token has expired as of `now`
    ///
    /// The boundary is inclusive: a token with `exp = T` is expired at
    /// exactly `T` seconds. No clock-skew tolerance is applied. `exp` is
    /// an arbitrary claim from the wire, so the seconds-to-millis
    /// conversion saturates instead of overflowing.
    #[must_use]
    pub const fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now.timestamp_millis() >= self.payload.exp.saturating_mul(1000)
    }
}

fn decode_part<T: DeserializeOwned>(part: &str) -> Result<T, TokenError> {
    let bytes = TOKEN_B64
        .decode(part)
        .map_err(|e| TokenError::InvalidPayload(e.to_string()))?;
    serde_json::from_slice(&bytes).map_err(|e| TokenError::InvalidPayload(e.to_string()))
}

fn encode_part<T: Serialize>(part: &T) -> Result<String, TokenError> {
    let json = serde_json::to_vec(part).map_err(|e| TokenError::InvalidPayload(e.to_string()))?;
    Ok(TOKEN_B64.encode(json))
}
