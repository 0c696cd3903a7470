/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Validation of [origin trial](https://github.com/GoogleChrome/OriginTrials) tokens,
//! delivered through `Origin-Trial` response headers.
//!
//! A token is the base64 encoding of:
//!
//! ```text
//! | version (1) | signature (64) | payload length (4, big endian) | payload (JSON) |
//! ```
//!
//! The Ed25519 signature covers the version byte, the payload length and the payload.

use std::fmt;

use base64::Engine;
use base64::prelude::BASE64_STANDARD;
use ed25519_dalek::{PUBLIC_KEY_LENGTH, SIGNATURE_LENGTH, Signature, Verifier, VerifyingKey};
use http::HeaderMap;
use log::{debug, warn};
use serde::Deserialize;
use servo_url::{Host, ImmutableOrigin, ServoUrl};
use time::OffsetDateTime;

use crate::headers::ORIGIN_TRIAL;

/// The trial gating `Cross-Origin-Opener-Policy` violation reports.
pub const COOP_REPORTING_TRIAL_FEATURE: &str = "CrossOriginOpenerPolicyReporting";

const VERSION_2: u8 = 2;
const VERSION_3: u8 = 3;

const SIGNATURE_OFFSET: usize = 1;
const PAYLOAD_LENGTH_OFFSET: usize = SIGNATURE_OFFSET + SIGNATURE_LENGTH;
const PAYLOAD_OFFSET: usize = PAYLOAD_LENGTH_OFFSET + 4;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TrialTokenError {
    /// Not base64, truncated, or an unparseable payload.
    Malformed,
    WrongVersion,
    InvalidSignature,
    /// The document requesting the trial is not a secure context.
    Insecure,
    /// Third-party tokens only apply to scripts, never to response headers.
    ThirdParty,
    WrongOrigin,
    Expired,
    NoPublicKeys,
}

impl fmt::Display for TrialTokenError {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        let description = match self {
            TrialTokenError::Malformed => "malformed token",
            TrialTokenError::WrongVersion => "unsupported token version",
            TrialTokenError::InvalidSignature => "signature does not match any trusted key",
            TrialTokenError::Insecure => "origin is not potentially trustworthy",
            TrialTokenError::ThirdParty => "third-party token used in a response header",
            TrialTokenError::WrongOrigin => "token does not match the origin",
            TrialTokenError::Expired => "token has expired",
            TrialTokenError::NoPublicKeys => "no trusted public keys are configured",
        };
        formatter.write_str(description)
    }
}

impl std::error::Error for TrialTokenError {}

#[derive(Deserialize)]
struct TrialTokenPayload {
    origin: String,
    #[serde(rename = "isSubdomain", default)]
    is_subdomain: bool,
    feature: String,
    expiry: i64,
    #[serde(rename = "isThirdParty", default)]
    is_third_party: bool,
    #[serde(default)]
    usage: Option<String>,
}

/// The validated contents of a token.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TrialToken {
    version: u8,
    origin: ImmutableOrigin,
    match_subdomains: bool,
    feature_name: String,
    expiry: OffsetDateTime,
    is_third_party: bool,
    usage: Option<String>,
}

impl TrialToken {
    fn from_payload(version: u8, payload: &[u8]) -> Result<TrialToken, TrialTokenError> {
        let payload: TrialTokenPayload =
            serde_json::from_slice(payload).map_err(|_| TrialTokenError::Malformed)?;
        if payload.feature.is_empty() {
            return Err(TrialTokenError::Malformed);
        }

        let origin = ServoUrl::parse(&payload.origin)
            .map_err(|_| TrialTokenError::Malformed)?
            .origin();
        if !origin.is_tuple() {
            return Err(TrialTokenError::Malformed);
        }
        let expiry = OffsetDateTime::from_unix_timestamp(payload.expiry)
            .map_err(|_| TrialTokenError::Malformed)?;

        // Version 2 tokens predate third-party and usage restrictions.
        let (is_third_party, usage) = match version {
            VERSION_3 => (payload.is_third_party, payload.usage),
            _ => (false, None),
        };

        Ok(TrialToken {
            version,
            origin,
            match_subdomains: payload.is_subdomain,
            feature_name: payload.feature,
            expiry,
            is_third_party,
            usage,
        })
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    pub fn origin(&self) -> &ImmutableOrigin {
        &self.origin
    }

    pub fn match_subdomains(&self) -> bool {
        self.match_subdomains
    }

    pub fn feature_name(&self) -> &str {
        &self.feature_name
    }

    pub fn expiry(&self) -> OffsetDateTime {
        self.expiry
    }

    pub fn is_third_party(&self) -> bool {
        self.is_third_party
    }

    pub fn usage(&self) -> Option<&str> {
        self.usage.as_deref()
    }

    /// Exact origin match, or a subdomain of the token's host with the same scheme and
    /// port when the token was issued with `isSubdomain`.
    pub fn matches_origin(&self, origin: &ImmutableOrigin) -> bool {
        if *origin == self.origin {
            return true;
        }
        if !self.match_subdomains {
            return false;
        }

        let (
            ImmutableOrigin::Tuple(scheme, Host::Domain(host), port),
            ImmutableOrigin::Tuple(token_scheme, Host::Domain(token_host), token_port),
        ) = (origin, &self.origin)
        else {
            return false;
        };
        scheme == token_scheme &&
            port == token_port &&
            host.strip_suffix(token_host.as_str())
                .is_some_and(|subdomain| subdomain.ends_with('.'))
    }

    pub fn is_valid(
        &self,
        origin: &ImmutableOrigin,
        now: OffsetDateTime,
    ) -> Result<(), TrialTokenError> {
        if !self.matches_origin(origin) {
            return Err(TrialTokenError::WrongOrigin);
        }
        if now >= self.expiry {
            return Err(TrialTokenError::Expired);
        }
        Ok(())
    }
}

/// Validates tokens against a set of trusted signing keys.
#[derive(Clone, Debug, Default)]
pub struct TrialTokenValidator {
    public_keys: Vec<VerifyingKey>,
}

impl TrialTokenValidator {
    pub fn new(public_keys: Vec<VerifyingKey>) -> Self {
        TrialTokenValidator { public_keys }
    }

    /// Builds a validator from a comma separated list of base64 encoded keys. Keys that do
    /// not decode to a valid Ed25519 public key are skipped.
    pub fn from_base64_keys(keys: &str) -> Self {
        let public_keys = keys
            .split(',')
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .filter_map(|key| {
                let public_key = decode_public_key(key);
                if public_key.is_none() {
                    warn!("Ignoring invalid origin trial public key {:?}", key);
                }
                public_key
            })
            .collect();
        Self::new(public_keys)
    }

    pub fn has_public_keys(&self) -> bool {
        !self.public_keys.is_empty()
    }

    /// Validates `token` for a document of `origin` at time `now`. The feature name is
    /// not checked here.
    pub fn validate_token(
        &self,
        token: &str,
        origin: &ImmutableOrigin,
        now: OffsetDateTime,
    ) -> Result<TrialToken, TrialTokenError> {
        if !self.has_public_keys() {
            return Err(TrialTokenError::NoPublicKeys);
        }

        let (version, payload) = self.extract(token)?;
        let token = TrialToken::from_payload(version, &payload)?;

        if !origin.is_potentially_trustworthy() {
            return Err(TrialTokenError::Insecure);
        }
        if token.is_third_party() {
            return Err(TrialTokenError::ThirdParty);
        }
        token.is_valid(origin, now)?;
        Ok(token)
    }

    /// Whether any `Origin-Trial` header of a response for `url` carries a valid token
    /// for `feature`.
    pub fn request_enables_feature(
        &self,
        url: &ServoUrl,
        headers: &HeaderMap,
        feature: &str,
        now: OffsetDateTime,
    ) -> bool {
        if !self.has_public_keys() {
            return false;
        }

        let origin = url.origin();
        headers
            .get_all(&ORIGIN_TRIAL)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(','))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .any(|token| match self.validate_token(token, &origin, now) {
                Ok(token) => token.feature_name() == feature,
                Err(error) => {
                    debug!("Ignoring origin trial token for {}: {}", url, error);
                    false
                },
            })
    }

    /// Checks the framing and signature of a token, returning its version and payload.
    fn extract(&self, token: &str) -> Result<(u8, Vec<u8>), TrialTokenError> {
        let mut bytes = BASE64_STANDARD
            .decode(token)
            .map_err(|_| TrialTokenError::Malformed)?;
        if bytes.len() < PAYLOAD_OFFSET {
            return Err(TrialTokenError::Malformed);
        }

        let version = bytes[0];
        if version != VERSION_2 && version != VERSION_3 {
            return Err(TrialTokenError::WrongVersion);
        }

        let signature_bytes: [u8; SIGNATURE_LENGTH] = bytes
            [SIGNATURE_OFFSET..PAYLOAD_LENGTH_OFFSET]
            .try_into()
            .map_err(|_| TrialTokenError::Malformed)?;
        let length_bytes: [u8; 4] = bytes[PAYLOAD_LENGTH_OFFSET..PAYLOAD_OFFSET]
            .try_into()
            .map_err(|_| TrialTokenError::Malformed)?;
        let payload = bytes.split_off(PAYLOAD_OFFSET);
        if payload.len() != u32::from_be_bytes(length_bytes) as usize {
            return Err(TrialTokenError::Malformed);
        }

        let mut signed_data = Vec::with_capacity(1 + length_bytes.len() + payload.len());
        signed_data.push(version);
        signed_data.extend_from_slice(&length_bytes);
        signed_data.extend_from_slice(&payload);

        let signature = Signature::from_bytes(&signature_bytes);
        if !self
            .public_keys
            .iter()
            .any(|key| key.verify(&signed_data, &signature).is_ok())
        {
            return Err(TrialTokenError::InvalidSignature);
        }

        Ok((version, payload))
    }
}

fn decode_public_key(key: &str) -> Option<VerifyingKey> {
    let bytes: [u8; PUBLIC_KEY_LENGTH] = BASE64_STANDARD.decode(key).ok()?.try_into().ok()?;
    VerifyingKey::from_bytes(&bytes).ok()
}
