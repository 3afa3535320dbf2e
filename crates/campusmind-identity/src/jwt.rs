// SPDX-FileCopyrightText: 2026 CampusMind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Minimal RS256 compact JWS support on top of `ring`.

use base64::Engine;
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use campusmind_core::CampusMindError;
use ring::rand::SystemRandom;
use ring::signature::{self, RsaKeyPair, RsaPublicKeyComponents};
use serde::Serialize;
use serde::de::DeserializeOwned;

fn identity_error(message: impl Into<String>) -> CampusMindError {
    CampusMindError::Identity {
        message: message.into(),
        source: None,
    }
}

/// Parses a PEM-armored PKCS#8 private key.
pub fn key_pair_from_pem(pem: &str) -> Result<RsaKeyPair, CampusMindError> {
    // Keys pasted into env vars often keep their newlines escaped.
    let pem = pem.replace("\\n", "\n");
    let body: String = pem
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with("-----"))
        .collect();
    let der = STANDARD
        .decode(body)
        .map_err(|e| identity_error(format!("service account key is not valid base64: {e}")))?;
    RsaKeyPair::from_pkcs8(&der)
        .map_err(|e| identity_error(format!("service account key rejected: {e}")))
}

/// Signs `claims` with RS256 and returns the compact token.
pub fn sign_rs256<C: Serialize>(
    key: &RsaKeyPair,
    kid: Option<&str>,
    claims: &C,
) -> Result<String, CampusMindError> {
    let mut header = serde_json::json!({"alg": "RS256", "typ": "JWT"});
    if let Some(kid) = kid {
        header["kid"] = kid.into();
    }
    let signing_input = format!("{}.{}", encode_part(&header)?, encode_part(claims)?);

    let mut sig = vec![0u8; key.public().modulus_len()];
    key.sign(
        &signature::RSA_PKCS1_SHA256,
        &SystemRandom::new(),
        signing_input.as_bytes(),
        &mut sig,
    )
    .map_err(|_| identity_error("failed to sign assertion"))?;

    Ok(format!("{signing_input}.{}", URL_SAFE_NO_PAD.encode(sig)))
}

fn encode_part<T: Serialize + ?Sized>(value: &T) -> Result<String, CampusMindError> {
    let json = serde_json::to_vec(value)
        .map_err(|e| CampusMindError::Internal(format!("failed to encode JWT part: {e}")))?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}

/// Header fields the verifier cares about.
#[derive(Debug, serde::Deserialize)]
pub struct Header {
    pub alg: String,
    #[serde(default)]
    pub kid: Option<String>,
}

/// A compact token split into its parts. Nothing is trusted yet.
pub struct Unverified<'a> {
    pub header: Header,
    payload: &'a str,
    signing_input: &'a str,
    signature: Vec<u8>,
}

impl<'a> Unverified<'a> {
    pub fn parse(token: &'a str) -> Result<Self, CampusMindError> {
        let malformed = || CampusMindError::Unauthenticated("malformed session token".into());
        let (signing_input, sig) = token.rsplit_once('.').ok_or_else(malformed)?;
        let (header, payload) = signing_input.split_once('.').ok_or_else(malformed)?;
        if payload.contains('.') {
            return Err(malformed());
        }
        Ok(Self {
            header: decode_segment(header)?,
            payload,
            signing_input,
            signature: URL_SAFE_NO_PAD.decode(sig).map_err(|_| malformed())?,
        })
    }

    /// Checks the signature against an RSA public key given as big-endian `n` and `e`.
    pub fn verify<T: DeserializeOwned>(self, n: &[u8], e: &[u8]) -> Result<T, CampusMindError> {
        RsaPublicKeyComponents { n, e }
            .verify(
                &signature::RSA_PKCS1_2048_8192_SHA256,
                self.signing_input.as_bytes(),
                &self.signature,
            )
            .map_err(|_| CampusMindError::Unauthenticated("invalid session signature".into()))?;
        decode_segment(self.payload)
    }
}

fn decode_segment<T: DeserializeOwned>(segment: &str) -> Result<T, CampusMindError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|_| CampusMindError::Unauthenticated("malformed session token".into()))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| CampusMindError::Unauthenticated(format!("malformed session token: {e}")))
}

/// Decodes an unpadded base64url value, as used for JWK parameters.
pub fn decode_b64url(value: &str) -> Result<Vec<u8>, CampusMindError> {
    URL_SAFE_NO_PAD
        .decode(value)
        .map_err(|e| identity_error(format!("invalid base64url value: {e}")))
}
