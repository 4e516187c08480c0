//! Validator key material: BLS public keys and deposit signatures.
//!
//! Keys arrive from operators as raw byte strings of arbitrary length
//! ([`NewValidatorDetails`]) and are only stored once they have been checked
//! into the fixed-width [`PubKey`] / [`ValidatorSignature`] forms.

use crate::error::KeyError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Length of a BLS12-381 public key.
pub const PUBKEY_LENGTH: usize = 48;

/// Length of a BLS12-381 deposit signature.
pub const SIGNATURE_LENGTH: usize = 96;

/// A 48-byte validator public key.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PubKey(pub [u8; PUBKEY_LENGTH]);

/// A 96-byte validator deposit signature.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ValidatorSignature(pub [u8; SIGNATURE_LENGTH]);

impl PubKey {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, KeyError> {
        let arr: [u8; PUBKEY_LENGTH] =
            bytes
                .try_into()
                .map_err(|_| KeyError::InvalidPubKeyLength {
                    expected: PUBKEY_LENGTH,
                    actual: bytes.len(),
                })?;
        Ok(Self(arr))
    }

    pub fn as_bytes(&self) -> &[u8; PUBKEY_LENGTH] {
        &self.0
    }
}

impl ValidatorSignature {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, KeyError> {
        let arr: [u8; SIGNATURE_LENGTH] =
            bytes
                .try_into()
                .map_err(|_| KeyError::InvalidSignatureLength {
                    expected: SIGNATURE_LENGTH,
                    actual: bytes.len(),
                })?;
        Ok(Self(arr))
    }

    pub fn as_bytes(&self) -> &[u8; SIGNATURE_LENGTH] {
        &self.0
    }
}

impl fmt::Display for PubKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for PubKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PubKey({self})")
    }
}

impl fmt::Display for ValidatorSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for ValidatorSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ValidatorSignature({self})")
    }
}

/// Decode an optionally `0x`-prefixed hex string.
pub fn decode_hex(s: &str) -> Result<Vec<u8>, KeyError> {
    let stripped = s.strip_prefix("0x").unwrap_or(s);
    hex::decode(stripped).map_err(|e| KeyError::InvalidHex(e.to_string()))
}

impl Serialize for PubKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PubKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        let bytes = decode_hex(&s).map_err(serde::de::Error::custom)?;
        PubKey::from_slice(&bytes).map_err(serde::de::Error::custom)
    }
}

impl Serialize for ValidatorSignature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ValidatorSignature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        let bytes = decode_hex(&s).map_err(serde::de::Error::custom)?;
        ValidatorSignature::from_slice(&bytes).map_err(serde::de::Error::custom)
    }
}

/// Hex (de)serialization for unchecked byte strings.
mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("0x{}", hex::encode(bytes)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        super::decode_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// A stored validator key record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorDetails {
    pub pub_key: PubKey,
    pub signature: ValidatorSignature,
}

/// Validator key material as submitted by an operator, not yet length-checked.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewValidatorDetails {
    #[serde(with = "hex_bytes")]
    pub pub_key: Vec<u8>,
    #[serde(with = "hex_bytes")]
    pub signature: Vec<u8>,
}

impl NewValidatorDetails {
    pub fn new(pub_key: impl Into<Vec<u8>>, signature: impl Into<Vec<u8>>) -> Self {
        Self {
            pub_key: pub_key.into(),
            signature: signature.into(),
        }
    }

    /// Check lengths and convert into a storable record.
    pub fn validate(&self) -> Result<ValidatorDetails, KeyError> {
        Ok(ValidatorDetails {
            pub_key: PubKey::from_slice(&self.pub_key)?,
            signature: ValidatorSignature::from_slice(&self.signature)?,
        })
    }
}
