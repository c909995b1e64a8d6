//! Scalar value types shared by every Koios endpoint.
//!
//! Koios serializes most identifiers as plain JSON strings and most counters
//! as numbers, but the wire format is not always consistent: large amounts
//! arrive as decimal strings, some hashes arrive double-quoted, timestamps are
//! unix seconds (or `null`), and transaction metadata comes in two shapes.
//! The wrappers below normalize those differences at the serde boundary so
//! that endpoint types can use them as ordinary fields.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};

/// Either a JSON number or a JSON string carrying a number.
#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Unsigned(u128),
    Float(f64),
    Text(String),
}

fn parse_unsigned<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u128, D::Error> {
    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Unsigned(n) => Ok(n),
        NumberOrString::Float(f) if f >= 0.0 && f.fract() == 0.0 => Ok(f as u128),
        NumberOrString::Float(f) => Err(de::Error::custom(format!(
            "expected a non-negative integer, got {f}"
        ))),
        NumberOrString::Text(s) => s
            .trim()
            .parse::<u128>()
            .map_err(|e| de::Error::custom(format!("invalid integer string {s:?}: {e}"))),
    }
}

/// Remove one level of JSON string quoting, as found on hashes that the
/// server double-encodes (`"\"abcd\""`).
fn unquote(raw: String) -> String {
    let trimmed = raw.trim();
    if trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"') {
        trimmed[1..trimmed.len() - 1].to_string()
    } else {
        raw
    }
}

macro_rules! string_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Borrow the canonical string form.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Borrow the canonical form as bytes.
            pub fn as_bytes(&self) -> &[u8] {
                self.0.as_bytes()
            }

            pub fn is_empty(&self) -> bool {
                self.0.trim().is_empty()
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                String::deserialize(deserializer).map(|s| Self(unquote(s)))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

macro_rules! number_type {
    ($(#[$meta:meta])* $name:ident($inner:ty)) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        #[serde(transparent)]
        pub struct $name(pub $inner);

        impl $name {
            pub fn get(self) -> $inner {
                self.0
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let n = parse_unsigned(deserializer)?;
                <$inner>::try_from(n)
                    .map(Self)
                    .map_err(|_| de::Error::custom(format!("{n} out of range for {}", stringify!($name))))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<$inner> for $name {
            fn from(value: $inner) -> Self {
                Self(value)
            }
        }
    };
}

string_type!(
    /// Bech32 payment address (`addr1...`, `addr_test1...`).
    Address
);
string_type!(
    /// Bech32 stake address (`stake1...`), the account identifier.
    StakeAddress
);
string_type!(
    /// Bech32 pool id (`pool1...`).
    PoolId
);
string_type!(
    /// Hex-encoded transaction hash.
    TxHash
);
string_type!(
    /// Hex-encoded block hash.
    BlockHash
);
string_type!(
    /// Hex-encoded script hash.
    ScriptHash
);
string_type!(
    /// Hex-encoded datum hash.
    DatumHash
);
string_type!(
    /// Hex-encoded minting policy id.
    PolicyId
);
string_type!(
    /// Hex-encoded asset name (may be empty for the policy's nameless asset).
    AssetName
);
string_type!(
    /// CIP-14 asset fingerprint (`asset1...`).
    AssetFingerprint
);

number_type!(
    /// Epoch number.
    EpochNo(u32)
);
number_type!(
    /// Absolute slot number.
    Slot(u64)
);
number_type!(
    /// Block height.
    BlockHeight(u64)
);

/// Amount of lovelace (1 ADA = 1 000 000 lovelace).
///
/// The API sends amounts as decimal strings to avoid precision loss in
/// JavaScript clients; both strings and numbers are accepted on decode and the
/// value is always encoded back as a string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Lovelace(pub u128);

impl Serialize for Lovelace {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for Lovelace {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        parse_unsigned(deserializer).map(Self)
    }
}

impl fmt::Display for Lovelace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Point in time carried on the wire as unix seconds.
///
/// `null` decodes to the zero timestamp (the unix epoch) and the zero
/// timestamp encodes back to `null`, so absent times survive a round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Timestamp(pub DateTime<Utc>);

impl Timestamp {
    pub const ZERO: Timestamp = Timestamp(DateTime::<Utc>::UNIX_EPOCH);

    pub fn from_unix(secs: i64) -> Option<Self> {
        DateTime::<Utc>::from_timestamp(secs, 0).map(Self)
    }

    pub fn unix(&self) -> i64 {
        self.0.timestamp()
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.is_zero() {
            serializer.serialize_none()
        } else {
            serializer.serialize_i64(self.unix())
        }
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Wire {
            Seconds(i64),
            Fractional(f64),
            Text(String),
        }

        let out_of_range = |secs| de::Error::custom(format!("timestamp {secs} out of range"));
        match Option::<Wire>::deserialize(deserializer)? {
            None => Ok(Self::ZERO),
            Some(Wire::Seconds(secs)) => Self::from_unix(secs).ok_or_else(|| out_of_range(secs)),
            Some(Wire::Fractional(f)) => {
                let secs = f.trunc() as i64;
                Self::from_unix(secs).ok_or_else(|| out_of_range(secs))
            }
            Some(Wire::Text(s)) if s.trim().is_empty() => Ok(Self::ZERO),
            Some(Wire::Text(s)) => {
                if let Ok(secs) = s.trim().parse::<i64>() {
                    return Self::from_unix(secs).ok_or_else(|| out_of_range(secs));
                }
                DateTime::parse_from_rfc3339(s.trim())
                    .map(|dt| Self(dt.with_timezone(&Utc)))
                    .map_err(|e| de::Error::custom(format!("invalid timestamp {s:?}: {e}")))
            }
        }
    }
}

/// Transaction metadata keyed by label.
///
/// Depending on the endpoint the server returns either a list of
/// `{"key": label, "json": value}` objects or a plain `{label: value}` object.
/// Decoding tries the list shape first, then the object shape, and treats
/// `null` as empty. Encoding always produces the object shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TxMetadata(pub BTreeMap<String, serde_json::Value>);

impl TxMetadata {
    pub fn get(&self, label: &str) -> Option<&serde_json::Value> {
        self.0.get(label)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl<'de> Deserialize<'de> for TxMetadata {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Entry {
            key: serde_json::Value,
            #[serde(default)]
            json: serde_json::Value,
        }

        let label = |key: serde_json::Value| match key {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        };

        match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::Null => Ok(Self::default()),
            serde_json::Value::Array(items) => items
                .into_iter()
                .map(|item| {
                    serde_json::from_value::<Entry>(item)
                        .map(|e| (label(e.key), e.json))
                        .map_err(de::Error::custom)
                })
                .collect::<Result<_, _>>()
                .map(Self),
            serde_json::Value::Object(map) => Ok(Self(map.into_iter().collect())),
            other => Err(de::Error::custom(format!(
                "unexpected metadata shape: {other}"
            ))),
        }
    }
}
