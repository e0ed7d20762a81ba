use serde::{Deserialize, Serialize};

// ════════════════════════════════════════════════════════════════
//  Record
// ════════════════════════════════════════════════════════════════

/// One persisted observation for a device, as handed out by storage.
///
/// `data` is opaque to storage; only the resolver interprets it as an
/// [`Event`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Origin-assigned id, not unique across devices.
    pub id: i64,
    #[serde(default)]
    pub device_id: String,
    /// Unix seconds the record was written.
    #[serde(default)]
    pub birth_date: i64,
    /// Unix seconds after which the record must not be served.
    /// `0` means unset and counts as already expired.
    #[serde(default)]
    pub death_date: i64,
    #[serde(default, with = "base64_bytes")]
    pub data: Vec<u8>,
}

impl Record {
    /// A record is live only while `death_date` is strictly in the future.
    pub fn is_expired_at(&self, now_secs: i64) -> bool {
        self.death_date <= now_secs
    }
}

// ════════════════════════════════════════════════════════════════
//  Event
// ════════════════════════════════════════════════════════════════

/// Decoded, caller-facing last known state of a device.
///
/// The serde form of this struct is the canonical encoding: it is both
/// what storage holds in [`Record::data`] and what the HTTP API returns.
/// Any JSON object decodes: missing or `null` fields take their zero value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Event {
    #[serde(deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub time: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub source: String,
    #[serde(deserialize_with = "null_as_default")]
    pub destination: String,
    #[serde(deserialize_with = "null_as_default")]
    pub partner_ids: Vec<String>,
    /// Raw inner content, base64 in JSON.
    #[serde(with = "base64_bytes")]
    pub payload: Vec<u8>,
}

impl Event {
    /// Decode an event from its canonical JSON bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    /// Encode to canonical JSON bytes.
    pub fn to_vec(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Byte blobs travel as standard base64 strings.
mod base64_bytes {
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
        serializer.serialize_str(&encoded)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
        base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .map_err(serde::de::Error::custom)
    }
}
