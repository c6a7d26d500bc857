//! Provider-agnostic DNS record model
//!
//! - [`ResourceRecord`]: a record as the caller sees it (name, type, data, TTL, optional ID)
//! - [`RecordType`]: the record type mnemonic
//! - [`MatchKey`]: the `(name, type)` pair used to correlate records without an ID

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::Error;

/// Opaque provider-assigned record identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Wrap a provider identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw identifier
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for RecordId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// DNS record type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RecordType {
    /// IPv4 address
    A,
    /// IPv6 address
    Aaaa,
    /// Canonical name
    Cname,
    /// Mail exchanger (`data` is `"<priority> <host>"`)
    Mx,
    /// Name server
    Ns,
    /// Free-form text
    Txt,
    /// Service locator (`data` is `"<priority> <weight> <port> <target>"`)
    Srv,
    /// Certification authority authorization
    Caa,
    /// TLS certificate association
    Tlsa,
    /// Delegation signer
    Ds,
    /// SSH fingerprint
    Sshfp,
    /// S/MIME certificate association
    Smimea,
    /// OpenPGP public key
    Openpgpkey,
    /// Any other type, stored as its upper-case mnemonic
    Other(String),
}

impl RecordType {
    /// The upper-case mnemonic of this type
    pub fn as_str(&self) -> &str {
        match self {
            Self::A => "A",
            Self::Aaaa => "AAAA",
            Self::Cname => "CNAME",
            Self::Mx => "MX",
            Self::Ns => "NS",
            Self::Txt => "TXT",
            Self::Srv => "SRV",
            Self::Caa => "CAA",
            Self::Tlsa => "TLSA",
            Self::Ds => "DS",
            Self::Sshfp => "SSHFP",
            Self::Smimea => "SMIMEA",
            Self::Openpgpkey => "OPENPGPKEY",
            Self::Other(name) => name,
        }
    }

    /// Whether the first token of `data` is a priority value
    pub fn has_priority(&self) -> bool {
        matches!(self, Self::Mx | Self::Srv)
    }
}

impl FromStr for RecordType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        Ok(match upper.as_str() {
            "" => return Err(Error::invalid_input("record type cannot be empty")),
            "A" => Self::A,
            "AAAA" => Self::Aaaa,
            "CNAME" => Self::Cname,
            "MX" => Self::Mx,
            "NS" => Self::Ns,
            "TXT" => Self::Txt,
            "SRV" => Self::Srv,
            "CAA" => Self::Caa,
            "TLSA" => Self::Tlsa,
            "DS" => Self::Ds,
            "SSHFP" => Self::Sshfp,
            "SMIMEA" => Self::Smimea,
            "OPENPGPKEY" => Self::Openpgpkey,
            _ => {
                if !upper.chars().all(|c| c.is_ascii_alphanumeric()) {
                    return Err(Error::invalid_input(format!(
                        "invalid record type mnemonic: {}",
                        s
                    )));
                }
                Self::Other(upper)
            }
        })
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for RecordType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RecordType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A provider-agnostic DNS record
///
/// `name` is relative to the zone (`"@"` for the apex). `id` is absent for
/// records that have not been created yet or whose identifier the caller
/// does not track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRecord {
    /// Provider-assigned identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,

    /// Record name relative to the zone
    pub name: String,

    /// Record type
    #[serde(rename = "type")]
    pub record_type: RecordType,

    /// Type-dependent payload
    pub data: String,

    /// Time-to-live, when the provider supports per-record TTLs
    #[serde(
        default,
        rename = "ttl_secs",
        with = "ttl_secs",
        skip_serializing_if = "Option::is_none"
    )]
    pub ttl: Option<Duration>,
}

impl ResourceRecord {
    /// Create a record without TTL or ID
    pub fn new(name: impl Into<String>, record_type: RecordType, data: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            record_type,
            data: data.into(),
            ttl: None,
        }
    }

    /// Set the provider ID
    pub fn with_id(mut self, id: impl Into<RecordId>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the TTL
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// The `(name, type)` key of this record
    pub fn match_key(&self) -> MatchKey {
        MatchKey::new(&self.name, self.record_type.clone())
    }

    /// Compare name, type, data and TTL. The ID is ignored.
    pub fn full_eq(&self, other: &Self) -> bool {
        self.identity_eq(other) && self.data == other.data && self.ttl == other.ttl
    }

    /// Compare only name and type
    pub fn identity_eq(&self, other: &Self) -> bool {
        self.match_key() == other.match_key()
    }
}

impl fmt::Display for ResourceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} \"{}\"", self.name, self.record_type, self.data)?;
        if let Some(ttl) = self.ttl {
            write!(f, " ttl={}s", ttl.as_secs())?;
        }
        if let Some(ref id) = self.id {
            write!(f, " id={}", id)?;
        }
        Ok(())
    }
}

/// The `(name, type)` pair used to correlate records lacking an ID
///
/// Names are DNS names, so they compare ASCII case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MatchKey {
    name: String,
    record_type: RecordType,
}

impl MatchKey {
    /// Build a key from a record name and type
    pub fn new(name: &str, record_type: RecordType) -> Self {
        Self {
            name: name.to_ascii_lowercase(),
            record_type,
        }
    }

    /// Normalized (lower-case) name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Record type
    pub fn record_type(&self) -> &RecordType {
        &self.record_type
    }
}

impl fmt::Display for MatchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.record_type)
    }
}

mod ttl_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(ttl: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match ttl {
            Some(ttl) => serializer.serialize_some(&ttl.as_secs()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_type_parse() {
        assert_eq!("txt".parse::<RecordType>().unwrap(), RecordType::Txt);
        assert_eq!("AAAA".parse::<RecordType>().unwrap(), RecordType::Aaaa);
        assert_eq!(
            "hinfo".parse::<RecordType>().unwrap(),
            RecordType::Other("HINFO".to_string())
        );
        assert!("".parse::<RecordType>().is_err());
        assert!("a b".parse::<RecordType>().is_err());
    }

    #[test]
    fn test_full_and_identity_equality() {
        let original = ResourceRecord::new("test", RecordType::Txt, "testval1");
        let edited = ResourceRecord::new("test", RecordType::Txt, "testval1edit");
        let with_id = original.clone().with_id("42");

        assert!(original.full_eq(&with_id), "ID is not part of full equality");
        assert!(!original.full_eq(&edited));
        assert!(original.identity_eq(&edited));
        assert!(!original.full_eq(&original.clone().with_ttl(Duration::from_secs(300))));
    }

    #[test]
    fn test_match_key_ignores_name_case() {
        let upper = ResourceRecord::new("WWW", RecordType::A, "192.0.2.1");
        let lower = ResourceRecord::new("www", RecordType::A, "192.0.2.2");
        let other_type = ResourceRecord::new("www", RecordType::Aaaa, "2001:db8::1");

        assert_eq!(upper.match_key(), lower.match_key());
        assert_ne!(lower.match_key(), other_type.match_key());
        assert_eq!(upper.match_key().name(), "www");
    }

    #[test]
    fn test_record_serde_shape() {
        let record = ResourceRecord::new("mail", RecordType::Mx, "10 mx.example.com")
            .with_ttl(Duration::from_secs(3600))
            .with_id("7");

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["type"], "MX");
        assert_eq!(json["ttl_secs"], 3600);
        assert_eq!(json["id"], "7");

        let back: ResourceRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_display() {
        let record = ResourceRecord::new("test", RecordType::Txt, "v").with_id("9");
        assert_eq!(record.to_string(), "test TXT \"v\" id=9");
    }
}
