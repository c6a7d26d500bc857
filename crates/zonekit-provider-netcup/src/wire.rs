//! netcup CCP JSON API wire format
//!
//! Every call is a POST of `{"action": ..., "param": {...}}` and answers with
//! a status envelope whose `responsedata` is action-specific (and an empty
//! string on errors).

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use zonekit_core::{RecordId, RecordType, ResourceRecord};

/// Failures translating between netcup records and [`ResourceRecord`]
#[derive(Error, Debug, PartialEq, Eq)]
pub enum WireError {
    /// A listed record came back without an ID
    #[error("record {0} has no id")]
    MissingId(String),

    /// Record type the core model rejects
    #[error("invalid record type: {0}")]
    InvalidType(String),

    /// MX/SRV data must start with a numeric priority
    #[error("{record_type} data must start with a priority, got {data:?}")]
    InvalidPriority {
        /// Record type mnemonic
        record_type: String,
        /// Offending data
        data: String,
    },
}

#[derive(Debug, Serialize)]
pub(crate) struct Request<'a, P> {
    pub action: &'a str,
    pub param: P,
}

#[derive(Debug, Serialize)]
pub(crate) struct LoginParam<'a> {
    pub customernumber: &'a str,
    pub apikey: &'a str,
    pub apipassword: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct SessionParam<'a> {
    pub customernumber: &'a str,
    pub apikey: &'a str,
    pub apisessionid: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct ZoneParam<'a> {
    pub domainname: &'a str,
    pub customernumber: &'a str,
    pub apikey: &'a str,
    pub apisessionid: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct UpdateRecordsParam<'a> {
    pub domainname: &'a str,
    pub customernumber: &'a str,
    pub apikey: &'a str,
    pub apisessionid: &'a str,
    pub dnsrecordset: RecordSet,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct RecordSet {
    #[serde(default)]
    pub dnsrecords: Vec<WireRecord>,
}

/// Status envelope common to every response
#[derive(Debug, Deserialize)]
pub(crate) struct Response {
    pub status: String,
    #[serde(default)]
    pub statuscode: u32,
    #[serde(default)]
    pub shortmessage: String,
    #[serde(default)]
    pub longmessage: Option<String>,
    #[serde(default)]
    pub responsedata: serde_json::Value,
}

impl Response {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }

    pub fn describe(&self) -> String {
        match self.longmessage.as_deref() {
            Some(long) if !long.is_empty() => {
                format!("{} ({}): {}", self.shortmessage, self.statuscode, long)
            }
            _ => format!("{} ({})", self.shortmessage, self.statuscode),
        }
    }

    pub fn data<T: serde::de::DeserializeOwned>(self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.responsedata)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginData {
    pub apisessionid: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ZoneInfo {
    #[serde(deserialize_with = "string_or_number")]
    pub ttl: String,
}

/// A DNS record as netcup represents it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireRecord {
    /// Record ID; absent when creating
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Host name relative to the zone, `@` for the apex
    pub hostname: String,
    /// Type mnemonic
    #[serde(rename = "type")]
    pub record_type: String,
    /// MX/SRV priority
    #[serde(default, deserialize_with = "string_or_number")]
    pub priority: String,
    /// Type-dependent payload without the priority
    pub destination: String,
    /// Set to delete the record in an update call
    #[serde(default)]
    pub deleterecord: bool,
    /// Provisioning state reported by netcup
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

impl WireRecord {
    /// Build the wire form of `record`, targeting `id` when given
    pub fn from_record(record: &ResourceRecord, id: Option<&RecordId>) -> Result<Self, WireError> {
        let (priority, destination) = if record.record_type.has_priority() {
            split_priority(record)?
        } else {
            (String::new(), record.data.clone())
        };

        Ok(Self {
            id: id.map(|id| id.as_str().to_string()),
            hostname: record.name.clone(),
            record_type: record.record_type.to_string(),
            priority,
            destination,
            deleterecord: false,
            state: None,
        })
    }

    /// Convert to the core model; netcup has no per-record TTL
    pub fn to_record(&self) -> Result<ResourceRecord, WireError> {
        let id = self
            .id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| WireError::MissingId(format!("{} {}", self.hostname, self.record_type)))?;

        let record_type: RecordType = self
            .record_type
            .parse()
            .map_err(|_| WireError::InvalidType(self.record_type.clone()))?;

        let priority = self.priority.trim();
        let data = if record_type.has_priority() && !priority.is_empty() {
            format!("{} {}", priority, self.destination)
        } else {
            self.destination.clone()
        };

        Ok(ResourceRecord::new(self.hostname.clone(), record_type, data).with_id(id))
    }

    /// Whether this is the wire form of `record`, ignoring ID and TTL
    pub fn describes(&self, record: &ResourceRecord) -> bool {
        let Ok(listed) = self.to_record() else {
            return false;
        };
        listed.identity_eq(record) && listed.data == record.data
    }
}

fn split_priority(record: &ResourceRecord) -> Result<(String, String), WireError> {
    let invalid = || WireError::InvalidPriority {
        record_type: record.record_type.to_string(),
        data: record.data.clone(),
    };

    let (priority, rest) = record.data.trim().split_once(char::is_whitespace).ok_or_else(invalid)?;
    if priority.parse::<u16>().is_err() {
        return Err(invalid());
    }
    Ok((priority.to_string(), rest.trim_start().to_string()))
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, got {}",
            other
        ))),
    }
}
