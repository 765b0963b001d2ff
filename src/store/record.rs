//! DNS record and zone value types.

use std::fmt;

/// Record types this agent manages or removes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordType {
    /// IPv4 address record
    A,
    /// IPv6 address record
    Aaaa,
    /// Canonical name record (only ever deleted)
    Cname,
}

impl RecordType {
    /// Returns the DNS mnemonic (`A`, `AAAA`, `CNAME`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::Aaaa => "AAAA",
            Self::Cname => "CNAME",
        }
    }

    /// Parses a DNS mnemonic, case-insensitively.
    #[must_use]
    pub fn from_mnemonic(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "A" => Some(Self::A),
            "AAAA" => Some(Self::Aaaa),
            "CNAME" => Some(Self::Cname),
            _ => None,
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A DNS resource record as seen by the agent.
///
/// `answers` holds the textual form of each answer, in store order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Store-assigned identity; `None` until the record is created
    pub id: Option<String>,
    /// Zone the record lives in
    pub zone: String,
    /// Fully qualified record name
    pub name: String,
    /// Record type
    pub record_type: RecordType,
    /// Time to live in seconds
    pub ttl: u32,
    /// Answer values
    pub answers: Vec<String>,
}

impl Record {
    /// Creates a record without an identity.
    #[must_use]
    pub fn new(
        zone: impl Into<String>,
        name: impl Into<String>,
        record_type: RecordType,
        ttl: u32,
        answers: Vec<String>,
    ) -> Self {
        Self {
            id: None,
            zone: zone.into(),
            name: name.into(),
            record_type,
            ttl,
            answers,
        }
    }

    /// Sets the store identity.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// Zone metadata returned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneInfo {
    /// Store-assigned identity, if reported
    pub id: Option<String>,
    /// Zone name
    pub zone: String,
}
