//! Password entries.

use crate::error::{ModelError, ModelResult};
use crate::record::{Record, RecordKind, RecordView};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// `expires` value for entries that never expire.
pub const NEVER_EXPIRES: &str = "Never";

/// A login entry, keyed by its title.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub title: String,
    pub username: String,
    pub password: String,
    pub url: String,
    pub notes: String,
    /// `"Never"`, empty, or an RFC 3339 timestamp.
    pub expires: String,
}

/// Entry without its password and notes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntrySummary {
    pub title: String,
    pub username: String,
    pub url: String,
    pub expires: String,
}

impl RecordView for EntrySummary {
    fn name(&self) -> &str {
        &self.title
    }
}

impl Entry {
    /// Parsed expiry, `None` for entries that never expire.
    pub fn expiry(&self) -> ModelResult<Option<DateTime<Utc>>> {
        let raw = self.expires.trim();
        if raw.is_empty() || raw.eq_ignore_ascii_case(NEVER_EXPIRES) {
            return Ok(None);
        }
        DateTime::parse_from_rfc3339(raw)
            .map(|t| Some(t.with_timezone(&Utc)))
            .map_err(|e| ModelError::Validation(format!("invalid expiry {raw:?}: {e}")))
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        matches!(self.expiry(), Ok(Some(t)) if t <= now)
    }
}

impl Record for Entry {
    const BUCKET: &'static str = "lockbox_entry";
    const KIND: RecordKind = RecordKind::Entry;

    type View = EntrySummary;

    fn name(&self) -> &str {
        &self.title
    }

    fn set_name(&mut self, name: String) {
        self.title = name;
    }

    fn validate(&self) -> ModelResult<()> {
        if self.title.trim().is_empty() {
            return Err(ModelError::Validation("entry title must not be empty".into()));
        }
        self.expiry().map(|_| ())
    }

    fn project(&self) -> EntrySummary {
        EntrySummary {
            title: self.title.clone(),
            username: self.username.clone(),
            url: self.url.clone(),
            expires: self.expires.clone(),
        }
    }
}
