//! Parsed messages and the records handed to a search index

use crate::document::Document;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A message with its body split into recognized blocks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Message-ID header, or a synthetic id when absent
    pub message_id: String,

    /// Display name (or address) from the From header
    pub from: Option<String>,

    pub subject: String,

    /// Date header normalized to UTC
    pub date: Option<DateTime<Utc>>,

    /// Best plain-text rendition of the body, LF line endings
    pub text: String,

    pub body: Document,
}

impl Message {
    /// Flatten into an index record for `page`.
    ///
    /// Headers take precedence. A missing author or date is taken from the
    /// first attribution in the body, so both fallbacks describe the same
    /// quoted message; a name-only first attribution leaves the date empty.
    #[must_use]
    pub fn record(&self, page: impl Into<String>) -> MessageRecord {
        let first = self.body.attributions().next();
        let user = self
            .from
            .clone()
            .or_else(|| first.map(|attribution| attribution.name.clone()));
        let timestamp = self.date.or_else(|| first.and_then(|attribution| attribution.time));

        MessageRecord {
            id: self.message_id.clone(),
            page: page.into(),
            timestamp,
            user,
            title: self.subject.clone(),
            body: self.text.clone(),
        }
    }
}

/// Flat record consumed by an indexing component
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRecord {
    pub id: String,
    pub page: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub user: Option<String>,
    pub title: String,
    pub body: String,
}

impl MessageRecord {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
