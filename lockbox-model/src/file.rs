//! Stored files. Content is opaque here; callers compress it beforehand.

use crate::codec;
use crate::error::ModelResult;
use crate::record::{Record, RecordKind, RecordView};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct File {
    pub name: String,
    pub content: Vec<u8>,
    /// Unix timestamp, seconds.
    pub created_at: i64,
}

/// File metadata without the content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileSummary {
    pub name: String,
    pub size: usize,
    pub created_at: i64,
}

impl RecordView for FileSummary {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Same layout as `File`, with the content borrowed from the input buffer.
#[derive(Deserialize)]
struct FileRef<'a> {
    name: String,
    content: &'a [u8],
    created_at: i64,
}

impl File {
    /// A file stamped with the current time.
    pub fn new(name: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content,
            created_at: Utc::now().timestamp(),
        }
    }

    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.created_at, 0)
    }
}

impl Record for File {
    const BUCKET: &'static str = "lockbox_file";
    const KIND: RecordKind = RecordKind::File;

    type View = FileSummary;

    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }

    fn project(&self) -> FileSummary {
        FileSummary {
            name: self.name.clone(),
            size: self.content.len(),
            created_at: self.created_at,
        }
    }

    fn decode_view(bytes: &[u8]) -> ModelResult<FileSummary> {
        let file: FileRef<'_> = codec::decode(Self::KIND, bytes)?;
        Ok(FileSummary {
            name: file.name,
            size: file.content.len(),
            created_at: file.created_at,
        })
    }
}
