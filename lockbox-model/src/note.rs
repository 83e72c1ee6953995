//! Free-form secure notes.

use crate::record::{Record, RecordKind, RecordView};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub name: String,
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NoteSummary {
    pub name: String,
    pub length: usize,
}

impl RecordView for NoteSummary {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Record for Note {
    const BUCKET: &'static str = "lockbox_note";
    const KIND: RecordKind = RecordKind::Note;

    type View = NoteSummary;

    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }

    fn project(&self) -> NoteSummary {
        NoteSummary {
            name: self.name.clone(),
            length: self.text.chars().count(),
        }
    }
}
