//! Payment cards.

use crate::error::{ModelError, ModelResult};
use crate::record::{Record, RecordKind, RecordView};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub name: String,
    pub card_type: String,
    pub number: String,
    pub security_code: String,
    pub expire_date: String,
    pub notes: String,
}

/// Card without its number and security code.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardSummary {
    pub name: String,
    pub card_type: String,
    pub expire_date: String,
}

impl RecordView for CardSummary {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Record for Card {
    const BUCKET: &'static str = "lockbox_card";
    const KIND: RecordKind = RecordKind::Card;

    type View = CardSummary;

    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }

    fn validate(&self) -> ModelResult<()> {
        let digits_only = self
            .number
            .chars()
            .all(|c| c.is_ascii_digit() || c == ' ' || c == '-');
        if !digits_only {
            return Err(ModelError::Validation(
                "card number may only contain digits, spaces and dashes".into(),
            ));
        }
        Ok(())
    }

    fn project(&self) -> CardSummary {
        CardSummary {
            name: self.name.clone(),
            card_type: self.card_type.clone(),
            expire_date: self.expire_date.clone(),
        }
    }
}
