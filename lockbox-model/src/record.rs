//! The capability set every object type provides to the encrypted store.

use crate::codec;
use crate::error::ModelResult;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Codec tag for each object type. Zero is never a valid tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum RecordKind {
    Entry = 1,
    File = 2,
    Note = 3,
    Card = 4,
}

impl RecordKind {
    pub fn tag(self) -> u8 {
        self as u8
    }
}

/// A partial materialization of a record.
pub trait RecordView {
    fn name(&self) -> &str;
}

/// An object type that can be stored in its own bucket.
pub trait Record: Serialize + DeserializeOwned {
    /// Bucket holding every record of this type.
    const BUCKET: &'static str;
    const KIND: RecordKind;
    /// When set, removing an absent name is an error instead of a no-op.
    const STRICT_REMOVE: bool = false;

    type View: RecordView;

    /// Primary key inside the bucket.
    fn name(&self) -> &str;

    fn set_name(&mut self, name: String);

    /// Type-specific checks beyond a non-empty name.
    fn validate(&self) -> ModelResult<()> {
        Ok(())
    }

    fn project(&self) -> Self::View;

    fn encode(&self) -> ModelResult<Vec<u8>> {
        codec::encode(Self::KIND, self)
    }

    fn decode(bytes: &[u8]) -> ModelResult<Self> {
        codec::decode(Self::KIND, bytes)
    }

    /// Decodes only what the view needs. Override when the type carries
    /// fields that are expensive to materialize.
    fn decode_view(bytes: &[u8]) -> ModelResult<Self::View> {
        Ok(Self::decode(bytes)?.project())
    }
}
