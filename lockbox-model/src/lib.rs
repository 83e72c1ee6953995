//! Record types for lockbox and their binary codec.
//!
//! Every object type implements [`Record`], which tells the encrypted store
//! which bucket the type lives in, how to extract its primary key, how to
//! validate it, and how to build its cheap [`RecordView`]. Encoding is a
//! one-byte [`RecordKind`] tag followed by a fixed-int bincode body.

mod card;
pub mod codec;
mod entry;
mod error;
mod file;
mod note;
mod record;

pub use card::{Card, CardSummary};
pub use entry::{Entry, EntrySummary, NEVER_EXPIRES};
pub use error::{ModelError, ModelResult};
pub use file::{File, FileSummary};
pub use note::{Note, NoteSummary};
pub use record::{Record, RecordKind, RecordView};
