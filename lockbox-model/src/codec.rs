//! Tagged bincode encoding.
//!
//! Layout: `[kind tag] ++ bincode(value)` using fixed-width integers.
//! Decoding rejects a mismatched tag, truncated input, and trailing bytes,
//! so a payload of another type or random bytes never decodes silently.

use crate::error::{ModelError, ModelResult};
use crate::record::RecordKind;
use bincode::Options;
use serde::{Deserialize, Serialize};

/// Upper bound on a single encoded record.
pub const MAX_ENCODED_SIZE: u64 = 256 * 1024 * 1024;

fn options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .reject_trailing_bytes()
        .with_limit(MAX_ENCODED_SIZE)
}

/// Encodes `value` behind its kind tag.
///
/// The output is allocated once at its final size, so no stale partial copy
/// of the plaintext is left on the heap.
pub fn encode<T: Serialize + ?Sized>(kind: RecordKind, value: &T) -> ModelResult<Vec<u8>> {
    let size = options()
        .serialized_size(value)
        .map_err(|e| ModelError::Encode(e.to_string()))?;
    let capacity = usize::try_from(size)
        .map_err(|_| ModelError::Encode(format!("{size} bytes does not fit in memory")))?
        + 1;
    let mut out = Vec::with_capacity(capacity);
    out.push(kind.tag());
    options()
        .serialize_into(&mut out, value)
        .map_err(|e| ModelError::Encode(e.to_string()))?;
    Ok(out)
}

pub fn decode<'a, T: Deserialize<'a>>(kind: RecordKind, bytes: &'a [u8]) -> ModelResult<T> {
    let (tag, body) = bytes
        .split_first()
        .ok_or_else(|| ModelError::Decode("empty payload".to_string()))?;
    if *tag != kind.tag() {
        return Err(ModelError::Decode(format!(
            "expected {kind:?} tag {}, found {tag}",
            kind.tag()
        )));
    }
    options()
        .deserialize(body)
        .map_err(|e| ModelError::Decode(e.to_string()))
}
