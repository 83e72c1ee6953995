//! Secret buffer for the master credential.

use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// The master credential, held only for as long as key derivation needs it.
///
/// Not `Clone`: there is exactly one copy, and it is zeroed when dropped on
/// every path (including early returns and unwinding).
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct Credential {
    bytes: Vec<u8>,
}

impl Credential {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn expose_secret(&self) -> &[u8] {
        &self.bytes
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl From<&str> for Credential {
    fn from(s: &str) -> Self {
        Self::new(s.as_bytes().to_vec())
    }
}

impl From<String> for Credential {
    fn from(s: String) -> Self {
        Self::new(s.into_bytes())
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential([REDACTED])")
    }
}
