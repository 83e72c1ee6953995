//! Encryption layer for lockbox.
//!
//! Provides per-record encryption using:
//! - Argon2id for key derivation from the master credential
//! - ChaCha20-Poly1305 for authenticated encryption
//! - Secret buffers and keys that are zeroed when dropped
//!
//! # Architecture
//!
//! A single **session key** is derived from the master credential and a
//! per-store salt when a store is opened. It is never persisted. Every
//! record is sealed independently under that key with a fresh random nonce,
//! so a flipped bit in one record never affects another.
//!
//! Opening a blob distinguishes two failure classes:
//! - [`CryptoError::Authentication`]: the tag did not verify (wrong key or
//!   tampered bytes).
//! - [`CryptoError::Malformed`]: the blob is too short to even hold a nonce
//!   and a tag.

mod cipher;
mod error;
mod key;
mod secret;

pub use cipher::{EncryptedData, NONCE_SIZE, TAG_SIZE, decrypt, encrypt, open, seal};
pub use error::{CryptoError, CryptoResult};
pub use key::{DerivedKey, KEY_SIZE, KdfParams, SALT_SIZE, Salt, derive_key, generate_random_key};
pub use secret::Credential;
