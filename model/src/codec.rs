// Copyright(C) Mundis.
//! The canonical binary encoding shared by hashing, the wire and storage.
//!
//! Integers are fixed width little endian, sequences and strings are prefixed with a `u64`
//! length, and struct fields follow declaration order. Decoding refuses trailing bytes and
//! anything larger than [`MAX_ENCODED_LEN`].

use {
    crate::{
        error::ModelResult,
        hash::{Hash, Hasher},
        sanitize::Sanitize,
    },
    bincode::Options,
    serde::{de::DeserializeOwned, Serialize},
};

/// Upper bound on a single decoded value.
pub const MAX_ENCODED_LEN: u64 = 1024 * 1024;

fn encoder() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .with_little_endian()
}

fn decoder() -> impl Options {
    encoder()
        .with_limit(MAX_ENCODED_LEN)
        .reject_trailing_bytes()
}

pub fn encode<T: Serialize + ?Sized>(value: &T) -> ModelResult<Vec<u8>> {
    Ok(encoder().serialize(value)?)
}

pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> ModelResult<T> {
    Ok(decoder().deserialize(bytes)?)
}

/// Decodes `bytes` and rejects values that are structurally unusable.
pub fn decode_sanitized<T: DeserializeOwned + Sanitize>(bytes: &[u8]) -> ModelResult<T> {
    let value: T = decode(bytes)?;
    value.sanitize()?;
    Ok(value)
}

/// SHA-256 of the canonical encoding of `value`.
pub fn digest<T: Serialize + ?Sized>(value: &T) -> Hash {
    let mut hasher = Hasher::default();
    // Model types are plain structs, sequences and validated strings: the encoder has no
    // size limit and writing into a hasher cannot fail.
    encoder()
        .serialize_into(&mut hasher, value)
        .expect("canonical encoding of model values is infallible");
    hasher.result()
}
