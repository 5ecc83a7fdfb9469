//! Raw bytes of a fetched resource.
//!
//! Resources are binary. Over a text-oriented transport they travel as a
//! "binary string": one character per byte, decoded with the
//! `x-user-defined` charset. That charset maps 0x00-0x7F to themselves and
//! 0x80-0xFF to U+F780-U+F7FF, so the low 8 bits of every character are the
//! original byte.

/// Bytes of one fetched resource, moved around as a single opaque blob.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Payload(Vec<u8>);

impl Payload {
    /// Wrap fetched bytes.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Decode a binary string by keeping the low 8 bits of each character.
    ///
    /// This is how a runtime filesystem coerces string content into file
    /// bytes, so both `x-user-defined` and latin-1 strings decode correctly.
    pub fn from_binary_string(text: &str) -> Self {
        Self(text.chars().map(|c| (c as u32 & 0xFF) as u8).collect())
    }

    /// Encode as an `x-user-defined` binary string.
    pub fn to_binary_string(&self) -> String {
        self.0
            .iter()
            .map(|&b| match b {
                0x00..=0x7F => b as char,
                // U+F780..U+F7FF, always a valid scalar value
                _ => char::from_u32(0xF700 + b as u32).unwrap_or(char::REPLACEMENT_CHARACTER),
            })
            .collect()
    }

    /// Borrow the bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Take the bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True for an empty resource.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for Payload {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Payload {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}
