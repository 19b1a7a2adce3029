//! Archive encoding for dictionary and text payloads.
//!
//! Both go through `serde_json`. Generic payloads bypass this module and are
//! stored byte-for-byte.

use serde_json::{Map, Value};

/// String-keyed map of arbitrary values.
pub type Dictionary = Map<String, Value>;

pub fn encode_dictionary(dict: &Dictionary) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(dict)
}

pub fn decode_dictionary(bytes: &[u8]) -> Result<Dictionary, serde_json::Error> {
    serde_json::from_slice(bytes)
}

pub fn encode_text(text: &str) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(text)
}

pub fn decode_text(bytes: &[u8]) -> Result<String, serde_json::Error> {
    serde_json::from_slice(bytes)
}
