//! Shared loader for the gzip-compressed JSON vector bundles.
#![allow(dead_code)]

use std::fs::File;
use std::path::Path;

use flate2::read::GzDecoder;
use serde::de::DeserializeOwned;

/// Load and parse `tests/testdata/<name>`.
pub fn load_bundle<T: DeserializeOwned>(name: &str) -> T {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/testdata")
        .join(name);
    let file = File::open(&path).unwrap_or_else(|e| panic!("failed to open {name}: {e}"));
    serde_json::from_reader(GzDecoder::new(file))
        .unwrap_or_else(|e| panic!("failed to parse {name}: {e}"))
}

/// Decode big-endian hex into the 32-byte little-endian wire order.
pub fn le_bytes_from_be_hex(hex_str: &str) -> [u8; 32] {
    let mut bytes: [u8; 32] = hex::decode(hex_str)
        .expect("coordinate should be valid hex")
        .try_into()
        .expect("coordinate should be 32 bytes");
    bytes.reverse();
    bytes
}
