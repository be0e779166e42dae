#![cfg(test)]

use std::path::PathBuf;

/// Unique temp file path per test so parallel tests never share a snapshot.
pub fn temp_data_file(prefix: &str) -> PathBuf {
    std::env::temp_dir().join(format!("{}_{}.json", prefix, uuid::Uuid::new_v4()))
}
