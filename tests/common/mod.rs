//! Common test utilities

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Create a temporary directory with a Shipfile
pub fn create_test_script(content: &str) -> (TempDir, PathBuf) {
    create_named_script("Shipfile", content)
}

/// Create a temporary directory with a script under a given file name
pub fn create_named_script(name: &str, content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let script_path = temp_dir.path().join(name);
    fs::write(&script_path, content).unwrap();
    (temp_dir, script_path)
}
