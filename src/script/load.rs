//! Script file discovery and loading

use crate::error::{Result, ScriptError, ScriptResult};
use crate::runner::{Plan, Registry};
use crate::script::parse_script;
use std::fs;
use std::path::{Path, PathBuf};

/// Script path used when none is given
pub const DEFAULT_SCRIPT: &str = "Shipfile";

/// Extension tried when the exact path does not exist
pub const SCRIPT_EXTENSION: &str = "ship";

/// Find a script: the exact path first, then `<path>.ship`
pub fn find_script_file(path: &Path) -> ScriptResult<PathBuf> {
    if path.is_file() {
        return Ok(path.to_path_buf());
    }

    let mut with_ext = path.as_os_str().to_owned();
    with_ext.push(".");
    with_ext.push(SCRIPT_EXTENSION);
    let with_ext = PathBuf::from(with_ext);
    if with_ext.is_file() {
        return Ok(with_ext);
    }

    Err(ScriptError::NotFound {
        path: path.to_path_buf(),
    })
}

/// Read a script file fully into memory; invalid UTF-8 is replaced, not rejected
pub fn read_script(path: &Path) -> ScriptResult<String> {
    let bytes = fs::read(path).map_err(|e| ScriptError::Read {
        path: path.to_path_buf(),
        error: e.to_string(),
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Discover, read and parse a script
pub fn load_script(path: &Path, registry: &Registry) -> Result<(Plan, PathBuf)> {
    let script_path = find_script_file(path)?;
    let source = read_script(&script_path)?;
    let plan = parse_script(&source, registry)?;
    Ok((plan, script_path))
}
