#![forbid(unsafe_code)]

//! Reads the newline-delimited channel list (`channels.txt`).

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::{Error, Result};

/// Loads identifiers from `path` in file order. A missing file is a
/// configuration error; an empty list is not.
pub fn load_identifiers(path: &Path) -> Result<Vec<String>> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(parse_identifiers(&contents)),
        Err(err) if err.kind() == ErrorKind::NotFound => {
            Err(Error::ChannelsFileMissing(path.to_path_buf()))
        }
        Err(err) => Err(Error::Io(err)),
    }
}

/// Trimmed, non-empty lines that are not `#` comments.
pub fn parse_identifiers(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_owned)
        .collect()
}
