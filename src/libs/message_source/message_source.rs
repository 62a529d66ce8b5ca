use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::debug;

use crate::libs::error::error::{Error, Result};

/// Reads the whole message file. The file handle is dropped before returning, on every path.
pub fn read_message(path: &Path) -> Result<Vec<u8>> {
    let io_error = |source| Error::Io { path: path.to_path_buf(), source };
    let mut file = File::open(path).map_err(io_error)?;
    let mut bytes = vec![];
    file.read_to_end(&mut bytes).map_err(io_error)?;
    if bytes.is_empty() {
        return Err(Error::Config(format!("Message file {:?} is empty", path)));
    }
    debug!("Read {} bytes from {:?}", bytes.len(), path);
    Ok(bytes)
}

#[cfg(test)]
#[path = "./message_source_spec.rs"]
mod message_source_spec;
