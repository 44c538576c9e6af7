use std::fs;
use std::path::Path;

use serde::Serialize;
use tickchart_core::Envelope;

use crate::error::CliError;

pub fn render<T: Serialize>(envelope: &Envelope<T>, pretty: bool) -> Result<(), CliError> {
    let payload = if pretty {
        serde_json::to_string_pretty(envelope)?
    } else {
        serde_json::to_string(envelope)?
    };
    println!("{payload}");
    Ok(())
}

/// Write `svg` to `path`, creating missing parent directories.
pub fn write_svg(path: &Path, svg: &str) -> Result<(), CliError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, svg)?;
    Ok(())
}
