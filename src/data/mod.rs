//! Dataset download and caching
//!
//! Helpers for fetching the DE440 export binary once and caching it
//! locally. This is tooling around the engine, not part of any query path;
//! queries themselves never touch the network.

use std::env;
use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::errors::{EphemerisError, Result};

/// The DE440 export binary covering 1550..2650 (~100 MB)
const DE440_URL: &str =
    "https://ssd.jpl.nasa.gov/ftp/eph/planets/Linux/de440/linux_p1550p2650.440";
/// File name the cached dataset is stored under
const DE440_FILENAME: &str = "linux_p1550p2650.440";

/// The cache directory for downloaded datasets
pub fn cache_dir() -> PathBuf {
    let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".cache").join("swingby")
}

fn file_exists_and_not_empty<P: AsRef<Path>>(path: P) -> bool {
    match fs::metadata(path) {
        Ok(metadata) => metadata.is_file() && metadata.len() > 0,
        Err(_) => false,
    }
}

/// Return a local copy of the DE440 dataset, downloading it on first use
///
/// The download goes to a temporary file and is renamed into place only
/// when complete, so an interrupted fetch never leaves a partial dataset
/// in the cache.
pub fn ensure_dataset() -> Result<PathBuf> {
    let path = cache_dir().join(DE440_FILENAME);

    if file_exists_and_not_empty(&path) {
        log::debug!("using cached ephemeris dataset {}", path.display());
        return Ok(path);
    }

    log::info!(
        "downloading DE440 ephemeris (~100 MB) from {} to {}",
        DE440_URL,
        path.display()
    );
    download_file(DE440_URL, &path)?;

    Ok(path)
}

/// Download `url` to `path` through a temporary file
fn download_file<P: AsRef<Path>>(url: &str, path: P) -> Result<()> {
    if let Some(parent) = path.as_ref().parent() {
        fs::create_dir_all(parent).map_err(|e| crate::errors::io_err(parent, e))?;
    }

    let temp_path = path.as_ref().with_extension("tmp");
    let mut file = BufWriter::new(
        File::create(&temp_path).map_err(|e| crate::errors::io_err(&temp_path, e))?,
    );

    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(600))
        .build()
        .map_err(|e| EphemerisError::Download(format!("failed to create HTTP client: {}", e)))?;

    let mut response = client
        .get(url)
        .send()
        .map_err(|e| EphemerisError::Download(format!("request failed: {}", e)))?;

    if !response.status().is_success() {
        return Err(EphemerisError::Download(format!(
            "unexpected status {} for {}",
            response.status(),
            url
        )));
    }

    let mut buffer = [0u8; 8192];
    loop {
        let bytes_read = response
            .read(&mut buffer)
            .map_err(|e| EphemerisError::Download(format!("read failed: {}", e)))?;
        if bytes_read == 0 {
            break;
        }
        file.write_all(&buffer[..bytes_read])
            .map_err(|e| crate::errors::io_err(&temp_path, e))?;
    }

    file.flush().map_err(|e| crate::errors::io_err(&temp_path, e))?;
    drop(file);

    fs::rename(&temp_path, &path).map_err(|e| crate::errors::io_err(path.as_ref(), e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_dir() {
        let dir = cache_dir();
        assert!(dir.to_str().unwrap().contains(".cache/swingby"));
    }
}
