//! Snapshot save-file helpers
//!
//! Thin wrappers that put buffered file handles around the snapshot
//! protocol's byte streams.

use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::Path;

/// Create (or truncate) a snapshot file for writing, creating parent
/// directories as needed.
pub fn create_snapshot(path: &Path) -> io::Result<BufWriter<File>> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(path)?;
    tracing::debug!(?path, "created snapshot file");
    Ok(BufWriter::new(file))
}

/// Open an existing snapshot file for reading.
pub fn open_snapshot(path: &Path) -> io::Result<BufReader<File>> {
    let file = File::open(path)?;
    Ok(BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};

    #[test]
    fn roundtrip_through_a_file() {
        let path = std::env::temp_dir().join("veld_save_test/snapshot.bin");
        {
            let mut writer = create_snapshot(&path).unwrap();
            writer.write_all(b"veld").unwrap();
        }
        let mut contents = Vec::new();
        open_snapshot(&path).unwrap().read_to_end(&mut contents).unwrap();
        assert_eq!(contents, b"veld");
        let _ = std::fs::remove_file(&path);
    }
}
