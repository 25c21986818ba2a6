//! Input validation: check a user-supplied path before any engine is built.
//!
//! One `metadata` call for existence and size, then one `open` to surface
//! permission problems before markitdown runs.

use crate::error::ConvertError;
use crate::output::FileInfo;
use std::path::PathBuf;
use tracing::debug;

/// Validate that `path_str` names a readable regular file of at most
/// `max_bytes` bytes.
pub fn validate_file(path_str: &str, max_bytes: u64) -> Result<FileInfo, ConvertError> {
    if path_str.trim().is_empty() {
        return Err(ConvertError::EmptyPath);
    }
    let path = PathBuf::from(path_str);

    let metadata = match std::fs::metadata(&path) {
        Ok(m) => m,
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(ConvertError::PermissionDenied { path });
        }
        Err(_) => return Err(ConvertError::FileNotFound { path }),
    };

    if !metadata.is_file() {
        return Err(ConvertError::NotAFile { path });
    }

    let size_bytes = metadata.len();
    if size_bytes > max_bytes {
        return Err(ConvertError::FileTooLarge {
            size_bytes,
            limit_bytes: max_bytes,
        });
    }

    // Check read permission by attempting to open
    match std::fs::File::open(&path) {
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(ConvertError::PermissionDenied { path });
        }
        Err(e) => return Err(ConvertError::Io(e)),
    }

    debug!("Validated input: {} ({} bytes)", path.display(), size_bytes);
    Ok(FileInfo { path, size_bytes })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn rejects_empty_path() {
        assert!(matches!(validate_file("", 10), Err(ConvertError::EmptyPath)));
        assert!(matches!(validate_file("   ", 10), Err(ConvertError::EmptyPath)));
    }

    #[test]
    fn rejects_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.docx");
        let err = validate_file(missing.to_str().unwrap(), 10).unwrap_err();
        assert!(matches!(err, ConvertError::FileNotFound { .. }), "got {err:?}");
    }

    #[test]
    fn rejects_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = validate_file(dir.path().to_str().unwrap(), 10).unwrap_err();
        assert!(matches!(err, ConvertError::NotAFile { .. }), "got {err:?}");
    }

    #[test]
    fn size_ceiling_is_inclusive() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"0123456789").unwrap();
        let path = f.path().to_str().unwrap();

        let info = validate_file(path, 10).unwrap();
        assert_eq!(info.size_bytes, 10);

        match validate_file(path, 9) {
            Err(ConvertError::FileTooLarge {
                size_bytes,
                limit_bytes,
            }) => {
                assert_eq!(size_bytes, 10);
                assert_eq!(limit_bytes, 9);
            }
            other => panic!("expected FileTooLarge, got {other:?}"),
        }
    }
}
