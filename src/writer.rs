//! Persisting rendered reports to disk.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::error::ReportError;

/// File name of the generated report.
pub const DEFAULT_OUTPUT_FILE: &str = "Generated_Report.pdf";

fn temporary_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from(DEFAULT_OUTPUT_FILE));
    name.push(".tmp");
    path.with_file_name(name)
}

/// Writes `bytes` to `path`, replacing any existing file.
///
/// The bytes go to a sibling temporary file first which is then renamed over `path`, so the
/// target either holds the complete report or is left as it was.
pub fn write_report(path: &Path, bytes: &[u8]) -> Result<(), ReportError> {
    let tmp_path = temporary_path(path);
    debug!("Writing {} bytes to {}", bytes.len(), tmp_path.display());

    let result = fs::write(&tmp_path, bytes).and_then(|()| fs::rename(&tmp_path, path));
    if let Err(source) = result {
        let _ = fs::remove_file(&tmp_path);
        return Err(ReportError::Write {
            path: path.to_path_buf(),
            source,
        });
    }

    info!("Saved report to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{temporary_path, write_report};
    use crate::error::ReportError;
    use std::fs;
    use std::path::Path;

    #[test]
    fn replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.pdf");
        fs::write(&path, b"old").unwrap();

        write_report(&path, b"%PDF-new").unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"%PDF-new");
        assert!(!temporary_path(&path).exists());
    }

    #[test]
    fn missing_directory_is_a_write_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("report.pdf");

        let err = write_report(&path, b"%PDF").unwrap_err();

        assert!(matches!(err, ReportError::Write { .. }));
        assert!(!path.exists());
    }

    #[test]
    fn temporary_file_sits_next_to_target() {
        assert_eq!(
            temporary_path(Path::new("out/Generated_Report.pdf")),
            Path::new("out/Generated_Report.pdf.tmp")
        );
    }
}
