//! Choosing where a job writes.

use std::path::{Path, PathBuf};

use crate::error::IoError;

/// `chrono` format of the suffix appended to working copies.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// `dir/name.dat` + `20240131_120000` -> `dir/name_20240131_120000.dat`.
pub fn timestamped_path(path: &Path, stamp: &str) -> PathBuf {
    let stem = path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{stem}_{stamp}.{}", ext.to_string_lossy()),
        None => format!("{stem}_{stamp}"),
    };
    path.with_file_name(name)
}

/// Return the path a job should edit.
///
/// In place: `path` itself. Otherwise a timestamped copy of `path` is
/// created next to it and its path returned.
pub fn prepare_target(path: &Path, in_place: bool) -> Result<PathBuf, IoError> {
    if in_place {
        return Ok(path.to_path_buf());
    }
    let stamp = chrono::Local::now().format(TIMESTAMP_FORMAT).to_string();
    let copy = timestamped_path(path, &stamp);
    std::fs::copy(path, &copy).map_err(|e| IoError::Copy {
        from: path.to_path_buf(),
        to: copy.clone(),
        message: e.to_string(),
    })?;
    log::debug!("created working copy {}", copy.display());
    Ok(copy)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stamp_goes_before_extension() {
        let p = timestamped_path(Path::new("/cfg/$machine.dat"), "20240131_120000");
        assert_eq!(p, PathBuf::from("/cfg/$machine_20240131_120000.dat"));

        let p = timestamped_path(Path::new("config"), "20240131_120000");
        assert_eq!(p, PathBuf::from("config_20240131_120000"));
    }

    #[test]
    fn in_place_returns_same_path() {
        let p = Path::new("/does/not/exist.dat");
        assert_eq!(prepare_target(p, true).unwrap(), p);
    }

    #[test]
    fn copy_is_created_next_to_original() {
        let dir = tempfile::tempdir().unwrap();
        let original = dir.path().join("target.dat");
        std::fs::write(&original, "ENDDAT\n").unwrap();

        let copy = prepare_target(&original, false).unwrap();

        assert_ne!(copy, original);
        assert_eq!(copy.parent(), original.parent());
        assert!(copy.file_name().unwrap().to_string_lossy().starts_with("target_"));
        assert_eq!(copy.extension().unwrap(), "dat");
        assert_eq!(std::fs::read_to_string(&copy).unwrap(), "ENDDAT\n");
    }

    #[test]
    fn missing_original_is_a_copy_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = prepare_target(&dir.path().join("missing.dat"), false).unwrap_err();
        assert!(matches!(err, IoError::Copy { .. }));
    }
}
