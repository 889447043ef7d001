//! Input discovery: list the files of a directory that a tool will process.
//!
//! Both batch tools scan a single directory (non-recursively), keep regular
//! files whose extension is on an allow-list, and process them in ascending
//! path order so repeated runs see the same sequence.

use crate::error::DocToolsError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Return `true` if `path`'s extension matches one of `extensions`.
///
/// Extensions are compared case-insensitively and may be given with or
/// without the leading dot (`".xlsx"` and `"xlsx"` are equivalent).
pub fn has_extension<S: AsRef<str>>(path: &Path, extensions: &[S]) -> bool {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };
    extensions
        .iter()
        .any(|allowed| allowed.as_ref().trim_start_matches('.').eq_ignore_ascii_case(ext))
}

/// List regular files in `dir` whose extension is in `extensions`, sorted
/// ascending by full path.
pub fn list_files_with_extensions<S: AsRef<str>>(
    dir: &Path,
    extensions: &[S],
) -> Result<Vec<PathBuf>, DocToolsError> {
    if !dir.exists() {
        return Err(DocToolsError::FileNotFound {
            path: dir.to_path_buf(),
        });
    }
    if !dir.is_dir() {
        return Err(DocToolsError::NotADirectory {
            path: dir.to_path_buf(),
        });
    }

    let entries = std::fs::read_dir(dir).map_err(|e| DocToolsError::io(dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| DocToolsError::io(dir, e))?.path();
        if path.is_file() && has_extension(&path, extensions) {
            files.push(path);
        }
    }
    files.sort();

    debug!("{} matching files in {}", files.len(), dir.display());
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_match_ignores_case_and_dot() {
        assert!(has_extension(Path::new("a/B.PNG"), &["png"]));
        assert!(has_extension(Path::new("report.XlSx"), &[".xlsx"]));
        assert!(!has_extension(Path::new("notes.txt"), &["png", "jpg"]));
        assert!(!has_extension(Path::new("README"), &["png"]));
    }

    #[test]
    fn lists_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["c.bmp", "a.png", "notes.txt", "b.JPG"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }
        std::fs::create_dir(dir.path().join("nested.png")).unwrap();

        let files = list_files_with_extensions(dir.path(), &["png", "jpg", "bmp"]).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["a.png", "b.JPG", "c.bmp"]);
    }

    #[test]
    fn missing_dir_is_file_not_found() {
        let err = list_files_with_extensions(Path::new("/definitely/not/here"), &["png"]).unwrap_err();
        assert!(matches!(err, DocToolsError::FileNotFound { .. }));
    }

    #[test]
    fn file_instead_of_dir_is_rejected() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let err = list_files_with_extensions(file.path(), &["png"]).unwrap_err();
        assert!(matches!(err, DocToolsError::NotADirectory { .. }));
    }
}
