//! File discovery and parallel batch formatting
//!
//! One compilation unit's pipeline is strictly sequential, but units are
//! independent: no shared mutable state exists between them, and style
//! records are immutable, so the batch fans out per file. A formatting
//! failure in one file never aborts the run — that unit is reported and its
//! content left untouched.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::NoriError;
use crate::format::format_source;
use crate::result::Result;
use crate::style::FormatStyle;

/// What happened to one file during a batch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// Already formatted; nothing to do.
    Unchanged,
    /// Formatting produced different text (and wrote it in write mode).
    Reformatted,
    /// The unit was skipped; the reason names the construct and cause.
    Skipped(String),
}

/// Per-file result of a batch run.
#[derive(Debug)]
pub struct FileReport {
    pub path: PathBuf,
    pub outcome: FileOutcome,
}

/// Batch mode: report only, or rewrite files in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchMode {
    Check,
    Write,
}

/// Recursively collect `.java` files under each given path. Plain files are
/// taken as-is.
pub fn discover_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_file() {
            files.push(path.clone());
            continue;
        }
        for entry in WalkDir::new(path).sort_by_file_name() {
            let entry = entry.map_err(|e| NoriError::Io {
                path: path.clone(),
                source: std::io::Error::other(e),
            })?;
            if entry.file_type().is_file()
                && entry.path().extension().is_some_and(|ext| ext == "java")
            {
                files.push(entry.path().to_path_buf());
            }
        }
    }
    Ok(files)
}

/// Format one file. Recoverable formatting errors become
/// [`FileOutcome::Skipped`]; I/O errors propagate.
pub fn format_file(path: &Path, style: &FormatStyle, mode: BatchMode) -> Result<FileOutcome> {
    let source = std::fs::read_to_string(path).map_err(|source| NoriError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    match format_source(&source, style) {
        Ok(formatted) => {
            if formatted == source {
                Ok(FileOutcome::Unchanged)
            } else {
                if mode == BatchMode::Write {
                    std::fs::write(path, &formatted).map_err(|source| NoriError::Io {
                        path: path.to_path_buf(),
                        source,
                    })?;
                }
                Ok(FileOutcome::Reformatted)
            }
        }
        Err(err) if err.skips_unit() => {
            warn!(path = %path.display(), %err, "skipping file");
            Ok(FileOutcome::Skipped(err.to_string()))
        }
        Err(err) => Err(err),
    }
}

/// Run the full pipeline once per file, in parallel.
pub fn format_batch(
    files: &[PathBuf],
    style: &FormatStyle,
    mode: BatchMode,
) -> Result<Vec<FileReport>> {
    debug!(count = files.len(), ?mode, "formatting batch");
    files
        .par_iter()
        .map(|path| {
            format_file(path, style, mode).map(|outcome| FileReport {
                path: path.clone(),
                outcome,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn discovers_java_files_recursively() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("src");
        std::fs::create_dir(&nested).unwrap();
        write(dir.path(), "A.java", "class A {}");
        write(&nested, "B.java", "class B {}");
        write(&nested, "notes.txt", "not java");

        let files = discover_files(&[dir.path().to_path_buf()]).unwrap();
        assert_eq!(files.len(), 2);
    }

    #[test]
    fn write_mode_rewrites_only_nonconforming_files() {
        let dir = tempfile::tempdir().unwrap();
        let messy = write(dir.path(), "A.java", "class A{int x=1;}");
        let reports = format_batch(
            &[messy.clone()],
            &FormatStyle::default(),
            BatchMode::Write,
        )
        .unwrap();
        assert_eq!(reports[0].outcome, FileOutcome::Reformatted);
        let formatted = std::fs::read_to_string(&messy).unwrap();
        assert_eq!(formatted, "class A {\n    int x = 1;\n}");

        // A second run finds nothing to do.
        let reports = format_batch(&[messy], &FormatStyle::default(), BatchMode::Write).unwrap();
        assert_eq!(reports[0].outcome, FileOutcome::Unchanged);
    }

    #[test]
    fn unparsable_file_is_skipped_and_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let good = write(dir.path(), "A.java", "class A{}");
        let bad = write(dir.path(), "B.java", "class B { ??? }");
        let reports = format_batch(
            &[good, bad.clone()],
            &FormatStyle::default(),
            BatchMode::Write,
        )
        .unwrap();
        assert_eq!(reports[0].outcome, FileOutcome::Reformatted);
        assert!(matches!(reports[1].outcome, FileOutcome::Skipped(_)));
        assert_eq!(std::fs::read_to_string(&bad).unwrap(), "class B { ??? }");
    }

    #[test]
    fn check_mode_never_writes() {
        let dir = tempfile::tempdir().unwrap();
        let messy = write(dir.path(), "A.java", "class A{int x=1;}");
        let reports =
            format_batch(&[messy.clone()], &FormatStyle::default(), BatchMode::Check).unwrap();
        assert_eq!(reports[0].outcome, FileOutcome::Reformatted);
        assert_eq!(
            std::fs::read_to_string(&messy).unwrap(),
            "class A{int x=1;}"
        );
    }
}
