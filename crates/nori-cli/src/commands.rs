//! `nori fmt` implementation

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::{info, warn};

use nori_core::{
    BatchMode, FileOutcome, FormatStyle, discover_config, discover_files, format_batch,
    load_config,
};

/// Resolve the style: explicit --config wins, otherwise discover upward from
/// the first input path, otherwise defaults.
fn resolve_style(explicit: Option<&Path>, start: &Path) -> anyhow::Result<FormatStyle> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => {
            let origin = if start.is_dir() {
                start.to_path_buf()
            } else {
                start.parent().map(Path::to_path_buf).unwrap_or_default()
            };
            discover_config(&origin).context("config discovery failed")?
        }
    };
    match path {
        Some(path) => {
            let config =
                load_config(&path).with_context(|| format!("loading {}", path.display()))?;
            Ok(config.style)
        }
        None => Ok(FormatStyle::default()),
    }
}

/// Run the formatter over the given paths. Returns the process exit code:
/// 0 on success, 1 when --check found nonconforming files.
pub fn fmt(paths: Vec<PathBuf>, check: bool, config: Option<&Path>) -> anyhow::Result<i32> {
    let paths = if paths.is_empty() {
        vec![PathBuf::from(".")]
    } else {
        paths
    };
    let style = resolve_style(config, &paths[0])?;
    let files = discover_files(&paths).context("file discovery failed")?;
    if files.is_empty() {
        warn!("no Java files found");
        return Ok(0);
    }

    let mode = if check {
        BatchMode::Check
    } else {
        BatchMode::Write
    };
    let reports = format_batch(&files, &style, mode)?;

    let mut changed = 0usize;
    let mut skipped = 0usize;
    for report in &reports {
        match &report.outcome {
            FileOutcome::Unchanged => {}
            FileOutcome::Reformatted => {
                changed += 1;
                if check {
                    println!("would reformat {}", report.path.display());
                } else {
                    info!("reformatted {}", report.path.display());
                }
            }
            FileOutcome::Skipped(reason) => {
                skipped += 1;
                eprintln!("skipped {}: {}", report.path.display(), reason);
            }
        }
    }

    info!(
        total = reports.len(),
        changed, skipped, "formatting complete"
    );
    if check && changed > 0 {
        return Ok(1);
    }
    Ok(0)
}
