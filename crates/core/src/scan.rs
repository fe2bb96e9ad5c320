use crate::naming::is_supported_image;
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanResult {
    pub images: Vec<PathBuf>,
    pub non_images: Vec<PathBuf>,
}

impl ScanResult {
    pub fn scanned_files(&self) -> usize {
        self.images.len() + self.non_images.len()
    }
}

/// Lists regular files under `root`, split by extension. Both lists come back
/// sorted so suffix assignment is stable between runs. Only an unreadable
/// root is an error; entries below it that cannot be read are skipped.
pub fn collect_images(root: &Path, recursive: bool) -> Result<ScanResult> {
    let mut result = ScanResult::default();

    if recursive {
        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) if err.depth() == 0 => {
                    return Err(err).with_context(|| {
                        format!("failed to walk directory: {}", root.display())
                    });
                }
                Err(err) => {
                    warn!(
                        path = %err.path().unwrap_or(root).display(),
                        error = %err,
                        "skipping unreadable entry"
                    );
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            push_entry(&mut result, entry.into_path());
        }
    } else {
        for entry in fs::read_dir(root)
            .with_context(|| format!("could not read directory: {}", root.display()))?
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!(path = %root.display(), error = %err, "skipping unreadable entry");
                    continue;
                }
            };
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            push_entry(&mut result, path);
        }
    }

    result.images.sort();
    result.non_images.sort();
    Ok(result)
}

fn push_entry(result: &mut ScanResult, path: PathBuf) {
    if is_supported_image(&path) {
        result.images.push(path);
    } else {
        result.non_images.push(path);
    }
}
