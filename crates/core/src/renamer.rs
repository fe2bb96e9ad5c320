use crate::error::RenameError;
use crate::metadata::CaptureTimestamp;
use crate::naming::{canonical_base, compose_name, normalized_extension};
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const DEFAULT_MAX_SUFFIX: u32 = 9999;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenameOptions {
    pub dry_run: bool,
    pub max_suffix: u32,
}

impl Default for RenameOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            max_suffix: DEFAULT_MAX_SUFFIX,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    AlreadyCanonical,
    UnsupportedExtension,
    WouldRename { to: PathBuf },
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RenameOutcome {
    Renamed {
        from: PathBuf,
        to: PathBuf,
    },
    Skipped {
        path: PathBuf,
        #[serde(flatten)]
        reason: SkipReason,
    },
    Failed {
        path: PathBuf,
        error: RenameError,
    },
}

impl RenameOutcome {
    pub fn path(&self) -> &Path {
        match self {
            RenameOutcome::Renamed { from, .. } => from,
            RenameOutcome::Skipped { path, .. } | RenameOutcome::Failed { path, .. } => path,
        }
    }

    /// Name the file carries once the outcome is applied.
    pub fn final_path(&self) -> &Path {
        match self {
            RenameOutcome::Renamed { to, .. } => to,
            RenameOutcome::Skipped {
                reason: SkipReason::WouldRename { to },
                ..
            } => to,
            RenameOutcome::Skipped { path, .. } | RenameOutcome::Failed { path, .. } => path,
        }
    }
}

/// Names claimed and vacated earlier in the same run. A dry run never touches
/// the directory, so collisions are checked against disk state patched by
/// this ledger.
#[derive(Debug, Default)]
pub struct NameLedger {
    claimed: HashSet<PathBuf>,
    vacated: HashSet<PathBuf>,
}

impl NameLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn is_taken(&self, candidate: &Path, current: &Path) -> bool {
        if candidate == current {
            return false;
        }
        if self.claimed.contains(candidate) {
            return true;
        }
        // symlink_metadata so a dangling link still counts as an entry
        fs::symlink_metadata(candidate).is_ok() && !self.vacated.contains(candidate)
    }

    fn claim(&mut self, path: &Path) {
        self.vacated.remove(path);
        self.claimed.insert(path.to_path_buf());
    }

    fn vacate(&mut self, path: &Path) {
        self.claimed.remove(path);
        self.vacated.insert(path.to_path_buf());
    }
}

/// Renames one file to its capture time, with a fresh ledger.
pub fn rename_to_timestamp(
    path: &Path,
    timestamp: &CaptureTimestamp,
    options: &RenameOptions,
) -> RenameOutcome {
    rename_with_ledger(path, timestamp, options, &mut NameLedger::new())
}

pub fn rename_with_ledger(
    path: &Path,
    timestamp: &CaptureTimestamp,
    options: &RenameOptions,
    ledger: &mut NameLedger,
) -> RenameOutcome {
    let target = match resolve_target(path, timestamp, options.max_suffix, ledger) {
        Ok(target) => target,
        Err(error) => {
            return RenameOutcome::Failed {
                path: path.to_path_buf(),
                error,
            }
        }
    };

    if target == path {
        ledger.claim(path);
        return RenameOutcome::Skipped {
            path: path.to_path_buf(),
            reason: SkipReason::AlreadyCanonical,
        };
    }

    if options.dry_run {
        ledger.vacate(path);
        ledger.claim(&target);
        return RenameOutcome::Skipped {
            path: path.to_path_buf(),
            reason: SkipReason::WouldRename { to: target },
        };
    }

    match fs::rename(path, &target) {
        Ok(()) => {
            info!(from = %path.display(), to = %target.display(), "renamed");
            ledger.vacate(path);
            ledger.claim(&target);
            RenameOutcome::Renamed {
                from: path.to_path_buf(),
                to: target,
            }
        }
        Err(source) => RenameOutcome::Failed {
            path: path.to_path_buf(),
            error: RenameError::Io {
                from: path.to_path_buf(),
                to: target,
                source,
            },
        },
    }
}

/// First free name in `base`, `base_1`, `base_2`, ... order. The file's own
/// current name counts as free.
pub fn resolve_target(
    path: &Path,
    timestamp: &CaptureTimestamp,
    max_suffix: u32,
    ledger: &NameLedger,
) -> Result<PathBuf, RenameError> {
    let parent = path
        .parent()
        .ok_or_else(|| RenameError::NoParent(path.to_path_buf()))?;
    let extension =
        normalized_extension(path).ok_or_else(|| RenameError::NoExtension(path.to_path_buf()))?;
    let base = canonical_base(timestamp);

    let candidate = parent.join(compose_name(&base, None, &extension));
    if !ledger.is_taken(&candidate, path) {
        return Ok(candidate);
    }

    for counter in 1..=max_suffix {
        let candidate = parent.join(compose_name(&base, Some(counter), &extension));
        if !ledger.is_taken(&candidate, path) {
            debug!(path = %path.display(), counter, "canonical name taken, using suffix");
            return Ok(candidate);
        }
    }

    Err(RenameError::SuffixExhausted {
        base,
        extension,
        max_suffix,
    })
}
