use crate::error::RenameError;
use crate::renamer::{
    rename_with_ledger, NameLedger, RenameOptions, RenameOutcome, SkipReason, DEFAULT_MAX_SUFFIX,
};
use crate::resolver::TimestampResolver;
use crate::scan::collect_images;
use anyhow::Result;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub root: PathBuf,
    pub recursive: bool,
    pub dry_run: bool,
    pub max_suffix: u32,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            recursive: false,
            dry_run: false,
            max_suffix: DEFAULT_MAX_SUFFIX,
        }
    }
}

#[derive(Debug, Clone, Serialize, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub scanned_files: usize,
    pub image_files: usize,
    pub renamed: usize,
    pub skipped: usize,
    pub failed: usize,
}

#[derive(Debug, Serialize)]
pub struct RunReport {
    pub root: PathBuf,
    pub dry_run: bool,
    pub outcomes: Vec<RenameOutcome>,
    pub summary: RunSummary,
}

/// Processes every file under `options.root`. Only a failure to enumerate the
/// directory is returned as an error; per-file problems land in the report.
pub fn run<R: TimestampResolver>(options: &RunOptions, resolver: &R) -> Result<RunReport> {
    let scan = collect_images(&options.root, options.recursive)?;
    let mut summary = RunSummary {
        scanned_files: scan.scanned_files(),
        image_files: scan.images.len(),
        ..RunSummary::default()
    };
    info!(
        root = %options.root.display(),
        images = scan.images.len(),
        dry_run = options.dry_run,
        "starting rename pass"
    );

    let rename_options = RenameOptions {
        dry_run: options.dry_run,
        max_suffix: options.max_suffix,
    };
    let mut ledger = NameLedger::new();
    let mut outcomes = Vec::with_capacity(scan.scanned_files());

    for path in scan.non_images {
        debug!(path = %path.display(), "not a supported image");
        outcomes.push(RenameOutcome::Skipped {
            path,
            reason: SkipReason::UnsupportedExtension,
        });
    }

    for path in scan.images {
        let outcome = match resolver.resolve(&path) {
            Ok(timestamp) => rename_with_ledger(&path, &timestamp, &rename_options, &mut ledger),
            Err(err) => RenameOutcome::Failed {
                error: RenameError::Timestamp(format!("{:#}", err)),
                path,
            },
        };
        if let RenameOutcome::Failed { path, error } = &outcome {
            warn!(path = %path.display(), error = %error, "file not renamed");
        }
        outcomes.push(outcome);
    }

    for outcome in &outcomes {
        match outcome {
            RenameOutcome::Renamed { .. } => summary.renamed += 1,
            RenameOutcome::Skipped { .. } => summary.skipped += 1,
            RenameOutcome::Failed { .. } => summary.failed += 1,
        }
    }

    info!(
        renamed = summary.renamed,
        skipped = summary.skipped,
        failed = summary.failed,
        "rename pass finished"
    );

    Ok(RunReport {
        root: options.root.clone(),
        dry_run: options.dry_run,
        outcomes,
        summary,
    })
}
