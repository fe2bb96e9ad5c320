mod batch;
mod config;
mod error;
mod exif_reader;
mod metadata;
mod naming;
mod renamer;
mod resolver;
mod scan;

pub use batch::{run, RunOptions, RunReport, RunSummary};
pub use config::{app_paths, load_config, save_config, AppConfig, AppPaths};
pub use error::RenameError;
pub use exif_reader::read_exif_timestamp;
pub use metadata::{CaptureTimestamp, TimestampSource};
pub use naming::{canonical_base, compose_name, is_supported_image, normalized_extension};
pub use renamer::{
    rename_to_timestamp, rename_with_ledger, resolve_target, NameLedger, RenameOptions,
    RenameOutcome, SkipReason, DEFAULT_MAX_SUFFIX,
};
pub use resolver::{filesystem_timestamp, ExifTimestampResolver, TimestampResolver};
pub use scan::{collect_images, ScanResult};
