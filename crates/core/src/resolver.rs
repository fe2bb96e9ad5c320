use crate::exif_reader::read_exif_timestamp;
use crate::metadata::{CaptureTimestamp, TimestampSource};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Supplies the capture time used to name a file.
pub trait TimestampResolver {
    fn resolve(&self, path: &Path) -> Result<CaptureTimestamp>;
}

/// EXIF capture time, then filesystem creation time, then modification time
/// on platforms that do not record creation.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExifTimestampResolver;

impl TimestampResolver for ExifTimestampResolver {
    fn resolve(&self, path: &Path) -> Result<CaptureTimestamp> {
        if let Some(ts) = read_exif_timestamp(path) {
            debug!(path = %path.display(), source = ?ts.source, "EXIF capture time");
            return Ok(ts);
        }
        filesystem_timestamp(path)
    }
}

impl<F> TimestampResolver for F
where
    F: Fn(&Path) -> Result<CaptureTimestamp>,
{
    fn resolve(&self, path: &Path) -> Result<CaptureTimestamp> {
        self(path)
    }
}

pub fn filesystem_timestamp(path: &Path) -> Result<CaptureTimestamp> {
    let meta = fs::metadata(path)
        .with_context(|| format!("could not read file metadata: {}", path.display()))?;

    match meta.created() {
        Ok(created) => {
            debug!(path = %path.display(), "no EXIF date, using creation time");
            Ok(CaptureTimestamp::from_system_time(
                created,
                TimestampSource::FileCreated,
            ))
        }
        Err(err) => {
            debug!(
                path = %path.display(),
                error = %err,
                "creation time unavailable, using modification time"
            );
            let modified = meta
                .modified()
                .with_context(|| format!("could not read modification time: {}", path.display()))?;
            Ok(CaptureTimestamp::from_system_time(
                modified,
                TimestampSource::FileModified,
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ExifTimestampResolver, TimestampResolver};
    use crate::metadata::{CaptureTimestamp, TimestampSource};
    use chrono::NaiveDate;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    #[test]
    fn falls_back_to_filesystem_time_without_exif() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("b.jpg");
        fs::write(&path, b"no exif here").expect("write");

        let ts = ExifTimestampResolver.resolve(&path).expect("fallback");
        assert!(matches!(
            ts.source,
            TimestampSource::FileCreated | TimestampSource::FileModified
        ));
    }

    #[test]
    fn missing_file_is_an_error() {
        let temp = tempdir().expect("tempdir");
        let result = ExifTimestampResolver.resolve(&temp.path().join("gone.jpg"));
        assert!(result.is_err());
    }

    #[test]
    fn closures_act_as_resolvers() {
        let value = NaiveDate::from_ymd_opt(2023, 5, 1)
            .and_then(|d| d.and_hms_opt(10, 0, 0))
            .expect("valid date");
        let fixed = move |_: &Path| -> anyhow::Result<CaptureTimestamp> {
            Ok(CaptureTimestamp::new(value, TimestampSource::ExifOriginal))
        };

        let ts = fixed.resolve(Path::new("anything.jpg")).expect("resolve");
        assert_eq!(ts.value, value);
    }
}
