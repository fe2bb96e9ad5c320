use crate::metadata::{CaptureTimestamp, TimestampSource};
use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use exif::{In, Reader, Tag};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::trace;

const DATE_TAGS: [(Tag, TimestampSource); 3] = [
    (Tag::DateTimeOriginal, TimestampSource::ExifOriginal),
    (Tag::DateTimeDigitized, TimestampSource::ExifDigitized),
    (Tag::DateTime, TimestampSource::ExifDateTime),
];

/// Missing, unreadable and malformed metadata all come back as `None`.
pub fn read_exif_timestamp(path: &Path) -> Option<CaptureTimestamp> {
    match load_exif(path) {
        Ok(exif) => find_timestamp(&exif),
        Err(err) => {
            trace!(path = %path.display(), error = %err, "no EXIF data");
            None
        }
    }
}

fn load_exif(path: &Path) -> Result<exif::Exif> {
    let file = File::open(path)
        .with_context(|| format!("could not open file for EXIF: {}", path.display()))?;
    let mut buf = BufReader::new(file);
    let exif = Reader::new()
        .read_from_container(&mut buf)
        .with_context(|| format!("could not parse EXIF: {}", path.display()))?;
    Ok(exif)
}

fn find_timestamp(exif: &exif::Exif) -> Option<CaptureTimestamp> {
    DATE_TAGS.iter().find_map(|(tag, source)| {
        let field = exif.get_field(*tag, In::PRIMARY)?;
        let raw = field.display_value().to_string();
        parse_date(&raw).map(|value| CaptureTimestamp::new(value, *source))
    })
}

pub(crate) fn parse_date(input: &str) -> Option<NaiveDateTime> {
    let normalized = input.trim().trim_matches('"');

    let candidates = [
        "%Y:%m:%d %H:%M:%S",
        "%Y:%m:%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y/%m/%d %H:%M:%S",
    ];

    candidates
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(normalized, fmt).ok())
}

#[cfg(test)]
mod tests {
    use super::{parse_date, read_exif_timestamp};
    use crate::metadata::TimestampSource;
    use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
    use exif::experimental::Writer;
    use exif::{Field, In, Tag, Value};
    use std::fs;
    use std::io::Cursor;
    use std::path::Path;
    use tempfile::tempdir;

    fn write_tiff(path: &Path, tags: &[(Tag, &str)]) {
        let fields: Vec<Field> = tags
            .iter()
            .map(|(tag, raw)| Field {
                tag: *tag,
                ifd_num: In::PRIMARY,
                value: Value::Ascii(vec![raw.as_bytes().to_vec()]),
            })
            .collect();
        let mut writer = Writer::new();
        for field in &fields {
            writer.push_field(field);
        }
        let mut buf = Cursor::new(Vec::new());
        writer.write(&mut buf, false).expect("encode exif");
        fs::write(path, buf.into_inner()).expect("write tiff");
    }

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 5, 1)
            .and_then(|d| d.and_hms_opt(h, m, s))
            .expect("valid date")
    }

    #[test]
    fn original_capture_time_wins_over_other_tags() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("all.jpg");
        write_tiff(
            &path,
            &[
                (Tag::DateTime, "2023:05:01 12:00:00"),
                (Tag::DateTimeDigitized, "2023:05:01 11:00:00"),
                (Tag::DateTimeOriginal, "2023:05:01 10:00:00"),
            ],
        );

        let ts = read_exif_timestamp(&path).expect("timestamp");
        assert_eq!(ts.value, at(10, 0, 0));
        assert_eq!(ts.source, TimestampSource::ExifOriginal);
    }

    #[test]
    fn digitized_time_is_used_without_original() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("digitized.jpg");
        write_tiff(
            &path,
            &[
                (Tag::DateTime, "2023:05:01 12:00:00"),
                (Tag::DateTimeDigitized, "2023:05:01 11:00:00"),
            ],
        );

        let ts = read_exif_timestamp(&path).expect("timestamp");
        assert_eq!(ts.value, at(11, 0, 0));
        assert_eq!(ts.source, TimestampSource::ExifDigitized);
    }

    #[test]
    fn generic_date_time_is_the_last_exif_choice() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("modified.jpg");
        write_tiff(&path, &[(Tag::DateTime, "2023:05:01 12:00:00")]);

        let ts = read_exif_timestamp(&path).expect("timestamp");
        assert_eq!(ts.value, at(12, 0, 0));
        assert_eq!(ts.source, TimestampSource::ExifDateTime);
    }

    #[test]
    fn malformed_original_falls_through_to_next_tag() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("broken.jpg");
        write_tiff(
            &path,
            &[
                (Tag::DateTimeOriginal, "not a date"),
                (Tag::DateTimeDigitized, "2023:05:01 11:00:00"),
            ],
        );

        let ts = read_exif_timestamp(&path).expect("timestamp");
        assert_eq!(ts.value, at(11, 0, 0));
        assert_eq!(ts.source, TimestampSource::ExifDigitized);
    }

    #[test]
    fn only_malformed_dates_yield_none() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("garbage.jpg");
        write_tiff(&path, &[(Tag::DateTimeOriginal, "    :  :     :  :  ")]);

        assert!(read_exif_timestamp(&path).is_none());
    }

    #[test]
    fn parse_date_accepts_exif_layout() {
        let dt = parse_date("2023:05:01 10:00:00").expect("exif layout");
        assert_eq!((dt.year(), dt.month(), dt.day()), (2023, 5, 1));
        assert_eq!((dt.hour(), dt.minute(), dt.second()), (10, 0, 0));
    }

    #[test]
    fn parse_date_accepts_quoted_and_dashed_layouts() {
        assert!(parse_date("\"2023:05:01 10:00:00\"").is_some());
        assert!(parse_date("2023-05-01 10:00:00").is_some());
        assert!(parse_date("2023-05-01T10:00:00").is_some());
        assert!(parse_date("2023/05/01 10:00:00").is_some());
        assert!(parse_date("2023:05:01 10:00:00.25").is_some());
    }

    #[test]
    fn parse_date_rejects_malformed_values() {
        assert!(parse_date("").is_none());
        assert!(parse_date("0000:00:00 00:00:00").is_none());
        assert!(parse_date("2023:13:01 10:00:00").is_none());
        assert!(parse_date("yesterday").is_none());
    }

    #[test]
    fn read_exif_timestamp_is_none_without_metadata() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("plain.jpg");
        fs::write(&path, b"not really a jpeg").expect("write");
        assert!(read_exif_timestamp(&path).is_none());
    }

    #[test]
    fn read_exif_timestamp_is_none_for_missing_file() {
        let temp = tempdir().expect("tempdir");
        assert!(read_exif_timestamp(&temp.path().join("missing.jpg")).is_none());
    }
}
