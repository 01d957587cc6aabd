//! Metadata and raw-data exports.
//!
//! Metadata exports serialize the whole counter store to JSON or CSV,
//! synchronously. Raw-data exports fetch a selected counter's datastreams,
//! pull counts for every stream concurrently, and bundle the results into a
//! single ZIP archive. A second raw-data export while one is running is a
//! no-op, enforced by [`ExportSlot`].

use std::io::{Cursor, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::NaiveDate;
use futures::stream::{self, StreamExt, TryStreamExt};
use thiserror::Error;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use nmcoast_api::{ClientError, CountsClient};
use nmcoast_core::{csv, Count, CounterStore};

/// Supported metadata export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    /// Parse a user-supplied format name. Unknown names are `None`; the
    /// caller logs and skips the export.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "json" => Some(ExportFormat::Json),
            "csv" => Some(ExportFormat::Csv),
            _ => None,
        }
    }

    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }

    #[must_use]
    pub fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Csv => "text/csv",
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// A finished export artifact, ready to download or write to disk.
#[derive(Debug, Clone)]
pub struct ExportFile {
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Errors raised while producing an export artifact.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("upstream fetch failed: {0}")]
    Client(#[from] ClientError),

    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("archive assembly failed: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("archive write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Serialize the counter store to a dated metadata file.
///
/// Filenames follow `nc_counters_<YYYY-MM-DD>.<ext>`.
///
/// # Errors
///
/// Returns [`ExportError::Serialize`] if a record fails to serialize.
pub fn metadata_export(
    store: &CounterStore,
    format: ExportFormat,
    date: NaiveDate,
) -> Result<ExportFile, ExportError> {
    let stamp = date.format("%Y-%m-%d");
    let filename = format!("nc_counters_{stamp}.{}", format.extension());

    let bytes = match format {
        ExportFormat::Json => serde_json::to_vec_pretty(store.as_slice())?,
        ExportFormat::Csv => csv::counters_to_csv(store.as_slice())?.into_bytes(),
    };

    Ok(ExportFile {
        filename,
        content_type: format.content_type(),
        bytes,
    })
}

/// Fetch a counter's raw data and bundle it into `counter_<id>_data.zip`.
///
/// The datastream list is fetched first; counts for every stream are then
/// fetched concurrently (bounded by `max_concurrent`) and joined. Completion
/// order is irrelevant — entries are keyed and sorted by datastream id. Any
/// fetch failure aborts the whole operation; no partial archive is produced.
///
/// The archive holds one `datastream_<sid>_counts.json` per stream, a
/// combined `counter_<id>_all_counts.json` keyed by stream id, and the
/// stream list as `counter_<id>_datastreams.json`.
///
/// # Errors
///
/// - [`ExportError::Client`] on any upstream failure.
/// - [`ExportError::Archive`] / [`ExportError::Io`] if ZIP assembly fails.
pub async fn raw_data_archive(
    client: &CountsClient,
    counter_id: i64,
    max_concurrent: usize,
) -> Result<ExportFile, ExportError> {
    let datastreams = client.list_datastreams(counter_id).await?;

    let datastream_ids: Vec<i64> = datastreams.iter().map(|ds| ds.datastream_id).collect();
    let mut per_stream: Vec<(i64, Vec<Count>)> = stream::iter(datastream_ids.into_iter().map(
        |datastream_id| async move {
            client
                .list_counts(datastream_id)
                .await
                .map(|counts| (datastream_id, counts))
        },
    ))
    .buffer_unordered(max_concurrent.max(1))
    .try_collect()
    .await?;
    per_stream.sort_unstable_by_key(|(id, _)| *id);

    let options =
        SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

    for (datastream_id, counts) in &per_stream {
        writer.start_file(format!("datastream_{datastream_id}_counts.json"), options)?;
        writer.write_all(&serde_json::to_vec_pretty(counts)?)?;
    }

    let mut combined = serde_json::Map::new();
    for (datastream_id, counts) in &per_stream {
        combined.insert(datastream_id.to_string(), serde_json::to_value(counts)?);
    }
    writer.start_file(format!("counter_{counter_id}_all_counts.json"), options)?;
    writer.write_all(&serde_json::to_vec_pretty(&combined)?)?;

    writer.start_file(format!("counter_{counter_id}_datastreams.json"), options)?;
    writer.write_all(&serde_json::to_vec_pretty(&datastreams)?)?;

    let bytes = writer.finish()?.into_inner();

    Ok(ExportFile {
        filename: format!("counter_{counter_id}_data.zip"),
        content_type: "application/zip",
        bytes,
    })
}

/// The single in-flight flag guarding raw-data exports.
///
/// `try_acquire` hands out at most one [`ExportPermit`] at a time; the flag
/// releases when the permit drops, whatever the outcome of the export.
#[derive(Debug, Clone, Default)]
pub struct ExportSlot {
    busy: Arc<AtomicBool>,
}

impl ExportSlot {
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Claim the slot, or `None` if an export is already running.
    #[must_use]
    pub fn try_acquire(&self) -> Option<ExportPermit> {
        self.busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| ExportPermit {
                busy: Arc::clone(&self.busy),
            })
    }
}

/// Proof of an exclusive raw-data export in progress.
#[derive(Debug)]
pub struct ExportPermit {
    busy: Arc<AtomicBool>,
}

impl Drop for ExportPermit {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nmcoast_core::Counter;

    fn store() -> CounterStore {
        CounterStore::new(vec![Counter {
            counter_id: 1,
            counter_code: "BOA".to_owned(),
            counter_name: "A,B".to_owned(),
            vendor: "SensorCorp".to_owned(),
            latitude: 35.2258,
            longitude: -80.8527,
            counter_notes: None,
        }])
    }

    #[test]
    fn format_parse_is_case_insensitive_and_strict() {
        assert_eq!(ExportFormat::parse("json"), Some(ExportFormat::Json));
        assert_eq!(ExportFormat::parse(" CSV "), Some(ExportFormat::Csv));
        assert_eq!(ExportFormat::parse("xlsx"), None);
        assert_eq!(ExportFormat::parse(""), None);
    }

    #[test]
    fn metadata_filenames_carry_the_date() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let json = metadata_export(&store(), ExportFormat::Json, date).expect("json export");
        assert_eq!(json.filename, "nc_counters_2025-06-01.json");
        assert_eq!(json.content_type, "application/json");

        let csv = metadata_export(&store(), ExportFormat::Csv, date).expect("csv export");
        assert_eq!(csv.filename, "nc_counters_2025-06-01.csv");
        let text = String::from_utf8(csv.bytes).expect("utf-8 csv");
        assert!(text.contains("\"A,B\""), "comma name must be quoted: {text}");
    }

    #[test]
    fn metadata_json_round_trips() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let json = metadata_export(&store(), ExportFormat::Json, date).expect("json export");
        let parsed: Vec<Counter> = serde_json::from_slice(&json.bytes).expect("parse back");
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].counter_name, "A,B");
    }

    #[test]
    fn slot_admits_exactly_one_permit() {
        let slot = ExportSlot::default();
        assert!(!slot.is_busy());

        let permit = slot.try_acquire().expect("first acquire succeeds");
        assert!(slot.is_busy());
        assert!(slot.try_acquire().is_none(), "second acquire must be a no-op");

        drop(permit);
        assert!(!slot.is_busy(), "slot must release on drop");
        assert!(slot.try_acquire().is_some());
    }
}
