#![forbid(unsafe_code)]

//! Input traces for deterministic replay.
//!
//! A trace is JSONL: a `trace_header` naming the initial items, one record
//! per normalized input with a nanosecond timestamp relative to the start
//! of the recording, and a closing `trace_summary`.
//!
//! ```text
//! {"event":"trace_header","schema_version":"sortable-trace-v1","session_name":"demo","items":["A","B"]}
//! {"event":"pointer_down","ts_ns":0,"id":"A","x":100.0,"y":20.0}
//! {"event":"pointer_move","ts_ns":16000000,"x":100.0,"y":70.0}
//! {"event":"pointer_up","ts_ns":32000000,"x":100.0,"y":70.0}
//! {"event":"trace_summary","total_events":3,"total_duration_ns":32000000}
//! ```
//!
//! Files ending in `.gz` are gzip-compressed on write. Readers detect gzip
//! by its magic bytes, whatever the file is called.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

use flate2::Compression;
use flate2::write::GzEncoder;

use serde::{Deserialize, Serialize};
use sortable_core::{ItemId, KeyInput, Point, PointerInput};

use crate::error::{HarnessError, Result};

/// Current schema version for trace files.
pub const SCHEMA_VERSION: &str = "sortable-trace-v1";

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// One line of a trace file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TraceRecord {
    #[serde(rename = "trace_header")]
    Header {
        schema_version: String,
        session_name: String,
        items: Vec<ItemId>,
    },
    PointerDown {
        ts_ns: u64,
        id: ItemId,
        x: f32,
        y: f32,
    },
    PointerMove {
        ts_ns: u64,
        x: f32,
        y: f32,
    },
    PointerUp {
        ts_ns: u64,
        x: f32,
        y: f32,
    },
    PointerInterrupt {
        ts_ns: u64,
    },
    Key {
        ts_ns: u64,
        key: KeyInput,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        focused: Option<ItemId>,
    },
    /// Clock advance with no input; drives delay activation.
    Tick {
        ts_ns: u64,
    },
    #[serde(rename = "trace_summary")]
    Summary {
        total_events: u64,
        total_duration_ns: u64,
    },
}

/// A replayable input.
#[derive(Debug, Clone, PartialEq)]
pub enum TraceInput {
    Pointer(PointerInput),
    Key {
        key: KeyInput,
        focused: Option<ItemId>,
    },
    Tick,
}

impl TraceRecord {
    /// Build the record for `input` at `ts_ns`.
    #[must_use]
    pub fn from_input(input: &TraceInput, ts_ns: u64) -> Self {
        match input {
            TraceInput::Pointer(PointerInput::Down { id, pos }) => Self::PointerDown {
                ts_ns,
                id: id.clone(),
                x: pos.x,
                y: pos.y,
            },
            TraceInput::Pointer(PointerInput::Move { pos }) => Self::PointerMove {
                ts_ns,
                x: pos.x,
                y: pos.y,
            },
            TraceInput::Pointer(PointerInput::Up { pos }) => Self::PointerUp {
                ts_ns,
                x: pos.x,
                y: pos.y,
            },
            TraceInput::Pointer(PointerInput::Interrupt) => Self::PointerInterrupt { ts_ns },
            TraceInput::Key { key, focused } => Self::Key {
                ts_ns,
                key: *key,
                focused: focused.clone(),
            },
            TraceInput::Tick => Self::Tick { ts_ns },
        }
    }

    /// The input this record carries, if it is not metadata.
    #[must_use]
    pub fn to_input(&self) -> Option<TraceInput> {
        let input = match self {
            Self::Header { .. } | Self::Summary { .. } => return None,
            Self::PointerDown { id, x, y, .. } => TraceInput::Pointer(PointerInput::Down {
                id: id.clone(),
                pos: Point::new(*x, *y),
            }),
            Self::PointerMove { x, y, .. } => TraceInput::Pointer(PointerInput::Move {
                pos: Point::new(*x, *y),
            }),
            Self::PointerUp { x, y, .. } => TraceInput::Pointer(PointerInput::Up {
                pos: Point::new(*x, *y),
            }),
            Self::PointerInterrupt { .. } => TraceInput::Pointer(PointerInput::Interrupt),
            Self::Key { key, focused, .. } => TraceInput::Key {
                key: *key,
                focused: focused.clone(),
            },
            Self::Tick { .. } => TraceInput::Tick,
        };
        Some(input)
    }

    /// Timestamp, for input records.
    #[must_use]
    pub fn ts_ns(&self) -> Option<u64> {
        match self {
            Self::PointerDown { ts_ns, .. }
            | Self::PointerMove { ts_ns, .. }
            | Self::PointerUp { ts_ns, .. }
            | Self::PointerInterrupt { ts_ns }
            | Self::Key { ts_ns, .. }
            | Self::Tick { ts_ns } => Some(*ts_ns),
            Self::Header { .. } | Self::Summary { .. } => None,
        }
    }
}

// ---------------------------------------------------------------------------
// TraceWriter
// ---------------------------------------------------------------------------

/// Writes trace records as JSONL.
pub struct TraceWriter<W: Write> {
    writer: BufWriter<W>,
    event_count: u64,
    first_ts_ns: Option<u64>,
    last_ts_ns: u64,
}

/// Destination of a trace file: plain, or gzip-compressed.
pub enum TraceSink {
    Plain(File),
    Gzip(GzEncoder<File>),
}

impl TraceSink {
    /// Complete the stream (writing the gzip trailer) and return the file.
    pub fn finish(self) -> io::Result<File> {
        match self {
            Self::Plain(mut file) => {
                file.flush()?;
                Ok(file)
            }
            Self::Gzip(encoder) => encoder.finish(),
        }
    }
}

impl Write for TraceSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::Plain(file) => file.write(buf),
            Self::Gzip(encoder) => encoder.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::Plain(file) => file.flush(),
            Self::Gzip(encoder) => encoder.flush(),
        }
    }
}

impl TraceWriter<TraceSink> {
    /// Create a trace file, gzip-compressed when the path ends in `.gz`.
    pub fn create(path: impl AsRef<Path>, session_name: &str, items: &[ItemId]) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path)?;
        let gzip = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"));
        let sink = if gzip {
            TraceSink::Gzip(GzEncoder::new(file, Compression::fast()))
        } else {
            TraceSink::Plain(file)
        };
        Self::from_writer(sink, session_name, items)
    }

    /// Write the summary and complete the file. Errors from the final gzip
    /// write are returned here.
    pub fn close(self) -> Result<File> {
        Ok(self.finish()?.finish()?)
    }
}

impl<W: Write> TraceWriter<W> {
    /// Wrap any writer and emit the header.
    pub fn from_writer(writer: W, session_name: &str, items: &[ItemId]) -> Result<Self> {
        let mut writer = BufWriter::new(writer);
        let header = TraceRecord::Header {
            schema_version: SCHEMA_VERSION.to_string(),
            session_name: session_name.to_string(),
            items: items.to_vec(),
        };
        serde_json::to_writer(&mut writer, &header)?;
        writer.write_all(b"\n")?;
        Ok(Self {
            writer,
            event_count: 0,
            first_ts_ns: None,
            last_ts_ns: 0,
        })
    }

    /// Record one input at `ts_ns`.
    pub fn record(&mut self, input: &TraceInput, ts_ns: u64) -> Result<()> {
        self.write_record(&TraceRecord::from_input(input, ts_ns))
    }

    /// Write any record.
    pub fn write_record(&mut self, record: &TraceRecord) -> Result<()> {
        serde_json::to_writer(&mut self.writer, record)?;
        self.writer.write_all(b"\n")?;
        if let Some(ts) = record.ts_ns() {
            if self.first_ts_ns.is_none() {
                self.first_ts_ns = Some(ts);
            }
            self.last_ts_ns = ts;
            self.event_count += 1;
        }
        Ok(())
    }

    /// Inputs written so far.
    #[must_use]
    pub fn event_count(&self) -> u64 {
        self.event_count
    }

    /// Write the summary, flush, and return the underlying writer.
    ///
    /// File-backed writers should use [`TraceWriter::close`] instead, which
    /// also completes a gzip stream.
    pub fn finish(mut self) -> Result<W> {
        let total_duration_ns = self
            .first_ts_ns
            .map_or(0, |first| self.last_ts_ns.saturating_sub(first));
        let summary = TraceRecord::Summary {
            total_events: self.event_count,
            total_duration_ns,
        };
        serde_json::to_writer(&mut self.writer, &summary)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        self.writer
            .into_inner()
            .map_err(|e| HarnessError::Io(io::Error::other(e.to_string())))
    }
}

// ---------------------------------------------------------------------------
// TraceReader
// ---------------------------------------------------------------------------

/// Parses trace files, plain or gzip.
pub struct TraceReader;

impl TraceReader {
    /// Open and parse a trace file.
    pub fn open(path: impl AsRef<Path>) -> Result<TraceFile> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(HarnessError::MissingPath {
                path: path.to_path_buf(),
            });
        }
        let data = std::fs::read(path)?;
        Self::from_bytes(&data)
    }

    /// Parse trace records from raw bytes.
    pub fn from_bytes(data: &[u8]) -> Result<TraceFile> {
        let text = if data.starts_with(&GZIP_MAGIC) {
            let mut decoder = flate2::read::GzDecoder::new(data);
            let mut buf = Vec::new();
            decoder.read_to_end(&mut buf)?;
            buf
        } else {
            data.to_vec()
        };

        let mut records = Vec::new();
        for (index, line) in BufReader::new(text.as_slice()).lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let record: TraceRecord = serde_json::from_str(&line)
                .map_err(|e| HarnessError::trace(index + 1, e.to_string()))?;
            records.push(record);
        }

        match records.first() {
            Some(TraceRecord::Header { schema_version, .. }) if schema_version == SCHEMA_VERSION => {}
            Some(TraceRecord::Header { schema_version, .. }) => {
                return Err(HarnessError::trace(
                    1,
                    format!("unsupported schema version {schema_version:?}"),
                ));
            }
            _ => return Err(HarnessError::trace(1, "missing trace_header")),
        }
        Ok(TraceFile { records })
    }
}

/// A parsed trace.
#[derive(Debug, Clone)]
pub struct TraceFile {
    records: Vec<TraceRecord>,
}

impl TraceFile {
    #[must_use]
    pub fn records(&self) -> &[TraceRecord] {
        &self.records
    }

    #[must_use]
    pub fn session_name(&self) -> &str {
        match self.records.first() {
            Some(TraceRecord::Header { session_name, .. }) => session_name,
            _ => "",
        }
    }

    /// Initial item ids from the header.
    #[must_use]
    pub fn items(&self) -> &[ItemId] {
        match self.records.first() {
            Some(TraceRecord::Header { items, .. }) => items,
            _ => &[],
        }
    }

    /// Inputs with their timestamps, in recorded order.
    #[must_use]
    pub fn inputs(&self) -> Vec<(TraceInput, u64)> {
        self.records
            .iter()
            .filter_map(|r| Some((r.to_input()?, r.ts_ns()?)))
            .collect()
    }

    /// Input count from the summary, if present.
    #[must_use]
    pub fn total_events(&self) -> Option<u64> {
        match self.records.last()? {
            TraceRecord::Summary { total_events, .. } => Some(*total_events),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use sortable_core::Direction;

    fn ids() -> Vec<ItemId> {
        vec!["A".into(), "B".into(), "C".into()]
    }

    fn sample_inputs() -> Vec<(TraceInput, u64)> {
        vec![
            (
                TraceInput::Pointer(PointerInput::Down {
                    id: "A".into(),
                    pos: Point::new(100.0, 20.0),
                }),
                0,
            ),
            (
                TraceInput::Pointer(PointerInput::Move {
                    pos: Point::new(100.0, 70.0),
                }),
                16_000_000,
            ),
            (
                TraceInput::Pointer(PointerInput::Up {
                    pos: Point::new(100.0, 70.0),
                }),
                32_000_000,
            ),
            (
                TraceInput::Key {
                    key: KeyInput::Activate,
                    focused: Some("B".into()),
                },
                40_000_000,
            ),
            (
                TraceInput::Key {
                    key: KeyInput::Step(Direction::Down),
                    focused: None,
                },
                41_000_000,
            ),
            (TraceInput::Tick, 42_000_000),
            (TraceInput::Pointer(PointerInput::Interrupt), 50_000_000),
        ]
    }

    #[test]
    fn write_and_read_plain_jsonl() {
        let mut buf = Vec::new();
        {
            let mut writer = TraceWriter::from_writer(&mut buf, "plain", &ids()).unwrap();
            for (input, ts) in sample_inputs() {
                writer.record(&input, ts).unwrap();
            }
            assert_eq!(writer.event_count(), 7);
            writer.finish().unwrap();
        }

        let trace = TraceReader::from_bytes(&buf).unwrap();
        assert_eq!(trace.session_name(), "plain");
        assert_eq!(trace.items(), ids().as_slice());
        assert_eq!(trace.total_events(), Some(7));
        assert_eq!(trace.inputs(), sample_inputs());
        assert_eq!(
            trace.records().last(),
            Some(&TraceRecord::Summary {
                total_events: 7,
                total_duration_ns: 50_000_000,
            })
        );
    }

    #[test]
    fn gzip_chosen_by_suffix_and_detected_by_magic() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trace.jsonl.gz");
        {
            let mut writer = TraceWriter::create(&path, "gz", &ids()).unwrap();
            for (input, ts) in sample_inputs() {
                writer.record(&input, ts).unwrap();
            }
            writer.close().unwrap();
        }
        let raw = std::fs::read(&path).unwrap();
        assert!(raw.starts_with(&GZIP_MAGIC));

        let trace = TraceReader::open(&path).unwrap();
        assert_eq!(trace.session_name(), "gz");
        assert_eq!(trace.inputs().len(), 7);
    }

    #[test]
    fn close_completes_gzip_before_the_file_is_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("open.jsonl.gz");
        let mut writer = TraceWriter::create(&path, "gz", &ids()).unwrap();
        for (input, ts) in sample_inputs() {
            writer.record(&input, ts).unwrap();
        }
        let file = writer.close().unwrap();

        // The handle is still open: the trailer must already be on disk.
        let raw = std::fs::read(&path).unwrap();
        let trace = TraceReader::from_bytes(&raw).unwrap();
        assert_eq!(trace.total_events(), Some(7));
        drop(file);
    }

    #[test]
    fn close_flushes_plain_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plain.jsonl");
        let mut writer = TraceWriter::create(&path, "plain", &ids()).unwrap();
        writer.record(&TraceInput::Tick, 1).unwrap();
        let _file = writer.close().unwrap();

        let trace = TraceReader::open(&path).unwrap();
        assert_eq!(trace.inputs(), vec![(TraceInput::Tick, 1)]);
    }

    #[test]
    fn key_record_shape() {
        let record = TraceRecord::from_input(
            &TraceInput::Key {
                key: KeyInput::Step(Direction::Up),
                focused: None,
            },
            5,
        );
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"event":"key","ts_ns":5,"key":{"step":"up"}}"#);
    }

    #[test]
    fn missing_header_is_rejected() {
        let data = br#"{"event":"pointer_interrupt","ts_ns":0}"#;
        let err = TraceReader::from_bytes(data).unwrap_err();
        assert!(matches!(err, HarnessError::Trace { line: 1, .. }));
    }

    #[test]
    fn wrong_schema_is_rejected() {
        let data =
            br#"{"event":"trace_header","schema_version":"event-trace-v1","session_name":"x","items":[]}"#;
        let err = TraceReader::from_bytes(data).unwrap_err();
        assert!(err.to_string().contains("unsupported schema version"));
    }

    #[test]
    fn malformed_line_reports_its_number() {
        let data = concat!(
            r#"{"event":"trace_header","schema_version":"sortable-trace-v1","session_name":"x","items":["A"]}"#,
            "\n",
            r#"{"event":"pointer_move","ts_ns":1}"#,
            "\n"
        );
        let err = TraceReader::from_bytes(data.as_bytes()).unwrap_err();
        assert!(matches!(err, HarnessError::Trace { line: 2, .. }));
    }

    #[test]
    fn opening_missing_file_is_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = TraceReader::open(dir.path().join("nope.jsonl")).unwrap_err();
        assert!(matches!(err, HarnessError::MissingPath { .. }));
    }
}
