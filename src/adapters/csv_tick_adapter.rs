//! CSV tick replay adapter.
//!
//! Reads `time,open,high,low,close,volume[,complete]` rows for a single
//! instrument and replays them in file order. `time` may be unix seconds or
//! milliseconds; the aggregator normalizes on ingest.

use crate::domain::bar::Tick;
use crate::domain::error::TickscoreError;
use crate::ports::tick_port::TickSource;
use rust_decimal::Decimal;
use std::fs::File;
use std::path::Path;

pub struct CsvTickAdapter {
    instrument: String,
    records: csv::StringRecordsIntoIter<File>,
}

impl CsvTickAdapter {
    pub fn from_file<P: AsRef<Path>>(
        path: P,
        instrument: impl Into<String>,
    ) -> Result<Self, TickscoreError> {
        let reader = csv::Reader::from_path(&path).map_err(|e| TickscoreError::TickData {
            reason: format!("failed to open {}: {}", path.as_ref().display(), e),
        })?;
        Ok(CsvTickAdapter {
            instrument: instrument.into(),
            records: reader.into_records(),
        })
    }

    fn parse_record(&self, record: &csv::StringRecord) -> Result<Tick, TickscoreError> {
        let time: i64 = parse_column(record, 0, "time")?;
        let open: Decimal = parse_column(record, 1, "open")?;
        let high: Decimal = parse_column(record, 2, "high")?;
        let low: Decimal = parse_column(record, 3, "low")?;
        let close: Decimal = parse_column(record, 4, "close")?;
        let volume: i64 = parse_column(record, 5, "volume")?;
        let complete = match record.get(6) {
            Some(raw) => parse_value(raw, "complete")?,
            None => false,
        };

        Ok(Tick {
            instrument: self.instrument.clone(),
            time,
            open,
            high,
            low,
            close,
            volume,
            complete,
        })
    }
}

impl TickSource for CsvTickAdapter {
    fn next_tick(&mut self) -> Result<Option<Tick>, TickscoreError> {
        match self.records.next() {
            None => Ok(None),
            Some(Err(e)) => Err(TickscoreError::TickData {
                reason: format!("CSV parse error: {e}"),
            }),
            Some(Ok(record)) => self.parse_record(&record).map(Some),
        }
    }
}

fn parse_column<T: std::str::FromStr>(
    record: &csv::StringRecord,
    index: usize,
    name: &str,
) -> Result<T, TickscoreError> {
    let raw = record.get(index).ok_or_else(|| TickscoreError::TickData {
        reason: format!("missing {name} column"),
    })?;
    parse_value(raw, name)
}

fn parse_value<T: std::str::FromStr>(raw: &str, name: &str) -> Result<T, TickscoreError> {
    raw.trim().parse().map_err(|_| TickscoreError::TickData {
        reason: format!("invalid {name} value '{raw}'"),
    })
}
