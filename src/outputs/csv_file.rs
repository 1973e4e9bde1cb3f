//! CSV result file.
//!
//! The file is opened once per run in append mode and every row is flushed as
//! soon as it is written, so an interrupted run keeps everything written
//! before the interruption. Quoting is minimal: fields are quoted only when
//! they contain a delimiter, quote, or line break (raw links usually do,
//! because they end in a newline).

use crate::models::OutputRow;
use crate::utils::ensure_parent_dir;
use csv::{QuoteStyle, Terminator, Writer, WriterBuilder};
use std::error::Error;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use tracing::{debug, info, instrument};

pub struct CsvSink<W: Write> {
    writer: Writer<W>,
    rows: usize,
}

impl CsvSink<File> {
    /// Open `path` for appending, creating it and its directory if needed.
    #[instrument(level = "info", skip_all, fields(path = %path.display()))]
    pub async fn open_append(path: &Path) -> Result<Self, Box<dyn Error>> {
        ensure_parent_dir(path).await?;
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        info!("Opened output file for appending");
        Ok(Self::from_writer(file))
    }
}

impl<W: Write> CsvSink<W> {
    pub fn from_writer(inner: W) -> Self {
        let writer = WriterBuilder::new()
            .has_headers(false)
            .delimiter(b',')
            .quote(b'"')
            .quote_style(QuoteStyle::Necessary)
            .terminator(Terminator::CRLF)
            .from_writer(inner);
        Self { writer, rows: 0 }
    }

    /// Append one row and flush it.
    pub fn write_row(&mut self, row: &OutputRow) -> Result<(), Box<dyn Error>> {
        self.writer.write_record(row.as_record())?;
        self.writer.flush()?;
        self.rows += 1;
        debug!(rows = self.rows, "Wrote row");
        Ok(())
    }

    /// Rows written through this sink.
    pub fn rows(&self) -> usize {
        self.rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LinkForm;
    use crate::ledger::Ledger;

    fn row(link: &str, sentence: &str, author: Option<&str>) -> OutputRow {
        OutputRow {
            link: link.to_string(),
            sentence: sentence.to_string(),
            author: author.map(str::to_string),
        }
    }

    #[test]
    fn test_minimal_quoting() {
        let mut sink = CsvSink::from_writer(Vec::new());
        sink.write_row(&row("https://a.test/1", "Plain sentence.", Some("Jane Doe")))
            .unwrap();
        sink.write_row(&row(
            "https://a.test/1\n",
            "He said \"black\", then left.",
            None,
        ))
        .unwrap();
        assert_eq!(sink.rows(), 2);

        let bytes = sink.writer.into_inner().map_err(|e| e.to_string()).unwrap();
        let out = String::from_utf8(bytes).unwrap();
        assert_eq!(
            out,
            "https://a.test/1,Plain sentence.,Jane Doe\r\n\"https://a.test/1\n\",\"He said \"\"black\"\", then left.\",\r\n"
        );
    }

    #[tokio::test]
    async fn test_appends_and_round_trips_through_ledger() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out/results.csv");

        {
            let mut sink = CsvSink::open_append(&path).await.unwrap();
            sink.write_row(&row("https://a.test/1\n", "Black history.", Some("A")))
                .unwrap();
        }
        {
            let mut sink = CsvSink::open_append(&path).await.unwrap();
            sink.write_row(&row("https://a.test/2\n", "African art.", Some("B")))
                .unwrap();
        }

        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_path(&path)
            .unwrap();
        let records: Vec<csv::StringRecord> = rdr.records().map(Result::unwrap).collect();
        assert_eq!(records.len(), 2);
        assert_eq!(&records[0][0], "https://a.test/1\n");
        assert_eq!(&records[1][1], "African art.");

        let ledger = Ledger::load(&path, LinkForm::Raw).unwrap();
        assert!(ledger.has_seen("https://a.test/1\n"));
        assert!(ledger.has_seen("https://a.test/2\n"));
    }

    #[tokio::test]
    async fn test_rows_end_with_crlf_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        {
            let mut sink = CsvSink::open_append(&path).await.unwrap();
            sink.write_row(&row("https://a.test/1\n", "Black history.", None))
                .unwrap();
        }

        let raw = std::fs::read_to_string(&path).unwrap();
        assert_eq!(raw, "\"https://a.test/1\n\",Black history.,\r\n");
    }
}
