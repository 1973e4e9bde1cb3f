//! Input link reader.
//!
//! Links are read one line at a time and handed out exactly as they appear in
//! the file, trailing newline included. The raw line is the link's identity
//! for the dedup ledger and for the first CSV column; only navigation trims it.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use tracing::{info, instrument};

/// Lazy, single-pass sequence of raw input lines.
pub struct LinkSource<R> {
    reader: R,
}

impl LinkSource<BufReader<File>> {
    /// Open the input file. Failing here is fatal for the whole run.
    #[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = File::open(path.as_ref())?;
        info!("Opened link source");
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> LinkSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> Iterator for LinkSource<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut line = String::new();
        match self.reader.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(Ok(line)),
            Err(e) => Some(Err(e)),
        }
    }
}
