//! Dedup ledger of links already present in the output file.
//!
//! The ledger is derived state: it is rebuilt from column 0 of the output CSV
//! at the start of every run and never written anywhere itself.

use crate::config::LinkForm;
use std::collections::HashMap;
use std::error::Error;
use std::path::Path;
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Default)]
pub struct Ledger {
    /// Link -> number of rows already written for it.
    seen: HashMap<String, usize>,
    form: LinkForm,
}

impl Ledger {
    /// An empty ledger, as for a first run.
    pub fn empty(form: LinkForm) -> Self {
        Self {
            seen: HashMap::new(),
            form,
        }
    }

    /// Build the ledger from an existing output file.
    ///
    /// A missing file yields an empty ledger. Records that fail to parse are
    /// logged and skipped.
    #[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>, form: LinkForm) -> Result<Self, Box<dyn Error>> {
        let path = path.as_ref();
        let mut ledger = Self::empty(form);
        if !path.exists() {
            info!("No previous output; starting with an empty ledger");
            return Ok(ledger);
        }

        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path)?;

        for (i, record) in rdr.records().enumerate() {
            match record {
                Ok(record) => {
                    if let Some(link) = record.get(0) {
                        ledger.insert(link);
                    }
                }
                Err(e) => warn!(row = i, error = %e, "Unreadable ledger row; ignoring"),
            }
        }

        info!(links = ledger.len(), "Loaded ledger from previous output");
        Ok(ledger)
    }

    fn insert(&mut self, link: &str) {
        let key = self.form.key(link).to_string();
        *self.seen.entry(key).or_insert(0) += 1;
    }

    /// Whether rows for this input line already exist.
    pub fn has_seen(&self, link: &str) -> bool {
        let hit = self.seen.contains_key(self.form.key(link));
        if !hit && self.form == LinkForm::Raw && self.seen.contains_key(link.trim()) {
            debug!(link = %link.trim(), "Link matches a ledger entry only after trimming");
        }
        hit
    }

    /// Rows recorded for a link in the previous output.
    pub fn rows_for(&self, link: &str) -> usize {
        self.seen.get(self.form.key(link)).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }
}
