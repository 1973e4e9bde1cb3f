//! Output generation.
//!
//! Results go to a single append-only CSV file with three columns and no
//! header:
//!
//! ```text
//! link,sentence,author
//! ```
//!
//! # Submodules
//!
//! - [`csv_file`]: Opens the output in append mode and writes one flushed row at a time

pub mod csv_file;
