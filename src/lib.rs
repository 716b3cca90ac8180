//! Parsing and aggregation for Debian `Contents-<arch>` package indices.
//!
//! A contents index maps every file path shipped by a distribution to the
//! package(s) that own it. This crate streams through a decompressed index
//! one line at a time and tallies how many entries each package owns, so
//! the packages shipping the most files can be ranked and reported.

use std::io::BufRead;

pub mod fetch;
pub mod parser;
pub mod report;
pub mod stats;

pub use parser::{classify, skip_preamble, ContentsLines, DataLine, Line};
pub use stats::{PackageCounts, RankedPackage};

pub type Result<T> = std::result::Result<T, ContentsError>;

#[derive(Debug, thiserror::Error)]
pub enum ContentsError {
    #[error("no data line found within the first {limit} lines of the index")]
    PreambleTooLong { limit: usize },

    #[error("cannot split line {line_no} into a file path and a location list")]
    UnsplittableLine { line_no: u64 },

    #[error("\"{url}\" does not exist on the remote server")]
    NotFound { url: String },

    #[error("remote server returned HTTP {status} for {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Consumes a decompressed contents index and tallies how many entries each
/// package location owns.
///
/// Leading header lines are skipped, bounded by `max_preamble_lines`. A
/// stream that ends before any data line yields an empty table; a failure
/// while reading or splitting a line aborts the whole run, so a partial
/// count is never returned.
pub fn aggregate_contents<R: BufRead>(
    reader: R,
    max_preamble_lines: usize,
) -> Result<PackageCounts> {
    let mut lines = ContentsLines::new(reader);
    let mut counts = PackageCounts::new();

    let Some(first) = skip_preamble(&mut lines, max_preamble_lines)? else {
        return Ok(counts);
    };
    counts.observe(&first);

    while let Some(line) = lines.next() {
        let line = line?;
        match classify(&line, lines.line_no())? {
            Line::Data(data) => counts.observe(&data),
            // Blank or stray text inside the data region carries no
            // ownership facts.
            Line::Preamble => {
                log::debug!("ignoring non-data line {}", lines.line_no());
            }
        }
    }

    Ok(counts)
}
