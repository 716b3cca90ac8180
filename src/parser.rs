//! Line-level parsing of the contents index.

use std::io::BufRead;

use crate::{ContentsError, Result};

/// One classified line of the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    /// Header or commentary preceding the data region.
    Preamble,
    /// A file path and the locations that own it.
    Data(DataLine),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataLine {
    pub file: String,
    pub locations: Vec<String>,
}

/// Classifies one raw index line.
///
/// Every real file path in the index is absolute, so a line without `/` is
/// still part of the leading header block. Data lines split at the last run
/// of whitespace: file paths may contain embedded spaces, the location list
/// never does.
pub fn classify(raw: &str, line_no: u64) -> Result<Line> {
    if !raw.contains('/') {
        return Ok(Line::Preamble);
    }

    let trimmed = raw.trim();
    let Some((idx, ws)) = trimmed
        .char_indices()
        .rev()
        .find(|&(_, c)| c.is_whitespace())
    else {
        return Err(ContentsError::UnsplittableLine { line_no });
    };

    let file = trimmed[..idx].trim_end().to_string();
    let locations = trimmed[idx + ws.len_utf8()..]
        .split(',')
        .map(str::trim)
        .filter(|location| !location.is_empty())
        .map(str::to_string)
        .collect();

    Ok(Line::Data(DataLine { file, locations }))
}

/// Iterator over the lines of a contents index.
///
/// The upstream file is not guaranteed to be valid UTF-8, so each byte is
/// decoded as one `char` (ISO-8859-1) and arbitrary byte values never fail
/// to decode.
pub struct ContentsLines<R> {
    reader: R,
    buf: Vec<u8>,
    line_no: u64,
}

impl<R: BufRead> ContentsLines<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            line_no: 0,
        }
    }

    /// 1-based number of the most recently yielded line.
    pub fn line_no(&self) -> u64 {
        self.line_no
    }
}

impl<R: BufRead> Iterator for ContentsLines<R> {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => None,
            Ok(_) => {
                self.line_no += 1;
                if self.buf.last() == Some(&b'\n') {
                    self.buf.pop();
                }
                if self.buf.last() == Some(&b'\r') {
                    self.buf.pop();
                }
                Some(Ok(self.buf.iter().map(|&b| b as char).collect()))
            }
            Err(e) => Some(Err(e.into())),
        }
    }
}

/// Discards leading non-data lines until the data region starts.
///
/// Returns the first data line so the caller can feed it onward; `None`
/// means the stream ended before any data appeared. Gives up after
/// `max_preamble_lines` discarded lines rather than walking an entire
/// malformed file.
pub fn skip_preamble<R: BufRead>(
    lines: &mut ContentsLines<R>,
    max_preamble_lines: usize,
) -> Result<Option<DataLine>> {
    let mut skipped = 0usize;
    while let Some(line) = lines.next() {
        let line = line?;
        match classify(&line, lines.line_no())? {
            Line::Data(data) => {
                if skipped > 0 {
                    log::debug!("skipped {skipped} preamble lines");
                }
                return Ok(Some(data));
            }
            Line::Preamble => {
                skipped += 1;
                if skipped > max_preamble_lines {
                    return Err(ContentsError::PreambleTooLong {
                        limit: max_preamble_lines,
                    });
                }
            }
        }
    }
    Ok(None)
}
