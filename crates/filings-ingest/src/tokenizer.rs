//! Line-oriented tab separated reader
//!
//! Data set entries are tab separated with one header line. Lines can be far
//! longer than any fixed buffer (text facts carry whole paragraphs), so each
//! line is read with a growable `read_until`.

use std::io::{self, BufRead};

/// Reader over the data rows of one archive entry.
///
/// The header line is consumed by [`TsvReader::new`]. Each call to
/// [`TsvReader::read_row`] yields the tokens of the next line with the line
/// terminator removed; tokens are never trimmed or unquoted. A blank line is a
/// row of one empty token, which every table decoder rejects as short.
pub struct TsvReader<R> {
    reader: R,
    buf: Vec<u8>,
    line: String,
    header: Vec<String>,
    line_number: usize,
}

impl<R: BufRead> TsvReader<R> {
    pub fn new(mut reader: R) -> io::Result<Self> {
        let mut buf = Vec::new();
        let read = reader.read_until(b'\n', &mut buf)?;
        let header = if read == 0 {
            Vec::new()
        } else {
            let line = decode_line(&buf);
            line.split('\t').map(str::to_string).collect()
        };

        Ok(Self {
            reader,
            buf,
            line: String::new(),
            header,
            line_number: if read == 0 { 0 } else { 1 },
        })
    }

    /// Column names from the header line, empty for an empty entry
    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// 1-based physical line number of the row last returned
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Next data row, or `None` at end of input.
    ///
    /// A final line without a trailing line feed is still returned. Bytes
    /// that are not valid UTF-8 are replaced.
    pub fn read_row(&mut self) -> io::Result<Option<Vec<&str>>> {
        self.buf.clear();
        if self.reader.read_until(b'\n', &mut self.buf)? == 0 {
            return Ok(None);
        }
        self.line_number += 1;

        self.line = decode_line(&self.buf);
        Ok(Some(self.line.split('\t').collect()))
    }
}

/// Strip one `\n` and one optional preceding `\r`, lossily decoding the rest
fn decode_line(buf: &[u8]) -> String {
    let mut end = buf.len();
    if end > 0 && buf[end - 1] == b'\n' {
        end -= 1;
        if end > 0 && buf[end - 1] == b'\r' {
            end -= 1;
        }
    }
    String::from_utf8_lossy(&buf[..end]).into_owned()
}
