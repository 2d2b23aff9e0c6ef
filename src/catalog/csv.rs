use std::io::BufRead;

/// Streaming reader for comma-separated records with RFC 4180 quoting.
///
/// MovieLens quotes titles containing commas (`"American President, The
/// (1995)"`), so naive splitting is not enough. Records are pulled one at
/// a time; the whole file is never buffered. Quoted fields may contain
/// commas, doubled quotes, and newlines.
pub struct CsvReader<R: BufRead> {
    inner: R,
    line: usize,
    record_line: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum CsvError {
    #[error("Read error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Unterminated quoted field starting at line {line}")]
    UnterminatedQuote { line: usize },
}

impl<R: BufRead> CsvReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            line: 0,
            record_line: 0,
        }
    }

    /// Line number (1-based) at which the most recent record started.
    pub fn record_line(&self) -> usize {
        self.record_line
    }

    /// Read the next record, or `None` at end of input.
    pub fn next_record(&mut self) -> Result<Option<Vec<String>>, CsvError> {
        let mut fields = Vec::new();
        let mut field = String::new();
        let mut in_quotes = false;
        let mut started = false;
        let mut buf = String::new();

        loop {
            buf.clear();
            let n = self.inner.read_line(&mut buf)?;
            if n == 0 {
                if !started {
                    return Ok(None);
                }
                if in_quotes {
                    return Err(CsvError::UnterminatedQuote {
                        line: self.record_line,
                    });
                }
                // Last line had no trailing newline.
                fields.push(field);
                return Ok(Some(fields));
            }

            self.line += 1;
            if !started {
                self.record_line = self.line;
                started = true;
            }

            let mut chars = buf.chars().peekable();
            while let Some(c) = chars.next() {
                if in_quotes {
                    if c == '"' {
                        if chars.peek() == Some(&'"') {
                            chars.next();
                            field.push('"');
                        } else {
                            in_quotes = false;
                        }
                    } else {
                        field.push(c);
                    }
                    continue;
                }
                match c {
                    ',' => fields.push(std::mem::take(&mut field)),
                    '"' if field.is_empty() => in_quotes = true,
                    '\r' if chars.peek() == Some(&'\n') => {}
                    '\n' => {
                        fields.push(field);
                        return Ok(Some(fields));
                    }
                    _ => field.push(c),
                }
            }
            // Reached end of line while inside a quoted field; the newline
            // is part of the field and the record continues.
        }
    }
}
