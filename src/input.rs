use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

use crate::domain::GeneRecord;
use crate::error::GeneCacheError;

/// Lazily reads gene records from a tab separated list, one per line.
pub struct RecordReader<R: BufRead> {
    lines: Lines<R>,
    line: usize,
}

impl RecordReader<BufReader<File>> {
    pub fn open(path: &Path) -> Result<Self, GeneCacheError> {
        let file = File::open(path).map_err(|err| GeneCacheError::InputOpen {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> RecordReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line: 0,
        }
    }
}

impl<R: BufRead> Iterator for RecordReader<R> {
    type Item = Result<GeneRecord, GeneCacheError>;

    fn next(&mut self) -> Option<Self::Item> {
        let line = self.lines.next()?;
        self.line += 1;
        let number = self.line;
        Some(match line {
            Ok(text) => GeneRecord::parse_line(text.trim_end_matches('\r'), number),
            Err(err) => Err(GeneCacheError::InputRead {
                line: number,
                message: err.to_string(),
            }),
        })
    }
}
