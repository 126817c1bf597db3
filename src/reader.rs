// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/reader.rs - Line-numbered reader for AGA tournament report files.
 *  Copyright (C) 2026  Forest Crossman <cyrozap@gmail.com>
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  You should have received a copy of the GNU General Public License
 *  along with this program.  If not, see <https://www.gnu.org/licenses/>.
 */

/*!
 * # `reader` Module
 *
 * [LineSource] reads a report one line at a time while keeping track of the
 * current line number, so that format errors can point at the offending
 * line. A single line can be pushed back to be returned again by the next
 * read.
 */

use std::fs::File;
use std::io::BufRead;
use std::io::BufReader;
use std::path::Path;

use crate::error::{Error, FormatError, Result};

/// A line reader with line number tracking and one line of pushback.
#[derive(Debug)]
pub struct LineSource<R> {
    name: String,
    reader: R,
    line_number: usize,
    pushed_back: Option<String>,
}

impl LineSource<BufReader<File>> {
    /// Opens the file at `path` for reading.
    ///
    /// The file is closed when the returned reader is dropped. A missing file
    /// is reported as an [Error::Io] for which [Error::is_not_found] holds.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        log::debug!("opened {} for reading", path.display());
        Ok(Self::new(path.display().to_string(), BufReader::new(file)))
    }
}

impl<R: BufRead> LineSource<R> {
    /// Wraps `reader`, using `name` in error messages.
    pub fn new(name: impl Into<String>, reader: R) -> Self {
        Self {
            name: name.into(),
            reader,
            line_number: 0,
            pushed_back: None,
        }
    }

    /// The name of the underlying file.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The number of the last line read from the underlying stream.
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Returns the next line, including its terminator.
    ///
    /// An empty string means the end of the stream has been reached.
    pub fn read_line(&mut self) -> Result<String> {
        if let Some(line) = self.pushed_back.take() {
            return Ok(line);
        }
        let mut line = String::new();
        if self.reader.read_line(&mut line)? > 0 {
            self.line_number += 1;
        }
        Ok(line)
    }

    /// Arranges for `line` to be returned by the next call to
    /// [LineSource::read_line]. Only one line is kept; pushing back a second
    /// line replaces the first.
    pub fn push_back(&mut self, line: String) {
        self.pushed_back = Some(line);
    }

    /// The file name and current line number, for diagnostics.
    pub fn location(&self) -> String {
        format!("{} {}", self.name, self.line_number)
    }

    /// Builds a format error pointing at the current line.
    pub fn format_error(&self, line: &str, message: impl Into<String>) -> Error {
        Error::Format(FormatError {
            file: self.name.clone(),
            line_number: self.line_number,
            line: line.to_string(),
            message: message.into(),
        })
    }
}
