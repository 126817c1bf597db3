// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/error.rs - Error types for AGA tournament report files.
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

use std::io;

use rust_decimal::Decimal;
use thiserror::Error;

/// A line of a report file that does not match the grammar expected at its
/// position.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{file} {line_number}: {message}")]
pub struct FormatError {
    /// The name of the file being read.
    pub file: String,
    /// The 1-based number of the offending line.
    pub line_number: usize,
    /// The raw text of the offending line, terminator included.
    pub line: String,
    /// What was expected.
    pub message: String,
}

/// Error is an error which may occur while reading or writing rosters.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error("for AGA member {id}, last names don't match: {found} versus {expected}")]
    IdentityConflict {
        id: u32,
        found: String,
        expected: String,
    },
    #[error("invalid rating {0}")]
    InvalidRating(Decimal),
    #[error("invalid rank {0:?}")]
    InvalidRank(String),
    #[error("the AGA membership list has already been loaded")]
    AlreadyLoaded,
    #[error("failed to read membership list: {0}")]
    Csv(#[from] csv::Error),
    #[error("bad membership record on line {line}: {message}")]
    InvalidMemberRecord { line: u64, message: String },
    #[error("the name of AGA member {id} can't be written to a report: {name}")]
    UnwritableName { id: u32, name: String },
    #[error("wrong regular expression: {0}")]
    WrongRegularExpression(#[from] regex::Error),
}

impl Error {
    /// Returns true if this error means a file does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Io(e) if e.kind() == io::ErrorKind::NotFound)
    }
}

/// Result is an alias for standard result with bound Error type.
pub type Result<T> = std::result::Result<T, Error>;
