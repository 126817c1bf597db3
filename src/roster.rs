// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/roster.rs - The AGA membership list.
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
 * # `roster` Module
 *
 * This module models the AGA membership list (`TDListA.txt`), a
 * tab-separated file with one member per line:
 *
 * ```text
 * Nahabedian, Mark	7068	Full	-3.5	6/30/2027
 * ```
 *
 * ## Usage Example
 *
 * ```no_run
 * use agaroster::roster::Registry;
 *
 * fn main() -> Result<(), Box<dyn std::error::Error>> {
 *     let mut registry = Registry::new();
 *     registry.read_member_file("TDListA.txt")?;
 *
 *     for member in registry.search("ahabed") {
 *         println!("{}", member);
 *     }
 *
 *     Ok(())
 * }
 * ```
 */

use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::{Error, Result};
use crate::grammar;
use crate::rank::{Rank, rank_from_rating};

/// Where the current membership list is published.
pub const AGA_MEMBER_FILE_URI: &str = "https://www.usgo.org/ratings/TDListA.txt";
/// The usual local name of the membership list.
pub const AGA_MEMBER_FILE_NAME: &str = "TDListA.txt";

const MEMBER_DATE_FORMAT: &str = "%m/%d/%Y";

/// A single entry of the AGA membership list.
#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    /// The member's last name.
    pub surname: String,
    /// The member's first name(s), if known.
    pub given_name: Option<String>,
    /// The member's AGA ID number.
    pub aga_id: u32,
    /// The kind of membership, e.g. `Full` or `Youth`.
    pub membership_type: Option<String>,
    /// The member's AGA rating, if rated.
    pub rating: Option<Decimal>,
    /// When the membership expires.
    pub expiration: Option<NaiveDate>,
    /// The rank the member plays at in this tournament, if it differs from
    /// their rating.
    pub playing_at: Option<Rank>,
}

impl Member {
    /// Makes an unrated member that is not on the membership list.
    pub fn new(surname: impl Into<String>, given_name: Option<String>, aga_id: u32) -> Self {
        Self {
            surname: surname.into(),
            given_name,
            aga_id,
            membership_type: None,
            rating: None,
            expiration: None,
            playing_at: None,
        }
    }

    /// Parses one record of the membership list.
    ///
    /// The record must have at least five fields: name, AGA ID, membership
    /// type, rating and expiration date. An empty rating means the member is
    /// unrated; an unparseable date is treated as unknown.
    pub fn from_record(record: &csv::StringRecord) -> Result<Self> {
        let field = |i: usize| record.get(i).unwrap_or("").trim();
        let bad = |message: String| Error::InvalidMemberRecord {
            line: record.position().map(|p| p.line()).unwrap_or(0),
            message,
        };

        let (surname, given_name) = match field(0).split_once(',') {
            Some((last, first)) => (last.trim(), Some(first.trim())),
            None => (field(0), None),
        };
        let aga_id = field(1)
            .parse::<u32>()
            .map_err(|e| bad(format!("AGA ID {:?}: {}", field(1), e)))?;
        let membership_type = Some(field(2)).filter(|s| !s.is_empty());
        let rating = match field(3) {
            "" => None,
            text => {
                let rating = Decimal::from_str(text)
                    .map_err(|e| bad(format!("rating {:?}: {}", text, e)))?;
                rank_from_rating(rating).map_err(|e| bad(e.to_string()))?;
                Some(rating)
            }
        };
        let expiration = NaiveDate::parse_from_str(field(4), MEMBER_DATE_FORMAT).ok();

        Ok(Self {
            surname: surname.to_string(),
            given_name: given_name.filter(|s| !s.is_empty()).map(String::from),
            aga_id,
            membership_type: membership_type.map(String::from),
            rating,
            expiration,
            playing_at: None,
        })
    }

    /// The rank derived from the member's rating, 30 kyu if unrated.
    pub fn rank(&self) -> Rank {
        self.rating
            .and_then(|r| rank_from_rating(r).ok())
            .unwrap_or(Rank::WEAKEST)
    }

    /// The rank the member plays at in the current tournament.
    pub fn playing_at(&self) -> Rank {
        self.playing_at.unwrap_or_else(|| self.rank())
    }

    /// Whether the member's name can be written as a player line and read
    /// back. Apostrophes and multi-word surnames can't.
    pub fn has_reportable_name(&self) -> bool {
        grammar::is_valid_surname(&self.surname)
            && self
                .given_name
                .as_deref()
                .is_none_or(grammar::is_valid_given_names)
    }

    /// Registers the member to play at `rank`.
    pub fn play_at(&mut self, rank: Rank) {
        self.playing_at = Some(rank);
    }
}

impl fmt::Display for Member {
    /// Formats as `7068 Nahabedian, Mark (5D)`. The alternate form pads the
    /// AGA ID to six columns for aligned listings.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            write!(f, "{:>6} {}", self.aga_id, self.surname)?;
        } else {
            write!(f, "{} {}", self.aga_id, self.surname)?;
        }
        if let Some(given_name) = &self.given_name {
            write!(f, ", {}", given_name)?;
        }
        write!(f, " ({})", self.playing_at())
    }
}

/// The set of known AGA members, keyed by AGA ID.
///
/// Members keep the order in which they were first added.
#[derive(Debug, Default)]
pub struct Registry {
    members: Vec<Member>,
    index: HashMap<u32, usize>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Member> {
        self.members.iter()
    }

    /// Adds `member`, replacing any earlier record with the same AGA ID.
    ///
    /// Fails with [Error::IdentityConflict] if the earlier record has a
    /// different surname.
    pub fn insert(&mut self, member: Member) -> Result<()> {
        match self.index.get(&member.aga_id) {
            Some(&i) => {
                let existing = &mut self.members[i];
                if existing.surname != member.surname {
                    log::error!(
                        "AGA ID {} is already known as {}, not {}",
                        member.aga_id,
                        existing.surname,
                        member.surname
                    );
                    return Err(Error::IdentityConflict {
                        id: member.aga_id,
                        found: member.surname,
                        expected: existing.surname.clone(),
                    });
                }
                *existing = member;
            }
            None => {
                self.index.insert(member.aga_id, self.members.len());
                self.members.push(member);
            }
        }
        Ok(())
    }

    /// Imports tab-separated membership records from `reader`, returning the
    /// number of members read. Lines with fewer than five fields are skipped.
    ///
    /// Every record is parsed and checked before any is added, so on error
    /// the registry is unchanged.
    pub fn import<R: Read>(&mut self, reader: R) -> Result<usize> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .flexible(true)
            .has_headers(false)
            .quoting(false)
            .from_reader(reader);

        let mut batch = Vec::new();
        for result in reader.records() {
            let record = result?;
            if record.len() < 5 {
                continue;
            }
            batch.push(Member::from_record(&record)?);
        }

        let mut surnames: HashMap<u32, &str> = HashMap::new();
        for member in &batch {
            let expected = surnames
                .get(&member.aga_id)
                .copied()
                .or_else(|| self.lookup(member.aga_id).map(|m| m.surname.as_str()));
            if let Some(expected) = expected {
                if expected != member.surname {
                    log::error!(
                        "AGA ID {} is listed as both {} and {}",
                        member.aga_id,
                        expected,
                        member.surname
                    );
                    return Err(Error::IdentityConflict {
                        id: member.aga_id,
                        found: member.surname.clone(),
                        expected: expected.to_string(),
                    });
                }
            }
            surnames.insert(member.aga_id, &member.surname);
        }

        let count = batch.len();
        for member in batch {
            self.insert(member)?;
        }
        log::info!("imported {} AGA members", count);
        Ok(count)
    }

    /// Fails with [Error::AlreadyLoaded] unless the registry is empty.
    pub fn check_not_loaded(&self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(Error::AlreadyLoaded)
        }
    }

    /// Loads the membership list from `path` into an empty registry.
    pub fn read_member_file<P: AsRef<Path>>(&mut self, path: P) -> Result<usize> {
        self.check_not_loaded()?;
        let path = path.as_ref();
        log::debug!("reading membership list {}", path.display());
        self.import(File::open(path)?)
    }

    /// Makes sure the registry is populated.
    ///
    /// Does nothing if members are already loaded. Otherwise, if there is no
    /// file at `path`, calls `fetch` to put one there, then reads it.
    pub fn ensure_loaded<P, F>(&mut self, path: P, fetch: F) -> Result<()>
    where
        P: AsRef<Path>,
        F: FnOnce(&Path) -> Result<()>,
    {
        if !self.is_empty() {
            return Ok(());
        }
        let path = path.as_ref();
        if !path.exists() {
            log::info!("{} not found, fetching it", path.display());
            fetch(path)?;
        }
        self.read_member_file(path)?;
        Ok(())
    }

    /// Looks up a member by AGA ID.
    pub fn lookup(&self, aga_id: u32) -> Option<&Member> {
        self.index.get(&aga_id).map(|&i| &self.members[i])
    }

    /// Returns the members whose surname or given name contains `substring`.
    pub fn search(&self, substring: &str) -> Vec<&Member> {
        self.members
            .iter()
            .filter(|m| {
                m.surname.contains(substring)
                    || m.given_name.as_deref().is_some_and(|g| g.contains(substring))
            })
            .collect()
    }
}
