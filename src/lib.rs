// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/lib.rs - Reader and writer library for AGA tournament report files.
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
 * # `agaroster` Crate
 *
 * A library for keeping the player roster of a Go tournament in the American
 * Go Association's tournament report format.
 *
 * The pieces, from the bottom up:
 *
 * 1. [reader]: Reads a file line by line, tracking line numbers.
 * 2. [grammar]: Patterns for each kind of line in a report.
 * 3. [section]: Reads and writes the sections of a report.
 * 4. [report]: The contents of one report file, with load and save.
 * 5. [roster]: The AGA membership list that players are looked up in.
 *
 * [registration] and [command] build the interactive registration tool on
 * top of these.
 *
 * ## Usage Example
 *
 * ```no_run
 * use agaroster::report::Report;
 * use agaroster::roster::Registry;
 *
 * fn main() -> Result<(), Box<dyn std::error::Error>> {
 *     // Load the membership list
 *     let mut registry = Registry::new();
 *     registry.read_member_file("TDListA.txt")?;
 *
 *     // Load the roster
 *     let mut report = Report::new("players.txt");
 *     report.load(&registry)?;
 *
 *     // Show who is playing
 *     for player in &report.players {
 *         println!("{:#}", player);
 *     }
 *
 *     Ok(())
 * }
 * ```
 */

pub mod command;
pub mod error;
pub mod grammar;
pub mod rank;
pub mod reader;
pub mod registration;
pub mod report;
pub mod roster;
pub mod section;

pub use error::{Error, FormatError, Result};
