// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/section.rs - Section reader and writer for AGA tournament report files.
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
 * # `section` Module
 *
 * A report file is a sequence of sections. Each section starts with a line
 * containing its keyword and ends at the first empty line:
 *
 * ```text
 * TOURNEY Summer Open
 * 	start=06/30/2004
 * 	finish=07/02/2004
 * rules=AGA
 *
 * PLAYERS
 *   7068 Nahabedian, Mark 5D
 *
 * GAMES
 * 7068 1234 w0 7
 *
 * ```
 *
 * The TOURNEY section is kept as opaque text. The PLAYERS and GAMES sections
 * are read line by line against the record grammar in [crate::grammar].
 *
 * Input lines may end in `\n` or `\r\n`. Output always uses `\n`.
 */

use std::collections::HashMap;
use std::io::BufRead;
use std::io::Write;

use chrono::NaiveDate;

use crate::error::{Error, Result};
use crate::grammar::{self, GameRecord, REPORT_DATE_FORMAT, Section};
use crate::reader::LineSource;
use crate::roster::{Member, Registry};

/// The TOURNEY section, kept as written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TournamentHeader {
    /// The keyword line without its terminator, e.g. `TOURNEY Summer Open`.
    pub heading: String,
    /// The remaining lines of the section, each ending in `\n`.
    pub body: String,
}

/// The fields of a new tournament description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TournamentInfo {
    pub description: String,
    pub start: NaiveDate,
    pub finish: NaiveDate,
    pub rules: String,
}

impl TournamentInfo {
    /// Renders the description as a TOURNEY section.
    pub fn header(&self) -> TournamentHeader {
        TournamentHeader {
            heading: format!("{} {}", grammar::SH_TOURNAMENT, self.description),
            body: format!(
                "\tstart={}\n\tfinish={}\nrules={}\n",
                self.start.format(REPORT_DATE_FORMAT),
                self.finish.format(REPORT_DATE_FORMAT),
                self.rules
            ),
        }
    }
}

/// Whether `line` is a section terminator.
fn is_empty_line(line: &str) -> bool {
    line == "\n" || line == "\r\n"
}

fn end_of_section<R: BufRead>(input: &LineSource<R>, section: Section) -> Error {
    input.format_error(
        "",
        format!("end of file before the end of the {} section", section.keyword()),
    )
}

/// Reads the next line of a section, failing at end of file. Returns `None`
/// at the empty line that ends the section.
fn read_section_line<R: BufRead>(
    input: &mut LineSource<R>,
    section: Section,
) -> Result<Option<String>> {
    let line = input.read_line()?;
    if line.is_empty() {
        return Err(end_of_section(input, section));
    }
    if is_empty_line(&line) {
        log::debug!("end of {} section at {}", section.keyword(), input.location());
        return Ok(None);
    }
    Ok(Some(line))
}

/// Consumes blank and whitespace-only lines, stopping before the next line
/// with content or at end of file.
pub fn skip_blank_lines<R: BufRead>(input: &mut LineSource<R>) -> Result<()> {
    loop {
        let line = input.read_line()?;
        if line.is_empty() {
            return Ok(());
        }
        if !line.trim().is_empty() {
            input.push_back(line);
            return Ok(());
        }
    }
}

/// Reads the TOURNEY section without interpreting it.
pub fn read_tournament_header<R: BufRead>(input: &mut LineSource<R>) -> Result<TournamentHeader> {
    let line = input.read_line()?;
    if !Section::Tournament.is_header(&line) {
        return Err(input.format_error(
            &line,
            format!("Expected line to start with {}", grammar::SH_TOURNAMENT),
        ));
    }
    let heading = line.trim_end_matches(['\r', '\n']).to_string();
    let mut body = String::new();
    while let Some(line) = read_section_line(input, Section::Tournament)? {
        body.push_str(line.trim_end_matches(['\r', '\n']));
        body.push('\n');
    }
    Ok(TournamentHeader { heading, body })
}

/// Reads the PLAYERS section, returning the players in file order.
///
/// Players on the membership list are taken from `registry`; others get a
/// new unrated record. Either way the rank in the file becomes the player's
/// playing-at rank. A player whose surname differs from the membership list,
/// or from an earlier line with the same AGA ID, is an
/// [Error::IdentityConflict].
pub fn read_players<R: BufRead>(
    input: &mut LineSource<R>,
    registry: &Registry,
) -> Result<Vec<Member>> {
    skip_blank_lines(input)?;
    let line = input.read_line()?;
    if !Section::Players.is_header(&line) {
        return Err(input.format_error(&line, format!("Expected {} line.", grammar::SH_PLAYERS)));
    }

    let mut players = Vec::new();
    let mut surnames: HashMap<u32, String> = HashMap::new();
    while let Some(line) = read_section_line(input, Section::Players)? {
        let record = grammar::parse_player(&line)
            .ok_or_else(|| input.format_error(&line, "malformed player line."))?;
        let rank = record
            .rank()
            .map_err(|_| input.format_error(&line, format!("unknown rank {}.", record.rank)))?;

        let expected = registry
            .lookup(record.aga_id)
            .map(|m| m.surname.as_str())
            .or_else(|| surnames.get(&record.aga_id).map(String::as_str));
        if let Some(expected) = expected {
            if expected != record.surname {
                log::error!(
                    "{}: AGA ID {} has conflicting surnames",
                    input.location(),
                    record.aga_id
                );
                return Err(Error::IdentityConflict {
                    id: record.aga_id,
                    found: record.surname,
                    expected: expected.to_string(),
                });
            }
        }

        let mut player = match registry.lookup(record.aga_id) {
            Some(member) => member.clone(),
            None => Member::new(record.surname.clone(), record.given_name, record.aga_id),
        };
        player.play_at(rank);
        surnames.insert(record.aga_id, record.surname);
        players.push(player);
    }
    log::debug!("read {} players", players.len());
    Ok(players)
}

/// Reads the GAMES section if there is one.
///
/// Returns an empty list at end of file.
pub fn read_games<R: BufRead>(input: &mut LineSource<R>) -> Result<Vec<GameRecord>> {
    skip_blank_lines(input)?;
    let line = input.read_line()?;
    if line.is_empty() {
        return Ok(Vec::new());
    }
    if !Section::Games.is_header(&line) {
        return Err(input.format_error(&line, format!("Expected {} line.", grammar::SH_GAMES)));
    }

    let mut games = Vec::new();
    while let Some(line) = read_section_line(input, Section::Games)? {
        let record = grammar::parse_game(&line)
            .ok_or_else(|| input.format_error(&line, "malformed game line."))?;
        games.push(record);
    }
    log::debug!("read {} game records", games.len());
    Ok(games)
}

/// Writes a TOURNEY section for a new tournament, followed by an empty line.
pub fn write_tournament_header<W: Write>(output: &mut W, info: &TournamentInfo) -> Result<()> {
    let header = info.header();
    write!(output, "{}\n{}\n", header.heading, header.body)?;
    Ok(())
}

/// Writes one player line, e.g. `  7068 Nahabedian, Mark 5D`.
///
/// Fails with [Error::UnwritableName] if the line would not read back.
pub fn write_player<W: Write>(output: &mut W, player: &Member) -> Result<()> {
    if !player.has_reportable_name() {
        return Err(Error::UnwritableName {
            id: player.aga_id,
            name: match &player.given_name {
                Some(given_name) => format!("{}, {}", player.surname, given_name),
                None => player.surname.clone(),
            },
        });
    }
    write!(output, "{:>6} {}", player.aga_id, player.surname)?;
    if let Some(given_name) = &player.given_name {
        write!(output, ", {}", given_name)?;
    }
    writeln!(output, " {}", player.playing_at())?;
    Ok(())
}

/// Writes the PLAYERS section, followed by an empty line.
pub fn write_players_section<W: Write>(output: &mut W, players: &[Member]) -> Result<()> {
    writeln!(output, "{}", grammar::SH_PLAYERS)?;
    for player in players {
        write_player(output, player)?;
    }
    writeln!(output)?;
    Ok(())
}

/// Writes one line of the GAMES section.
pub fn write_game<W: Write>(output: &mut W, record: &GameRecord) -> Result<()> {
    match record {
        GameRecord::Pairing(p) => writeln!(output, "{} {}", p.white, p.black)?,
        GameRecord::Result(r) => writeln!(
            output,
            "{} {} {}{} {}",
            r.white,
            r.black,
            r.winner.letter(),
            r.handicap,
            r.komi
        )?,
        GameRecord::Pass(id) => writeln!(output, "{} {}", grammar::PASS_KEYWORD, id)?,
    }
    Ok(())
}

/// Writes the GAMES section, followed by an empty line.
pub fn write_games_section<'a, W, I>(output: &mut W, records: I) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a GameRecord>,
{
    writeln!(output, "{}", grammar::SH_GAMES)?;
    for record in records {
        write_game(output, record)?;
    }
    writeln!(output)?;
    Ok(())
}
