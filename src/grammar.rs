// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/grammar.rs - Record grammar for AGA tournament report files.
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
 * # `grammar` Module
 *
 * Field patterns and whole-record patterns for the lines of a report file.
 *
 * Field patterns are plain regular expression fragments with a named capture
 * group, so they can be composed into record patterns and also matched on
 * their own. Record patterns match a whole line; leading and trailing
 * whitespace (including the line terminator) is allowed.
 *
 * Each `parse_*` function decomposes one line into a typed record, returning
 * `None` when the line does not match. Callers turn that into a format error
 * with the position of the line.
 */

use std::sync::LazyLock;

use regex::Regex;

use crate::rank::Rank;

/// Keyword opening the tournament description section.
pub const SH_TOURNAMENT: &str = "TOURNEY";
/// Keyword opening the player roster section.
pub const SH_PLAYERS: &str = "PLAYERS";
/// Keyword opening the pairings and results section.
pub const SH_GAMES: &str = "GAMES";

/// Keyword introducing a player who sat out a round.
pub const PASS_KEYWORD: &str = "PASSED:";

/// Date format used by the tournament header, e.g. `06/30/2004`.
pub const REPORT_DATE_FORMAT: &str = "%m/%d/%Y";

pub fn aga_id_pattern(name: &str) -> String {
    format!("(?P<{name}>[0-9]+)")
}

/// A surname: letters and periods, no whitespace.
pub fn name_pattern(name: &str) -> String {
    format!("(?P<{name}>[a-zA-Z.]+)")
}

/// One or more given names: letters, periods and spaces.
pub fn names_pattern(name: &str) -> String {
    format!("(?P<{name}>[a-zA-Z. ]+)")
}

pub fn whitespace_pattern() -> &'static str {
    r"\s+"
}

pub fn opt_comma_pattern(name: &str) -> String {
    format!("(?P<{name}>,?)")
}

pub fn rank_pattern(name: &str) -> String {
    format!("(?P<{name}>[0-9]+[KDP])")
}

pub fn winner_pattern(name: &str) -> String {
    format!("(?P<{name}>[wb])")
}

pub fn handicap_pattern(name: &str) -> String {
    format!("(?P<{name}>[0-9])")
}

pub fn komi_pattern(name: &str) -> String {
    format!("(?P<{name}>-?[0-9]+)")
}

fn whole_line(pattern: &str) -> Regex {
    Regex::new(&format!(r"^\s*{pattern}\s*$")).expect("valid record regex")
}

fn keyword(word: &str) -> Regex {
    Regex::new(&format!("(?i){}", regex::escape(word))).expect("valid keyword regex")
}

// The given names are optional so that registry members with no given name
// can be written and read back.
static PLAYER_RECORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    whole_line(&format!(
        "{}{}{}{}(?:{}{})?{}{}",
        aga_id_pattern("AGA_ID"),
        whitespace_pattern(),
        name_pattern("NAME1"),
        opt_comma_pattern("COMMA"),
        whitespace_pattern(),
        names_pattern("NAME2"),
        whitespace_pattern(),
        rank_pattern("RANK"),
    ))
});

static PAIRING_RECORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    whole_line(&format!(
        "{}{}{}",
        aga_id_pattern("WHITE_ID"),
        whitespace_pattern(),
        aga_id_pattern("BLACK_ID"),
    ))
});

static RESULT_RECORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    whole_line(&format!(
        "{}{}{}{}{}{}{}{}",
        aga_id_pattern("WHITE_ID"),
        whitespace_pattern(),
        aga_id_pattern("BLACK_ID"),
        whitespace_pattern(),
        winner_pattern("WINNER"),
        handicap_pattern("HANDICAP"),
        whitespace_pattern(),
        komi_pattern("KOMI"),
    ))
});

static PASS_RECORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    whole_line(&format!(
        "{}{}{}",
        regex::escape(PASS_KEYWORD),
        whitespace_pattern(),
        aga_id_pattern("AGA_ID"),
    ))
});

static SH_TOURNAMENT_RE: LazyLock<Regex> = LazyLock::new(|| keyword(SH_TOURNAMENT));
static SH_PLAYERS_RE: LazyLock<Regex> = LazyLock::new(|| keyword(SH_PLAYERS));
static SH_GAMES_RE: LazyLock<Regex> = LazyLock::new(|| keyword(SH_GAMES));

/// The section headers of a report file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Tournament,
    Players,
    Games,
}

impl Section {
    /// The keyword that introduces this section.
    pub fn keyword(self) -> &'static str {
        match self {
            Section::Tournament => SH_TOURNAMENT,
            Section::Players => SH_PLAYERS,
            Section::Games => SH_GAMES,
        }
    }

    /// Whether `line` contains this section's keyword, in any case.
    pub fn is_header(self, line: &str) -> bool {
        match self {
            Section::Tournament => SH_TOURNAMENT_RE.is_match(line),
            Section::Players => SH_PLAYERS_RE.is_match(line),
            Section::Games => SH_GAMES_RE.is_match(line),
        }
    }
}

/// Which side won a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn letter(self) -> char {
        match self {
            Color::White => 'w',
            Color::Black => 'b',
        }
    }

    fn from_letter(s: &str) -> Option<Color> {
        match s {
            "w" => Some(Color::White),
            "b" => Some(Color::Black),
            _ => None,
        }
    }
}

/// A decomposed player line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerRecord {
    pub aga_id: u32,
    pub surname: String,
    pub given_name: Option<String>,
    /// The rank text exactly as written, e.g. `5K`.
    pub rank: String,
}

impl PlayerRecord {
    /// The rank as a point on the amateur scale.
    pub fn rank(&self) -> crate::error::Result<Rank> {
        self.rank.parse()
    }
}

/// Two players paired for a game that has not been played yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pairing {
    pub white: u32,
    pub black: u32,
}

/// The outcome of a played game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameResult {
    pub white: u32,
    pub black: u32,
    pub winner: Color,
    pub handicap: u8,
    pub komi: i32,
}

/// Any line of the GAMES section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameRecord {
    Pairing(Pairing),
    Result(GameResult),
    Pass(u32),
}

/// Parses a player line such as `  7068 Nahabedian, Mark 5D`.
///
/// The surname always comes first; the comma after it may be left out.
pub fn parse_player(line: &str) -> Option<PlayerRecord> {
    let caps = PLAYER_RECORD_RE.captures(line)?;
    let aga_id = caps["AGA_ID"].parse().ok()?;
    // The comma is cosmetic: the first name token is always the surname.
    Some(PlayerRecord {
        aga_id,
        surname: caps["NAME1"].to_string(),
        given_name: caps
            .name("NAME2")
            .map(|m| m.as_str().trim().to_string())
            .filter(|s| !s.is_empty()),
        rank: caps["RANK"].to_string(),
    })
}

pub fn parse_pairing(line: &str) -> Option<Pairing> {
    let caps = PAIRING_RECORD_RE.captures(line)?;
    Some(Pairing {
        white: caps["WHITE_ID"].parse().ok()?,
        black: caps["BLACK_ID"].parse().ok()?,
    })
}

pub fn parse_result(line: &str) -> Option<GameResult> {
    let caps = RESULT_RECORD_RE.captures(line)?;
    Some(GameResult {
        white: caps["WHITE_ID"].parse().ok()?,
        black: caps["BLACK_ID"].parse().ok()?,
        winner: Color::from_letter(&caps["WINNER"])?,
        handicap: caps["HANDICAP"].parse().ok()?,
        komi: caps["KOMI"].parse().ok()?,
    })
}

/// Parses a `PASSED: <id>` line, returning the id.
pub fn parse_pass(line: &str) -> Option<u32> {
    let caps = PASS_RECORD_RE.captures(line)?;
    caps["AGA_ID"].parse().ok()
}

/// Parses any line of the GAMES section.
pub fn parse_game(line: &str) -> Option<GameRecord> {
    parse_result(line)
        .map(GameRecord::Result)
        .or_else(|| parse_pairing(line).map(GameRecord::Pairing))
        .or_else(|| parse_pass(line).map(GameRecord::Pass))
}

/// Whether `text` is entirely a valid surname field.
pub fn is_valid_surname(text: &str) -> bool {
    static RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(&format!("^{}$", name_pattern("NAME"))).expect("valid regex"));
    RE.is_match(text)
}

/// Whether `text` is entirely a valid given names field.
pub fn is_valid_given_names(text: &str) -> bool {
    static RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(&format!("^{}$", names_pattern("NAME"))).expect("valid regex"));
    RE.is_match(text)
}
