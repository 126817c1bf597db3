// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/report.rs - Model of an AGA tournament report file.
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
 * # `report` Module
 *
 * [Report] holds the contents of one tournament report file: the tournament
 * description, the registered players, and any pairings and results.
 *
 * ## Usage Example
 *
 * ```no_run
 * use agaroster::report::Report;
 * use agaroster::roster::Registry;
 *
 * fn main() -> Result<(), Box<dyn std::error::Error>> {
 *     let mut registry = Registry::new();
 *     registry.read_member_file("TDListA.txt")?;
 *
 *     // A missing file just leaves the report empty.
 *     let mut report = Report::new("players.txt");
 *     report.load(&registry)?;
 *
 *     for player in &report.players {
 *         println!("{}", player);
 *     }
 *
 *     report.save()?;
 *
 *     Ok(())
 * }
 * ```
 */

use std::fs;
use std::io::BufRead;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::grammar::{self, GameRecord, GameResult, Pairing};
use crate::reader::LineSource;
use crate::roster::{Member, Registry};
use crate::section::{self, TournamentHeader, TournamentInfo};

/// The contents of a tournament report file.
#[derive(Debug, Clone)]
pub struct Report {
    /// The file the report is loaded from and saved to.
    pub file_name: PathBuf,
    /// The TOURNEY section, kept as written.
    pub header: TournamentHeader,
    /// Registered players, in registration order.
    pub players: Vec<Member>,
    /// Games paired but not yet played.
    pub pairings: Vec<Pairing>,
    /// Games played.
    pub results: Vec<GameResult>,
    /// AGA IDs of players who sat out a round.
    pub passes: Vec<u32>,
}

impl Report {
    /// Makes an empty report backed by `file_name`.
    pub fn new<P: AsRef<Path>>(file_name: P) -> Self {
        Self {
            file_name: file_name.as_ref().to_path_buf(),
            header: TournamentHeader::default(),
            players: Vec::new(),
            pairings: Vec::new(),
            results: Vec::new(),
            passes: Vec::new(),
        }
    }

    /// Replaces the tournament description.
    pub fn set_tournament(&mut self, info: &TournamentInfo) {
        self.header = info.header();
    }

    /// Whether the player with `aga_id` is registered.
    pub fn is_registered(&self, aga_id: u32) -> bool {
        self.players.iter().any(|p| p.aga_id == aga_id)
    }

    /// Loads the report from its file.
    ///
    /// If the file does not exist the report is left as it is. Nothing is
    /// changed unless the whole file is read successfully.
    pub fn load(&mut self, registry: &Registry) -> Result<()> {
        let mut input = match LineSource::open(&self.file_name) {
            Ok(input) => input,
            Err(e) if e.is_not_found() => {
                log::info!("{} not found, starting a new report", self.file_name.display());
                return Ok(());
            }
            Err(e) => return Err(e),
        };
        self.read_from(&mut input, registry)
    }

    /// Reads the report from `input`, replacing the current contents.
    pub fn read_from<R: BufRead>(
        &mut self,
        input: &mut LineSource<R>,
        registry: &Registry,
    ) -> Result<()> {
        let header = section::read_tournament_header(input)?;
        let players = section::read_players(input, registry)?;
        let games = section::read_games(input)?;

        let mut pairings = Vec::new();
        let mut results = Vec::new();
        let mut passes = Vec::new();
        for game in games {
            match game {
                GameRecord::Pairing(p) => pairings.push(p),
                GameRecord::Result(r) => results.push(r),
                GameRecord::Pass(id) => passes.push(id),
            }
        }

        log::info!(
            "loaded {} players and {} games from {}",
            players.len(),
            pairings.len() + results.len(),
            input.name()
        );
        self.header = header;
        self.players = players;
        self.pairings = pairings;
        self.results = results;
        self.passes = passes;
        Ok(())
    }

    /// The GAMES section records: pairings, then results, then passes.
    pub fn games(&self) -> Vec<GameRecord> {
        self.pairings
            .iter()
            .copied()
            .map(GameRecord::Pairing)
            .chain(self.results.iter().copied().map(GameRecord::Result))
            .chain(self.passes.iter().copied().map(GameRecord::Pass))
            .collect()
    }

    /// Writes the report in file format to `output`, with `\n` line endings.
    pub fn write_to<W: Write>(&self, output: &mut W) -> Result<()> {
        if self.header.heading.is_empty() {
            writeln!(output, "{}", grammar::SH_TOURNAMENT)?;
        } else {
            writeln!(output, "{}", self.header.heading)?;
        }
        writeln!(output, "{}", self.header.body)?;
        section::write_players_section(output, &self.players)?;
        let games = self.games();
        if !games.is_empty() {
            section::write_games_section(output, &games)?;
        }
        writeln!(output)?;
        Ok(())
    }

    /// Saves the report to its file, replacing the previous contents.
    ///
    /// The file is left untouched if the report can't be written.
    pub fn save(&self) -> Result<()> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer)?;
        fs::write(&self.file_name, buffer)?;
        log::info!(
            "saved {} players to {}",
            self.players.len(),
            self.file_name.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use assert_matches::assert_matches;

    use super::*;
    use crate::error::Error;
    use crate::grammar::Color;

    const REPORT: &str = "\
TOURNEY Summer Open
\tstart=06/30/2004
\tfinish=07/02/2004
rules=AGA

PLAYERS
  7068 Nahabedian, Mark 5D
   123 Smith, John D 5K


";

    fn parse(text: &str) -> Result<Report> {
        let mut report = Report::new("players.txt");
        let mut input = LineSource::new("players.txt", Cursor::new(text.as_bytes().to_vec()));
        report.read_from(&mut input, &Registry::new())?;
        Ok(report)
    }

    fn render(report: &Report) -> String {
        let mut output = Vec::new();
        report.write_to(&mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_round_trip() {
        let report = parse(REPORT).unwrap();
        assert_eq!(report.header.heading, "TOURNEY Summer Open");
        assert_eq!(report.players.len(), 2);
        assert_eq!(render(&report), REPORT);
    }

    #[test]
    fn test_round_trip_with_games() {
        let text = format!(
            "{}GAMES\n7068 123\n7068 123 w0 7\nPASSED: 42\n\n\n",
            &REPORT[..REPORT.len() - 1]
        );
        let report = parse(&text).unwrap();
        assert_eq!(report.pairings, vec![Pairing { white: 7068, black: 123 }]);
        assert_eq!(report.results[0].winner, Color::White);
        assert_eq!(report.passes, vec![42]);
        assert_eq!(render(&report), text);
    }

    #[test]
    fn test_crlf_report_is_written_with_lf() {
        let crlf = REPORT.replace('\n', "\r\n");
        let report = parse(&crlf).unwrap();
        assert_eq!(report.players.len(), 2);
        assert_eq!(render(&report), REPORT);
    }

    #[test]
    fn test_new_report_renders_valid_file() {
        let report = Report::new("players.txt");
        let text = render(&report);
        assert_eq!(text, "TOURNEY\n\nPLAYERS\n\n\n");
        let again = parse(&text).unwrap();
        assert!(again.players.is_empty());
        assert_eq!(again.header.heading, "TOURNEY");
    }

    #[test]
    fn test_failed_read_leaves_report_alone() {
        let mut report = parse(REPORT).unwrap();
        let bad = "TOURNEY\n\nPLAYERS\nnonsense\n\n";
        let mut input = LineSource::new("bad.txt", Cursor::new(bad.as_bytes().to_vec()));
        let err = report.read_from(&mut input, &Registry::new()).unwrap_err();
        assert_matches!(err, Error::Format(_));
        assert_eq!(report.players.len(), 2);
        assert_eq!(report.header.heading, "TOURNEY Summer Open");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut report = Report::new(dir.path().join("players.txt"));
        report.load(&Registry::new()).unwrap();
        assert!(report.players.is_empty());
        assert_eq!(report.header, TournamentHeader::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("players.txt");
        fs::write(&path, REPORT).unwrap();

        let mut report = Report::new(&path);
        report.load(&Registry::new()).unwrap();
        report.players.remove(0);
        report.save().unwrap();

        let mut again = Report::new(&path);
        again.load(&Registry::new()).unwrap();
        assert_eq!(again.players.len(), 1);
        assert_eq!(again.players[0].aga_id, 123);
    }

    #[test]
    fn test_unwritable_player_leaves_file_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("players.txt");
        fs::write(&path, REPORT).unwrap();

        let mut report = Report::new(&path);
        report.load(&Registry::new()).unwrap();
        report.players.push(Member::new("O'Brien", Some("Sean".into()), 501));
        let err = report.save().unwrap_err();
        assert_matches!(err, Error::UnwritableName { id: 501, .. });
        assert_eq!(fs::read_to_string(&path).unwrap(), REPORT);
    }

    #[test]
    fn test_set_tournament() {
        let mut report = Report::new("players.txt");
        report.set_tournament(&TournamentInfo {
            description: "Winter Open".into(),
            start: chrono::NaiveDate::from_ymd_opt(2005, 1, 8).unwrap(),
            finish: chrono::NaiveDate::from_ymd_opt(2005, 1, 9).unwrap(),
            rules: "Japanese".into(),
        });
        assert_eq!(
            render(&report),
            concat!(
                "TOURNEY Winter Open\n\tstart=01/08/2005\n\tfinish=01/09/2005\n",
                "rules=Japanese\n\nPLAYERS\n\n\n"
            )
        );
    }

    #[test]
    fn test_is_registered() {
        let report = parse(REPORT).unwrap();
        assert!(report.is_registered(7068));
        assert!(!report.is_registered(1));
    }
}
