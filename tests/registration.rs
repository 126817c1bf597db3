// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  tests/registration.rs - Registration session tests.
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

use std::fs;

use agaroster::command::Console;
use agaroster::registration::{self, Listing, Session};
use agaroster::report::Report;
use agaroster::roster::Registry;

const MEMBERS: &str = "\
Nahabedian, Mark\t7068\tFull\t\t12/31/2030
Smith, John D\t123\tYouth\t-5.5\t6/30/2025
Smithson, Ann\t124\tFull\t2.2\t6/30/2025
";

fn registry() -> Registry {
    let mut registry = Registry::new();
    registry.import(MEMBERS.as_bytes()).unwrap();
    registry
}

struct Output {
    out: String,
    err: String,
}

fn run(session: &mut Session, input: &str) -> Output {
    let commands = registration::commands(Some("> ")).unwrap();
    let mut out = Vec::new();
    let mut err = Vec::new();
    {
        let mut console = Console {
            out: &mut out,
            err: &mut err,
        };
        commands.run(session, input.as_bytes(), &mut console).unwrap();
    }
    Output {
        out: String::from_utf8(out).unwrap(),
        err: String::from_utf8(err).unwrap(),
    }
}

#[test]
fn test_loaded_rank_overrides_registry() {
    let registry = registry();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("players.txt");
    fs::write(&path, "TOURNEY\n\nPLAYERS\n  7068 Nahabedian, Mark 5D\n\n\n").unwrap();

    let mut report = Report::new(&path);
    report.load(&registry).unwrap();
    let mut session = Session::new(report, &registry);

    let output = run(&mut session, "who\n");
    assert!(output.out.contains("There are 1 players registered for the tournament:\n"));
    assert!(output.out.contains("    1.    7068 Nahabedian, Mark (5D)\n"));
    assert_eq!(output.out.matches("Nahabedian, Mark").count(), 1);
    assert!(!output.out.contains("30K"));
    assert_eq!(session.last_listing, Listing::Registered);
}

#[test]
fn test_search_register_and_save() {
    let registry = registry();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("players.txt");
    let mut session = Session::new(Report::new(&path), &registry);

    let output = run(&mut session, "?Smith\nr2\n?7068\nr\nr\nsave\nexit\n");
    assert!(output.out.contains("2 members match the last search:\n"));
    assert!(output.out.contains("124 Smithson, Ann (2D) registered.\n"));
    assert!(output.out.contains("7068 Nahabedian, Mark (30K) registered.\n"));
    assert!(output.err.contains("7068 Nahabedian, Mark (30K) already registered.\n"));
    assert!(output.out.contains(&format!("Wrote {}.\n", path.display())));

    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "TOURNEY\n\nPLAYERS\n   124 Smithson, Ann 2D\n  7068 Nahabedian, Mark 30K\n\n\n"
    );
}

#[test]
fn test_register_needs_a_search() {
    let registry = registry();
    let mut session = Session::new(Report::new("unused.txt"), &registry);
    let output = run(&mut session, "r1\n");
    assert!(output.err.contains("You need to do a player search first."));
    assert!(session.registered().is_empty());
}

#[test]
fn test_selection_out_of_range() {
    let registry = registry();
    let mut session = Session::new(Report::new("unused.txt"), &registry);
    let output = run(&mut session, "?Smith\nr3\nr\n");
    assert!(output.err.contains("Selection 3 is out of range.\n"));
    assert!(output.err.contains("Please give a selection number.\n"));
    assert!(session.registered().is_empty());
}

#[test]
fn test_unregister() {
    let registry = registry();
    let mut session = Session::new(Report::new("unused.txt"), &registry);

    let output = run(&mut session, "unr1\n?123\nr\nwho\nunr1\nunr1\n");
    assert!(output.err.contains("First use the \"who\" command"));
    assert!(output.out.contains("123 Smith, John D (5K) is no longer registered.\n"));
    assert!(session.registered().is_empty());
}

#[test]
fn test_name_outside_report_format_is_refused() {
    let registry = registry();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("players.txt");
    let mut session = Session::new(Report::new(&path), &registry);

    let output = run(&mut session, "?501\nr\nsave\n");
    assert!(output.err.contains(
        "501 O'Brien, Sean (2D) can't be registered: the name doesn't fit the report file format.\n"
    ));
    assert!(session.registered().is_empty());

    let mut again = Report::new(&path);
    again.load(&registry).unwrap();
    assert!(again.players.is_empty());
}

#[test]
fn test_unknown_lookups_and_commands() {
    let registry = registry();
    let mut session = Session::new(Report::new("unused.txt"), &registry);
    let output = run(&mut session, "?999\n?Nobody\nfrobnicate\n");
    assert!(output.err.contains("No member with AGA id 999 found.\n"));
    assert!(output.err.contains("No members have names matching Nobody.\n"));
    assert!(output.err.contains("Command not found.\n"));
}

#[test]
fn test_reload_discards_changes() {
    let registry = registry();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("players.txt");
    fs::write(&path, "TOURNEY\n\nPLAYERS\n   123 Smith, John D 4K\n\n\n").unwrap();

    let mut report = Report::new(&path);
    report.load(&registry).unwrap();
    let mut session = Session::new(report, &registry);

    run(&mut session, "?7068\nr\nreload\n");
    assert_eq!(session.registered().len(), 1);
    assert_eq!(session.registered()[0].playing_at().to_string(), "4K");
}
