// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/registration.rs - Interactive tournament registration.
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

use std::io::Write;

use regex::Captures;

use crate::command::{CommandTable, Console, Flow};
use crate::error::Result;
use crate::report::Report;
use crate::roster::{Member, Registry};

/// Which list was shown last. Numbered selections refer to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Listing {
    None,
    Found,
    Registered,
}

/// The state of a registration session.
pub struct Session<'a> {
    pub report: Report,
    pub registry: &'a Registry,
    pub found: Vec<Member>,
    pub last_listing: Listing,
}

impl<'a> Session<'a> {
    pub fn new(report: Report, registry: &'a Registry) -> Self {
        Self {
            report,
            registry,
            found: Vec::new(),
            last_listing: Listing::None,
        }
    }

    pub fn registered(&self) -> &[Member] {
        &self.report.players
    }

    pub fn list_found(&mut self, output: &mut dyn Write) -> Result<()> {
        writeln!(output, "\n{} members match the last search:", self.found.len())?;
        list(output, &self.found)?;
        self.last_listing = Listing::Found;
        Ok(())
    }

    pub fn list_players(&mut self, output: &mut dyn Write) -> Result<()> {
        writeln!(
            output,
            "\nThere are {} players registered for the tournament:",
            self.registered().len()
        )?;
        list(output, self.registered())?;
        self.last_listing = Listing::Registered;
        Ok(())
    }

    /// Adds `member` to the tournament unless already there.
    ///
    /// Members whose names don't fit a player line are refused.
    pub fn register(&mut self, member: Member, console: &mut Console) -> Result<()> {
        if !member.has_reportable_name() {
            log::warn!("refusing to register AGA ID {}", member.aga_id);
            writeln!(
                console.err,
                "{} can't be registered: the name doesn't fit the report file format.",
                member
            )?;
        } else if self.report.is_registered(member.aga_id) {
            writeln!(console.err, "{} already registered.", member)?;
        } else {
            writeln!(console.out, "{} registered.", member)?;
            self.report.players.push(member);
        }
        Ok(())
    }

    /// Removes the player with `aga_id` from the tournament.
    pub fn unregister(&mut self, aga_id: u32, console: &mut Console) -> Result<()> {
        match self.report.players.iter().position(|p| p.aga_id == aga_id) {
            Some(i) => {
                let member = self.report.players.remove(i);
                writeln!(console.out, "{} is no longer registered.", member)?;
            }
            None => writeln!(console.err, "AGA ID {} isn't registered.", aga_id)?,
        }
        Ok(())
    }
}

fn list(output: &mut dyn Write, members: &[Member]) -> Result<()> {
    for (i, m) in members.iter().enumerate() {
        writeln!(output, "  {:3}.  {:#}", i + 1, m)?;
    }
    Ok(())
}

/// Parses a 1-based selection into `count` items, reporting bad ones.
fn selection(caps: &Captures, count: usize, console: &mut Console) -> Result<Option<usize>> {
    let index = match caps["INDEX"].parse::<usize>() {
        Ok(index) => index,
        Err(_) => {
            writeln!(console.err, "Please give a selection number.")?;
            return Ok(None);
        }
    };
    if index < 1 || index > count {
        writeln!(console.err, "Selection {} is out of range.", index)?;
        return Ok(None);
    }
    Ok(Some(index - 1))
}

fn id_lookup(
    _: &CommandTable<Session>,
    caps: &Captures,
    state: &mut Session,
    console: &mut Console,
) -> Result<Flow> {
    let Ok(aga_id) = caps["AGA_ID"].parse::<u32>() else {
        writeln!(console.err, "Bad AGA id {}.", &caps["AGA_ID"])?;
        return Ok(Flow::Continue);
    };
    match state.registry.lookup(aga_id) {
        Some(member) => {
            state.found = vec![member.clone()];
            state.list_found(console.out)?;
        }
        None => writeln!(console.err, "No member with AGA id {} found.", aga_id)?,
    }
    Ok(Flow::Continue)
}

fn name_search(
    _: &CommandTable<Session>,
    caps: &Captures,
    state: &mut Session,
    console: &mut Console,
) -> Result<Flow> {
    let substring = &caps["SUBSTRING"];
    let members = state.registry.search(substring);
    if members.is_empty() {
        writeln!(console.err, "No members have names matching {}.", substring)?;
    } else {
        state.found = members.into_iter().cloned().collect();
        state.list_found(console.out)?;
    }
    Ok(Flow::Continue)
}

fn show_found(
    _: &CommandTable<Session>,
    _: &Captures,
    state: &mut Session,
    console: &mut Console,
) -> Result<Flow> {
    state.list_found(console.out)?;
    Ok(Flow::Continue)
}

fn register(
    _: &CommandTable<Session>,
    caps: &Captures,
    state: &mut Session,
    console: &mut Console,
) -> Result<Flow> {
    if state.last_listing != Listing::Found {
        writeln!(console.err, "You need to do a player search first.")?;
        return Ok(Flow::Continue);
    }
    let member = if state.found.len() == 1 {
        state.found[0].clone()
    } else {
        match selection(caps, state.found.len(), console)? {
            Some(i) => state.found[i].clone(),
            None => return Ok(Flow::Continue),
        }
    };
    state.register(member, console)?;
    Ok(Flow::Continue)
}

fn unregister(
    _: &CommandTable<Session>,
    caps: &Captures,
    state: &mut Session,
    console: &mut Console,
) -> Result<Flow> {
    if state.last_listing != Listing::Registered {
        writeln!(
            console.err,
            "First use the \"who\" command to list the players who are registered."
        )?;
        return Ok(Flow::Continue);
    }
    if let Some(i) = selection(caps, state.registered().len(), console)? {
        let aga_id = state.registered()[i].aga_id;
        state.unregister(aga_id, console)?;
        // The numbering of the listing is stale now.
        state.last_listing = Listing::None;
    }
    Ok(Flow::Continue)
}

fn who(
    _: &CommandTable<Session>,
    _: &Captures,
    state: &mut Session,
    console: &mut Console,
) -> Result<Flow> {
    state.list_players(console.out)?;
    Ok(Flow::Continue)
}

fn save(
    _: &CommandTable<Session>,
    _: &Captures,
    state: &mut Session,
    console: &mut Console,
) -> Result<Flow> {
    match state.report.save() {
        Ok(()) => writeln!(console.out, "Wrote {}.", state.report.file_name.display())?,
        Err(e) => writeln!(console.err, "{}", e)?,
    }
    Ok(Flow::Continue)
}

fn reload(
    _: &CommandTable<Session>,
    _: &Captures,
    state: &mut Session,
    console: &mut Console,
) -> Result<Flow> {
    let registry = state.registry;
    match state.report.load(registry) {
        Ok(()) => {
            state.last_listing = Listing::None;
            writeln!(console.out, "Read {}.", state.report.file_name.display())?;
        }
        Err(e) => writeln!(console.err, "{}", e)?,
    }
    Ok(Flow::Continue)
}

/// Builds the registration command table.
pub fn commands<'a>(prompt: Option<&str>) -> Result<CommandTable<Session<'a>>> {
    let mut table = CommandTable::with_common_commands(prompt)?;
    table.add(
        "lookup",
        "[?](?P<AGA_ID>[0-9]+)",
        "Find the AGA member with the specified ID number.",
        id_lookup,
    )?;
    table.add(
        "lookup",
        "[?](?P<SUBSTRING>[A-Za-z -]+)",
        "Find AGA members whose first or last name contains the specified substring.",
        name_search,
    )?;
    table.add("found", "found", "Show the most recent search results.", show_found)?;
    table.add(
        "register",
        "r(?P<INDEX>[0-9]*)",
        "Register a player from among the most recent search results.",
        register,
    )?;
    table.add(
        "unregister",
        "unr(?P<INDEX>[0-9]*)",
        "Unregister a player from the most recent \"who\" listing.",
        unregister,
    )?;
    table.add("who", "who", "Lists those who are registered for the tournament.", who)?;
    table.add("save", "save", "Save the state of registration to a file.", save)?;
    table.add("reload", "reload", "Discard changes and reread the saved file.", reload)?;
    Ok(table)
}
