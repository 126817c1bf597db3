// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/command.rs - A simple line-oriented command interpreter.
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
 * # `command` Module
 *
 * A [CommandTable] maps regular expressions to actions. Each input line is
 * matched in full against the commands in the order they were added, and the
 * first match runs. The captures of the match are passed to the action along
 * with the application state.
 */

use std::io::BufRead;
use std::io::Write;

use regex::{Captures, Regex};

use crate::error::Result;

/// What the command loop does after an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Where actions write their output.
pub struct Console<'a> {
    pub out: &'a mut dyn Write,
    pub err: &'a mut dyn Write,
}

/// An action run when its command matches.
pub type Action<S> = fn(&CommandTable<S>, &Captures, &mut S, &mut Console) -> Result<Flow>;

struct Command<S> {
    name: String,
    source: String,
    regex: Regex,
    description: String,
    action: Action<S>,
}

/// An ordered set of commands and the loop that runs them.
pub struct CommandTable<S> {
    commands: Vec<Command<S>>,
    prompt: String,
}

impl<S> CommandTable<S> {
    /// Makes an empty table. The prompt defaults to `"> "`.
    pub fn new(prompt: Option<&str>) -> Self {
        Self {
            commands: Vec::new(),
            prompt: prompt.unwrap_or("> ").to_string(),
        }
    }

    /// Makes a table holding the `exit` and `help` commands.
    pub fn with_common_commands(prompt: Option<&str>) -> Result<Self> {
        let mut table = Self::new(prompt);
        table.add("exit", "(?i)exit", "Exit the command loop.", |_, _, _, _| {
            Ok(Flow::Exit)
        })?;
        table.add("help", "(?i)help", "Show command help.", |table, _, _, console| {
            table.help(console.out)?;
            Ok(Flow::Continue)
        })?;
        Ok(table)
    }

    /// Adds a command. `pattern` must match the whole input line.
    pub fn add(
        &mut self,
        name: &str,
        pattern: &str,
        description: &str,
        action: Action<S>,
    ) -> Result<()> {
        let regex = Regex::new(&format!("^(?:{})$", pattern))?;
        self.commands.push(Command {
            name: name.to_string(),
            source: pattern.to_string(),
            regex,
            description: description.to_string(),
            action,
        });
        Ok(())
    }

    /// Lists the commands.
    pub fn help(&self, output: &mut dyn Write) -> Result<()> {
        for c in &self.commands {
            writeln!(output, "  {}: {}  {}", c.name, c.source, c.description)?;
        }
        Ok(())
    }

    /// Runs one line of input. Returns `None` if no command matched.
    pub fn dispatch(
        &self,
        line: &str,
        state: &mut S,
        console: &mut Console,
    ) -> Result<Option<Flow>> {
        for c in &self.commands {
            if let Some(caps) = c.regex.captures(line) {
                log::debug!("running command {}", c.name);
                return (c.action)(self, &caps, state, console).map(Some);
            }
        }
        Ok(None)
    }

    /// Reads and runs commands from `input` until an action asks to exit or
    /// the input ends.
    pub fn run<R: BufRead>(
        &self,
        state: &mut S,
        mut input: R,
        console: &mut Console,
    ) -> Result<()> {
        loop {
            write!(console.out, "{}", self.prompt)?;
            console.out.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                return Ok(());
            }
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            match self.dispatch(line, state, console)? {
                Some(Flow::Exit) => return Ok(()),
                Some(Flow::Continue) => {}
                None => writeln!(console.err, "Command not found.")?,
            }
            console.out.flush()?;
            console.err.flush()?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Counter {
        total: u32,
    }

    fn table() -> CommandTable<Counter> {
        let mut table = CommandTable::with_common_commands(Some("$ ")).unwrap();
        table
            .add("add", "add (?P<N>[0-9]+)", "Add a number.", |_, caps, state: &mut Counter, _| {
                state.total += caps["N"].parse::<u32>().unwrap_or(0);
                Ok(Flow::Continue)
            })
            .unwrap();
        table
            .add("anything", "a.*", "Shadowed by add.", |_, _, state: &mut Counter, _| {
                state.total = 0;
                Ok(Flow::Continue)
            })
            .unwrap();
        table
    }

    fn run(input: &str) -> (Counter, String, String) {
        let mut state = Counter::default();
        let mut out = Vec::new();
        let mut err = Vec::new();
        {
            let mut console = Console {
                out: &mut out,
                err: &mut err,
            };
            table().run(&mut state, input.as_bytes(), &mut console).unwrap();
        }
        (
            state,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    fn test_first_match_wins() {
        let (state, _, _) = run("add 2\nadd 3\n");
        assert_eq!(state.total, 5);
    }

    #[test]
    fn test_whole_line_must_match() {
        let (state, _, err) = run("add 2\nadd 3 please\nxadd 3\n");
        assert_eq!(state.total, 2);
        assert_eq!(err, "Command not found.\nCommand not found.\n");
    }

    #[test]
    fn test_blank_lines_and_padding() {
        let (state, out, err) = run("\n   \n  add 4  \n");
        assert_eq!(state.total, 4);
        assert_eq!(out, "$ $ $ $ ");
        assert!(err.is_empty());
    }

    #[test]
    fn test_exit_stops_loop() {
        let (state, _, _) = run("add 1\nEXIT\nadd 100\n");
        assert_eq!(state.total, 1);
    }

    #[test]
    fn test_help_lists_commands() {
        let (_, out, _) = run("help\n");
        assert!(out.contains("  exit: (?i)exit  Exit the command loop.\n"));
        assert!(out.contains("  add: add (?P<N>[0-9]+)  Add a number.\n"));
    }

    #[test]
    fn test_bad_pattern() {
        let mut table: CommandTable<Counter> = CommandTable::new(None);
        assert!(table
            .add("bad", "(", "Broken.", |_, _, _, _| Ok(Flow::Continue))
            .is_err());
    }
}
