// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  aga-register.rs - Interactive player registration for Go tournaments.
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
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use env_logger::{self as logger};

use agaroster::command::Console;
use agaroster::error::{Error, Result};
use agaroster::registration::{self, Session};
use agaroster::report::Report;
use agaroster::roster::{AGA_MEMBER_FILE_NAME, AGA_MEMBER_FILE_URI, Registry};

const AGA_DEBUG_LOG: &str = "AGA_DEBUG_LOG";
const AGA_DEBUG_LOG_STYLE: &str = "AGA_DEBUG_LOG_STYLE";

/// Build the list of players in a Go tournament.
///
/// All of the files of a tournament are kept in one directory, which should
/// be the current directory. The AGA membership list must be there too.
/// Once started, type 'help' for a list of commands.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about)]
struct Args {
    /// The tournament roster file.
    #[arg(long, env = "AGA_ROSTER", default_value = "players.txt")]
    roster: PathBuf,

    /// The AGA membership list.
    #[arg(long, env = "AGA_MEMBERS", default_value = AGA_MEMBER_FILE_NAME)]
    members: PathBuf,

    /// The command prompt.
    #[arg(long, default_value = "> ")]
    prompt: String,
}

fn init_logging() {
    if std::env::var(AGA_DEBUG_LOG).is_ok() {
        logger::Builder::from_env(
            logger::Env::new()
                .filter(AGA_DEBUG_LOG)
                .write_style(AGA_DEBUG_LOG_STYLE),
        )
        .format_timestamp_micros()
        .init();
        log::debug!("logging initialized");
    } else {
        logger::Builder::new()
            .filter_level(log::LevelFilter::Error)
            .format_timestamp_millis()
            .init()
    }
}

fn run(args: &Args) -> Result<()> {
    let mut registry = Registry::new();
    registry.ensure_loaded(&args.members, |path| {
        Err(Error::Io(io::Error::new(
            io::ErrorKind::NotFound,
            format!(
                "{} is missing, download it from {}",
                path.display(),
                AGA_MEMBER_FILE_URI
            ),
        )))
    })?;

    let mut report = Report::new(&args.roster);
    report.load(&registry)?;

    let mut session = Session::new(report, &registry);
    let commands = registration::commands(Some(&args.prompt))?;

    let mut stdout = io::stdout();
    let mut stderr = io::stderr();
    let mut console = Console {
        out: &mut stdout,
        err: &mut stderr,
    };
    commands.run(&mut session, io::stdin().lock(), &mut console)?;

    session.report.save()?;
    println!("Wrote {}.", session.report.file_name.display());
    Ok(())
}

fn main() -> ExitCode {
    init_logging();
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("Error: {}", error);
            ExitCode::FAILURE
        }
    }
}
