// SPDX-License-Identifier: GPL-2.0-only

#[macro_use]
extern crate lazy_static;

mod argset;
mod cmd;
mod descriptor;
mod nameversion;
mod reporoot;
mod spawn;

use std::io::Write;

use clap::crate_version;
use termcolor::WriteColor;

fn main() {
    let app = clap::Command::new("pkgpatch")
        .about("Inspect patch files for packages installed in node_modules.")
        .version(crate_version!())
        .subcommand_required(true)
        .arg_required_else_help(true)
        .max_term_width(88)
        .subcommand_value_name("command")
        .subcommand_help_heading("COMMANDS")
        .subcommands(cmd::COMMANDS.iter().map(|command| (command.make)()));

    let matches = app.get_matches();
    let result: anyhow::Result<()> =
        if let Some((command_name, cmd_matches)) = matches.subcommand() {
            if let Some(command) = cmd::COMMANDS
                .iter()
                .find(|command| command.name == command_name)
            {
                (command.run)(cmd_matches)
            } else {
                panic!("unknown subcommand `{command_name}`")
            }
        } else {
            panic!("no subcommand?")
        };

    if let Err(e) = result {
        print_error_message(&e);
        std::process::exit(2);
    }
}

fn print_error_message(err: &anyhow::Error) {
    let color_choice = if atty::is(atty::Stream::Stderr) {
        termcolor::ColorChoice::Auto
    } else {
        termcolor::ColorChoice::Never
    };
    let mut stderr = termcolor::StandardStream::stderr(color_choice);
    let mut color = termcolor::ColorSpec::new();
    stderr
        .set_color(color.set_fg(Some(termcolor::Color::Red)).set_bold(true))
        .unwrap();
    write!(stderr, "error: ").unwrap();
    stderr
        .set_color(color.set_fg(None).set_bold(false))
        .unwrap();
    let err_string = format!("{err:#}");
    let mut remainder: &str = &err_string;
    loop {
        let parts: Vec<&str> = remainder.splitn(3, '`').collect();
        match parts.len() {
            0 => {
                writeln!(stderr).unwrap();
                break;
            }
            1 => {
                writeln!(stderr, "{}", parts[0]).unwrap();
                break;
            }
            2 => {
                writeln!(stderr, "{}`{}", parts[0], parts[1]).unwrap();
                break;
            }
            3 => {
                write!(stderr, "{}`", parts[0]).unwrap();
                stderr
                    .set_color(color.set_fg(Some(termcolor::Color::Yellow)))
                    .unwrap();
                write!(stderr, "{}", parts[1]).unwrap();
                stderr.set_color(color.set_fg(None)).unwrap();
                write!(stderr, "`").unwrap();
                remainder = parts[2];
            }
            _ => panic!("unhandled split len"),
        }
    }
}
