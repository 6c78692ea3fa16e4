// Command line front end
// Sub-commands over the key codec, the apply transform and pair generation

use clap::{ArgMatches, Command};
use std::io::Write;

pub mod app;
mod commands;

pub use commands::{ApplyCmd, KeygenCmd, ShowCmd};

pub trait Cmd {
    const NAME: &'static str;

    fn cmd() -> Command;

    fn run(&self, m: &ArgMatches, out: &mut dyn Write) -> anyhow::Result<()>;
}
