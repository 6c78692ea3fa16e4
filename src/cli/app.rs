// Application entry for the command line
// Sets up logging, parses arguments and dispatches to a sub-command

use std::ffi::OsString;
use std::io::Write;

use clap::{ArgMatches, Command};
use log::LevelFilter;

use super::{ApplyCmd, Cmd, KeygenCmd, ShowCmd};

pub fn command() -> Command {
    Command::new(env!("CARGO_PKG_NAME"))
        .version(clap::crate_version!())
        .about("RSA key generation and the modular-exponentiation transform")
        .subcommand(KeygenCmd::cmd())
        .subcommand(ApplyCmd::cmd())
        .subcommand(ShowCmd::cmd())
        .subcommand_required(true)
}

/// Parse `args` and run the selected sub-command, writing its output to `out`
pub fn run_with_args<I, T>(args: I, out: &mut dyn Write) -> anyhow::Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = command().try_get_matches_from(args)?;
    dispatch(&matches, out)
}

fn dispatch(matches: &ArgMatches, out: &mut dyn Write) -> anyhow::Result<()> {
    match matches.subcommand() {
        Some((KeygenCmd::NAME, m)) => KeygenCmd.run(m, out),
        Some((ApplyCmd::NAME, m)) => ApplyCmd.run(m, out),
        Some((ShowCmd::NAME, m)) => ShowCmd.run(m, out),
        Some((other, _)) => anyhow::bail!("unsupported sub-command `{other}`"),
        None => anyhow::bail!("a sub-command is required"),
    }
}

pub fn create_app() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    // clap prints help/version and exits on its own here
    let matches = command().get_matches();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    dispatch(&matches, &mut out)
}
