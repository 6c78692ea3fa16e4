// CLI Commands
// keygen, apply and show sub-commands over the rsa module

use std::io::Write;

use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};

use super::Cmd;
use crate::rsa::{
    KeyGenConfig, KeyPairGenerator, RsaKey, Value, DEFAULT_PRIMALITY_ROUNDS,
    DEFAULT_PUBLIC_EXPONENT,
};

fn key_arg() -> Arg {
    Arg::new("key")
        .value_name("KEY")
        .action(ArgAction::Set)
        .required(true)
        .value_parser(value_parser!(String))
        .help("key in the form \"<modulus hex>, <exponent hex>\"")
}

fn parse_key_arg(m: &ArgMatches) -> anyhow::Result<RsaKey> {
    let text = m
        .get_one::<String>("key")
        .context("missing KEY argument")?;
    text.parse::<RsaKey>()
        .with_context(|| format!("invalid key `{text}`"))
}

#[derive(Default)]
pub struct KeygenCmd;

impl Cmd for KeygenCmd {
    const NAME: &'static str = "keygen";

    fn cmd() -> Command {
        Command::new(Self::NAME)
            .about("generate an RSA key pair, printing the public then the private key")
            .arg(
                Arg::new("bits")
                    .value_name("BITS")
                    .action(ArgAction::Set)
                    .required(true)
                    .allow_negative_numbers(true)
                    .value_parser(value_parser!(i64))
                    .help("modulus bit length, a multiple of 256"),
            )
            .arg(
                Arg::new("exponent")
                    .long("exponent")
                    .short('e')
                    .action(ArgAction::Set)
                    .default_value(DEFAULT_PUBLIC_EXPONENT.to_string())
                    .value_parser(value_parser!(u32))
                    .help("public exponent"),
            )
            .arg(
                Arg::new("rounds")
                    .long("rounds")
                    .short('t')
                    .action(ArgAction::Set)
                    .default_value(DEFAULT_PRIMALITY_ROUNDS.to_string())
                    .value_parser(value_parser!(usize))
                    .help("Miller-Rabin rounds per prime candidate"),
            )
    }

    fn run(&self, m: &ArgMatches, out: &mut dyn Write) -> anyhow::Result<()> {
        let bits = m.get_one::<i64>("bits").copied().context("missing BITS")?;
        let e = m
            .get_one::<u32>("exponent")
            .copied()
            .unwrap_or(DEFAULT_PUBLIC_EXPONENT);
        let rounds = m
            .get_one::<usize>("rounds")
            .copied()
            .unwrap_or(DEFAULT_PRIMALITY_ROUNDS);

        let config = KeyGenConfig::default()
            .with_public_exponent(e)
            .with_primality_rounds(rounds);
        let pair = KeyPairGenerator::new(config)
            .generate(bits)
            .with_context(|| format!("failed to generate a {bits}-bit key pair"))?;

        writeln!(out, "{}", pair.public_key)?;
        writeln!(out, "{}", pair.private_key)?;
        Ok(())
    }
}

#[derive(Default)]
pub struct ApplyCmd;

impl Cmd for ApplyCmd {
    const NAME: &'static str = "apply";

    fn cmd() -> Command {
        Command::new(Self::NAME)
            .about("apply a key to a value (encrypt with one key of a pair, decrypt with the other)")
            .arg(key_arg())
            .arg(
                Arg::new("value")
                    .value_name("VALUE")
                    .action(ArgAction::Set)
                    .required(true)
                    .allow_negative_numbers(true)
                    .value_parser(value_parser!(String))
                    .help("decimal integer, or hex digits with --hex"),
            )
            .arg(
                Arg::new("hex")
                    .long("hex")
                    .short('x')
                    .action(ArgAction::SetTrue)
                    .help("treat VALUE as hex, optionally 0x prefixed"),
            )
    }

    fn run(&self, m: &ArgMatches, out: &mut dyn Write) -> anyhow::Result<()> {
        let key = parse_key_arg(m)?;
        let text = m
            .get_one::<String>("value")
            .context("missing VALUE argument")?;

        let value = if m.get_flag("hex") {
            Value::Hex(text.clone())
        } else {
            Value::from_decimal(text)?
        };

        log::debug!("applying {}-bit key", key.bit_length());
        let result = key
            .apply(value)
            .with_context(|| format!("cannot apply key to `{text}`"))?;

        writeln!(out, "{result}")?;
        Ok(())
    }
}

#[derive(Default)]
pub struct ShowCmd;

impl Cmd for ShowCmd {
    const NAME: &'static str = "show";

    fn cmd() -> Command {
        Command::new(Self::NAME)
            .about("print the canonical and debug forms of a key")
            .arg(key_arg())
    }

    fn run(&self, m: &ArgMatches, out: &mut dyn Write) -> anyhow::Result<()> {
        let key = parse_key_arg(m)?;

        writeln!(out, "{key}")?;
        writeln!(out, "{key:?}")?;
        writeln!(out, "modulus bits: {}", key.bit_length())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::app::run_with_args;
    use crate::rsa::{RsaError, ValidationError};

    fn run(args: &[&str]) -> anyhow::Result<String> {
        let mut out = Vec::new();
        let mut argv = vec!["rsa_key"];
        argv.extend_from_slice(args);
        run_with_args(argv, &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_show() {
        let out = run(&["show", "0xDEADBEEF,  12345"]).unwrap();
        assert_eq!(
            out,
            "deadbeef, 12345\nRsaKey(\"deadbeef, 12345\")\nmodulus bits: 32\n"
        );
    }

    #[test]
    fn test_show_rejects_bad_key() {
        assert!(run(&["show", "xyz, 12345"]).is_err());
    }

    #[test]
    fn test_keygen_then_apply() {
        let out = run(&["keygen", "256"]).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);

        let c = run(&["apply", lines[0], "1337"]).unwrap();
        assert_ne!(c.trim(), "1337");
        let m = run(&["apply", lines[1], c.trim()]).unwrap();
        assert_eq!(m, "1337\n");

        let c = run(&["apply", "--hex", lines[0], "0x539"]).unwrap();
        assert!(c.starts_with("0x"));
        let m = run(&["apply", "--hex", lines[1], c.trim()]).unwrap();
        assert_eq!(m, "0x539\n");
    }

    #[test]
    fn test_keygen_rejects_bad_size() {
        for bits in ["-1", "0", "1000"] {
            let err = run(&["keygen", bits]).unwrap_err();
            let rsa = err.downcast_ref::<RsaError>().unwrap();
            assert!(matches!(rsa, RsaError::Validation(_)), "bits {bits}");
        }

        let err = run(&["keygen", "32768"]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RsaError>(),
            Some(RsaError::Validation(ValidationError::TooLarge { .. }))
        ));
    }

    #[test]
    fn test_apply_negative_is_contract_violation() {
        let err = run(&["apply", "ca1, 11", "-42"]).unwrap_err();
        assert!(err
            .downcast_ref::<RsaError>()
            .is_some_and(RsaError::is_contract_violation));
    }
}
