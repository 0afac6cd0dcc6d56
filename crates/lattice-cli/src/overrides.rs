//! Configuration overrides from command-line arguments.
//!
//! Two argument shapes reach the resolver as ordinary key/value pairs:
//!
//! - `key=value` — the value goes through literal parsing, so
//!   `epochs=10` is an integer and `data=CifarDataset` a string;
//! - `--flag` / `--no-flag` — boolean shorthand for `flag=true` /
//!   `flag=false`.
//!
//! Keys may be dotted (`data.batch_size=64`) to scope a value to a
//! nested component; the resolver interprets the dotting.

use crate::error::CliError;
use crate::parse::parse_literal;
use lattice_types::Conf;

/// Translate raw override arguments into configuration input.
pub fn parse_overrides(args: &[String]) -> Result<Conf, CliError> {
    let mut conf = Conf::new();
    for arg in args {
        let (key, value) = split_override(arg)?;
        if conf.contains(&key) {
            return Err(CliError::DuplicateOverride(key));
        }
        conf.insert(key, value);
    }
    Ok(conf)
}

fn split_override(arg: &str) -> Result<(String, lattice_types::ConfigValue), CliError> {
    if let Some((key, raw)) = arg.split_once('=') {
        let key = key.trim_start_matches("--").to_owned();
        if key.is_empty() {
            return Err(CliError::InvalidOverride(arg.to_owned()));
        }
        return Ok((key, parse_literal(raw)));
    }
    if let Some(flag) = arg.strip_prefix("--no-") {
        if flag.is_empty() {
            return Err(CliError::InvalidOverride(arg.to_owned()));
        }
        return Ok((flag.to_owned(), false.into()));
    }
    if let Some(flag) = arg.strip_prefix("--") {
        if flag.is_empty() {
            return Err(CliError::InvalidOverride(arg.to_owned()));
        }
        return Ok((flag.to_owned(), true.into()));
    }
    Err(CliError::InvalidOverride(arg.to_owned()))
}
