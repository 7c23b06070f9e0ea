//! # errata CLI
//!
//! Inspect the predefined error kinds, classify kind names, look up errno
//! codes, prettify raw stacks and compose errors from the command line.

use clap::{Parser, Subcommand};
use errata_core::classify;
use errata_core::errno;
use errata_core::{args, kinds, Arg, ComposedError, ErrorKindRegistry};
use std::error::Error;
use std::io::{self, Read};

#[derive(Debug, Parser)]
#[command(name = "errata", version, about = "Inspect and compose errata error kinds")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the predefined kinds with their status code and log level
    Kinds,
    /// Show the classification of one kind name
    Classify {
        kind: String,
    },
    /// Describe an errno-style code (name or number)
    Errno {
        code: String,
    },
    /// Prettify a raw stack read from stdin
    Pretty,
    /// Build an error and print its stack
    Compose {
        /// Kind name; `Error` builds an unnamed error
        kind: String,
        /// Kind of an optional cause
        #[arg(long, requires = "cause_message")]
        cause_kind: Option<String>,
        /// Message of the optional cause
        #[arg(long)]
        cause_message: Option<String>,
        /// Print the serialized record instead of the stack
        #[arg(long)]
        json: bool,
        /// Message template and interpolation values
        args: Vec<String>,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(command: Command) -> Result<(), Box<dyn Error>> {
    match command {
        Command::Kinds => print_kinds(),
        Command::Classify { kind } => print_classification(&kind),
        Command::Errno { code } => print_errno(&code)?,
        Command::Pretty => {
            let mut input = String::new();
            io::stdin().read_to_string(&mut input)?;
            print!("{}", errata_core::pretty(input.trim_end_matches('\n')));
        }
        Command::Compose {
            kind,
            cause_kind,
            cause_message,
            json,
            args,
        } => {
            let registry = errata_core::registry();
            let mut values: Vec<Arg> = Vec::new();
            if let Some(message) = cause_message {
                let cause_kind = cause_kind.unwrap_or_else(|| UNNAMED.to_string());
                values.push(compose(registry, &cause_kind, args![message])?.into());
            }
            values.extend(args.iter().map(|arg| parse_arg(arg)));

            let error = compose(registry, &kind, values)?;
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&errata_core::serialize(&error))?
                );
            } else {
                println!("{}", error.stack());
            }
        }
    }
    Ok(())
}

const UNNAMED: &str = "Error";

fn compose(
    registry: &ErrorKindRegistry,
    kind: &str,
    values: Vec<Arg>,
) -> Result<ComposedError, ComposedError> {
    if kind == UNNAMED {
        return Ok(registry.error(values));
    }
    registry.construct(kind, values).ok_or_else(|| {
        registry.named(kinds::NOT_FOUND, args!["Unknown error kind `%s`", kind])
    })
}

/// Integers and JSON objects are passed typed, everything else as text
fn parse_arg(raw: &str) -> Arg {
    if let Ok(number) = raw.parse::<i64>() {
        return Arg::Int(number);
    }
    if raw.starts_with('{') || raw.starts_with('[') {
        if let Ok(value) = serde_json::from_str::<serde_json::Value>(raw) {
            return Arg::from(value);
        }
    }
    Arg::from(raw)
}

fn print_kinds() {
    println!("{:<24} {:>6}  {:<8} DESCRIPTION", "KIND", "STATUS", "LEVEL");
    for metadata in classify::all_kind_metadata() {
        println!(
            "{:<24} {:>6}  {:<8} {}",
            metadata.name, metadata.status_code, metadata.log_level, metadata.description
        );
    }
}

fn print_classification(kind: &str) {
    println!("kind:        {}", kind);
    println!("status code: {}", classify::status_code(kind));
    println!("log level:   {}", classify::log_level(kind));
    println!("description: {}", classify::get_description(kind));
}

fn print_errno(code: &str) -> Result<(), ComposedError> {
    let entry = match code.parse::<i32>() {
        Ok(number) => errno::lookup_errno(number),
        Err(_) => errno::lookup(&code.to_ascii_uppercase()),
    };

    match entry {
        Some(entry) => {
            println!("{} ({}): {}", entry.name, entry.errno, entry.description);
            Ok(())
        }
        None => Err(errata_core::registry().named(
            kinds::NOT_FOUND,
            args!["Unknown errno code `%s`", code],
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_parse_compose_command() {
        let cli = Cli::try_parse_from([
            "errata",
            "compose",
            "FileLoadError",
            "--cause-kind",
            "IOError",
            "--cause-message",
            "ENOENT, open",
            "--json",
            "cannot load %s",
            "a.toml",
        ])
        .unwrap();

        assert_matches!(
            cli.command,
            Command::Compose { ref kind, json: true, ref args, .. }
                if kind == "FileLoadError" && args.len() == 2
        );
    }

    #[test]
    fn test_cause_kind_requires_message() {
        let result = Cli::try_parse_from(["errata", "compose", "IOError", "--cause-kind", "IOError"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_arg_types() {
        assert_matches!(parse_arg("404"), Arg::Int(404));
        assert_matches!(parse_arg("{\"id\": 1}"), Arg::Object(_));
        assert_matches!(parse_arg("{not json"), Arg::Text(_));
        assert_matches!(parse_arg("alice"), Arg::Text(ref t) if t == "alice");
    }

    #[test]
    fn test_compose_unknown_kind() {
        let registry = errata_core::registry();
        let error = compose(registry, "NoSuchError", args!["x"]).unwrap_err();

        assert_eq!(error.name(), Some(kinds::NOT_FOUND));
        assert_eq!(error.message(), "Unknown error kind `NoSuchError`");
    }

    #[test]
    fn test_compose_http_error() {
        let error = compose(errata_core::registry(), kinds::HTTP, vec![parse_arg("404")]).unwrap();
        assert_eq!(error.message(), "Not Found");
    }
}
