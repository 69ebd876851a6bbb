//! Command line parsing for the interactive prompt

use std::path::PathBuf;

use bridge_core::OutputFormat;

pub const HELP: &str = "\
Commands:
  show [KEY|GROUP]          List parameters (all, one group, or one key)
  set KEY [VALUE]           Change a value (checked after a short pause)
  blur KEY                  Check one field now
  validate                  Validate all parameters with the server
  results                   Show the last validation results
  generate [dxf|pdf] [PATH] Generate the drawing and save it
  reset                     Restore default values
  copy [PATH]               Copy parameters to the clipboard file
  paste [PATH]              Load parameters from the clipboard file
  help                      Show this help
  quit                      Exit";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Help,
    Show(Option<String>),
    Set { key: String, value: String },
    Blur(String),
    Validate,
    Results,
    Generate { format: OutputFormat, path: Option<PathBuf> },
    Reset,
    Copy(Option<PathBuf>),
    Paste(Option<PathBuf>),
    Quit,
}

/// Parse one input line; `Ok(None)` for a blank line
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (name, rest) = match line.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (line, ""),
    };
    let optional = |s: &str| (!s.is_empty()).then(|| s.to_string());

    let command = match name.to_ascii_lowercase().as_str() {
        "help" | "?" => Command::Help,
        "show" | "ls" => Command::Show(optional(rest)),
        "set" => {
            let (key, value) = match rest.split_once(char::is_whitespace) {
                Some((key, value)) => (key, value.trim()),
                None => (rest, ""),
            };
            if key.is_empty() {
                return Err("usage: set KEY [VALUE]".to_string());
            }
            Command::Set {
                key: key.to_ascii_uppercase(),
                value: value.to_string(),
            }
        }
        "blur" | "check" => {
            if rest.is_empty() {
                return Err("usage: blur KEY".to_string());
            }
            Command::Blur(rest.to_ascii_uppercase())
        }
        "validate" => Command::Validate,
        "results" => Command::Results,
        "generate" | "gen" => {
            let mut args = rest.split_whitespace();
            let first = args.next();
            match first.and_then(OutputFormat::parse) {
                Some(format) => Command::Generate {
                    format,
                    path: args.next().map(PathBuf::from),
                },
                None => Command::Generate {
                    format: OutputFormat::default(),
                    path: first.map(PathBuf::from),
                },
            }
        }
        "reset" => Command::Reset,
        "copy" => Command::Copy(optional(rest).map(PathBuf::from)),
        "paste" => Command::Paste(optional(rest).map(PathBuf::from)),
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(format!("Unknown command '{}'. Type 'help' for a list.", other)),
    };

    Ok(Some(command))
}
