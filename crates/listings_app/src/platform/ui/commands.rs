use listings_core::BulkAction;

pub const HELP: &str = "\
commands:
  company <id>            show listings of a company
  filter <name>=<value>   set a filter option
  unfilter <name>         clear a filter option
  reset                   clear all filters
  more                    load the next page (retries after an error)
  reload                  drop cached pages and start over
  clear | sync | publish  run a bulk action for the company
  show                    print the listing again
  help                    print this text
  quit                    exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Company(String),
    Filter { name: String, value: String },
    Unfilter(String),
    Reset,
    More,
    Reload,
    Bulk(BulkAction),
    Show,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("unknown command `{0}` (type `help`)")]
    Unknown(String),
    #[error("`{command}` expects {expected}")]
    MissingArgument {
        command: &'static str,
        expected: &'static str,
    },
}

/// Parses one input line. Blank lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<Command>, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "company" => {
            if rest.is_empty() {
                return Err(CommandError::MissingArgument {
                    command: "company",
                    expected: "a company id",
                });
            }
            Command::Company(rest.to_string())
        }
        "filter" => match rest.split_once('=') {
            Some((name, value)) if !name.trim().is_empty() => Command::Filter {
                name: name.trim().to_string(),
                value: value.trim().to_string(),
            },
            _ => {
                return Err(CommandError::MissingArgument {
                    command: "filter",
                    expected: "<name>=<value>",
                })
            }
        },
        "unfilter" => {
            if rest.is_empty() {
                return Err(CommandError::MissingArgument {
                    command: "unfilter",
                    expected: "a filter name",
                });
            }
            Command::Unfilter(rest.to_string())
        }
        "reset" => Command::Reset,
        "more" | "next" => Command::More,
        "reload" => Command::Reload,
        "clear" => Command::Bulk(BulkAction::Clear),
        "sync" => Command::Bulk(BulkAction::Resync),
        "publish" => Command::Bulk(BulkAction::Publish),
        "show" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_arguments() {
        assert_eq!(
            parse_command("company  big co ").unwrap(),
            Some(Command::Company("big co".to_string()))
        );
        assert_eq!(
            parse_command("filter status = open").unwrap(),
            Some(Command::Filter {
                name: "status".to_string(),
                value: "open".to_string(),
            })
        );
        assert_eq!(
            parse_command("unfilter status").unwrap(),
            Some(Command::Unfilter("status".to_string()))
        );
    }

    #[test]
    fn parses_bare_words_case_insensitively() {
        assert_eq!(parse_command("MORE").unwrap(), Some(Command::More));
        assert_eq!(
            parse_command("sync").unwrap(),
            Some(Command::Bulk(BulkAction::Resync))
        );
        assert_eq!(parse_command("exit").unwrap(), Some(Command::Quit));
        assert_eq!(parse_command("   ").unwrap(), None);
    }

    #[test]
    fn reports_bad_input() {
        assert_eq!(
            parse_command("frobnicate").unwrap_err(),
            CommandError::Unknown("frobnicate".to_string())
        );
        assert!(matches!(
            parse_command("filter status"),
            Err(CommandError::MissingArgument { command: "filter", .. })
        ));
        assert!(matches!(
            parse_command("company"),
            Err(CommandError::MissingArgument { command: "company", .. })
        ));
    }
}
