//! Operator command line parsing
//!
//! One command per line. Multi-field arguments are separated by `|`, so
//! `init Ada Lovelace | Analytical Engines` has two fields even though each
//! contains spaces.

use console_domain::constants::{
    DEFAULT_SIMULATED_BODY, DEFAULT_SIMULATED_SENDER, DEFAULT_SIMULATED_SUBJECT,
    DEFAULT_SIMULATE_BATCH, DEFAULT_VAULT_BUSINESS, DEFAULT_VAULT_OWNER,
};
use console_domain::{ConsoleError, ConsoleResult, SimulateEmailRequest};

/// A parsed operator command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Status,
    Items,
    Approvals,
    Dashboard,
    Vault,
    Handbook,
    Process { filename: String },
    ProcessAll,
    Approve { id: String },
    Reject { id: String },
    Init { owner: String, business: String },
    /// Ask the agent to regenerate its dashboard.
    Refresh,
    Simulate { count: u32 },
    Email(SimulateEmailRequest),
    Edit { content: String },
    Save,
    Validate,
    Help,
    Quit,
}

impl Command {
    /// Stable identifier for logs; never contains operator input.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Status => "status::status",
            Self::Items => "queues::items",
            Self::Approvals => "queues::approvals",
            Self::Dashboard => "status::dashboard",
            Self::Vault => "vault::status",
            Self::Handbook => "handbook::show",
            Self::Process { .. } => "queues::process",
            Self::ProcessAll => "queues::process_all",
            Self::Approve { .. } => "queues::approve",
            Self::Reject { .. } => "queues::reject",
            Self::Init { .. } => "vault::init",
            Self::Refresh => "status::refresh_dashboard",
            Self::Simulate { .. } => "simulate::batch",
            Self::Email(_) => "simulate::email",
            Self::Edit { .. } => "handbook::edit",
            Self::Save => "handbook::save",
            Self::Validate => "handbook::validate",
            Self::Help => "help",
            Self::Quit => "quit",
        }
    }
}

/// Parse one input line. Blank lines yield `None`.
///
/// # Errors
///
/// `InvalidInput` for unknown commands and malformed arguments.
pub fn parse(line: &str) -> ConsoleResult<Option<Command>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "status" => no_args(word, rest, Command::Status)?,
        "items" | "needs-action" => no_args(word, rest, Command::Items)?,
        "approvals" => no_args(word, rest, Command::Approvals)?,
        "dashboard" => no_args(word, rest, Command::Dashboard)?,
        "vault" => no_args(word, rest, Command::Vault)?,
        "handbook" => no_args(word, rest, Command::Handbook)?,
        "process" => Command::Process { filename: required(word, rest, "<filename>")? },
        "process-all" => no_args(word, rest, Command::ProcessAll)?,
        "approve" => Command::Approve { id: required(word, rest, "<id>")? },
        "reject" => Command::Reject { id: required(word, rest, "<id>")? },
        "init" => parse_init(rest)?,
        "refresh" => no_args(word, rest, Command::Refresh)?,
        "simulate" => parse_simulate(rest)?,
        "email" => parse_email(rest)?,
        "edit" => Command::Edit { content: unescape(rest) },
        "save" => no_args(word, rest, Command::Save)?,
        "validate" => no_args(word, rest, Command::Validate)?,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => {
            return Err(ConsoleError::invalid_input(format!(
                "unknown command '{other}'; type 'help' for a list"
            )))
        }
    };

    Ok(Some(command))
}

fn no_args(word: &str, rest: &str, command: Command) -> ConsoleResult<Command> {
    if rest.is_empty() {
        Ok(command)
    } else {
        Err(ConsoleError::invalid_input(format!("'{word}' takes no arguments")))
    }
}

fn required(word: &str, rest: &str, placeholder: &str) -> ConsoleResult<String> {
    if rest.is_empty() {
        Err(ConsoleError::invalid_input(format!("usage: {word} {placeholder}")))
    } else {
        Ok(rest.to_string())
    }
}

fn fields(rest: &str) -> Vec<&str> {
    rest.split('|').map(str::trim).collect()
}

fn or_default(value: Option<&str>, default: &str) -> String {
    match value {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => default.to_string(),
    }
}

fn parse_init(rest: &str) -> ConsoleResult<Command> {
    if rest.is_empty() {
        return Ok(Command::Init {
            owner: DEFAULT_VAULT_OWNER.to_string(),
            business: DEFAULT_VAULT_BUSINESS.to_string(),
        });
    }

    let parts = fields(rest);
    if parts.len() > 2 {
        return Err(ConsoleError::invalid_input("usage: init [<owner> | <business>]"));
    }
    Ok(Command::Init {
        owner: or_default(parts.first().copied(), DEFAULT_VAULT_OWNER),
        business: or_default(parts.get(1).copied(), DEFAULT_VAULT_BUSINESS),
    })
}

fn parse_simulate(rest: &str) -> ConsoleResult<Command> {
    if rest.is_empty() {
        return Ok(Command::Simulate { count: DEFAULT_SIMULATE_BATCH });
    }
    rest.parse::<u32>()
        .map(|count| Command::Simulate { count })
        .map_err(|_| ConsoleError::invalid_input(format!("batch size must be a number, got '{rest}'")))
}

fn parse_email(rest: &str) -> ConsoleResult<Command> {
    let parts = if rest.is_empty() { Vec::new() } else { fields(rest) };
    if parts.len() > 3 {
        return Err(ConsoleError::invalid_input("usage: email <sender> | <subject> | <body>"));
    }
    Ok(Command::Email(SimulateEmailRequest::new(
        or_default(parts.first().copied(), DEFAULT_SIMULATED_SENDER),
        or_default(parts.get(1).copied(), DEFAULT_SIMULATED_SUBJECT),
        or_default(parts.get(2).map(|body| unescape(body)).as_deref(), DEFAULT_SIMULATED_BODY),
    )))
}

/// Turn the two-character sequences `\n` and `\\` into a newline and a
/// backslash so multi-line text fits on one input line.
fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(line: &str) -> Command {
        parse(line).unwrap().unwrap()
    }

    #[test]
    fn blank_lines_are_ignored() {
        assert_eq!(parse("   ").unwrap(), None);
    }

    #[test]
    fn keywords_are_case_insensitive() {
        assert_eq!(parsed("STATUS"), Command::Status);
        assert_eq!(parsed("Process-All"), Command::ProcessAll);
    }

    #[test]
    fn identifiers_keep_their_spaces() {
        assert_eq!(
            parsed("process  EMAIL 2026 invoice.md "),
            Command::Process { filename: "EMAIL 2026 invoice.md".into() }
        );
        assert_eq!(parsed("reject x1"), Command::Reject { id: "x1".into() });
    }

    #[test]
    fn missing_identifier_is_rejected() {
        let err = parse("approve").unwrap_err();
        assert_eq!(err, ConsoleError::invalid_input("usage: approve <id>"));
    }

    #[test]
    fn unknown_command_is_reported() {
        let err = parse("frobnicate now").unwrap_err();
        assert!(matches!(err, ConsoleError::InvalidInput { .. }));
        assert!(err.to_string().contains("frobnicate"));
    }

    #[test]
    fn init_splits_on_pipe_and_fills_defaults() {
        assert_eq!(
            parsed("init Ada Lovelace | Analytical Engines"),
            Command::Init { owner: "Ada Lovelace".into(), business: "Analytical Engines".into() }
        );
        assert_eq!(
            parsed("init"),
            Command::Init { owner: "AI Employee".into(), business: "My Business".into() }
        );
        assert_eq!(
            parsed("init Ada"),
            Command::Init { owner: "Ada".into(), business: "My Business".into() }
        );
    }

    #[test]
    fn simulate_parses_count_and_defaults_to_five() {
        assert_eq!(parsed("simulate 12"), Command::Simulate { count: 12 });
        assert_eq!(parsed("simulate"), Command::Simulate { count: 5 });
        assert!(parse("simulate lots").is_err());
        assert!(parse("simulate -3").is_err());
    }

    #[test]
    fn email_fills_blank_fields() {
        match parsed("email boss@corp.com | | Please call\\nThanks") {
            Command::Email(request) => {
                assert_eq!(request.sender, "boss@corp.com");
                assert_eq!(request.subject, "Test Email");
                assert_eq!(request.body, "Please call\nThanks");
                assert_eq!(request.email_type, None);
            }
            other => panic!("expected email, got {other:?}"),
        }
    }

    #[test]
    fn edit_unescapes_newlines() {
        assert_eq!(
            parsed(r"edit ## 1. Identity\nOwner: Ada\\Bob"),
            Command::Edit { content: "## 1. Identity\nOwner: Ada\\Bob".into() }
        );
    }

    #[test]
    fn no_arg_commands_reject_arguments() {
        assert!(parse("save now").is_err());
        assert!(parse("items all").is_err());
    }
}
