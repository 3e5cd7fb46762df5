use std::{
    borrow::Cow,
    collections::BTreeMap,
    fmt,
    io::{self, BufRead},
};

use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::{ValidationContext, ValidationResult, Validator},
    Cmd, Context as ReadlineContext, Editor, Helper, KeyEvent,
};
use shell_words::split;
use tracing::debug;

use crate::cli::core::{CliError, CliMode, CommandError, LoopControl, ShellContext};
use crate::cli::output::info as output_info;

/// Set to run commands read from stdin without prompts or colors.
pub const SCRIPT_ENV: &str = "ASSET_REGISTER_CLI_SCRIPT";

pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };

    let mut context = ShellContext::new(mode)?;
    match mode {
        CliMode::Interactive => run_interactive(&mut context),
        CliMode::Script => run_script(&mut context),
    }
}

fn run_interactive(context: &mut ShellContext) -> Result<(), CliError> {
    let mut editor = Editor::<CommandHelper, DefaultHistory>::new()?;
    editor.set_helper(Some(CommandHelper::from_context(context)));
    editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);

    while context.running {
        match editor.readline(&context.prompt()) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                editor.add_history_entry(trimmed).ok();
                if run_line(context, trimmed)? == LoopControl::Exit {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => {
                if context.confirm_exit()? {
                    break;
                }
            }
            Err(ReadlineError::Eof) => {
                output_info("Exiting shell.");
                break;
            }
            Err(err) => return Err(err.into()),
        }
    }
    Ok(())
}

/// Runs stdin line by line. Blank lines and `#` comments are skipped.
fn run_script(context: &mut ShellContext) -> Result<(), CliError> {
    for line in io::stdin().lock().lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        if run_line(context, trimmed)? == LoopControl::Exit || !context.running {
            break;
        }
    }
    Ok(())
}

fn run_line(context: &mut ShellContext, line: &str) -> Result<LoopControl, CliError> {
    match handle_line(context, line) {
        Ok(control) => Ok(control),
        Err(err) => {
            context.report_error(err)?;
            Ok(LoopControl::Continue)
        }
    }
}

fn handle_line(context: &mut ShellContext, line: &str) -> Result<LoopControl, CommandError> {
    let tokens = match parse_command_line(line) {
        Ok(tokens) => tokens,
        Err(err) => {
            context.print_warning(&err.message);
            return Ok(LoopControl::Continue);
        }
    };
    let Some((raw, rest)) = tokens.split_first() else {
        return Ok(LoopControl::Continue);
    };

    let command = raw.to_lowercase();
    let args: Vec<&str> = rest.iter().map(String::as_str).collect();
    context.last_command = Some(line.to_string());
    debug!(command = %command, args = args.len(), "dispatching command");

    let control = context.dispatch(&command, raw, &args)?;
    if control == LoopControl::Exit {
        context.running = false;
    }
    Ok(control)
}

/// Completes command names, then the subcommand in second position.
struct CommandHelper {
    commands: BTreeMap<String, Vec<&'static str>>,
}

impl CommandHelper {
    fn from_context(context: &ShellContext) -> Self {
        let commands = context
            .registry
            .list()
            .map(|entry| (entry.name.to_ascii_lowercase(), entry.subcommands.to_vec()))
            .collect();
        Self { commands }
    }

    fn candidates(&self, words: &[&str], needle: &str) -> Vec<String> {
        let needle = needle.to_ascii_lowercase();
        match words {
            [] => self
                .commands
                .keys()
                .filter(|name| name.starts_with(&needle))
                .cloned()
                .collect(),
            [command] => self
                .commands
                .get(&command.to_ascii_lowercase())
                .map(|subcommands| {
                    subcommands
                        .iter()
                        .filter(|sub| sub.starts_with(&needle))
                        .map(|sub| sub.to_string())
                        .collect()
                })
                .unwrap_or_default(),
            _ => Vec::new(),
        }
    }
}

impl Helper for CommandHelper {}

impl Completer for CommandHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let prefix = &line[..pos];
        let start = prefix
            .rfind(char::is_whitespace)
            .map(|idx| idx + 1)
            .unwrap_or(0);
        let words: Vec<&str> = prefix[..start].split_whitespace().collect();
        let candidates = self
            .candidates(&words, &prefix[start..])
            .into_iter()
            .map(|name| Pair {
                display: name.clone(),
                replacement: name,
            })
            .collect();
        Ok((start, candidates))
    }
}

impl Hinter for CommandHelper {
    type Hint = String;
}

impl Highlighter for CommandHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        Cow::Borrowed(line)
    }
}

impl Validator for CommandHelper {
    fn validate(&self, ctx: &mut ValidationContext) -> rustyline::Result<ValidationResult> {
        // An unterminated quote continues on the next line.
        if split(ctx.input()).is_err() {
            Ok(ValidationResult::Incomplete)
        } else {
            Ok(ValidationResult::Valid(None))
        }
    }
}

pub(crate) fn parse_command_line(input: &str) -> Result<Vec<String>, ParseError> {
    split(input).map_err(|err| ParseError {
        message: err.to_string(),
    })
}

#[derive(Debug)]
pub(crate) struct ParseError {
    message: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn helper() -> CommandHelper {
        let mut commands = BTreeMap::new();
        commands.insert("asset".to_string(), vec!["add", "edit", "list"]);
        commands.insert("account".to_string(), vec!["add"]);
        commands.insert("refresh".to_string(), Vec::new());
        CommandHelper { commands }
    }

    #[test]
    fn completes_commands_then_subcommands() {
        let helper = helper();
        assert_eq!(helper.candidates(&[], "a"), vec!["account", "asset"]);
        assert_eq!(helper.candidates(&["asset"], "e"), vec!["edit"]);
        assert!(helper.candidates(&["asset", "add"], "").is_empty());
        assert!(helper.candidates(&["unknown"], "").is_empty());
    }

    #[test]
    fn unbalanced_quotes_are_reported() {
        assert!(parse_command_line("asset add label=\"open").is_err());
        assert_eq!(
            parse_command_line("schedule CHF02 --json").unwrap(),
            vec!["schedule", "CHF02", "--json"]
        );
    }
}
