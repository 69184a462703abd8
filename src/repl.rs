//! Interactive translation loop
//!
//! The loop alternates between two prompts: a statement, then the language
//! it is written in. An invalid language re-prompts for the language while
//! keeping the pending statement. `help`, `rules`, `history` and `exit` are
//! recognised at the statement prompt.

use crate::engine::Engine;
use crate::language::Language;
use crate::RuleError;

pub const STATEMENT_PROMPT: &str = "statement> ";
pub const LANGUAGE_PROMPT: &str = "language (PYTHON, JAVA, CPP)> ";

/// REPL command type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Statement to translate
    Statement(String),
    /// List stored rules
    Rules,
    /// List statements entered so far
    History,
    /// Show help
    Help,
    /// Exit REPL
    Exit,
    /// Blank input
    Empty,
}

/// Command parser
pub struct CommandParser;

impl CommandParser {
    pub fn parse(input: &str) -> Command {
        let input = input.trim();

        if input.is_empty() {
            return Command::Empty;
        }

        match input.to_lowercase().as_str() {
            "rules" => Command::Rules,
            "history" => Command::History,
            "help" | "?" => Command::Help,
            "exit" | "quit" => Command::Exit,
            _ => Command::Statement(input.to_string()),
        }
    }
}

/// REPL state
#[derive(Debug, Clone, Default)]
pub struct ReplContext {
    /// Statement waiting for its language
    pub pending: Option<String>,
    pub history: Vec<String>,
}

impl ReplContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prompt for the next line of input
    pub fn prompt(&self) -> &'static str {
        if self.pending.is_some() {
            LANGUAGE_PROMPT
        } else {
            STATEMENT_PROMPT
        }
    }

    pub fn add_to_history(&mut self, line: &str) {
        self.history.push(line.to_string());
    }
}

/// REPL executor
pub struct ReplExecutor;

impl ReplExecutor {
    /// Feed one line of input to the loop
    pub fn handle(input: &str, context: &mut ReplContext, engine: &Engine<'_>) -> ExecutionResult {
        match context.pending.take() {
            Some(statement) => {
                if matches!(CommandParser::parse(input), Command::Exit) {
                    return ExecutionResult::exit();
                }
                Self::translate(statement, input, context, engine)
            }
            None => {
                let command = CommandParser::parse(input);
                Self::execute(&command, context, engine)
            }
        }
    }

    pub fn execute(
        command: &Command,
        context: &mut ReplContext,
        engine: &Engine<'_>,
    ) -> ExecutionResult {
        match command {
            Command::Statement(statement) => {
                context.add_to_history(statement);
                context.pending = Some(statement.clone());
                ExecutionResult::empty()
            }
            Command::Rules => ExecutionResult::output(&Self::format_rules(engine)),
            Command::History => ExecutionResult::output(&Self::format_history(context)),
            Command::Help => ExecutionResult::output(Self::help_text()),
            Command::Exit => ExecutionResult::exit(),
            Command::Empty => ExecutionResult::empty(),
        }
    }

    fn translate(
        statement: String,
        language: &str,
        context: &mut ReplContext,
        engine: &Engine<'_>,
    ) -> ExecutionResult {
        let language: Language = match language.parse() {
            Ok(lang) => lang,
            Err(e) => {
                context.pending = Some(statement);
                return ExecutionResult::error(&e.to_string());
            }
        };

        match engine.translate_statement(&statement, language) {
            Ok(translation) => {
                let lines: Vec<String> = translation
                    .iter()
                    .map(|(lang, text)| format!("{}: {}", lang, text))
                    .collect();
                ExecutionResult::output(&lines.join("\n"))
            }
            Err(RuleError::NoMatchFound(_)) => ExecutionResult::output(&format!(
                "No appropriate rule for translating '{}' was found in the database.",
                statement
            )),
            Err(e) => ExecutionResult::error(&e.to_string()),
        }
    }

    fn format_rules(engine: &Engine<'_>) -> String {
        let db = engine.database();
        if db.is_empty() {
            return "(no rules)".to_string();
        }
        db.names()
            .map(|name| format!("  {}", name))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn format_history(context: &ReplContext) -> String {
        if context.history.is_empty() {
            return "(empty)".to_string();
        }
        context
            .history
            .iter()
            .enumerate()
            .map(|(i, line)| format!("{:>3}  {}", i + 1, line))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn help_text() -> &'static str {
        r#"Enter a statement, then the language it is written in.

Commands:
  rules           - List rule names
  history         - List entered statements
  help            - Show this help
  exit            - Exit REPL"#
    }
}

/// Execution result
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    pub output: Option<String>,
    pub error: Option<String>,
    pub should_exit: bool,
}

impl ExecutionResult {
    pub fn output(msg: &str) -> Self {
        Self {
            output: Some(msg.to_string()),
            error: None,
            should_exit: false,
        }
    }

    pub fn error(msg: &str) -> Self {
        Self {
            output: None,
            error: Some(msg.to_string()),
            should_exit: false,
        }
    }

    pub fn exit() -> Self {
        Self {
            output: None,
            error: None,
            should_exit: true,
        }
    }

    pub fn empty() -> Self {
        Self {
            output: None,
            error: None,
            should_exit: false,
        }
    }
}
