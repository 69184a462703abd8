//! rulecraft CLI - Rule-based statement translator
//!
//! Translates single statements between Python, Java and C++ using a
//! database of learned rules.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use rulecraft::batch::output_path;
use rulecraft::evaluate::append_log;
use rulecraft::fingerprint::TreeSitterFingerprinter;
use rulecraft::repl::{ReplContext, ReplExecutor};
use rulecraft::{
    learn_from_aligned, AlignedStatements, BatchTranslator, Config, Engine, IndelRatio, Language,
    MatchStrategy, Matcher, Precision, RuleError, RuleNamer, RuleSession, SequentialNamer,
    UnmatchedPolicy,
};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "rulecraft")]
#[command(about = "Translate statements between Python, Java and C++ using learned rules")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Rule database file (overrides configuration)
    #[arg(long, global = true)]
    rules: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate statements interactively
    Repl,

    /// Translate a file line by line
    Translate {
        /// Source file
        file: PathBuf,

        /// Source language (detected from the extension if omitted)
        #[arg(short, long)]
        language: Option<Language>,

        /// Only write this target language
        #[arg(long)]
        to: Option<Language>,

        /// Directory for translations.{py,java,cpp}
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Handling of lines no rule matches (passthrough, marker, drop)
        #[arg(long)]
        unmatched: Option<UnmatchedPolicy>,

        /// Compare outputs against ground-truth files next to the source
        #[arg(long)]
        evaluate: bool,

        /// Minimum similarity score (0-100)
        #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
        threshold: Option<u8>,

        /// Candidate selection strategy (first, best)
        #[arg(long)]
        strategy: Option<MatchStrategy>,
    },

    /// Compute translation precision against a ground truth
    Eval {
        /// Ground-truth file
        ground_truth: PathBuf,

        /// Translated file
        translation: PathBuf,

        /// Do not append to the evaluation log
        #[arg(long)]
        no_log: bool,
    },

    /// Learn rules from three line-aligned files
    Learn {
        /// Python source
        python: PathBuf,

        /// Java source
        java: PathBuf,

        /// C++ source
        cpp: PathBuf,

        /// Name rules automatically instead of prompting
        #[arg(long)]
        auto_name: bool,

        /// Prefix for automatic rule names
        #[arg(long, default_value = "RULE")]
        prefix: String,
    },

    /// Add one rule from aligned statements
    Add {
        /// Rule name
        #[arg(long)]
        name: String,

        /// Python statement
        #[arg(long)]
        python: String,

        /// Java statement
        #[arg(long)]
        java: String,

        /// C++ statement
        #[arg(long)]
        cpp: String,
    },

    /// List rules in the database
    Rules {
        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: Format,
    },

    /// Show which rule a statement matches
    Match {
        /// Statement to match
        statement: String,

        /// Statement language
        #[arg(short, long)]
        language: Language,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

/// Asks for rule names on the terminal
struct StdinNamer;

impl RuleNamer for StdinNamer {
    fn name_rule(
        &mut self,
        statement: &str,
        rejected: Option<&str>,
    ) -> rulecraft::Result<Option<String>> {
        if let Some(taken) = rejected {
            println!("{}: rule '{}' already exists", "warning".yellow().bold(), taken);
        }
        print!("Name for '{}' (blank to skip): ", statement.trim());
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().lock().read_line(&mut input)? == 0 {
            return Ok(None);
        }
        let name = input.trim();
        Ok((!name.is_empty()).then(|| name.to_string()))
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    let mut config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => Config::load_default().context("Failed to load config")?,
    };
    config.merge_cli(cli.rules.clone(), None, None, None, None);

    let fingerprinter = TreeSitterFingerprinter::new();

    match cli.command {
        Commands::Repl => run_repl(&config, &fingerprinter),
        Commands::Translate {
            file,
            language,
            to,
            output_dir,
            unmatched,
            evaluate,
            threshold,
            strategy,
        } => {
            config.merge_cli(None, threshold, strategy, unmatched, output_dir);
            config.validate()?;
            run_translate(&config, &fingerprinter, &file, language, to, evaluate)
        }
        Commands::Eval {
            ground_truth,
            translation,
            no_log,
        } => {
            let precision = Precision::from_files(&ground_truth, &translation)
                .context("Failed to read files for evaluation")?;
            println!("{}: {}", "Precision".bold(), precision);
            if !no_log {
                append_log(&config.evaluation.log_path, &ground_truth, &translation, &precision)?;
            }
            Ok(())
        }
        Commands::Learn {
            python,
            java,
            cpp,
            auto_name,
            prefix,
        } => run_learn(&config, &fingerprinter, &python, &java, &cpp, auto_name, &prefix),
        Commands::Add {
            name,
            python,
            java,
            cpp,
        } => {
            let mut session = RuleSession::open(&config.rules_path, &fingerprinter)?;
            let statements = AlignedStatements::new(&python, &java, &cpp);
            let rule = session.add_rule(&statements, &name, &fingerprinter)?;
            println!("{} rule {}", "Added".green().bold(), name.cyan());
            for (language, entry) in rule.entries() {
                println!("  {}: {}", language, entry.template);
            }
            session.close()?;
            Ok(())
        }
        Commands::Rules { format } => {
            let session = RuleSession::open(&config.rules_path, &fingerprinter)?;
            let db = session.database();
            match format {
                Format::Json => println!("{}", serde_json::to_string_pretty(db)?),
                Format::Text => {
                    println!("{} ({})", "Rules".bold(), db.len());
                    for (name, rule) in db.iter() {
                        println!("{}", name.cyan());
                        for (language, entry) in rule.entries() {
                            println!("  {:<7} {}", language.to_string(), entry.template);
                        }
                    }
                }
            }
            session.close()?;
            Ok(())
        }
        Commands::Match {
            statement,
            language,
        } => {
            let session = RuleSession::open(&config.rules_path, &fingerprinter)?;
            let engine =
                Engine::with_config(session.database(), &fingerprinter, &IndelRatio, &config.matching);
            match engine.match_statement(&statement, language)? {
                Some(found) => println!(
                    "{} (via {}, score {})",
                    found.rule_name.cyan(),
                    found.language,
                    found.score
                ),
                None => println!("{}", "No rule matched".yellow()),
            }
            drop(engine);
            session.close()?;
            Ok(())
        }
    }
}

fn run_repl(config: &Config, fingerprinter: &TreeSitterFingerprinter) -> Result<()> {
    let session = RuleSession::open(&config.rules_path, fingerprinter)?;
    let engine =
        Engine::with_config(session.database(), fingerprinter, &IndelRatio, &config.matching);
    let mut context = ReplContext::new();

    println!("rulecraft {}", env!("CARGO_PKG_VERSION"));
    println!("Type 'help' for available commands, 'exit' to quit.\n");

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("{}", context.prompt());
        stdout.flush()?;

        let mut input = String::new();
        if stdin.lock().read_line(&mut input)? == 0 {
            break; // EOF
        }

        let result = ReplExecutor::handle(&input, &mut context, &engine);

        if let Some(output) = result.output {
            println!("{}", output);
        }

        if let Some(error) = result.error {
            eprintln!("{}: {}", "error".red().bold(), error);
        }

        if result.should_exit {
            break;
        }
    }

    drop(engine);
    session.close()?;
    Ok(())
}

fn run_translate(
    config: &Config,
    fingerprinter: &TreeSitterFingerprinter,
    file: &Path,
    language: Option<Language>,
    to: Option<Language>,
    evaluate: bool,
) -> Result<()> {
    let language = match language {
        Some(lang) => lang,
        None => file
            .extension()
            .and_then(|e| e.to_str())
            .and_then(Language::from_extension)
            .with_context(|| {
                format!("Cannot detect language of {}, use --language", file.display())
            })?,
    };

    let targets = match to {
        Some(target) if target == language => {
            bail!("Target language {} is the same as the source language", target)
        }
        Some(target) => vec![target],
        None => Language::ALL.to_vec(),
    };

    let session = RuleSession::open(&config.rules_path, fingerprinter)?;
    let engine =
        Engine::with_config(session.database(), fingerprinter, &IndelRatio, &config.matching);
    let report = BatchTranslator::new(&engine, config.batch.unmatched)
        .with_targets(targets)
        .translate_file(file, language, &config.batch.output_dir)
        .with_context(|| format!("Failed to translate {}", file.display()))?;

    println!("{}", report.summary());
    for path in &report.written {
        println!("  {} {}", "wrote".green(), path.display());
    }
    if !report.unmatched.is_empty() {
        let lines: Vec<String> = report.unmatched.iter().map(|n| n.to_string()).collect();
        println!("  {} lines {}", "unmatched".yellow(), lines.join(", "));
    }

    if evaluate {
        for (target, _) in &report.outputs {
            let ground_truth = file.with_extension(target.extension());
            if !ground_truth.exists() {
                log::warn!("No ground truth at {}, skipping", ground_truth.display());
                continue;
            }
            let translation = output_path(&config.batch.output_dir, *target);
            let precision = Precision::from_files(&ground_truth, &translation)?;
            println!("  {:<7} precision {}", target.to_string(), precision);
            append_log(&config.evaluation.log_path, &ground_truth, &translation, &precision)?;
        }
    }

    drop(engine);
    session.close()?;
    Ok(())
}

fn run_learn(
    config: &Config,
    fingerprinter: &TreeSitterFingerprinter,
    python: &Path,
    java: &Path,
    cpp: &Path,
    auto_name: bool,
    prefix: &str,
) -> Result<()> {
    let read = |path: &Path| {
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
    };
    let (py_src, java_src, cpp_src) = (read(python)?, read(java)?, read(cpp)?);

    let mut session = RuleSession::open(&config.rules_path, fingerprinter)?;
    let matcher = Matcher::new(&IndelRatio)
        .with_threshold(config.matching.threshold)
        .with_strategy(config.matching.strategy);

    let mut sequential = SequentialNamer::new(prefix);
    let mut interactive = StdinNamer;
    let namer: &mut dyn RuleNamer = if auto_name {
        &mut sequential
    } else {
        &mut interactive
    };

    let report = match learn_from_aligned(
        session.database_mut(),
        &py_src,
        &java_src,
        &cpp_src,
        fingerprinter,
        &matcher,
        namer,
    ) {
        Ok(report) => report,
        Err(RuleError::Io(e)) => return Err(e).context("Failed to read rule name"),
        Err(e) => return Err(e.into()),
    };

    println!(
        "{} {} rules, {} already covered, {} skipped",
        "Learned".green().bold(),
        report.added.len(),
        report.already_covered,
        report.skipped
    );
    for name in &report.added {
        println!("  {}", name.cyan());
    }

    session.close()?;
    Ok(())
}
