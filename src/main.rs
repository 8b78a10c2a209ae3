// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, info, warn};
use std::io::Write;
use std::path::{Path, PathBuf};

use konjugator::app_config::{self, Config};
use konjugator::app_controller::Controller;
use konjugator::grammar::{CefrLevel, GermanCase, PrepositionCase, Pronoun, SkillType, Tense};
use konjugator::importer::ImportPolicy;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Import verbs from a JSON file or a directory of JSON files
    Import {
        /// Payload file or directory
        #[arg(value_name = "PATH")]
        path: PathBuf,

        /// Overwrite existing values instead of only filling gaps
        #[arg(short, long)]
        force: bool,

        /// Log every skipped value
        #[arg(long)]
        debug: bool,
    },

    /// Conjugate a verb
    Conjugate {
        infinitive: String,

        /// Präsens, Präteritum or Perfekt
        tense: Tense,

        /// Only this pronoun (ich, du, er/sie/es, wir, ihr, sie)
        #[arg(short, long)]
        pronoun: Option<Pronoun>,
    },

    /// Show paradigms, translation and prepositions of a verb
    Show {
        infinitive: String,

        /// Translation language (defaults to the configured one)
        #[arg(short, long)]
        language: Option<String>,
    },

    /// Answer a practice item and update progress
    Answer {
        infinitive: String,

        /// translation, praesens, praeteritum or perfekt
        skill: SkillType,

        /// The learner's answer
        response: String,

        /// Pronoun for conjugation skills
        #[arg(short, long)]
        pronoun: Option<Pronoun>,

        /// Learner (defaults to the configured one)
        #[arg(short, long)]
        user: Option<String>,
    },

    /// Show a learner's progress
    Progress {
        /// Learner (defaults to the configured one)
        #[arg(short, long)]
        user: Option<String>,

        /// Only this skill
        #[arg(short, long)]
        skill: Option<SkillType>,

        /// Print per-skill totals only
        #[arg(long)]
        summary: bool,
    },

    /// Manage learning units
    #[command(subcommand)]
    Unit(UnitCommands),

    /// Manage verb prepositions
    #[command(subcommand)]
    Preposition(PrepositionCommands),

    /// Show database statistics
    Stats,

    /// Generate shell completions for konjugator
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand, Debug)]
enum UnitCommands {
    /// Create a learning unit
    Create {
        title: String,

        #[arg(short, long, default_value = "A1")]
        level: CefrLevel,

        #[arg(short, long, default_value = "Präsens")]
        tense: Tense,

        /// Position among units
        #[arg(short, long, default_value_t = 0)]
        order: u32,
    },

    /// Add a verb to a learning unit
    AddVerb { unit_id: i64, infinitive: String },

    /// List learning units with their verbs
    List {
        #[arg(short, long)]
        level: Option<CefrLevel>,
    },
}

#[derive(Subcommand, Debug)]
enum PrepositionCommands {
    /// Link a preposition to a verb
    Add {
        infinitive: String,
        preposition: String,

        /// Case the preposition requires (AKK, DAT, GEN, MIXED)
        #[arg(short, long)]
        requires: PrepositionCase,

        /// Case used with this verb (AKK, DAT)
        #[arg(long = "case", value_parser = GermanCase::parse_governed)]
        governed_case: Option<GermanCase>,
    },
}

/// konjugator - German verb conjugation trainer
///
/// Keeps a catalogue of German verbs with their forms and translations and
/// tracks a learner's progress through conjugation exercises.
#[derive(Parser, Debug)]
#[command(name = "konjugator")]
#[command(version)]
#[command(about = "German verb conjugation trainer")]
#[command(long_about = "konjugator stores German verbs, resolves their conjugations and tracks learner progress.

EXAMPLES:
    konjugator import verbs.json                  # Fill in missing data from a payload
    konjugator import -f data/                    # Force-import every .json file in data/
    konjugator conjugate gehen Perfekt            # ich bin gegangen, du bist gegangen, ...
    konjugator show machen -l ru                  # Paradigms with the Russian translation
    konjugator answer machen praesens -p du machst
    konjugator progress --summary
    konjugator completions bash > konjugator.bash

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json", global = true)]
    config_path: String,

    /// Set logging level
    #[arg(long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color and tag for a level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("1;31", "ERROR"),
            Level::Warn => ("1;33", "WARN "),
            Level::Info => ("1;32", "INFO "),
            Level::Debug => ("1;36", "DEBUG"),
            Level::Trace => ("1;35", "TRACE"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (color, tag) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "\x1B[{}m{} {} {}\x1B[0m", color, now, tag, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() -> Result<()> {
    // The logger accepts everything; the effective level is set through max_level
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "konjugator", &mut std::io::stdout());
        return Ok(());
    }

    if let Some(level) = &cli.log_level {
        let level: app_config::LogLevel = level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let mut config = Config::load_or_create(Path::new(&cli.config_path))?;
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone().into();
    } else {
        log::set_max_level(config.log_level.to_level_filter());
    }

    config.validate().context("Configuration validation failed")?;

    let controller = Controller::with_config(config)?;
    run_command(&controller, cli.command)
}

fn run_command(controller: &Controller, command: Commands) -> Result<()> {
    let default_user = controller.config().default_user.clone();

    match command {
        Commands::Import { path, force, debug } => {
            let mut options = controller.config().import.options();
            if force {
                options.policy = ImportPolicy::Force;
            }
            options.debug |= debug;
            if options.debug {
                log::set_max_level(log::max_level().max(LevelFilter::Info));
            }

            let report = controller.import(&path, options)?;
            println!("{}", report);
        }

        Commands::Conjugate { infinitive, tense, pronoun } => {
            for (pronoun, form) in controller.conjugate(&infinitive, tense, pronoun)? {
                if tense.is_simple() {
                    println!("{:<10} {}", pronoun, form);
                } else {
                    println!("{}", form);
                }
            }
        }

        Commands::Show { infinitive, language } => {
            let overview = controller.show_verb(&infinitive, language.as_deref())?;
            print!("{}", overview);
        }

        Commands::Answer { infinitive, skill, response, pronoun, user } => {
            let user = user.unwrap_or(default_user);
            let outcome = controller.answer(&user, &infinitive, skill, pronoun, &response)?;
            if outcome.correct {
                println!("Richtig! Streak: {}", outcome.progress.streak);
            } else {
                println!("Falsch. Expected: {}", outcome.expected);
            }
            if outcome.progress.mastered {
                println!("Mastered.");
            }
        }

        Commands::Progress { user, skill, summary } => {
            let user = user.unwrap_or(default_user);
            if summary {
                for entry in controller.progress_summary(&user)? {
                    println!(
                        "{:<12} {} tracked, {} mastered",
                        entry.skill_type, entry.tracked, entry.mastered
                    );
                }
            } else {
                let entries = controller.progress(&user, skill)?;
                if entries.is_empty() {
                    warn!("No progress recorded for {}", user);
                }
                for entry in entries {
                    println!("{}", entry);
                }
            }
        }

        Commands::Unit(UnitCommands::Create { title, level, tense, order }) => {
            let unit = controller.create_unit(&title, level, tense, order)?;
            println!("Created unit {}: {}", unit.id, unit.title);
        }

        Commands::Unit(UnitCommands::AddVerb { unit_id, infinitive }) => {
            if controller.add_verb_to_unit(unit_id, &infinitive)? {
                info!("Added {} to unit {}", infinitive, unit_id);
            } else {
                warn!("{} is already in unit {}", infinitive, unit_id);
            }
        }

        Commands::Unit(UnitCommands::List { level }) => {
            for (unit, verbs) in controller.list_units(level)? {
                let verbs: Vec<&str> = verbs.iter().map(|v| v.infinitive.as_str()).collect();
                println!(
                    "{:>3}. [{}] {} ({}): {}",
                    unit.order,
                    unit.level,
                    unit.title,
                    unit.tense,
                    verbs.join(", ")
                );
            }
        }

        Commands::Preposition(PrepositionCommands::Add {
            infinitive,
            preposition,
            requires,
            governed_case,
        }) => {
            if controller.add_preposition(&infinitive, &preposition, requires, governed_case)? {
                info!("Linked '{}' to {}", preposition, infinitive);
            } else {
                warn!("'{}' is already linked to {}", preposition, infinitive);
            }
        }

        Commands::Stats => {
            println!("{}", controller.stats()?);
        }

        Commands::Completions { .. } => {}
    }

    Ok(())
}
