#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! # objmark
//! ## Introduction
//!
//! Marks objective answers (multiple choice letters, short words, ja/nein)
//! against a reference key and prints the score with feedback.
//!
//! ## Usage
//!
//! `objmark mark --reference answers_dictionary.json --assignment "A1 1.2" submission.txt`
//!
//! Reference files are either JSON (an answers dictionary keyed by assignment,
//! or a single assignment row) or plain text with one `"<n>. <answer>"` line
//! per question. Pass `-` to read the submission from stdin.

use std::{
    io::Read,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use bpaf::*;
use colored::Colorize;
use dotenvy::dotenv;
use objmark::{
    MarkingConfig,
    constants::NO_REFERENCE_ANSWERS,
    objective::{
        AnswerFormat, AnswersDictionary, FeedbackStyle, ReferenceKey, ReferenceSource,
        ScoreResult, StudentAnswer, build, feedback, globalize, normalize, parse, score,
    },
};
use serde::Serialize;
use serde_json::Value;
use tabled::{Table, Tabled, settings::Style};
use tracing::{Level, metadata::LevelFilter};
use tracing_subscriber::{fmt, prelude::*, util::SubscriberInitExt};

/// Top-level CLI commands.
#[derive(Debug, Clone)]
enum Cmd {
    /// Mark a submission against a reference key
    Mark {
        /// Reference document
        reference:  PathBuf,
        /// Assignment to pick from an answers dictionary
        assignment: Option<String>,
        /// Print JSON instead of a table
        json:       bool,
        /// Feedback style override
        style:      Option<FeedbackStyle>,
        /// Renumber `Teil` sections before parsing
        sections:   bool,
        /// Submission path, or `-` for stdin
        answers:    String,
    },
    /// Show how a submission is parsed
    Parse {
        /// Submission path, or `-` for stdin
        answers: String,
    },
    /// Show canonical forms of tokens
    Normalize {
        /// Tokens to normalize
        tokens: Vec<String>,
    },
    /// List assignments of an answers dictionary
    Assignments {
        /// Answers dictionary
        reference: PathBuf,
    },
    /// Rewrite `Teil`-local numbering to global numbering
    Globalize {
        /// Submission path, or `-` for stdin
        answers: String,
    },
}

/// Parsed command line.
#[derive(Debug, Clone)]
struct Opts {
    /// Log at debug level
    verbose: bool,
    /// The command to run
    cmd:     Cmd,
}

/// Parse the command line arguments and return the options
fn options() -> Opts {
    /// parses the submission argument
    fn answers() -> impl Parser<String> {
        positional("ANSWERS").help("Path to the student's submission, or - to read stdin")
    }

    /// parses the reference document option
    fn reference() -> impl Parser<PathBuf> {
        short('r')
            .long("reference")
            .help("Reference answers: JSON dictionary/row or \"<n>. <answer>\" lines")
            .argument::<PathBuf>("PATH")
    }

    let assignment = short('a')
        .long("assignment")
        .help("Assignment to use from an answers dictionary")
        .argument::<String>("NAME")
        .optional();
    let json = long("json").help("Print the result as JSON").switch();
    let style = long("style")
        .help("Feedback style: brief or summary")
        .argument::<FeedbackStyle>("STYLE")
        .optional();
    let sections = long("sections")
        .help("Continue question numbers across Teil sections")
        .switch();
    let mark = {
        let reference = reference();
        let answers = answers();
        construct!(Cmd::Mark {
            reference,
            assignment,
            json,
            style,
            sections,
            answers
        })
    }
    .to_options()
    .command("mark")
    .help("Mark a submission against a reference key");

    let parse = {
        let answers = answers();
        construct!(Cmd::Parse { answers })
    }
    .to_options()
    .command("parse")
    .help("Show the answers found in a submission");

    let normalize = {
        let tokens = positional::<String>("TOKEN")
            .help("Token to normalize")
            .many();
        construct!(Cmd::Normalize { tokens })
    }
    .to_options()
    .command("normalize")
    .help("Print the canonical form of each token");

    let assignments = {
        let reference = reference();
        construct!(Cmd::Assignments { reference })
    }
    .to_options()
    .command("assignments")
    .help("List the assignments of an answers dictionary");

    let globalize = {
        let answers = answers();
        construct!(Cmd::Globalize { answers })
    }
    .to_options()
    .command("globalize")
    .help("Renumber a submission split into Teil sections");

    let verbose = short('v')
        .long("verbose")
        .help("Log debug information")
        .switch();
    let cmd = construct!([mark, parse, normalize, assignments, globalize]);

    construct!(Opts { verbose, cmd })
        .to_options()
        .descr("Marks objective answers against a reference key")
        .run()
}

/// Reads a submission from a file, or from stdin when `source` is `-`.
fn read_answers(source: &str) -> Result<String> {
    if source == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Could not read submission from stdin")?;
        Ok(text)
    } else {
        std::fs::read_to_string(source).with_context(|| format!("Could not read {source}"))
    }
}

/// Whether a JSON object looks like a single assignment row.
fn is_reference_row(object: &serde_json::Map<String, Value>) -> bool {
    object
        .keys()
        .any(|k| k.to_lowercase().starts_with("answer"))
}

/// Loads the reference key from `path`.
///
/// JSON documents are either one assignment row or an answers dictionary, in
/// which case `assignment` picks the row (or the only row, if there is one).
/// Anything else is read as objective `"<n>. <answer>"` lines.
fn load_reference(
    path: &Path,
    assignment: Option<&str>,
    default_format: AnswerFormat,
) -> Result<ReferenceKey> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Could not read reference {}", path.display()))?;

    let Ok(document) = serde_json::from_str::<Value>(&text) else {
        tracing::debug!("{} is not JSON, reading it as reference lines", path.display());
        return Ok(ReferenceKey {
            answers: build(&ReferenceSource::TextBlock(text)),
            link:    String::new(),
            format:  AnswerFormat::Objective,
        });
    };

    if document.as_object().is_some_and(is_reference_row) {
        return ReferenceKey::from_json_row(&document, default_format)
            .with_context(|| format!("Malformed reference row in {}", path.display()));
    }

    let dictionary = AnswersDictionary::from_json(document)
        .with_context(|| format!("Malformed answers dictionary in {}", path.display()))?;
    let name = match (assignment, dictionary.assignments().as_slice()) {
        (Some(name), _) => name.to_string(),
        (None, [only]) => only.to_string(),
        (None, names) => bail!(
            "{} holds {} assignments, pick one with --assignment: {}",
            path.display(),
            names.len(),
            names.join(", ")
        ),
    };

    dictionary
        .key(&name, default_format)
        .with_context(|| format!("Malformed reference row `{name}`"))?
        .with_context(|| format!("No assignment named `{name}` in {}", path.display()))
}

/// JSON shape printed by `mark --json`.
#[derive(Serialize)]
struct MarkReport<'a> {
    /// The detailed scoring result
    #[serde(flatten)]
    result:   &'a ScoreResult,
    /// Generated feedback
    feedback: String,
}

/// One row of the `parse` table.
#[derive(Tabled)]
struct ParsedRow<'a> {
    /// The question number
    #[tabled(rename = "Question")]
    question: u32,
    /// The parsed answer
    #[tabled(inline)]
    answer:   &'a StudentAnswer,
}

/// Marks a submission and prints the outcome.
fn mark(
    key: &ReferenceKey,
    submission: &str,
    config: &MarkingConfig,
    json: bool,
) -> Result<()> {
    if !key.is_objective() {
        bail!(
            "This reference uses the `{}` format, which has to be marked by the external \
             marker.",
            key.format
        );
    }

    let result = score(&key.answers, &parse(submission));
    let feedback = if key.answers.is_empty() {
        NO_REFERENCE_ANSWERS.to_string()
    } else {
        feedback(&result, config.feedback_style(), config.summary_limit())
    };

    if json {
        let report = MarkReport {
            result: &result,
            feedback,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if !result.mismatches.is_empty() {
        println!("{}", Table::new(&result.mismatches).with(Style::modern()));
    }

    let verdict = format!("Score: {result}");
    if result.all_correct() && !key.answers.is_empty() {
        println!("{}", verdict.green().bold());
    } else {
        println!("{}", verdict.yellow().bold());
    }
    println!("{feedback}");
    if !key.link.is_empty() {
        println!("Solution: {}", key.link);
    }
    Ok(())
}

fn main() -> Result<()> {
    dotenv().ok();

    let opts = options();

    let fmt = fmt::layer()
        .without_time()
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr);
    let filter_layer = LevelFilter::from_level(if opts.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    });
    tracing_subscriber::registry()
        .with(fmt)
        .with(filter_layer)
        .init();

    let config = MarkingConfig::from_env();

    match opts.cmd {
        Cmd::Mark {
            reference,
            assignment,
            json,
            style,
            sections,
            answers,
        } => {
            let config = match style {
                Some(style) => config.with_feedback_style(style),
                None => config,
            };
            let key = load_reference(&reference, assignment.as_deref(), config.default_format())?;
            let mut submission = read_answers(&answers)?;
            if sections {
                submission = globalize(&submission);
            }
            mark(&key, &submission, &config, json)?;
        }
        Cmd::Parse { answers } => {
            let parsed = parse(&read_answers(&answers)?);
            if parsed.is_empty() {
                tracing::warn!("No answers found.");
            } else {
                let rows = parsed
                    .iter()
                    .map(|(question, answer)| ParsedRow { question, answer });
                println!("{}", Table::new(rows).with(Style::modern()));
            }
        }
        Cmd::Normalize { tokens } => {
            for token in tokens {
                println!("{token}\t{}", normalize(&token));
            }
        }
        Cmd::Assignments { reference } => {
            let text = std::fs::read_to_string(&reference)
                .with_context(|| format!("Could not read reference {}", reference.display()))?;
            let document: Value = serde_json::from_str(&text)
                .with_context(|| format!("{} is not valid JSON", reference.display()))?;
            let dictionary = AnswersDictionary::from_json(document)?;
            for name in dictionary.assignments() {
                println!("{name}");
            }
        }
        Cmd::Globalize { answers } => {
            println!("{}", globalize(&read_answers(&answers)?));
        }
    };

    Ok(())
}
