//! Command-line interface for pq-tmlanguage
//! Inspects how the Power Query grammar and the reference lexer tokenize M source, and reconciles the two.
//!
//! Usage:
//!   pqgrammar tokens `<path>` [--raw] [--format json|text]       - Grammar tokens, line by line
//!   pqgrammar lex `<path>` [--format json|text]                  - Reference lexer tokens
//!   pqgrammar compare `<path>` [--check-offsets]                 - Reconcile a document line by line
//!   pqgrammar compare --expr `<text>` [--incremental] [--raw]    - Reconcile one expression
//!
//! Global flags: --config `<file>` layers a TOML file over the built-in defaults (without it,
//! `pqgrammar.toml` in the working directory is used when present), --grammar `<path>` loads a
//! grammar artifact instead of the bundled one.

use clap::{Arg, ArgAction, ArgMatches, Command};
use pq_tmlanguage::config::{AppConfig, Loader, LOCAL_CONFIG_FILE};
use pq_tmlanguage::grammar::{Grammar, GrammarToken};
use pq_tmlanguage::lexing::LexerState;
use pq_tmlanguage::reconcile::{normalize, ClassificationTable, OffsetCheck, Reconciler};
use pq_tmlanguage::testing::{render_grammar_tokens, render_reference_tokens};
use serde::Serialize;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn main() {
    let matches = Command::new("pqgrammar")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Inspect and reconcile Power Query grammar tokenization")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .help("TOML configuration file layered over the built-in defaults [default: ./pqgrammar.toml if present]"),
        )
        .arg(
            Arg::new("grammar")
                .long("grammar")
                .short('g')
                .global(true)
                .help("Grammar artifact to load instead of the bundled one"),
        )
        .subcommand(
            Command::new("tokens")
                .about("Print the grammar's tokens for every line of a file")
                .arg(Arg::new("path").help("Path to the M source file").required(true))
                .arg(
                    Arg::new("raw")
                        .long("raw")
                        .help("Skip normalization and print the grammar's raw tokens")
                        .action(ArgAction::SetTrue),
                )
                .arg(format_arg()),
        )
        .subcommand(
            Command::new("lex")
                .about("Print the reference lexer's tokens for a file")
                .arg(Arg::new("path").help("Path to the M source file").required(true))
                .arg(format_arg()),
        )
        .subcommand(
            Command::new("compare")
                .about("Reconcile grammar and reference lexer tokens")
                .arg(
                    Arg::new("path")
                        .help("Path to the M source file (reconciled line by line)")
                        .required_unless_present("expr"),
                )
                .arg(
                    Arg::new("expr")
                        .long("expr")
                        .short('e')
                        .help("Reconcile a single expression instead of a file")
                        .conflicts_with("path"),
                )
                .arg(
                    Arg::new("incremental")
                        .long("incremental")
                        .help("Reconcile --expr line by line instead of as a single line")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("raw")
                        .long("raw")
                        .help("Compare --expr without normalizing the grammar's tokens")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("check-offsets")
                        .long("check-offsets")
                        .help("Compare raw positions in incremental mode")
                        .action(ArgAction::SetTrue),
                ),
        )
        .get_matches();

    let config = load_config(&matches);
    init_logging(&config.logging.filter);

    let grammar = config.grammar.load().unwrap_or_else(|e| {
        eprintln!("Grammar error: {}", e);
        std::process::exit(1);
    });

    match matches.subcommand() {
        Some(("tokens", sub)) => handle_tokens_command(&grammar, sub),
        Some(("lex", sub)) => handle_lex_command(sub),
        Some(("compare", sub)) => handle_compare_command(&grammar, &config, sub),
        _ => {
            eprintln!("Unknown command. See --help.");
            std::process::exit(2);
        }
    }
}

fn format_arg() -> Arg {
    Arg::new("format")
        .long("format")
        .short('f')
        .help("Output format")
        .value_parser(["json", "text"])
        .default_value("json")
}

fn load_config(matches: &ArgMatches) -> AppConfig {
    let mut loader = match matches.get_one::<String>("config") {
        Some(path) => Loader::new().with_file(path),
        None => Loader::new().with_optional_file(LOCAL_CONFIG_FILE),
    };
    if let Some(path) = matches.get_one::<String>("grammar") {
        loader = loader
            .set_override("grammar.path", path.as_str())
            .unwrap_or_else(|e| fail_config(e));
    }
    if let Some(("compare", sub)) = matches.subcommand() {
        if sub.get_flag("check-offsets") {
            loader = loader
                .set_override("incremental.check_offsets", true)
                .unwrap_or_else(|e| fail_config(e));
        }
    }
    loader.build().unwrap_or_else(|e| fail_config(e))
}

fn fail_config(e: config::ConfigError) -> ! {
    eprintln!("Configuration error: {}", e);
    std::process::exit(1);
}

fn init_logging(default_filter: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn read_source(sub: &ArgMatches) -> String {
    let path = sub.get_one::<String>("path").cloned().unwrap_or_default();
    std::fs::read_to_string(&path).unwrap_or_else(|e| {
        eprintln!("Failed to read {}: {}", path, e);
        std::process::exit(1);
    })
}

fn is_text_format(sub: &ArgMatches) -> bool {
    sub.get_one::<String>("format").map(String::as_str) == Some("text")
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| {
        eprintln!("Error formatting output: {}", e);
        std::process::exit(1);
    })
}

#[derive(Serialize)]
struct TokenizedLine {
    line: usize,
    depth: usize,
    tokens: Vec<GrammarToken>,
}

/// Handle the tokens command
fn handle_tokens_command(grammar: &Grammar, sub: &ArgMatches) {
    let source = read_source(sub);
    let raw = sub.get_flag("raw");

    let mut stack = None;
    let mut lines = Vec::new();
    for (index, line) in source.lines().enumerate() {
        let result = grammar.tokenize_line(line, stack.as_ref());
        let tokens = if raw {
            result.tokens
        } else {
            normalize(&result.tokens).unwrap_or_else(|e| {
                eprintln!("Line {}: {}", index + 1, e);
                std::process::exit(1);
            })
        };
        lines.push(TokenizedLine {
            line: index + 1,
            depth: result.rule_stack.depth(),
            tokens,
        });
        stack = Some(result.rule_stack);
    }

    if is_text_format(sub) {
        for line in &lines {
            println!("-- line {} (depth {})", line.line, line.depth);
            println!("{}", render_grammar_tokens(&line.tokens));
        }
    } else {
        println!("{}", to_json(&lines));
    }
}

/// Handle the lex command
fn handle_lex_command(sub: &ArgMatches) {
    let source = read_source(sub);
    let state = LexerState::from(&source).unwrap_or_else(|e| {
        eprintln!("Lex error: {}", e);
        std::process::exit(1);
    });

    if is_text_format(sub) {
        println!("{}", render_reference_tokens(state.all_tokens()));
    } else {
        println!("{}", to_json(&state.all_tokens()));
    }
}

/// Handle the compare command
fn handle_compare_command(grammar: &Grammar, config: &AppConfig, sub: &ArgMatches) {
    let table = ClassificationTable::new().unwrap_or_else(|e| {
        eprintln!("Classification table error: {}", e);
        std::process::exit(1);
    });
    let offsets: OffsetCheck = config.incremental.offset_check();
    let mut reconciler = Reconciler::new(grammar, &table).with_offset_check(offsets);
    if sub.get_flag("raw") {
        reconciler = reconciler.without_normalization();
    }

    let outcome = match sub.get_one::<String>("expr") {
        Some(expr) if !sub.get_flag("incremental") => reconciler
            .reconcile_line(expr)
            .map(|report| format!("ok: {} tokens", report.grammar_tokens.len())),
        Some(expr) => reconciler
            .reconcile_document(expr)
            .map(|steps| format!("ok: {} lines", steps.len())),
        None => reconciler
            .reconcile_document(&read_source(sub))
            .map(|steps| format!("ok: {} lines", steps.len())),
    };

    match outcome {
        Ok(summary) => println!("{}", summary),
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}
