use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use kmacro::{escape, format_tokens, tokenize_with, unescape, ErrorCollector, Mode, SourceState, Token};

#[derive(Parser)]
#[command(name = "kmacro")]
#[command(author, version, about = "Tokenizer for K# macro expressions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    /// One token per line
    #[value(name = "text")]
    Text,
    /// JSON array of tokens
    #[value(name = "json")]
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the tokens of a macro expression
    Tokens {
        /// The expression to tokenize
        expression: Option<String>,

        /// Read the expression from a file instead
        #[arg(short, long, conflicts_with = "expression")]
        file: Option<PathBuf>,

        /// Stop at the first error instead of failing
        #[arg(long)]
        lenient: bool,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Check every line of a file for lexical errors
    Check {
        /// File with one expression per line
        input: PathBuf,
    },

    /// Escape text for use inside a string literal
    Escape { text: String },

    /// Decode the escape sequences of a string literal body
    Unescape { text: String },

    /// Start an interactive tokenizer prompt
    Repl,
}

fn main() -> Result<()> {
    // Initialize logger before parsing CLI args
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    if cli.verbose {
        log::set_max_level(log::LevelFilter::Debug);
    }

    let result = match cli.command {
        Commands::Tokens {
            expression,
            file,
            lenient,
            format,
        } => tokens(expression, file, lenient, format),
        Commands::Check { input } => check(input),
        Commands::Escape { text } => {
            println!("{}", escape(&text));
            Ok(())
        }
        Commands::Unescape { text } => {
            println!("{}", unescape(&text));
            Ok(())
        }
        Commands::Repl => repl(),
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}

fn read_source(path: &Path) -> Result<SourceState> {
    SourceState::from_file(path).with_context(|| format!("Failed to read source file: {:?}", path))
}

fn tokens(
    expression: Option<String>,
    file: Option<PathBuf>,
    lenient: bool,
    format: OutputFormat,
) -> Result<()> {
    let state = match (expression, file) {
        (_, Some(path)) => read_source(&path)?,
        (Some(expression), None) => SourceState::new("<expression>", expression),
        (None, None) => anyhow::bail!("Provide an expression or --file"),
    };

    let mode = if lenient { Mode::Lenient } else { Mode::Strict };
    log::debug!("Tokenizing {} characters in {:?} mode", state.source.chars().count(), mode);

    let tokens = match tokenize_with(&state.source, mode) {
        Ok(tokens) => tokens,
        Err(e) => {
            let mut collector = ErrorCollector::new();
            collector.add_error(e.into(), state.file_id, 0);
            state.report_errors(&collector)?;
            anyhow::bail!("Lexical analysis failed");
        }
    };

    print_tokens(&tokens, format)
}

fn print_tokens(tokens: &[Token], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            if !tokens.is_empty() {
                println!("{}", format_tokens(tokens));
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(tokens)?),
    }
    Ok(())
}

fn check(input: PathBuf) -> Result<()> {
    log::info!("Checking {:?}", input);

    let state = read_source(&input)?;
    let report = state.check_lines();
    state.report_errors(&report.errors)?;

    if report.errors.has_errors() {
        anyhow::bail!(
            "{} of {} expressions failed lexical analysis",
            report.errors.error_count(),
            report.checked
        );
    }

    println!(
        "{}: {} expressions, no errors found",
        "success".green().bold(),
        report.checked
    );
    Ok(())
}

fn repl() -> Result<()> {
    println!("{}", "K# macro tokenizer".bold());
    println!("Type ':quit' or ':q' to exit, ':help' for help\n");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut mode = Mode::Strict;
    let mut line_number = 1;

    loop {
        print!("kmacro:{:03}> ", line_number);
        stdout.flush()?;

        let mut input = String::new();
        if stdin.read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim_end_matches(['\n', '\r']);

        match input.trim() {
            ":quit" | ":q" => {
                println!("Goodbye!");
                break;
            }
            ":help" | ":h" => {
                println!("REPL commands:");
                println!("  :quit, :q    Exit the REPL");
                println!("  :help, :h    Show this help message");
                println!("  :lenient     Stop silently at lexical errors");
                println!("  :strict      Report lexical errors (default)");
                println!("\nEnter a macro expression to see its tokens.");
                continue;
            }
            ":lenient" => {
                mode = Mode::Lenient;
                println!("{}: lenient mode", "info".blue());
                continue;
            }
            ":strict" => {
                mode = Mode::Strict;
                println!("{}: strict mode", "info".blue());
                continue;
            }
            "" => continue,
            _ => {}
        }

        match tokenize_with(input, mode) {
            Ok(tokens) => {
                for (i, token) in tokens.iter().enumerate() {
                    println!("{:4}: {} @ {}", i, token, token.offset());
                }
            }
            Err(e) => {
                eprintln!("{}: {}", "error".red(), e.kind);
                eprintln!("  {}", input);
                eprintln!("  {}{}", " ".repeat(e.offset), "^".red().bold());
            }
        }

        line_number += 1;
    }

    Ok(())
}
