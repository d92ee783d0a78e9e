use std::fs::File;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use clap::Subcommand;
use env_logger::Builder;
use log::{debug, info};
use memmap2::Mmap;

use glu::ast_printer::AstPrinter;
use glu::interpreter::Interpreter;
use glu::parser::Parser;
use glu::scanner::{Scanner, ScannerConfig};
use glu::GluError;

const EXIT_DATA_ERR: i32 = 65;
const EXIT_SOFTWARE: i32 = 70;

const PROMPT: &str = "glu> ";

#[derive(ClapParser, Debug)]
#[command(version, about = "glu language interpreter", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    commands: Commands,

    /// Enable logging to app.log
    #[arg(long, global = true)]
    log: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Tokenizes input from a file, printing each token
    Tokenize {
        filename: PathBuf,

        /// Print one JSON object per token
        #[arg(long)]
        json: bool,
    },

    /// Parses input from a file as a single expression and prints its AST
    Parse { filename: PathBuf },

    /// Evaluates input from a file as a single expression and prints the result
    Evaluate { filename: PathBuf },

    /// Runs input from a file as a glu program
    Run { filename: PathBuf },

    /// Runs the arguments, joined by spaces, as a glu program
    Exec {
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
        source: Vec<String>,
    },

    /// Starts an interactive session
    Repl,
}

/// Maps the file into memory and copies it out as UTF-8 text.
fn read_file(filename: &Path) -> Result<String> {
    info!("Reading file: {:?}", filename);
    let file = File::open(filename).context(format!("Failed to open file {:?}", filename))?;

    // SAFETY: the map is only read here and dropped before returning.
    let map = unsafe { Mmap::map(&file) }.context(format!("Failed to map file {:?}", filename))?;

    let text = std::str::from_utf8(&map)
        .map_err(GluError::from)
        .context(format!("File {:?} is not valid UTF-8", filename))?;

    info!("Read {} bytes from {:?}", text.len(), filename);

    Ok(text.to_owned())
}

fn init_logger() -> Result<()> {
    let log_file = File::create("app.log").context("Failed to create app.log")?;

    Builder::new()
        .format(|buf, record| {
            let module = record
                .module_path()
                .unwrap_or("<unnamed>")
                .strip_prefix("glu::")
                .unwrap_or(record.module_path().unwrap_or("<unnamed>"));
            writeln!(
                buf,
                "[{}:{}] - {}",
                module,
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .filter(None, log::LevelFilter::Debug)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized, writing to app.log");
    Ok(())
}

fn report_all<'e>(errors: impl IntoIterator<Item = &'e GluError>) -> bool {
    let mut any = false;
    for e in errors {
        any = true;
        eprintln!("{}", e);
    }
    any
}

fn tokenize(filename: &Path, json: bool) -> Result<()> {
    let source = read_file(filename)?;
    let config = ScannerConfig::with_origin(filename.display().to_string());
    let mut failed = false;

    for result in Scanner::with_config(&source, config) {
        match result {
            Ok(token) if json => println!("{}", serde_json::to_string(&token)?),
            Ok(token) => println!("{}", token),
            Err(e) => {
                failed = true;
                debug!("Tokenization debug: {}", e);
                eprintln!("{}", e);
            }
        }
    }

    if failed {
        debug!("Tokenization failed, exiting with code {}", EXIT_DATA_ERR);
        std::process::exit(EXIT_DATA_ERR);
    }

    Ok(())
}

fn parse(filename: &Path) -> Result<()> {
    let source = read_file(filename)?;
    let (tokens, lex_errors) = Scanner::new(&source).scan_tokens();

    if report_all(&lex_errors) {
        std::process::exit(EXIT_DATA_ERR);
    }

    match Parser::new(tokens).parse_expression() {
        Ok(expr) => {
            let ast = AstPrinter::print_expr(&expr);
            debug!("AST: {}", ast);
            println!("{}", ast);
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(EXIT_DATA_ERR);
        }
    }
}

fn evaluate(filename: &Path) -> Result<()> {
    let source = read_file(filename)?;
    let (tokens, lex_errors) = Scanner::new(&source).scan_tokens();

    if report_all(&lex_errors) {
        std::process::exit(EXIT_DATA_ERR);
    }

    let expr = match Parser::new(tokens).parse_expression() {
        Ok(expr) => expr,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(EXIT_DATA_ERR);
        }
    };

    let mut interpreter = Interpreter::new();

    match interpreter.eval_expr(&expr) {
        Ok(value) => {
            println!("{}", value);
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(EXIT_SOFTWARE);
        }
    }
}

/// Batch execution: diagnostics exit with 65, runtime failures with 70.
fn run(source: &str, config: ScannerConfig) -> Result<()> {
    let mut interpreter = Interpreter::new();
    let report = interpreter.exec_with(source, config);

    if report_all(report.diagnostics()) {
        std::process::exit(EXIT_DATA_ERR);
    }

    if report_all(report.runtime_errors()) {
        std::process::exit(EXIT_SOFTWARE);
    }

    info!("Program executed successfully");
    Ok(())
}

fn repl() -> Result<()> {
    println!("glu {}", env!("CARGO_PKG_VERSION"));
    println!("Type 'exit' to exit.");

    let mut interpreter = Interpreter::new();
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("\n{}", PROMPT);
        io::stdout().flush().context("Failed to flush stdout")?;

        let Some(line) = lines.next() else {
            return Ok(());
        };
        let line = line.context("Failed to read from stdin")?;

        if line.trim() == "exit" {
            return Ok(());
        }

        let report = interpreter.exec_with(&line, ScannerConfig::with_origin("repl"));
        report_all(report.diagnostics());
        report_all(report.runtime_errors());

        if let Some(value) = report.last_value().filter(|v| !v.is_nil()) {
            print!("{}", value);
        }
    }
}

fn main() -> Result<()> {
    let args: Cli = Cli::parse();

    if args.log {
        init_logger()?;
    } else {
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Off)
            .init();
    }

    info!("CLI arguments: {:?}", args);

    match args.commands {
        Commands::Tokenize { filename, json } => tokenize(&filename, json),
        Commands::Parse { filename } => parse(&filename),
        Commands::Evaluate { filename } => evaluate(&filename),
        Commands::Run { filename } => {
            let source = read_file(&filename)?;
            run(
                &source,
                ScannerConfig::with_origin(filename.display().to_string()),
            )
        }
        Commands::Exec { source } => run(&source.join(" "), ScannerConfig::with_origin("cmd")),
        Commands::Repl => repl(),
    }
}
