// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//    http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
use std::error::Error;
use std::fs;
use std::path::Path;

use clap::{arg, Arg, ArgMatches, Command};
use log::LevelFilter;
use log4rs::append::console::ConsoleAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;

use wsil::errors::{EngineError, ParseError, ResolveError};
use wsil::{parser, resolve, serialize};
use wsil::{Engine, Program};

fn main() {
    let matches = Command::new("wsc")
        .about("Whitespace compiler and interpreter")
        .version("0.1.0")
        .subcommand_required(true)
        .arg(arg!(--verbose "Show verbose output"))
        .subcommand(
            Command::new("run")
                .about("Parse, resolve and execute a Whitespace source file")
                .arg(Arg::new("file").required(true))
                .visible_alias("r"),
        )
        .subcommand(
            Command::new("compile")
                .about("Parse, resolve and serialize a Whitespace source file")
                .arg(Arg::new("file").required(true))
                .arg(arg!(-o --output <FILE> "Output path").required(false))
                .visible_alias("c"),
        )
        .subcommand(
            Command::new("disassemble")
                .about("Print the commands held in a compiled .wsc file")
                .arg(Arg::new("file").required(true))
                .visible_alias("d"),
        )
        .get_matches();

    let verbose = matches.is_present("verbose");
    if verbose {
        init_logging(LevelFilter::Debug);
    } else {
        init_logging(LevelFilter::Warn);
    }

    let exitcode = match matches.subcommand() {
        Some(("run", args)) => dispatch(run(args)),
        Some(("compile", args)) => dispatch(compile(args)),
        Some(("disassemble", args)) => dispatch(disassemble(args)),
        _ => unreachable!(),
    };
    std::process::exit(exitcode);
}

/// Maps a subcommand's outcome onto the exit codes: 0 success, 1
/// malformed program, 2 runtime fault.
fn dispatch(result: Result<(), CliError>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("error: {e}");
            e.exit_code()
        }
    }
}

#[derive(Debug)]
enum CliError {
    Malformed(Box<dyn Error>),
    Runtime(Box<dyn Error>),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            CliError::Malformed(e) => write!(f, "{e}"),
            CliError::Runtime(e) => write!(f, "{e}"),
        }
    }
}

impl CliError {
    fn exit_code(&self) -> i32 {
        match self {
            CliError::Malformed(_) => 1,
            CliError::Runtime(_) => 2,
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Runtime(Box::new(e))
    }
}

impl From<ParseError> for CliError {
    fn from(e: ParseError) -> Self {
        CliError::Malformed(Box::new(e))
    }
}

impl From<ResolveError> for CliError {
    fn from(e: ResolveError) -> Self {
        CliError::Malformed(Box::new(e))
    }
}

impl From<EngineError> for CliError {
    fn from(e: EngineError) -> Self {
        CliError::Runtime(Box::new(e))
    }
}

fn load_and_resolve(filename: &str) -> Result<Program, CliError> {
    let source = fs::read(filename)?;
    let mut program = parser::parse(&source)?;
    resolve::resolve(&mut program)?;
    Ok(program)
}

fn run(args: &ArgMatches) -> Result<(), CliError> {
    let filename = args.get_one::<String>("file").unwrap();
    let program = load_and_resolve(filename)?;
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut engine = Engine::new(&program, stdin.lock(), stdout.lock())?;
    engine.run()?;
    Ok(())
}

fn compile(args: &ArgMatches) -> Result<(), CliError> {
    let filename = args.get_one::<String>("file").unwrap();
    let program = load_and_resolve(filename)?;
    let bytes = serialize::serialize(&program);
    let output = match args.get_one::<String>("output") {
        Some(path) => path.clone(),
        None => default_output_path(filename),
    };
    fs::write(&output, bytes)?;
    log::info!("wrote {} ({} commands)", output, program.len());
    Ok(())
}

fn disassemble(args: &ArgMatches) -> Result<(), CliError> {
    let filename = args.get_one::<String>("file").unwrap();
    let bytes = fs::read(filename)?;
    let program = serialize::deserialize(&bytes).map_err(|e| CliError::Malformed(Box::new(e)))?;
    print!("{program}");
    Ok(())
}

fn default_output_path(source: &str) -> String {
    let path = Path::new(source);
    path.with_extension("wsc").to_string_lossy().into_owned()
}

/// Initialise logging using a suitable pattern.
pub fn init_logging(level: LevelFilter) {
    let encoder = PatternEncoder::new("[{l}] {m}{n}");
    let stdout = ConsoleAppender::builder().encoder(Box::new(encoder)).build();
    let config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .build(Root::builder().appender("stdout").build(level))
        .unwrap();
    let _handle = log4rs::init_config(config).unwrap();
}
