//! Command-line interface for comtext
//!
//! Usage:
//!   comtext `<path>` [-t ctx|doc|web] [-I `<dir>`]... [-p `<lib>`]... [--config `<file>`]
//!           [--format text|json] [-v|-q]

use clap::{Arg, ArgAction, Command};
use comtext::comtext::config::{ComtextConfig, Loader};
use comtext::comtext::loader::{DocumentLoader, LoaderError};
use comtext::comtext::pipeline::Compiler;
use std::path::PathBuf;
use std::process;
use tracing::Level;

/// Read from the working directory when `--config` is not given
const PROJECT_CONFIG: &str = "comtext.toml";

fn main() {
    let matches = Command::new("comtext")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Compile comtext documents to normalized, doc or web output")
        .arg_required_else_help(true)
        .arg(
            Arg::new("path")
                .help("Path to the document to compile")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("target")
                .long("target")
                .short('t')
                .help("Output target (defaults to the configured one)")
                .value_parser(["ctx", "doc", "web"]),
        )
        .arg(
            Arg::new("include")
                .long("include")
                .short('I')
                .help("Additional library search directory")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("preload")
                .long("preload")
                .short('p')
                .help("Library to load before the document")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("Configuration file layered over the defaults (default: ./comtext.toml if present)"),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .short('f')
                .help("Output format")
                .value_parser(["text", "json"])
                .default_value("text"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log more (repeat for more detail)")
                .action(ArgAction::Count),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .short('q')
                .help("Only log errors")
                .action(ArgAction::SetTrue)
                .conflicts_with("verbose"),
        )
        .get_matches();

    let level = if matches.get_flag("quiet") {
        Level::ERROR
    } else {
        match matches.get_count("verbose") {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .init();

    let config = load_config(
        matches.get_one::<String>("config"),
        matches.get_one::<String>("target"),
    );
    let mut options = config.compile;
    if let Some(dirs) = matches.get_many::<String>("include") {
        options.include_path.extend(dirs.map(PathBuf::from));
    }
    if let Some(libs) = matches.get_many::<String>("preload") {
        options.preload.extend(libs.cloned());
    }

    let path = matches
        .get_one::<String>("path")
        .expect("path is a required argument");
    let format = matches
        .get_one::<String>("format")
        .expect("format has a default value");
    handle_compile_command(path, format, Compiler::new(options), config.output.target);
}

fn load_config(file: Option<&String>, target: Option<&String>) -> ComtextConfig {
    let loader = match file {
        Some(file) => Loader::new().with_file(file),
        None => Loader::new().with_optional_file(PROJECT_CONFIG),
    };
    let loader = match target {
        Some(target) => loader.set_override("output.target", target.as_str()),
        None => Ok(loader),
    };
    loader.and_then(Loader::build).unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        process::exit(1);
    })
}

/// Compile `path` and print the result
fn handle_compile_command(
    path: &str,
    format: &str,
    compiler: Compiler,
    target: comtext::comtext::target::Target,
) {
    let loader = DocumentLoader::from_path(path).unwrap_or_else(|e| {
        eprintln!("Error reading file: {}", e);
        process::exit(1);
    });

    let output = match loader.compile(&compiler, target) {
        Ok(output) => output,
        Err(LoaderError::ParseError(err)) => {
            let source = loader.source();
            if err.file == source.filename && err.path == source.path {
                eprintln!("{}", err.render_with_context(&source.text));
            } else {
                eprintln!("{}", err);
            }
            process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    match format {
        "json" => match serde_json::to_string_pretty(&output) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Serialization error: {}", e);
                process::exit(1);
            }
        },
        _ => print!("{}", output.document),
    }
}
