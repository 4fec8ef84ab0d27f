use std::io::Read;
use std::sync::Arc;

use sqlattribs_core::{EngineConfig, EnrichError, EventLevel, EventSink, FilterChain, LogSink, RequestState};
use sqlattribs_persistence::AttributeFromSql;

const USAGE: &str = "Uso: sqlattribs-cli (--config <FILE.json> | --env) [--state <FILE.json>] [--verbose]";

const EXIT_USAGE: i32 = 2;
const EXIT_CONNECTION: i32 = 3;
const EXIT_QUERY: i32 = 4;
const EXIT_IO: i32 = 5;

/// Eventos del filtro a stderr, para uso interactivo.
struct StderrSink;

impl EventSink for StderrSink {
    fn emit(&self, level: EventLevel, message: &str) {
        eprintln!("[{level}] {message}");
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ConfigSource {
    File(String),
    Env,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct RunArgs {
    config: ConfigSource,
    state: Option<String>,
    verbose: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Run(RunArgs),
    Help,
}

/// Interpreta los argumentos (sin el nombre del binario). `Err` lleva el
/// mensaje de uso a mostrar.
fn parse_args(args: &[String]) -> Result<Command, String> {
    let mut config_path: Option<String> = None;
    let mut state: Option<String> = None;
    let mut from_env = false;
    let mut verbose = false;
    let mut it = args.iter();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--config" => {
                let path = it.next().ok_or_else(|| format!("--config requires a file\n{USAGE}"))?;
                config_path = Some(path.clone());
            }
            "--state" => {
                let path = it.next().ok_or_else(|| format!("--state requires a file\n{USAGE}"))?;
                state = Some(path.clone());
            }
            "--env" => from_env = true,
            "--verbose" | "-v" => verbose = true,
            "--help" | "-h" => return Ok(Command::Help),
            other => return Err(format!("unknown argument: {other}\n{USAGE}")),
        }
    }
    let config = match (config_path, from_env) {
        (Some(path), false) => ConfigSource::File(path),
        (None, true) => ConfigSource::Env,
        (Some(_), true) => return Err(format!("--config and --env are mutually exclusive\n{USAGE}")),
        (None, false) => return Err(USAGE.to_owned()),
    };
    Ok(Command::Run(RunArgs { config,
                              state,
                              verbose }))
}

fn exit_code(err: &EnrichError) -> i32 {
    match err {
        EnrichError::InvalidConfig(_) => EXIT_USAGE,
        EnrichError::Connection { .. } => EXIT_CONNECTION,
        EnrichError::Query { .. } => EXIT_QUERY,
    }
}

fn fail(code: i32, msg: impl std::fmt::Display) -> ! {
    eprintln!("[sqlattribs] {msg}");
    std::process::exit(code);
}

fn main() {
    // Cargar .env si existe para las variables SQLATTRIBS_*
    let _ = dotenvy::dotenv();
    let args: Vec<String> = std::env::args().skip(1).collect();
    let run = match parse_args(&args) {
        Ok(Command::Run(run)) => run,
        Ok(Command::Help) => {
            println!("{USAGE}");
            std::process::exit(0);
        }
        Err(msg) => fail(EXIT_USAGE, msg),
    };

    let config = match &run.config {
        ConfigSource::File(path) => {
            let raw = std::fs::read_to_string(path).unwrap_or_else(|e| fail(EXIT_IO, format!("cannot read {path}: {e}")));
            EngineConfig::from_json_str(&raw)
        }
        ConfigSource::Env => EngineConfig::from_env(),
    };
    let config = config.unwrap_or_else(|e| fail(exit_code(&e), e));

    let raw_state = match &run.state {
        Some(path) => std::fs::read_to_string(path).unwrap_or_else(|e| fail(EXIT_IO, format!("cannot read {path}: {e}"))),
        None => {
            let mut buf = String::new();
            if let Err(e) = std::io::stdin().read_to_string(&mut buf) {
                fail(EXIT_IO, format!("cannot read stdin: {e}"));
            }
            buf
        }
    };
    let mut state: RequestState =
        serde_json::from_str(&raw_state).unwrap_or_else(|e| fail(EXIT_USAGE, format!("invalid request state: {e}")));

    let sink: Arc<dyn EventSink> = if run.verbose { Arc::new(StderrSink) } else { Arc::new(LogSink) };
    let chain = FilterChain::new().push(AttributeFromSql::new(config).with_sink(sink));
    if let Err(e) = chain.run(&mut state) {
        fail(exit_code(&e), e);
    }

    match serde_json::to_string_pretty(&state) {
        Ok(out) => println!("{out}"),
        Err(e) => fail(EXIT_IO, format!("cannot render state: {e}")),
    }
}
