//! Command line host for the completion bridge: drives the same request
//! path an editor would (position -> byte offset -> dcd-client -> parsed
//! candidates), printing one candidate label per line.

use dcd_bridge::kernel::services::adapters::DcdService;
use dcd_bridge::kernel::services::ports::DcdConfig;
use dcd_bridge::models::Document;
use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;

const USAGE: &str = "\
usage: dcd-bridge complete <file> <line> <column> [options]
       dcd-bridge import <dir> [options]
       dcd-bridge clear-cache [options]

<line> and <column> are zero-based; the column is measured in bytes.

options:
    --port <n>        daemon port (default 4242)
    --client <cmd>    client executable (default dcd-client)
    --timeout-ms <n>  bound on the client wait (default 50)";

enum CliError {
    Usage(String),
    Failed(String),
}

fn main() -> ExitCode {
    let _logging = dcd_bridge::logging::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(CliError::Usage(message)) => {
            eprintln!("{message}\n\n{USAGE}");
            ExitCode::from(2)
        }
        Err(CliError::Failed(message)) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Vec<String>) -> Result<(), CliError> {
    let mut positionals = Vec::new();
    let mut config = DcdConfig::default();

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                println!("{USAGE}");
                return Ok(());
            }
            "--port" => config.port = parse_option(iter.next(), "--port")?,
            "--client" => {
                config.command = iter
                    .next()
                    .ok_or_else(|| CliError::Usage("--client needs a value".to_string()))?;
            }
            "--timeout-ms" => {
                config.timeout = Duration::from_millis(parse_option(iter.next(), "--timeout-ms")?);
            }
            _ if arg.starts_with('-') => {
                return Err(CliError::Usage(format!("unknown option: {arg}")));
            }
            _ => positionals.push(arg),
        }
    }

    let service = DcdService::new(config)
        .map_err(|e| CliError::Failed(format!("failed to start runtime: {e}")))?;

    match positionals.first().map(String::as_str) {
        Some("complete") => {
            let [_, file, line, column] = positionals.as_slice() else {
                return Err(CliError::Usage(
                    "complete needs <file> <line> <column>".to_string(),
                ));
            };
            let line: usize = parse_number(line, "<line>")?;
            let column: usize = parse_number(column, "<column>")?;

            let document = Document::open(Path::new(file))
                .map_err(|e| CliError::Failed(format!("cannot read {file}: {e}")))?;
            let byte_offset = document.buffer().byte_offset(line, column);

            let candidates = service
                .query_completions(byte_offset, document.path())
                .map_err(|e| CliError::Failed(e.to_string()))?;
            for candidate in candidates {
                println!("{}", candidate.label);
            }
            Ok(())
        }
        Some("import") => {
            let [_, dir] = positionals.as_slice() else {
                return Err(CliError::Usage("import needs <dir>".to_string()));
            };
            service
                .add_import_path(Path::new(dir))
                .map_err(|e| CliError::Failed(e.to_string()))
        }
        Some("clear-cache") => {
            if positionals.len() != 1 {
                return Err(CliError::Usage("clear-cache takes no arguments".to_string()));
            }
            service
                .clear_cache()
                .map_err(|e| CliError::Failed(e.to_string()))
        }
        Some(other) => Err(CliError::Usage(format!("unknown command: {other}"))),
        None => Err(CliError::Usage("missing command".to_string())),
    }
}

fn parse_option<T: std::str::FromStr>(value: Option<String>, flag: &str) -> Result<T, CliError> {
    let value = value.ok_or_else(|| CliError::Usage(format!("{flag} needs a value")))?;
    parse_number(&value, flag)
}

fn parse_number<T: std::str::FromStr>(value: &str, what: &str) -> Result<T, CliError> {
    value
        .parse()
        .map_err(|_| CliError::Usage(format!("{what} expects a number, got {value:?}")))
}
