mod body;
mod capture;
mod config;
mod decompress;
mod error;
mod har;
mod headers;
mod logging;
mod mapper;
mod replay;
mod transport;
mod url;

use anyhow::Result;
use clap::Parser;
use config::Config;
use error::{EXIT_CODE_BASE, HarError};
use std::process::ExitCode;
use tracing::{error, info};
use transport::CurlTransport;

#[derive(Parser)]
#[command(name = "har-replay")]
#[command(author, version, about = "Replay a HAR entry over HTTP and write back the completed entry")]
struct Cli {
    /// HAR entry to replay (use - for stdin)
    #[arg(default_value = "-")]
    file: String,

    /// Keep raw header text, protocol trace and body sizes in the output
    #[arg(short, long)]
    verbose: bool,

    /// Give up on the transfer after this many seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = logging::init_logging(cli.verbose) {
        eprintln!("har-replay: logging unavailable: {:#}", err);
    }

    match run(&cli) {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            error!("{:#}", err);
            let code = err
                .downcast_ref::<HarError>()
                .map_or(EXIT_CODE_BASE, HarError::exit_code);
            ExitCode::from(code)
        }
    }
}

fn run(cli: &Cli) -> Result<u8> {
    let config = Config::new(cli.verbose, cli.timeout);
    let mut entry = load_entry(&cli.file)?;

    let mut transport = CurlTransport::new(config.timeout);
    let failure = replay::replay(&mut entry, &mut transport, &config)?;

    har::write_stdout(&entry)?;

    Ok(failure.map_or(0, |f| {
        HarError::Transport { code: f.code, message: f.message }.exit_code()
    }))
}

fn load_entry(path: &str) -> Result<har::Entry> {
    if path == "-" {
        if atty::is(atty::Stream::Stdin) {
            info!("Reading HAR entry from standard input");
        }
        har::parse_stdin()
    } else {
        har::parse_file(path)
    }
}
