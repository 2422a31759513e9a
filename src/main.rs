use chrono::NaiveDateTime;
use clap::Parser;
use miette::{IntoDiagnostic, Result};
use payreq::application::request::PaymentRequest;
use payreq::domain::clock::FixedClock;
use payreq::domain::coerce::FromMapping;
use payreq::interfaces::json::request_reader::RequestReader;
use payreq::interfaces::json::request_writer::RequestWriter;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use tracing::Level;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input payment request JSON file
    input: PathBuf,

    /// Validate as of this instant (e.g. 2019-04-03T00:00:00) instead of the system clock.
    #[arg(long)]
    now: Option<NaiveDateTime>,

    /// Pretty-print the normalized request.
    #[arg(long)]
    pretty: bool,

    /// Log rule decisions to stderr.
    #[arg(long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .init();

    let file = File::open(&cli.input).into_diagnostic()?;
    let mapping = RequestReader::new(file).read().into_diagnostic()?;
    let request = PaymentRequest::from_mapping(&mapping).into_diagnostic()?;

    match cli.now {
        Some(now) => request.validate_with(&FixedClock(now)),
        None => request.validate(),
    }
    .into_diagnostic()?;
    tracing::debug!("Payment request {} is valid", cli.input.display());

    let stdout = io::stdout();
    let mut writer = RequestWriter::new(stdout.lock());
    writer.write(&request, cli.pretty).into_diagnostic()?;

    Ok(())
}
