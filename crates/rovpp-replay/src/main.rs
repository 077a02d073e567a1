mod fixture;
mod replay;

use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use rovpp_policy::PolicyConfig;

#[derive(Parser)]
#[command(
    name = "rovpp-replay",
    about = "Replay one AS round through the ROV++ v1 Lite policy"
)]
struct Cli {
    /// Fixture JSON describing the AS, its RIB and the announcements it receives.
    fixture: PathBuf,

    /// Override the fixture's ASN.
    #[arg(long)]
    asn: Option<u32>,

    /// Skip the end-of-round blackhole invariant check.
    #[arg(long)]
    no_verify: bool,

    /// Run the subprefix-hijack temporary hole counter around selection.
    #[arg(long)]
    temp_holes: bool,

    /// Write the report here instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let fixture = fixture::load(&cli.fixture)?;

    let mut config = PolicyConfig::new(cli.asn.unwrap_or(fixture.asn));
    if cli.no_verify {
        config = config.verify_invariants(false);
    }
    if cli.temp_holes {
        config = config.temp_holes(true);
    }
    tracing::debug!("replaying {} as AS {}", cli.fixture.display(), config.asn());

    let report = replay::run(fixture, config)?;
    let json = serde_json::to_string_pretty(&report)?;

    match cli.output {
        Some(path) => std::fs::write(&path, json)?,
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{json}")?;
        }
    }

    Ok(())
}
