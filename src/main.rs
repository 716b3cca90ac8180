use std::fs::File;
use std::io::BufReader;
use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use flate2::read::MultiGzDecoder;

use package_statistics::{aggregate_contents, fetch, report};

/// Reports which packages of a Debian architecture ship the most files.
#[derive(Parser)]
#[clap(name = "package-statistics", version)]
#[clap(about = "Reads the contents index for an architecture and prints the packages owning the most files")]
struct Cli {
    /// Architecture of the target system (e.g. amd64, arm64, i386)
    #[clap(short, long)]
    arch: String,

    /// Mirror root the contents index is fetched from
    #[clap(long, default_value_t = fetch::DEFAULT_MIRROR.to_string())]
    mirror: String,

    /// How many packages to report
    #[clap(long, default_value_t = 10)]
    top: usize,

    /// Give up when this many header lines precede the data region
    #[clap(long, default_value_t = 1000)]
    max_preamble_lines: usize,

    /// Emit the ranking as JSON instead of a table
    #[clap(long)]
    json: bool,

    /// Enable debug logging
    #[clap(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let dest_dir = std::env::current_dir()?;
    let archive = fetch::download_contents(&cli.mirror, &cli.arch, &dest_dir).await?;

    let started = Instant::now();
    let reader = BufReader::new(MultiGzDecoder::new(File::open(&archive)?));
    let counts = aggregate_contents(reader, cli.max_preamble_lines)?;
    log::info!(
        "counted {} entries across {} packages in {:.2?}",
        counts.total(),
        counts.distinct(),
        started.elapsed()
    );

    let ranked = counts.top_k(cli.top);
    if cli.json {
        println!("{}", report::render_json(&ranked)?);
    } else {
        print!("{}", report::render_table(&ranked));
    }

    Ok(())
}
