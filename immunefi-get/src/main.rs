use anyhow::Error;
use clap::Parser;
use contract_downloader_lib::api::immunefi::ImmunefiClient;
use contract_downloader_lib::config::Config;
use contract_downloader_lib::downloader;
use contract_downloader_lib::scope;
use log::info;
use simplelog::*;
use std::path::PathBuf;

/// Gathers all block explorer links to verified smart contracts in scope from an Immunefi bug bounty page
/// and forwards them to the downloader.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Bug bounty URL, e.g. https://immunefi.com/bounty/vulnerableproject/
    bounty_url: String,

    /// Remove bounty contracts from the local filesystem
    #[arg(short, long)]
    remove: bool,

    /// Only list the contracts in scope without downloading them
    #[arg(short, long)]
    list: bool,

    /// Directory to place `contracts/` and `node_modules/` in (default: current directory)
    #[arg(short, long)]
    dir: Option<PathBuf>,

    /// Print debug output
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();

    if let Err(why) = run(&args) {
        println!("Error: {why}");
    }
}

fn run(args: &Args) -> Result<(), Error> {
    let level = match args.verbose {
        true => LevelFilter::Debug,
        false => LevelFilter::Info,
    };

    TermLogger::init(
        level,
        ConfigBuilder::new()
            .add_filter_allow_str("contract_downloader")
            .add_filter_allow_str("immunefi_get")
            .set_time_level(LevelFilter::Off)
            .build(),
        TerminalMode::Stdout,
        ColorChoice::Auto,
    )?;

    let links = ImmunefiClient::new()?.get_scope_links(&args.bounty_url)?;
    info!("Found {} contracts in scope", links.len());

    if args.list {
        for link in &links {
            println!("{link}");
        }

        return Ok(());
    }

    let root = match &args.dir {
        Some(dir) => std::fs::canonicalize(dir)?,
        None => std::env::current_dir()?,
    };

    // Always try to resolve the implementation contract
    let config = Config::new()?;
    let skipped = scope::forward(&links, |network, address| {
        downloader::start_network(&config, &root, network, address, args.remove, true)
    });

    if !skipped.is_empty() {
        println!();
        println!("Skipped contracts due to errors:");
        for (link, _) in &skipped {
            println!("{link}");
        }
    }

    println!();
    println!("Done!");

    Ok(())
}
