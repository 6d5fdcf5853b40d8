use anyhow::Error;
use clap::Parser;
use contract_downloader_lib::config::Config;
use contract_downloader_lib::downloader;
use simplelog::*;
use std::path::PathBuf;

/// Downloads a verified smart contract and its dependencies from Etherscan, Polygonscan or BscScan.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Address of a verified contract
    contract_address: String,

    /// Network: mainnet, polygon or bsc
    #[arg(short, long, default_value = "mainnet")]
    network: String,

    /// If the specified contract is a proxy: resolve and download the implementation instead
    #[arg(short, long = "impl")]
    implementation: bool,

    /// Remove a previously downloaded contract from the local filesystem
    #[arg(short, long)]
    remove: bool,

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
            .set_time_level(LevelFilter::Off)
            .build(),
        TerminalMode::Stdout,
        ColorChoice::Auto,
    )?;

    let root = match &args.dir {
        Some(dir) => std::fs::canonicalize(dir)?,
        None => std::env::current_dir()?,
    };

    let config = Config::new()?;
    downloader::start(
        &config,
        &root,
        &args.network,
        &args.contract_address,
        args.remove,
        args.implementation,
    )?;

    println!();
    println!("Done!");

    Ok(())
}
