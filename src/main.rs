use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::info;

use sgdnet::{mnist, Network, Result, SgdConfig};

/// Train a digit classifier on the MNIST dataset and report test accuracy.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Directory containing the four gzipped MNIST distribution files.
    data_dir: PathBuf,
}

fn run(args: Args) -> Result<()> {
    let (train, test) = mnist::load(&args.data_dir)?;
    info!(
        "loaded {} training and {} test examples",
        train.len(),
        test.len()
    );

    let mut net = Network::new_with_seed(&[train.input_dim(), 30, mnist::NUM_CLASSES], 1)?;
    net.sgd(&train, SgdConfig::default())?;

    let correct = net.evaluate(&test)?;
    println!("{correct} out of {} correct", test.len());
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
