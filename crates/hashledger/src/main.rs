//! `hashledger`: build a chain, attack it, and show what verification catches.

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use hashledger::demo::{self, BlockView, DemoConfig, StepOutcome};
use hashledger::DigestAlgorithm;

#[derive(Debug, Parser)]
#[command(name = "hashledger", version, about = "Hash-linked ledger tamper-detection demo")]
struct Args {
    /// Records to append after the genesis block.
    #[arg(short = 'n', long, default_value_t = 3)]
    records: usize,

    /// Digest algorithm: blake3 or sha256.
    #[arg(short, long, default_value = "blake3")]
    algorithm: DigestAlgorithm,

    /// Index of the block the simulated attacker rewrites.
    #[arg(short, long, default_value_t = 1)]
    tamper_index: u64,

    /// Reject blocks whose timestamp precedes their predecessor's.
    #[arg(long)]
    strict_timestamps: bool,

    /// Print the report as JSON.
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = DemoConfig {
        records: args.records,
        algorithm: args.algorithm,
        tamper_index: args.tamper_index,
        strict_timestamps: args.strict_timestamps,
    };

    let report = demo::run(&config).context("demo run failed")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Initial chain ({}):", report.algorithm);
    print_blocks(&report.initial_chain);
    print_outcome("Is the chain valid?", &report.initial);

    println!();
    println!("Block {} payload rewritten in place:", report.tampered_index);
    print_outcome("Is the chain valid?", &report.after_edit);

    println!();
    println!(
        "Block {} payload rewritten and its digest recomputed:",
        report.tampered_index
    );
    print_blocks(&report.forged_chain);
    print_outcome("Is the chain valid?", &report.after_forgery);
    println!(
        "Does the checkpoint signed before the attack still hold? {}",
        report.checkpoint_holds
    );

    Ok(())
}

fn print_blocks(blocks: &[BlockView]) {
    for b in blocks {
        println!("Index: {}, Data: {}, Hash: {}", b.index, b.payload, b.digest);
    }
}

fn print_outcome(question: &str, outcome: &StepOutcome) {
    println!();
    println!("{} {}", question, outcome.valid);
    if let Some(failure) = &outcome.failure {
        println!("  {}", failure);
    }
}
