use anyhow::Context;
use clap::Parser;
use fieldlog::cli::{Args, setup_logging};
use fieldlog::processor::LogProcessor;
use std::process;

fn main() {
    let args = Args::parse();

    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    match runtime.block_on(run(args)) {
        Ok(true) => process::exit(0),
        Ok(false) => process::exit(1),
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

/// Returns whether every input was converted
async fn run(args: Args) -> anyhow::Result<bool> {
    setup_logging(&args)?;

    let config = args.parser_config().context("Invalid options")?;
    let processor = LogProcessor::new(args.mode, config)?.with_progress(args.show_progress());

    let stats = processor
        .process(&args.inputs, args.output.as_deref())
        .await
        .with_context(|| format!("Failed to convert {} logs", args.mode))?;

    Ok(stats.files_failed == 0)
}
