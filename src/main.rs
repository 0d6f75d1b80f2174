use anyhow::Result;
use clap::Parser;
use deep_researcher::{WorkflowOutcome, cli, launch};
use tracing_subscriber::{EnvFilter, prelude::*};

fn init_tracing(verbose: bool) -> Result<()> {
    let default_level = if verbose { "debug" } else { "info" };
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| default_level.to_string());
    let env_filter = EnvFilter::try_new(format!("warn,deep_researcher={}", log_level))?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_filter(env_filter))
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Args::parse();
    init_tracing(args.verbose)?;

    let config = args.into_config()?;

    match launch(&config).await? {
        WorkflowOutcome::Completed(report_path) => {
            println!("🎉 调研完成，报告已写入: {}", report_path.display());
        }
        WorkflowOutcome::Interrupted(thread_id) => {
            println!("⏸️ 调研已暂停，线程ID: {}", thread_id);
        }
    }

    Ok(())
}
