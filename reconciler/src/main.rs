use anyhow::Context;
use bridge::model::BridgeState;
use clap::Parser;
use generator::staircase::{build_sections, GeneratorConfig};
use std::path::PathBuf;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use workflow::config::WorkflowConfig;
use workflow::input::load_sections;
use workflow::report::RunReport;
use workflow::runner::{CancellationToken, Runner};

mod bridge;
mod generator;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Design versus as-built bench reconciliation driver")]
struct Args {
    /// JSON file with the section profiles to reconcile
    #[arg(long)]
    sections: Option<PathBuf>,
    /// Generate this many synthetic sections instead of reading a file
    #[arg(long)]
    synthetic: Option<usize>,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Load a workflow config from YAML
    #[arg(long)]
    workflow: Option<PathBuf>,
    #[arg(long, default_value_t = 0.5)]
    resolution: f64,
    #[arg(long, default_value_t = 40.0)]
    face_threshold: f64,
    #[arg(long, default_value_t = 20.0)]
    berm_threshold: f64,
    /// Outlier filter on berm width; 0 disables it
    #[arg(long, default_value_t = 50.0)]
    max_berm_width: f64,
    #[arg(long, default_value_t = 4)]
    workers: usize,
    #[arg(long, default_value = "reconciliation_report.json")]
    output: PathBuf,
    /// Keep the HTTP bridge alive for result queries and bench edits
    #[arg(long, default_value_t = false)]
    serve: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let workflow_config = if let Some(path) = args.workflow.as_ref() {
        WorkflowConfig::load(path)?
    } else {
        WorkflowConfig::from_args(
            args.resolution,
            args.face_threshold,
            args.berm_threshold,
            Some(args.max_berm_width),
            args.workers,
        )
    };

    let sections = match (args.sections.as_ref(), args.synthetic) {
        (Some(path), _) => load_sections(path)?,
        (None, Some(count)) => build_sections(&GeneratorConfig {
            sections: count,
            seed: args.seed,
            ..Default::default()
        })?,
        (None, None) => anyhow::bail!("either --sections or --synthetic is required"),
    };
    log::info!("loaded {} sections", sections.len());

    let runner = Runner::new(workflow_config.clone())?;
    let runtime = TokioBuilder::new_multi_thread()
        .worker_threads(workflow_config.max_workers)
        .enable_all()
        .build()
        .context("creating workflow runtime")?;

    let cancel = CancellationToken::new();
    let outcomes = runtime.block_on(async {
        let interrupt = cancel.clone();
        tokio::spawn(async move {
            if signal::ctrl_c().await.is_ok() {
                log::warn!("interrupt received, stopping after running sections");
                interrupt.cancel();
            }
        });
        runner.run(sections, &cancel).await
    })?;

    let metrics = runner.metrics();
    log::info!(
        "sections={} empty_extractions={} benches={} errors={}",
        metrics.sections,
        metrics.empty_extractions,
        metrics.benches,
        metrics.errors
    );

    {
        let report = RunReport::build(&outcomes, &workflow_config, metrics);
        report.write(&args.output)?;
        let summary = &report.summary;
        println!(
            "Reconciled {} sections -> matched {}, missing {}, extra {} (height {:.0}%, angle {:.0}%, berm {:.0}% compliant); report at {}",
            report.sections.len(),
            summary.matched,
            summary.missing,
            summary.extra,
            summary.height.compliance_pct,
            summary.angle.compliance_pct,
            summary.berm.compliance_pct,
            args.output.display()
        );
    }

    if args.serve && !cancel.is_cancelled() {
        bridge::server::spawn(BridgeState::new(workflow_config, outcomes, metrics));
        println!("HTTP bridge running (Ctrl+C to stop)...");
        runtime.block_on(async {
            signal::ctrl_c().await.context("awaiting Ctrl+C to exit")?;
            Ok::<(), anyhow::Error>(())
        })?;
    }

    Ok(())
}
