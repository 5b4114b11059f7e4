//! CLI glue: read raw title items from JSONL, run the mapping pipeline,
//! write the case map, run summary, and per-item results.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use casemap::services::report;
use casemap::{
    aggregate, cancel_flag, BatchMapper, MapperSettings, PatternRuleSet, RawTitleItem,
    TitleExtractor,
};

#[derive(Debug, Parser)]
#[command(name = "casemap", about = "Map folder/email titles to case metadata")]
struct Cli {
    /// JSONL file of raw title items ({"source_id": ..., "title": ...}).
    #[arg(long)]
    input: PathBuf,
    /// Rule definition file. Defaults to the built-in catalog.
    #[arg(long)]
    rules: Option<PathBuf>,
    /// Output directory for case_map.json, run_summary.json, results.jsonl.
    #[arg(long, default_value = "out")]
    out_dir: PathBuf,
    /// Batch size override (also CASEMAP_BATCH_SIZE).
    #[arg(long)]
    batch_size: Option<usize>,
}

fn read_items(path: &PathBuf) -> anyhow::Result<Vec<RawTitleItem>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read input {}", path.display()))?;
    let mut items = Vec::new();
    for (line_no, line) in contents.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let item: RawTitleItem = serde_json::from_str(line)
            .with_context(|| format!("invalid item on line {}", line_no + 1))?;
        items.push(item);
    }
    Ok(items)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut settings = MapperSettings::from_env()?;
    if let Some(batch_size) = cli.batch_size {
        settings.batch_size = batch_size;
        settings.validate()?;
    }

    let rules = match &cli.rules {
        Some(path) => PatternRuleSet::load(path)?,
        None => PatternRuleSet::builtin(),
    };
    let rules = Arc::new(rules);

    let items = read_items(&cli.input)?;
    log::info!("mapping {} items with batch size {}", items.len(), settings.batch_size);

    let cancel = cancel_flag();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                log::warn!("cancellation requested, finishing in-flight batch");
                cancel.store(true, Ordering::SeqCst);
            }
        });
    }

    let extractor = TitleExtractor::new(rules, settings);
    let mapper = BatchMapper::new(extractor, settings.batch_size);
    let mut rx = mapper.map_all(items, cancel);
    let mut results = Vec::new();
    while let Some(result) = rx.recv().await {
        results.push(result);
    }

    let (case_map, summary) = aggregate(results.clone());

    report::write_json(&cli.out_dir.join("case_map.json"), &case_map)?;
    report::write_json(&cli.out_dir.join("run_summary.json"), &summary)?;
    report::write_results_jsonl(&cli.out_dir.join("results.jsonl"), &results)?;

    log::info!(
        "done: {} items, {} cases, {} unassigned, {} errors",
        summary.total_items,
        summary.total_cases,
        summary.unassigned_items,
        summary.error_items
    );
    Ok(())
}
