//! Subcommand implementations.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{ContentArrangement, Table};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use recon_engine::reconcile;
use recon_ingest::load_ledger;
use recon_model::{OUTPUT_COLUMNS, ReconcileOptions, SummaryStats};
use recon_report::{stats_sidecar_path, write_result_csv, write_stats_json};

use crate::cli::ReconcileArgs;

/// What one `reconcile` run produced, for the summary printer.
#[derive(Debug)]
pub struct ReconcileOutcome {
    pub rows: usize,
    pub stats: SummaryStats,
    pub output: PathBuf,
    pub stats_path: PathBuf,
}

pub fn run_reconcile(args: &ReconcileArgs) -> Result<ReconcileOutcome> {
    let options = build_options(args);

    let outgoing = load_ledger(&args.outgoing, &options)
        .with_context(|| format!("loading outgoing ledger {}", args.outgoing.display()))?;
    let incoming = load_ledger(&args.incoming, &options)
        .with_context(|| format!("loading incoming ledger {}", args.incoming.display()))?;
    info!(
        outgoing = outgoing.len(),
        incoming = incoming.len(),
        threshold = options.similarity_threshold,
        "ledgers loaded"
    );

    let bar = progress_bar(!args.no_progress);
    let mut on_progress = |fraction: f64, message: &str| {
        bar.set_position((fraction * 100.0).round() as u64);
        bar.set_message(message.to_string());
    };
    let started = Instant::now();
    let (rows, stats) = reconcile(&outgoing, &incoming, &options, Some(&mut on_progress));
    bar.finish_and_clear();
    info!(
        rows = rows.len(),
        duration_ms = started.elapsed().as_millis(),
        "reconciliation run complete"
    );

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from("reconciliation.csv"));
    write_result_csv(&output, &rows)
        .with_context(|| format!("writing result table {}", output.display()))?;
    let stats_path = stats_sidecar_path(&output);
    write_stats_json(&stats_path, &stats)
        .with_context(|| format!("writing statistics {}", stats_path.display()))?;

    Ok(ReconcileOutcome {
        rows: rows.len(),
        stats,
        output,
        stats_path,
    })
}

pub fn run_columns() -> Result<()> {
    let mut inputs = Table::new();
    inputs.set_header(vec!["Canonical field", "Header substrings", "Required"]);
    apply_table_style(&mut inputs);
    for (field, substrings, required) in [
        ("product", "produto, descricao, descrição, material", "yes"),
        ("document", "documento, nf, nota", "yes"),
        ("origin unit", "unidade + origem", "yes"),
        ("destination unit", "unidade + destino", "yes"),
        ("value", "valor total, vl_total, total", "yes"),
        ("quantity", "quantidade, qtd, qt_entrada, qt entrada", "yes"),
        ("species", "especie, espécie", "no"),
        ("time", "hora, time", "no"),
        ("date", "data, date", "yes"),
    ] {
        inputs.add_row(vec![field, substrings, required]);
    }
    println!("Recognized input columns (matched case-insensitively, first match wins):");
    println!("{inputs}");

    let mut outputs = Table::new();
    outputs.set_header(vec!["#", "Output column"]);
    apply_table_style(&mut outputs);
    for (idx, column) in OUTPUT_COLUMNS.iter().enumerate() {
        outputs.add_row(vec![(idx + 1).to_string(), (*column).to_string()]);
    }
    println!("Result table layout:");
    println!("{outputs}");
    Ok(())
}

fn build_options(args: &ReconcileArgs) -> ReconcileOptions {
    let mut options = ReconcileOptions {
        similarity_threshold: args.threshold,
        ..ReconcileOptions::default()
    };
    if args.no_default_exclusions {
        options.excluded_facility_terms.clear();
    }
    options
        .excluded_facility_terms
        .extend(args.exclude.iter().cloned());
    options
}

fn progress_bar(enabled: bool) -> ProgressBar {
    if !enabled {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(100);
    bar.set_style(
        ProgressStyle::with_template("[{bar:40.cyan/blue}] {pos:>3}% {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-"),
    );
    bar
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
}
