//! End-to-end tests for the reconcile command over real CSV fixtures.

use std::path::{Path, PathBuf};

use recon_cli::cli::ReconcileArgs;
use recon_cli::commands::run_reconcile;

const OUTGOING_CSV: &str = "\
Documento,Produto,Unidade Origem,Unidade Destino,Valor Total,Quantidade,Data\n\
NF 100,DIPIRONA 500MG COMP C/20,HOSPITAL A,HOSPITAL B,\"50,00\",20,01/03/2024\n\
NF 200,SORO FISIOLOGICO 500ML FRASCO,HOSPITAL A,HOSPITAL B,\"40,00\",10,02/03/2024\n\
NF 999,LUVA NITRILICA M C/100,HOSPITAL A,HOSPITAL B,\"30,00\",5,03/03/2024\n";

const INCOMING_CSV: &str = "\
Documento,Produto,Unidade Origem,Unidade Destino,Valor Total,Quantidade,Data\n\
NF 100,DIPIRONA 500MG COMP C/20,HOSPITAL A,HOSPITAL B,\"50,00\",20,01/03/2024\n\
NF 200,SORO FISIOLOGICO 500ML FRASCO,HOSPITAL A,HOSPITAL B,\"16,00\",4,02/03/2024\n\
NF 200,SORO FISIOLOGICO 500ML FRASCO,HOSPITAL A,HOSPITAL B,\"24,00\",6,02/03/2024\n";

fn write_fixture(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn args(dir: &Path) -> ReconcileArgs {
    ReconcileArgs {
        outgoing: write_fixture(dir, "outgoing.csv", OUTGOING_CSV),
        incoming: write_fixture(dir, "incoming.csv", INCOMING_CSV),
        output: Some(dir.join("result.csv")),
        threshold: 65.0,
        exclude: Vec::new(),
        no_default_exclusions: false,
        no_summary: true,
        no_progress: true,
    }
}

#[test]
fn reconcile_writes_result_table_and_stats_sidecar() {
    let dir = tempfile::tempdir().unwrap();
    let outcome = run_reconcile(&args(dir.path())).unwrap();

    // One row per outgoing record: exact match, aggregated receipt,
    // missing document.
    assert_eq!(outcome.rows, 3);
    assert_eq!(outcome.stats.compliant, 2);
    assert_eq!(outcome.stats.not_found, 1);

    let table = std::fs::read_to_string(&outcome.output).unwrap();
    let mut lines = table.lines();
    let header = lines.next().unwrap();
    assert!(header.starts_with("Date,Origin Unit"));
    assert_eq!(lines.count(), 3);
    assert!(table.contains("Compliant"));
    assert!(table.contains("Document 999 not found"));

    let stats_json = std::fs::read_to_string(&outcome.stats_path).unwrap();
    assert!(stats_json.contains("\"compliant\": 2"));
}

#[test]
fn missing_required_column_is_reported_with_context() {
    let dir = tempfile::tempdir().unwrap();
    let mut a = args(dir.path());
    a.outgoing = write_fixture(dir.path(), "broken.csv", "Documento,Produto\nNF 1,DIPIRONA\n");

    let error = run_reconcile(&a).unwrap_err();
    let chain = format!("{error:#}");
    assert!(chain.contains("loading outgoing ledger"), "chain: {chain}");
    assert!(chain.contains("required column"), "chain: {chain}");
}
