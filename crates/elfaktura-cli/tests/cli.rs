use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

const HEADER: &str = "<h2>2024-02-01 FAKTURA</h2><p>Fakturanummer</p><p>123456</p>";

const TABLES: &str = r#"
<table>
  <tr><th></th><th>Antal</th><th>Pris</th><th>Summa</th></tr>
  <tr><td>Fast avgift enkeltariff</td><td>1,00</td><td>312,50</td><td>312,50</td></tr>
  <tr><td>Överföring enkeltariff</td><td>1 234,00</td><td>45,67</td><td>563,57</td></tr>
  <tr><td>Energiskatt</td><td>1 234,00</td><td>53,50</td><td>660,19</td></tr>
  <tr><td>TOTALT BELOPP kWh</td><td></td><td></td><td>1 536,26</td></tr>
</table>
<table>
  <tr><th></th><th>Antal</th><th>Pris</th><th>Summa</th></tr>
  <tr><td>Medelspotpris</td><td>1 234,00</td><td>80,12</td><td>988,68</td></tr>
  <tr><td>Rörliga kostnader</td><td>1 234,00</td><td>4,50</td><td>55,53</td></tr>
  <tr><td>Fasta påslag</td><td>1 234,00</td><td>3,90</td><td>48,13</td></tr>
  <tr><td>Fast avgift</td><td>1,00</td><td>39,00</td><td>39,00</td></tr>
  <tr><td>TOTALT BELOPP kWh</td><td></td><td></td><td>1 131,34</td></tr>
</table>
<table>
  <tr><th></th><th>Antal</th><th>Pris</th><th>Summa</th></tr>
  <tr><td>Fast Avgift</td><td>1,00</td><td>4 200,00</td><td>350,00</td></tr>
  <tr><td>Energiavgift</td><td>1,25</td><td>780,00</td><td>975,00</td></tr>
  <tr><td>TOTALT BELOPP MWh</td><td></td><td></td><td>1 325,00</td></tr>
</table>
<table>
  <tr><th></th><th>Antal</th><th>Pris</th><th>Summa</th></tr>
  <tr><td>Serviceavgift villa</td><td>1,00</td><td>99,00</td><td>99,00</td></tr>
</table>"#;

fn elfaktura(config: &Path) -> Command {
    let mut cmd = Command::cargo_bin("elfaktura").unwrap();
    cmd.arg("--config").arg(config).env_remove("RUST_LOG");
    cmd
}

/// Directory with an empty config file, so defaults apply.
fn workspace() -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.json");
    fs::write(&config, "{}").unwrap();
    (dir, config)
}

#[test]
fn test_parse_batch_skips_broken_document() {
    let (dir, config) = workspace();
    let input = dir.path().join("in");
    fs::create_dir(&input).unwrap();

    fs::write(
        input.join("invoice_1.html"),
        format!("<html><body>{}{}</body></html>", HEADER, TABLES),
    )
    .unwrap();
    // No layout sidecar: conversion fails for this one
    fs::write(input.join("invoice_2.pdf"), b"%PDF-1.4").unwrap();
    // Only a partial layout: extracted through the text fallback
    fs::write(
        input.join("invoice_3.html"),
        format!("<html><body>{}<p>Serviceavgift villa</p></body></html>", HEADER),
    )
    .unwrap();
    fs::write(input.join("notes.txt"), "not an invoice").unwrap();

    let output = dir.path().join("out.csv");
    elfaktura(&config)
        .arg("parse")
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 3 documents"))
        .stdout(predicate::str::contains("invoice_2.pdf"));

    let csv = fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("El förbrukning (kWh),"));
    assert!(lines[0].ends_with("date,invoice_number,backend,source"));
    assert!(lines[1].ends_with("2024-02-01,123456,table,invoice_1.html"));
    assert!(lines[2].ends_with("2024-02-01,123456,text,invoice_3.html"));
}

#[test]
fn test_parse_pdf_with_layout_sidecar_is_one_document() {
    let (dir, config) = workspace();
    let input = dir.path().join("in");
    fs::create_dir(&input).unwrap();
    fs::write(input.join("invoice_1.pdf"), b"%PDF-1.4").unwrap();
    fs::write(
        input.join("invoice_1.html"),
        format!("<html><body>{}{}</body></html>", HEADER, TABLES),
    )
    .unwrap();

    let output = dir.path().join("out.csv");
    elfaktura(&config)
        .arg("parse")
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 1 documents"));

    let csv = fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[1].ends_with("2024-02-01,123456,table,invoice_1.pdf"));
}

#[test]
fn test_parse_json_output() {
    let (dir, config) = workspace();
    fs::write(
        dir.path().join("invoice_1.html"),
        format!("<html><body>{}{}</body></html>", HEADER, TABLES),
    )
    .unwrap();

    let output = dir.path().join("out.json");
    elfaktura(&config)
        .args(["parse", "--format", "json", "--output"])
        .arg(&output)
        .arg(dir.path())
        .assert()
        .success();

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(json[0]["Elnät överföring enkeltariff (öre/kWh)"], serde_json::json!(45.67));
    assert_eq!(json[0]["backend"], serde_json::json!("table"));
}

#[test]
fn test_parse_without_documents_fails() {
    let (dir, config) = workspace();
    elfaktura(&config)
        .arg("parse")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("No invoice documents"));
}

#[test]
fn test_inspect_reports_backend() {
    let (dir, config) = workspace();
    let input = dir.path().join("invoice_1.html");
    fs::write(&input, format!("<html><body>{}{}</body></html>", HEADER, TABLES)).unwrap();

    elfaktura(&config)
        .arg("inspect")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"backend\": \"table\""))
        .stdout(predicate::str::contains("\"invoice_number\": \"123456\""));
}

#[test]
fn test_template_show_and_check() {
    let (dir, config) = workspace();
    elfaktura(&config)
        .args(["template", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("se-multi-utility"));

    let exported = dir.path().join("template.json");
    elfaktura(&config)
        .args(["template", "export"])
        .arg(&exported)
        .assert()
        .success();

    elfaktura(&config)
        .args(["template", "check"])
        .arg(&exported)
        .assert()
        .success()
        .stdout(predicate::str::contains("15 fields (13 with text patterns)"));
}

#[test]
fn test_config_get() {
    let (_dir, config) = workspace();
    elfaktura(&config)
        .args(["config", "get", "input.filename_prefix"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"invoice_\""));
}
