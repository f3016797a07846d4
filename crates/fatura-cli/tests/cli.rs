use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const INVOICE: &str = "FATURA
Fatura No: ABC2024000000123
Fatura Tarihi: 29 Ağu 2025
Sayın
ACME Bilişim A.Ş.
Atatürk Cad. No:12 Kadıköy İstanbul
Tel: 0216 555 12 34
Vergi Dairesi: Kadıköy VKN: 1234567890
Açıklama Miktar Birim Fiyat Tutar
Danışmanlık Hizmeti 2 ADET 250,00 500,00
Yazılım Lisansı 1 ADET 500,00 500,00
ARA TOPLAM 1.000,00 TL
KDV %18 180,00 TL
Yalnız Bin Yüz Seksen Türk Lirası
";

fn fatura(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("fatura").unwrap();
    // Keep the user's real configuration out of the tests
    cmd.arg("--config").arg(dir.join("config.json"));
    cmd
}

fn write_invoice(dir: &Path, name: &str, text: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, text).unwrap();
    path
}

fn init_config(dir: &Path) {
    fatura(dir).args(["config", "init"]).assert().success();
}

#[test]
fn process_text_file_as_json() {
    let dir = TempDir::new().unwrap();
    init_config(dir.path());
    let input = write_invoice(dir.path(), "fatura.txt", INVOICE);

    let output = fatura(dir.path()).arg("process").arg(&input).output().unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["invoice_number"], "ABC2024000000123");
    assert_eq!(json["invoice_date"], "2025-08-29");
    assert_eq!(json["buyer_name"], "ACME Bilişim A.Ş.");
    assert_eq!(json["descriptions"][1], "Yazılım Lisansı");
    assert_eq!(json["subtotal"], "1000.00");
    assert_eq!(json["grand_total"], "1180.00");
}

#[test]
fn process_text_file_as_csv() {
    let dir = TempDir::new().unwrap();
    init_config(dir.path());
    let input = write_invoice(dir.path(), "fatura.txt", INVOICE);

    fatura(dir.path())
        .arg("process")
        .arg(&input)
        .args(["--format", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("invoice_number,invoice_date,buyer_name"))
        .stdout(predicate::str::contains("Danışmanlık Hizmeti; Yazılım Lisansı"));
}

#[test]
fn process_text_file_as_text_summary() {
    let dir = TempDir::new().unwrap();
    init_config(dir.path());
    let input = write_invoice(dir.path(), "fatura.txt", INVOICE);

    fatura(dir.path())
        .arg("process")
        .arg(&input)
        .args(["--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Invoice: ABC2024000000123"))
        .stdout(predicate::str::contains("1.180,00 ₺"));
}

#[test]
fn process_writes_output_file() {
    let dir = TempDir::new().unwrap();
    init_config(dir.path());
    let input = write_invoice(dir.path(), "fatura.txt", INVOICE);
    let out = dir.path().join("out.json");

    fatura(dir.path())
        .arg("process")
        .arg(&input)
        .arg("--output")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Output written to"));

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(out).unwrap()).unwrap();
    assert_eq!(json["tax_amount"], "180.00");
}

#[test]
fn process_reports_validation_and_warnings() {
    let dir = TempDir::new().unwrap();
    init_config(dir.path());
    let input = write_invoice(dir.path(), "eksik.txt", "GENEL TOPLAM 50,00\n");

    fatura(dir.path())
        .arg("process")
        .arg(&input)
        .args(["--validate", "--show-warnings"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Validation issues:"))
        .stderr(predicate::str::contains("Missing invoice number"))
        .stderr(predicate::str::contains("Could not extract buyer name"));
}

#[test]
fn explicit_config_must_exist() {
    let dir = TempDir::new().unwrap();
    let input = write_invoice(dir.path(), "fatura.txt", INVOICE);

    fatura(dir.path())
        .arg("process")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load configuration"));
}

#[test]
fn process_rejects_unsupported_format() {
    let dir = TempDir::new().unwrap();
    init_config(dir.path());
    let input = write_invoice(dir.path(), "fatura.pdf", "%PDF");

    fatura(dir.path())
        .arg("process")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported file format"));
}

#[test]
fn process_missing_input_fails() {
    let dir = TempDir::new().unwrap();
    init_config(dir.path());

    fatura(dir.path())
        .arg("process")
        .arg(dir.path().join("yok.txt"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn process_uses_configured_unit() {
    let dir = TempDir::new().unwrap();
    init_config(dir.path());
    fatura(dir.path())
        .args(["config", "set", "extraction.default_unit", "PCS"])
        .assert()
        .success();
    let input = write_invoice(dir.path(), "fatura.txt", INVOICE);

    let output = fatura(dir.path()).arg("process").arg(&input).output().unwrap();
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["units"][0], "PCS");
}

#[test]
fn config_get_set_round_trip() {
    let dir = TempDir::new().unwrap();
    init_config(dir.path());

    fatura(dir.path())
        .args(["config", "get", "ocr.command"])
        .assert()
        .success()
        .stdout(predicate::str::contains("tesseract"));

    fatura(dir.path())
        .args(["config", "set", "ocr.command", "my-ocr"])
        .assert()
        .success();

    fatura(dir.path())
        .args(["config", "get", "ocr.command"])
        .assert()
        .success()
        .stdout(predicate::str::contains("my-ocr"));

    fatura(dir.path())
        .args(["config", "get", "ocr.missing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration key not found"));
}

#[test]
fn config_init_refuses_to_overwrite() {
    let dir = TempDir::new().unwrap();
    init_config(dir.path());

    fatura(dir.path())
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    fatura(dir.path())
        .args(["config", "init", "--force"])
        .assert()
        .success();
}

#[test]
fn batch_writes_outputs_and_summary() {
    let dir = TempDir::new().unwrap();
    init_config(dir.path());
    let inputs = dir.path().join("in");
    fs::create_dir(&inputs).unwrap();
    write_invoice(&inputs, "a.txt", INVOICE);
    write_invoice(&inputs, "b.txt", "Fatura No: B-2\nGENEL TOPLAM 99,90\n");
    let out = dir.path().join("out");

    fatura(dir.path())
        .arg("batch")
        .arg(format!("{}/*.txt", inputs.display()))
        .arg("--output-dir")
        .arg(&out)
        .args(["--summary", "--jobs", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 successful, 0 failed"));

    assert!(out.join("a.txt.json").exists());
    assert!(out.join("b.txt.json").exists());

    let summary = fs::read_to_string(out.join("summary.csv")).unwrap();
    let mut lines = summary.lines();
    assert!(lines.next().unwrap().starts_with("filename,status,invoice_number"));
    assert!(lines.next().unwrap().starts_with("a.txt,success,ABC2024000000123"));
    assert!(lines.next().unwrap().starts_with("b.txt,success,B-2"));
}

#[test]
fn batch_continues_past_failures_when_asked() {
    let dir = TempDir::new().unwrap();
    init_config(dir.path());
    fatura(dir.path())
        .args(["config", "set", "ocr.command", "fatura-no-such-recognizer"])
        .assert()
        .success();

    let inputs = dir.path().join("in");
    fs::create_dir(&inputs).unwrap();
    write_invoice(&inputs, "a.txt", INVOICE);
    fs::write(inputs.join("scan.png"), [0x89, b'P', b'N', b'G']).unwrap();

    fatura(dir.path())
        .arg("batch")
        .arg(format!("{}/*", inputs.display()))
        .assert()
        .failure();

    fatura(dir.path())
        .arg("batch")
        .arg(format!("{}/*", inputs.display()))
        .arg("--continue-on-error")
        .assert()
        .success()
        .stdout(predicate::str::contains("1 successful, 1 failed"))
        .stdout(predicate::str::contains("scan.png"));
}

#[cfg(unix)]
#[test]
fn batch_keeps_outputs_of_same_stem_apart() {
    let dir = TempDir::new().unwrap();
    init_config(dir.path());
    // `cat` echoes the "image" back as its recognized text
    fatura(dir.path())
        .args(["config", "set", "ocr.command", "cat"])
        .assert()
        .success();
    fatura(dir.path())
        .args(["config", "set", "ocr.args", "[]"])
        .assert()
        .success();

    let inputs = dir.path().join("in");
    fs::create_dir(&inputs).unwrap();
    write_invoice(&inputs, "a.txt", INVOICE);
    write_invoice(&inputs, "a.png", "Fatura No: PNG-7\nGENEL TOPLAM 10,00\n");
    let out = dir.path().join("out");

    fatura(dir.path())
        .arg("batch")
        .arg(format!("{}/*", inputs.display()))
        .arg("--output-dir")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("2 successful, 0 failed"));

    let from_text = fs::read_to_string(out.join("a.txt.json")).unwrap();
    let from_image = fs::read_to_string(out.join("a.png.json")).unwrap();
    assert!(from_text.contains("ABC2024000000123"));
    assert!(from_image.contains("PNG-7"));
}

#[test]
fn batch_without_matches_fails() {
    let dir = TempDir::new().unwrap();
    init_config(dir.path());

    fatura(dir.path())
        .arg("batch")
        .arg(format!("{}/*.txt", dir.path().display()))
        .assert()
        .failure()
        .stderr(predicate::str::contains("No matching files"));
}
