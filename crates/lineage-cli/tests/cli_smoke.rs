use assert_cmd::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

fn repo_root() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .and_then(|p| p.parent())
        .expect("expected crates/<name> layout")
        .to_path_buf()
}

fn fixture_dir() -> PathBuf {
    repo_root().join("fixtures").join("family")
}

#[test]
fn cli_renders_svg_to_file() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let out = tmp.path().join("tree.svg");

    let exe = assert_cmd::cargo_bin!("lineage-cli");
    Command::new(exe)
        .args([
            "render",
            "--data",
            fixture_dir().to_string_lossy().as_ref(),
            "--out",
            out.to_string_lossy().as_ref(),
        ])
        .assert()
        .success();

    let svg = fs::read_to_string(&out).expect("read svg");
    let doc = roxmltree::Document::parse(&svg).expect("svg parses");
    let nodes = doc
        .descendants()
        .filter(|n| n.attribute("data-id").is_some())
        .count();
    assert_eq!(nodes, 8);
}

#[test]
fn cli_prints_layout_json() {
    let exe = assert_cmd::cargo_bin!("lineage-cli");
    let output = Command::new(exe)
        .args([
            "layout",
            "--data",
            fixture_dir().to_string_lossy().as_ref(),
            "--set",
            "layout.missing_generation=auto",
        ])
        .output()
        .expect("run");
    assert!(output.status.success());

    let layout: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(layout["placement"], "curated");
    assert_eq!(layout["persons"].as_array().map(Vec::len), Some(9));
    assert_eq!(layout["auto_generations"], serde_json::json!([4]));
}

#[test]
fn cli_renders_png_smoke() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let out = tmp.path().join("tree.png");

    let exe = assert_cmd::cargo_bin!("lineage-cli");
    Command::new(exe)
        .args([
            "render",
            "--format",
            "png",
            "--scale",
            "0.5",
            "--data",
            fixture_dir().to_string_lossy().as_ref(),
            "--out",
            out.to_string_lossy().as_ref(),
        ])
        .assert()
        .success();

    let bytes = fs::read(&out).expect("read png");
    assert!(
        bytes.starts_with(b"\x89PNG\r\n\x1a\n"),
        "output is not a PNG"
    );
}

#[test]
fn cli_fails_without_dataset() {
    let tmp = tempfile::tempdir().expect("tempdir");

    let exe = assert_cmd::cargo_bin!("lineage-cli");
    let output = Command::new(exe)
        .args(["render", "--data", tmp.path().to_string_lossy().as_ref()])
        .output()
        .expect("run");
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("family_data.json"));
}

#[test]
fn cli_usage_errors_exit_2() {
    let exe = assert_cmd::cargo_bin!("lineage-cli");
    Command::new(exe)
        .args(["render", "--format", "gif"])
        .assert()
        .code(2);
}

#[test]
fn cli_imports_csv_then_renders_it() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let csv = tmp.path().join("family.csv");
    fs::write(
        &csv,
        "PersonID,Generation,Name,PartnerID,FatherID,MotherID,Gender\n\
         1,1,Ivan,2,,,M\n\
         2,1,Maria,1,,,F\n\
         3,2,Anna,,1,2,F\n",
    )
    .expect("write csv");
    let json = tmp.path().join("family_data.json");

    let exe = assert_cmd::cargo_bin!("lineage-cli");
    Command::new(exe)
        .args([
            "import",
            "--csv",
            csv.to_string_lossy().as_ref(),
            "--out",
            json.to_string_lossy().as_ref(),
        ])
        .assert()
        .success();

    let text = fs::read_to_string(&json).expect("read json");
    let persons = lineage::person::parse_dataset(&text).expect("dataset parses");
    assert_eq!(persons.len(), 3);
    assert_eq!(persons[2].parent_key(), ("1".to_string(), "2".to_string()));

    let exe = assert_cmd::cargo_bin!("lineage-cli");
    let output = Command::new(exe)
        .args(["render", "--data", tmp.path().to_string_lossy().as_ref()])
        .output()
        .expect("run");
    assert!(output.status.success());
    let svg = String::from_utf8(output.stdout).expect("utf-8");
    let doc = roxmltree::Document::parse(&svg).expect("svg parses");
    let nodes = doc
        .descendants()
        .filter(|n| n.attribute("data-id").is_some())
        .count();
    assert_eq!(nodes, 3);
}
