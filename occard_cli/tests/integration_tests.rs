//! Integration tests for the occard binary.
//!
//! These tests verify end-to-end behavior including:
//! - Card authoring workflow (add, list, search, edit, delete)
//! - Study session lifecycle
//! - Export outputs in all three formats

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Helper to create a test data directory
fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Helper to get the path to the CLI binary
fn cli() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("occard"))
}

/// Write a small fake PNG into the test directory
fn write_test_image(dir: &Path) -> PathBuf {
    let path = dir.join("diagram.png");
    fs::write(&path, b"\x89PNG fake image bytes").expect("Failed to write image");
    path
}

fn add_card(data_dir: &Path, image: &Path, title: &str, tags: &[&str]) {
    let mut cmd = cli();
    cmd.arg("add")
        .arg("--data-dir")
        .arg(data_dir)
        .arg("--title")
        .arg(title)
        .arg("--image")
        .arg(image)
        .arg("--answer")
        .arg("Mitochondria");
    for tag in tags {
        cmd.arg("--tag").arg(tag);
    }
    cmd.assert().success();
}

#[test]
fn test_cli_help() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Image occlusion flashcard manager"));
}

#[test]
fn test_add_creates_card_table() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();
    let image = write_test_image(temp_dir.path());

    cli()
        .arg("add")
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("--title")
        .arg("Cell Biology")
        .arg("--image")
        .arg(&image)
        .assert()
        .success()
        .stdout(predicate::str::contains("Created card 1"));

    let table = fs::read_to_string(data_dir.join("cards.json")).expect("Failed to read table");
    assert!(table.contains("Cell Biology"));
    assert!(table.contains("data:image/png;base64,"));
}

#[test]
fn test_add_rejects_unknown_image_extension() {
    let temp_dir = setup_test_dir();
    let bad = temp_dir.path().join("notes.txt");
    fs::write(&bad, "not an image").unwrap();

    cli()
        .arg("add")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .arg("--title")
        .arg("x")
        .arg("--image")
        .arg(&bad)
        .assert()
        .failure();
}

#[test]
fn test_list_orders_most_recently_updated_first() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();
    let image = write_test_image(temp_dir.path());

    add_card(&data_dir, &image, "First", &[]);
    add_card(&data_dir, &image, "Second", &[]);

    cli()
        .arg("edit")
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("1")
        .arg("--answer")
        .arg("touched")
        .assert()
        .success();

    let output = cli()
        .arg("list")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("2 card(s)"))
        .get_output()
        .stdout
        .clone();

    let text = String::from_utf8(output).unwrap();
    let first_pos = text.find("First").unwrap();
    let second_pos = text.find("Second").unwrap();
    assert!(first_pos < second_pos, "touched card should list first");
}

#[test]
fn test_search_by_tag() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();
    let image = write_test_image(temp_dir.path());

    add_card(&data_dir, &image, "Cell Biology", &["biology"]);
    add_card(&data_dir, &image, "Rome", &["history"]);

    cli()
        .arg("search")
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("bio")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cell Biology"))
        .stdout(predicate::str::contains("1 match(es)"));
}

#[test]
fn test_delete_removes_card() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();
    let image = write_test_image(temp_dir.path());

    add_card(&data_dir, &image, "Ephemeral", &[]);

    cli()
        .arg("delete")
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("1")
        .assert()
        .success();

    cli()
        .arg("show")
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("1")
        .assert()
        .success()
        .stdout(predicate::str::contains("not found"));
}

#[test]
fn test_study_lifecycle() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();
    let image = write_test_image(temp_dir.path());

    add_card(&data_dir, &image, "Cell Biology", &[]);

    cli()
        .arg("study")
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("start")
        .arg("1")
        .assert()
        .success()
        .stdout(predicate::str::contains("Started session 1"));

    cli()
        .arg("study")
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("end")
        .arg("1")
        .arg("--score")
        .arg("85")
        .assert()
        .success();

    cli()
        .arg("study")
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("sessions")
        .arg("1")
        .assert()
        .success()
        .stdout(predicate::str::contains("score 85"))
        .stdout(predicate::str::contains("1 session(s)"));
}

#[test]
fn test_export_json_without_images() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();
    let image = write_test_image(temp_dir.path());
    let output = temp_dir.path().join("export.json");

    add_card(&data_dir, &image, "Cell Biology", &["biology"]);

    cli()
        .arg("export")
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("--format")
        .arg("json")
        .arg("--output")
        .arg(&output)
        .arg("--no-images")
        .assert()
        .success();

    let value: serde_json::Value =
        serde_json::from_slice(&fs::read(&output).unwrap()).expect("Invalid JSON export");
    assert_eq!(value["version"], "1.0");
    assert_eq!(value["cards"][0]["title"], "Cell Biology");
    assert!(value["cards"][0]["imageData"].is_null());
}

#[test]
fn test_export_csv_header() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();
    let image = write_test_image(temp_dir.path());
    let output = temp_dir.path().join("export.csv");

    add_card(&data_dir, &image, "Cell Biology", &["a", "b"]);

    cli()
        .arg("export")
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("--format")
        .arg("csv")
        .arg("--output")
        .arg(&output)
        .assert()
        .success();

    let text = fs::read_to_string(&output).unwrap();
    assert!(text.starts_with("Title,Answer,Tags,Created At,Updated At,Image Data"));
    assert!(text.contains("a;b"));
}

#[test]
fn test_export_anki_archive_is_readable() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();
    let image = write_test_image(temp_dir.path());
    let output = temp_dir.path().join("deck.apkg");

    add_card(&data_dir, &image, "Cell Biology", &[]);

    cli()
        .arg("export")
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("--format")
        .arg("anki")
        .arg("--output")
        .arg(&output)
        .assert()
        .success();

    let file = fs::File::open(&output).unwrap();
    let mut archive = zip::ZipArchive::new(file).expect("Invalid zip archive");
    assert!(archive.by_name("collection.anki2").is_ok());
    assert!(archive.by_name("media/image_1.png").is_ok());
}
