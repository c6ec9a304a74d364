//! CLI Integration Tests
//!
//! Runs the xlcp binary against order workbooks built in a temporary directory.

#![cfg(not(coverage))]
#![allow(deprecated)] // Command::cargo_bin deprecation - no stable replacement yet

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// ═══════════════════════════════════════════════════════════════════════════
// HELPERS
// ═══════════════════════════════════════════════════════════════════════════

fn xlcp() -> Command {
    let mut cmd = Command::cargo_bin("xlcp").unwrap();
    cmd.env_remove("XLCP_FORCE_OVERWRITE")
        .env_remove("XLCP_HEADER_POSITION")
        .env("NO_COLOR", "1");
    cmd
}

fn blank_book(path: &Path) {
    let book = umya_spreadsheet::new_file();
    umya_spreadsheet::writer::xlsx::write(&book, path).unwrap();
}

/// Source `in/src.xlsx` with a 2 x 2 block on "Data", plus an order workbook
/// copying it twice, once through a malformed range.
fn setup(dir: &TempDir) -> PathBuf {
    let root = dir.path();
    fs::create_dir(root.join("in")).unwrap();
    fs::create_dir(root.join("out")).unwrap();
    blank_book(&root.join("template.xlsx"));

    let mut source = umya_spreadsheet::new_file();
    let data = source.new_sheet("Data").unwrap();
    data.get_cell_mut((1, 1)).set_value_number(1);
    data.get_cell_mut((2, 1)).set_value_number(2);
    data.get_cell_mut((1, 2)).set_value_number(3);
    data.get_cell_mut((2, 2)).set_value_number(4);
    umya_spreadsheet::writer::xlsx::write(&source, root.join("in").join("src.xlsx")).unwrap();

    let mut order = umya_spreadsheet::new_file();
    let sheet = order.get_sheet_by_name_mut("Sheet1").unwrap();
    sheet
        .get_cell_mut((2, 1))
        .set_value_string(root.join("template.xlsx").display().to_string());
    sheet
        .get_cell_mut((2, 2))
        .set_value_string(root.join("in").display().to_string());
    sheet
        .get_cell_mut((2, 3))
        .set_value_string(root.join("out").display().to_string());
    let rows = [
        ["Block", "src.xlsx", "Data", "A1:", "out.xlsx", "Result", "B2:"],
        ["", "src.xlsx", "Data", "A1", "out.xlsx", "Result", ""],
    ];
    for (i, row) in rows.iter().enumerate() {
        for (j, text) in row.iter().enumerate() {
            if !text.is_empty() {
                sheet
                    .get_cell_mut((j as u32 + 1, i as u32 + 6))
                    .set_value_string(*text);
            }
        }
    }
    let order_file = root.join("orders.xlsx");
    umya_spreadsheet::writer::xlsx::write(&order, &order_file).unwrap();
    order_file
}

// ═══════════════════════════════════════════════════════════════════════════
// HELP AND VERSION TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_cli_help() {
    xlcp()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("xlcp"))
        .stdout(predicate::str::contains("--header-position"))
        .stdout(predicate::str::contains("--force-overwrite"));
}

#[test]
fn test_cli_version() {
    xlcp()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("xlcp"));
}

// ═══════════════════════════════════════════════════════════════════════════
// ARGUMENT ERRORS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_cli_requires_order_file() {
    xlcp().assert().failure().code(2);
}

#[test]
fn test_cli_rejects_bad_header_position() {
    xlcp()
        .args(["orders.xlsx", "--header-position", "(top,bottom)"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("header-position"));
}

#[test]
fn test_cli_missing_order_file() {
    let dir = TempDir::new().unwrap();
    xlcp()
        .arg(dir.path().join("missing.xlsx"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing.xlsx"));
}

// ═══════════════════════════════════════════════════════════════════════════
// RUNS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_cli_copies_and_reports_rejected_rows() {
    let dir = TempDir::new().unwrap();
    let order_file = setup(&dir);

    xlcp()
        .arg(&order_file)
        .arg("-f")
        .assert()
        .success()
        .stdout(predicate::str::contains("Order Sheet1"))
        .stdout(predicate::str::contains("row 7"))
        .stdout(predicate::str::contains("1 block(s) copied, 1 not copied"));

    let book = umya_spreadsheet::reader::xlsx::read(dir.path().join("out").join("out.xlsx"))
        .unwrap();
    let sheet = book.get_sheet_by_name("Result").unwrap();
    assert_eq!(sheet.get_value("B1"), "Block");
    assert_eq!(sheet.get_value("C3"), "4");
}

#[test]
fn test_cli_header_position_and_transpose() {
    let dir = TempDir::new().unwrap();
    let order_file = setup(&dir);

    xlcp()
        .arg(&order_file)
        .args(["--transpose", "--header-position", "(left,top)"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Transposing every block"));

    let book = umya_spreadsheet::reader::xlsx::read(dir.path().join("out").join("out.xlsx"))
        .unwrap();
    let sheet = book.get_sheet_by_name("Result").unwrap();
    assert_eq!(sheet.get_value("A2"), "Block");
    assert_eq!(sheet.get_value("C2"), "3");
    assert_eq!(sheet.get_value("B3"), "2");
}

#[test]
fn test_cli_verbose_prints_order_table() {
    let dir = TempDir::new().unwrap();
    let order_file = setup(&dir);

    xlcp()
        .arg(&order_file)
        .arg("--verbose")
        .assert()
        .success()
        .stdout(predicate::str::contains("destination : out.xlsx [Result] B2:"));
}
