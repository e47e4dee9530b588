use assert_cmd::cargo::cargo_bin_cmd;
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Output;
use tempfile::TempDir;

fn run(config_home: &Path, args: &[&str]) -> Output {
    cargo_bin_cmd!("threadle")
        .env("XDG_CONFIG_HOME", config_home)
        .env_remove("THREADLE_API_TOKEN")
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("run command")
}

fn run_json(config_home: &Path, args: &[&str]) -> Value {
    let mut full = vec!["--json"];
    full.extend_from_slice(args);
    let output = run(config_home, &full);
    assert!(output.status.success(), "command failed: {:?}", output);
    serde_json::from_slice(&output.stdout).expect("parse json")
}

fn write_pages(dir: &Path, pages: Value) -> PathBuf {
    let path = dir.join("pages.json");
    fs::write(&path, serde_json::to_vec_pretty(&pages).expect("encode")).expect("write pages");
    path
}

fn conversation(id: u64, identifier: &str) -> Value {
    json!({
        "id": id,
        "meta": {"channel": "Channel::Whatsapp", "sender": {"identifier": identifier}},
    })
}

#[test]
fn search_reports_match_and_unresolved_target() {
    let temp = TempDir::new().expect("temp dir");
    let pages = write_pages(
        temp.path(),
        json!([
            [
                conversation(1, "5491165442102@messaging.net"),
                conversation(2, "5491100001111@messaging.net")
            ],
            [conversation(3, "5491122223333@messaging.net")],
            [conversation(4, "5491144445555@messaging.net")]
        ]),
    );

    let report = run_json(
        temp.path(),
        &[
            "search",
            "--pages-file",
            pages.to_str().expect("pages path"),
            "--page-size",
            "2",
            "5491165442102",
            "+54 9 11 9999-0000",
        ],
    );

    let matches = report["matches"].as_array().expect("matches");
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0]["id"], "1");
    assert_eq!(matches[0]["tier"], "exact");
    assert_eq!(matches[0]["record"]["best_phone"], "5491165442102");
    assert_eq!(report["unresolved"], json!(["5491199990000"]));
    assert_eq!(report["pages_fetched"], 2);
    assert_eq!(report["stop_reason"]["kind"], "short_page");
    assert_eq!(report["partial"], false);
}

#[test]
fn search_with_only_invalid_targets_returns_empty_result() {
    let temp = TempDir::new().expect("temp dir");
    let pages = write_pages(temp.path(), json!([[conversation(1, "5491165442102")]]));

    let report = run_json(
        temp.path(),
        &["search", "--pages-file", pages.to_str().expect("pages path"), "123", "abc"],
    );

    assert_eq!(report["matches"], json!([]));
    assert_eq!(report["unresolved"], json!([]));
    assert_eq!(report["stop_reason"]["kind"], "no_targets");
}

#[test]
fn search_text_output_lists_unresolved() {
    let temp = TempDir::new().expect("temp dir");
    let pages = write_pages(temp.path(), json!([[conversation(1, "WAID:5491165442102")]]));

    let output = run(
        temp.path(),
        &[
            "search",
            "--pages-file",
            pages.to_str().expect("pages path"),
            "5491165442102",
            "5491199990000",
        ],
    );
    assert!(output.status.success(), "command failed: {:?}", output);
    let stdout = String::from_utf8(output.stdout).expect("utf8");
    assert!(stdout.contains("Matched 1 of 2 targets"));
    assert!(stdout.contains("5491165442102 -> conversation 1 (exact"));
    assert!(stdout.contains("Unresolved:\n- 5491199990000"));
}

#[test]
fn search_without_source_settings_is_invalid_input() {
    let temp = TempDir::new().expect("temp dir");
    let output = run(temp.path(), &["search", "5491165442102"]);
    assert_eq!(output.status.code(), Some(3));
    let stderr = String::from_utf8(output.stderr).expect("utf8");
    assert!(stderr.contains("connect conversation source"));
}

#[test]
fn search_rejects_out_of_range_page_size() {
    let temp = TempDir::new().expect("temp dir");
    let pages = write_pages(temp.path(), json!([]));
    let output = run(
        temp.path(),
        &[
            "search",
            "--pages-file",
            pages.to_str().expect("pages path"),
            "--page-size",
            "0",
            "5491165442102",
        ],
    );
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn normalize_prints_canonical_digits() {
    let temp = TempDir::new().expect("temp dir");
    let report = run_json(
        temp.path(),
        &["normalize", "WAID:+5491112345678", "5491112345678@messaging.net", "12345"],
    );
    assert_eq!(
        report,
        json!([
            {"input": "WAID:+5491112345678", "normalized": "5491112345678"},
            {"input": "5491112345678@messaging.net", "normalized": "5491112345678"},
            {"input": "12345", "normalized": null}
        ])
    );
}

#[test]
fn inspect_shows_derived_attributes() {
    let temp = TempDir::new().expect("temp dir");
    let pages = write_pages(
        temp.path(),
        json!([
            {"id": 1, "meta": {"channel": "Channel::Email"}, "contact": {"phone_number": "+1 415 555 1212"}},
            conversation(2, "5491165442102@messaging.net")
        ]),
    );

    let items = run_json(
        temp.path(),
        &["inspect", "--pages-file", pages.to_str().expect("pages path")],
    );
    let items = items.as_array().expect("array");
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["best_phone"], "14155551212");
    assert_eq!(items[0]["channel_accepted"], false);
    assert_eq!(items[1]["best_identifier"], "5491165442102@messaging.net");
    assert_eq!(items[1]["channel_accepted"], true);
}
