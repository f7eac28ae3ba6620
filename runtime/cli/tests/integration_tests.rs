use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

fn lazylex_cli() -> Command {
    cargo_bin_cmd!("lazylex-cli")
}

#[test]
fn cli_help() {
    lazylex_cli()
        .arg("-h")
        .assert()
        .success()
        .stdout(predicate::str::contains("lazylex"))
        .stdout(predicate::str::contains("USAGE:"));
}

#[test]
fn cli_tokenize_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{{\"name\": [1, 2.5e1]}}").unwrap();

    lazylex_cli()
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Symbol({) @ 1:1"))
        .stdout(predicate::str::contains("String(\"name\") @ 1:2"))
        .stdout(predicate::str::contains("FloatNumber(25) @ 1:14"))
        .stdout(predicate::str::contains("Terminal @ 2:1"));
}

#[test]
fn cli_eval_inline_source() {
    lazylex_cli()
        .args(["-e", "x 15e+10"])
        .assert()
        .success()
        .stdout("Id(\"x\") @ 1:1\nFloatNumber(150000000000) @ 1:3\nTerminal @ 1:9\n");
}

#[test]
fn cli_reads_stdin() {
    lazylex_cli()
        .write_stdin("[true]")
        .assert()
        .success()
        .stdout(predicate::str::contains("Id(\"true\") @ 1:2"));
}

#[test]
fn cli_empty_stdin() {
    lazylex_cli()
        .write_stdin("")
        .assert()
        .success()
        .stdout("Terminal @ 1:1\n");
}

#[test]
fn cli_unknown_character_exit_code() {
    lazylex_cli()
        .args(["-e", "[1 # 2]"])
        .assert()
        .code(3)
        .stdout(predicate::str::contains("UnknownCharacterError('#') @ 1:4"))
        .stdout(predicate::str::contains("Terminal @ 1:8"))
        .stderr(predicate::str::contains("Lexical error at line 1, column 4"))
        .stderr(predicate::str::contains("^"));
}

#[test]
fn cli_json_output() {
    let assert = lazylex_cli()
        .args(["-o", "json", "-e", "{\"a\": 1}"])
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();

    assert_eq!(parsed["type"], "tokenize");
    assert_eq!(parsed["success"], true);
    assert_eq!(parsed["summary"]["total"], 6);
    assert_eq!(parsed["tokens"][3]["kind"], "float_number");
    assert_eq!(parsed["tokens"][3]["location"]["column"], 7);
}

#[test]
fn cli_json_output_with_errors() {
    lazylex_cli()
        .args(["--output", "json", "-e", "%"])
        .assert()
        .code(3)
        .stdout(predicate::str::contains("\"success\":false"))
        .stdout(predicate::str::contains("Unknown character '%'"))
        .stderr(predicate::str::contains("Lexical error").not());
}

#[test]
fn cli_jsonl_output() {
    let assert = lazylex_cli()
        .args(["-o", "jsonl", "-e", "a b"])
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();

    assert_eq!(lines.len(), 4);
    assert!(lines[0].contains("\"value\":\"a\""));
    assert!(lines[2].contains("\"kind\":\"terminal\""));
    assert!(lines[3].contains("\"type\":\"summary\""));
    assert!(lines[3].contains("\"total\":3"));
}

#[test]
fn cli_invalid_output_mode() {
    lazylex_cli()
        .args(["-o", "yaml", "-e", "x"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("text, json, jsonl"));
}

#[test]
fn cli_error_file_not_found() {
    lazylex_cli()
        .arg("/nonexistent/input.json")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error reading file"));
}

#[test]
fn cli_unknown_option() {
    lazylex_cli()
        .arg("--frobnicate")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unknown option: --frobnicate"));
}

#[test]
fn cli_verbose_logs_to_stderr() {
    lazylex_cli()
        .args(["-vv", "-e", "x"])
        .env_remove("LAZYLEX_LOG")
        .assert()
        .success()
        .stdout("Id(\"x\") @ 1:1\nTerminal @ 1:2\n")
        .stderr(predicate::str::contains("tokenizing"));
}

#[test]
fn cli_quiet_by_default() {
    lazylex_cli()
        .args(["-e", "x"])
        .env_remove("LAZYLEX_LOG")
        .assert()
        .success()
        .stderr(predicate::str::is_empty());
}

#[test]
fn cli_log_level_from_environment() {
    lazylex_cli()
        .args(["-e", "x"])
        .env("LAZYLEX_LOG", "info")
        .assert()
        .success()
        .stderr(predicate::str::contains("tokenizing"));
}

#[test]
#[cfg(not(feature = "profile"))]
fn cli_profile_without_feature_warns() {
    lazylex_cli()
        .args(["-p", "-e", "x"])
        .env_remove("LAZYLEX_LOG")
        .assert()
        .success()
        .stdout("Id(\"x\") @ 1:1\nTerminal @ 1:2\n")
        .stderr(predicate::str::contains("without the profile feature"));
}

#[test]
fn cli_json_overflowing_number() {
    lazylex_cli()
        .args(["-o", "json", "-e", "1e999"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"value\":\"inf\""));
}
