use assert_cmd::cargo::{self};
use predicates::prelude::*;
use predicates::str::contains;

const PROFILE_SCHEMA: &str = r#"{
    "title": "Profile",
    "type": "object",
    "required": ["firstName"],
    "properties": {
        "firstName": {"type": "string", "title": "First name"},
        "tags": {"type": "array", "items": {"type": "string"}},
        "subscribed": {"type": "boolean", "default": false}
    }
}"#;

#[test]
fn submits_inline_schema_with_edits() {
    let mut cmd = cargo::cargo_bin_cmd!("schemaform");
    cmd.args([
        "--schema",
        PROFILE_SCHEMA,
        "--data",
        r#"{"tags": ["a", "b"]}"#,
        "--set",
        "/firstName=John",
        "--toggle",
        "/subscribed",
        "--add",
        "/tags",
        "--move",
        "/tags/2:up",
        "--no-pretty",
    ])
    .assert()
    .success()
    .stdout(contains(
        r#"{"tags":["a","","b"],"subscribed":true,"firstName":"John"}"#,
    ));
}

#[test]
fn rejects_missing_required_field() {
    let mut cmd = cargo::cargo_bin_cmd!("schemaform");
    cmd.args(["--schema", PROFILE_SCHEMA, "--data", "{}"])
        .assert()
        .failure()
        .stdout(contains("firstName").not())
        .stderr(contains("form submission rejected with 1 error(s)"))
        .stderr(contains("/firstName"));
}

#[test]
fn preview_shows_inline_errors() {
    let mut cmd = cargo::cargo_bin_cmd!("schemaform");
    cmd.args(["--schema", PROFILE_SCHEMA, "--preview"])
        .assert()
        .failure()
        .stdout(contains("Profile"))
        .stdout(contains("First name *"))
        .stdout(contains("[+ Add]"))
        .stdout(contains("1 error(s)"));
}

#[test]
fn reports_unparseable_schema() {
    let mut cmd = cargo::cargo_bin_cmd!("schemaform");
    cmd.args(["--schema", "{not json"])
        .assert()
        .failure()
        .stderr(contains("failed to parse inline schema"));
}

#[test]
fn rejects_malformed_move() {
    let mut cmd = cargo::cargo_bin_cmd!("schemaform");
    cmd.args([
        "--schema",
        PROFILE_SCHEMA,
        "--data",
        r#"{"firstName": "Ann", "tags": ["a"]}"#,
        "--move",
        "/tags/0:left",
    ])
    .assert()
    .failure()
    .stderr(contains("expected up or down"));
}

#[test]
fn prints_machine_readable_errors() {
    let mut cmd = cargo::cargo_bin_cmd!("schemaform");
    cmd.args(["--schema", PROFILE_SCHEMA, "--errors-json", "--no-defaults"])
        .assert()
        .failure()
        .stdout(contains(r#""path": "/firstName""#))
        .stdout(contains(r#""kind": "required""#));
}

const YEARS_SCHEMA: &str = r#"{
    "type": "object",
    "properties": {
        "2024": {"type": "array", "items": {"type": "string"}}
    }
}"#;

#[test]
fn removes_items_under_numeric_property_keys() {
    let mut cmd = cargo::cargo_bin_cmd!("schemaform");
    cmd.args([
        "--schema",
        YEARS_SCHEMA,
        "--data",
        r#"{"2024": ["a", "b"]}"#,
        "--remove",
        "/2024/0",
        "--move",
        "/2024/0:down",
        "--no-pretty",
    ])
    .assert()
    .success()
    .stdout(contains(r#"{"2024":["a"]}"#));
}

#[test]
fn edits_past_the_end_of_an_array_fail_cleanly() {
    let mut cmd = cargo::cargo_bin_cmd!("schemaform");
    cmd.args([
        "--schema",
        YEARS_SCHEMA,
        "--data",
        r#"{"2024": ["a"]}"#,
        "--set",
        "/2024/4000000000=x",
    ])
    .assert()
    .failure()
    .stderr(contains("item 4000000000 does not exist"));
}

#[test]
fn moving_the_largest_index_is_a_noop() {
    let mut cmd = cargo::cargo_bin_cmd!("schemaform");
    cmd.args([
        "--schema",
        YEARS_SCHEMA,
        "--data",
        r#"{"2024": ["a", "b"]}"#,
        "--move",
        "/2024/18446744073709551615:down",
        "--no-pretty",
    ])
    .assert()
    .success()
    .stdout(contains(r#"{"2024":["a","b"]}"#));
}
