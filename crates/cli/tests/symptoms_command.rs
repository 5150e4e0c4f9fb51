use assert_cmd::Command;
use serde_json::Value;
use tempfile::tempdir;

#[allow(deprecated)]
fn healbuddy() -> Command {
    Command::cargo_bin("healbuddy").expect("binary")
}

fn json_names(output: &[u8]) -> Vec<String> {
    let body: Value = serde_json::from_slice(output).expect("valid json");
    body.as_array()
        .expect("array")
        .iter()
        .map(|s| s["name"].as_str().unwrap().to_string())
        .collect()
}

#[test]
fn lists_builtin_symptoms() {
    let output = healbuddy()
        .args(["symptoms", "--json"])
        .output()
        .expect("command run");
    assert!(output.status.success());
    let names = json_names(&output.stdout);
    assert_eq!(names.len(), 33);
    assert_eq!(names[0], "Fever");
}

#[test]
fn substring_search_is_case_insensitive() {
    let output = healbuddy()
        .args(["symptoms", "--search", "PAIN", "--json"])
        .output()
        .expect("command run");
    let names = json_names(&output.stdout);
    assert_eq!(names, vec!["Chest Pain", "Abdominal Pain", "Joint Pain"]);
}

#[test]
fn fuzzy_search_ranks_close_names() {
    let output = healbuddy()
        .args(["symptoms", "--search", "hedache", "--fuzzy", "--json"])
        .output()
        .expect("command run");
    let names = json_names(&output.stdout);
    assert_eq!(names.first().map(String::as_str), Some("Headache"));
}

#[test]
fn custom_catalog_file() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("tiny.toml");
    std::fs::write(
        &path,
        r#"
schema_version = 1

[[symptoms]]
id = 1
name = "Hiccups"
category = "General"
"#,
    )
    .unwrap();

    healbuddy()
        .arg("--catalog")
        .arg(&path)
        .arg("symptoms")
        .assert()
        .success()
        .stdout(predicates::str::contains("Hiccups (General)"));
}

#[test]
fn missing_catalog_file_fails() {
    let temp = tempdir().unwrap();
    healbuddy()
        .arg("--catalog")
        .arg(temp.path().join("missing.json"))
        .arg("symptoms")
        .assert()
        .failure()
        .stderr(predicates::str::contains("Failed to load catalog"));
}
