//! End-to-end tests of the `pbo` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const SPIN_MODEL: &str = r#"{
    "domain": "spin",
    "objective": [[["a"], -1], [["b"], 2], [["a", "b"], -3], [["b", "c"], -4], [[], -2]]
}"#;

const PICK_ONE: &str = r#"{
    "domain": "binary",
    "objective": [[["x"], -1], [["y"], -1]],
    "constraints": [
        { "relation": "le", "polynomial": [[["x"], 1], [["y"], 1], [[], -1]], "lam": 10 }
    ]
}"#;

const SYMBOLIC_WEIGHT: &str = r#"{
    "domain": "binary",
    "objective": [[["x"], -1], [["y"], -1]],
    "constraints": [
        { "relation": "eq", "polynomial": [[["x"], 1], [["y"], 1], [[], -1]], "lam": "lam" }
    ]
}"#;

const CUBIC: &str = r#"{
    "domain": "binary",
    "objective": [[[0, 1, 2], -2], [[0], 1], [[2], 1]]
}"#;

/// Get the CLI command, run inside `dir` so no stray config is picked up
#[allow(deprecated)]
fn cli(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("pbo").unwrap();
    cmd.current_dir(dir.path());
    cmd
}

fn write_model(dir: &TempDir, name: &str, json: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, json).unwrap();
    path
}

fn run_json(cmd: &mut Command) -> Value {
    let output = cmd.output().expect("Failed to run CLI");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("Invalid JSON output")
}

/// Coefficient of the term with exactly these indices.
fn coefficient(json: &Value, key: &[u64]) -> Option<f64> {
    json["terms"].as_array()?.iter().find_map(|entry| {
        let vars: Vec<u64> = entry[0].as_array()?.iter().filter_map(Value::as_u64).collect();
        (vars == key).then(|| entry[1].as_f64()).flatten()
    })
}

#[test]
fn help_lists_subcommands() {
    let dir = TempDir::new().unwrap();
    cli(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("convert"))
        .stdout(predicate::str::contains("solve"))
        .stdout(predicate::str::contains("--verbose"));
}

#[test]
fn solve_spin_model() {
    let dir = TempDir::new().unwrap();
    let model = write_model(&dir, "spin.json", SPIN_MODEL);
    let json = run_json(cli(&dir).arg("solve").arg(&model));

    assert_eq!(json["domain"], "spin");
    assert_eq!(json["energy"], -10.0);
    assert_eq!(json["variables"], 3);
    let solutions = json["solutions"].as_array().unwrap();
    assert_eq!(solutions.len(), 1);
    assert_eq!(solutions[0]["assignment"], serde_json::json!({ "a": -1, "b": -1, "c": -1 }));
    assert_eq!(solutions[0]["valid"], true);
    assert!(json["diagnostics"].as_array().unwrap().is_empty());
}

#[test]
fn solve_all_drops_slack_bits() {
    let dir = TempDir::new().unwrap();
    let model = write_model(&dir, "pick_one.json", PICK_ONE);
    let json = run_json(cli(&dir).args(["solve", "--all"]).arg(&model));

    assert_eq!(json["energy"], -1.0);
    let solutions = json["solutions"].as_array().unwrap();
    assert_eq!(solutions.len(), 2);
    for sol in solutions {
        assert_eq!(sol["valid"], true);
        let assignment = sol["assignment"].as_object().unwrap();
        assert_eq!(assignment.len(), 2);
        assert!(!assignment.keys().any(|k| k.starts_with("__a")));
    }
}

#[test]
fn weak_penalty_still_reports_feasible_solutions() {
    let dir = TempDir::new().unwrap();
    let model = write_model(&dir, "weak.json", &PICK_ONE.replace("\"lam\": 10", "\"lam\": 0.25"));
    let json = run_json(cli(&dir).args(["solve", "--all"]).arg(&model));

    assert_eq!(json["energy"], -1.0);
    let solutions = json["solutions"].as_array().unwrap();
    assert_eq!(solutions.len(), 2);
    assert!(solutions.iter().all(|sol| sol["valid"] == true));
}

#[test]
fn convert_to_qubo() {
    let dir = TempDir::new().unwrap();
    let model = write_model(&dir, "spin.json", SPIN_MODEL);
    let json = run_json(cli(&dir).arg("convert").arg(&model).args(["--to", "qubo"]));

    assert_eq!(json["form"], "qubo");
    assert_eq!(json["domain"], "binary");
    assert_eq!(json["mapping"], serde_json::json!([["a", 0], ["b", 1], ["c", 2]]));
    assert!(json["ancillas"].as_array().unwrap().is_empty());
    // s = 1 - 2x applied to every spin
    assert_eq!(coefficient(&json, &[]), Some(-8.0));
    assert_eq!(coefficient(&json, &[0]), Some(8.0));
    assert_eq!(coefficient(&json, &[1]), Some(10.0));
    assert_eq!(coefficient(&json, &[2]), Some(8.0));
    assert_eq!(coefficient(&json, &[0, 1]), Some(-12.0));
    assert_eq!(coefficient(&json, &[1, 2]), Some(-16.0));
}

#[test]
fn convert_reports_reduction_ancillas() {
    let dir = TempDir::new().unwrap();
    let model = write_model(&dir, "cubic.json", CUBIC);

    let json = run_json(cli(&dir).arg("convert").arg(&model).args(["--to", "pubo"]));
    assert_eq!(coefficient(&json, &[0, 1, 2]), Some(-2.0));
    assert!(json["ancillas"].as_array().unwrap().is_empty());

    let json = run_json(
        cli(&dir)
            .arg("convert")
            .arg(&model)
            .args(["--to", "pubo", "--degree", "2"]),
    );
    let ancillas = json["ancillas"].as_array().unwrap();
    assert_eq!(ancillas.len(), 1);
    assert_eq!(ancillas[0]["index"], 3);
    assert!(ancillas[0]["origin"].as_str().unwrap().contains('*'));
    assert!(json["terms"]
        .as_array()
        .unwrap()
        .iter()
        .all(|t| t[0].as_array().unwrap().len() <= 2));
}

#[test]
fn unresolved_parameter_needs_a_value() {
    let dir = TempDir::new().unwrap();
    let model = write_model(&dir, "symbolic.json", SYMBOLIC_WEIGHT);

    cli(&dir)
        .arg("solve")
        .arg(&model)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unresolved parameters: lam"));

    let json = run_json(cli(&dir).arg("solve").arg(&model).args(["--set", "lam=10"]));
    assert_eq!(json["energy"], -1.0);
    assert_eq!(json["solutions"][0]["valid"], true);
}

#[test]
fn unsatisfiable_constraint_is_diagnosed() {
    let dir = TempDir::new().unwrap();
    let model = write_model(
        &dir,
        "never.json",
        r#"{
            "domain": "binary",
            "objective": [[["x"], 1]],
            "constraints": [{ "relation": "le", "polynomial": [[["x"], 1], [[], 1]] }]
        }"#,
    );
    let json = run_json(cli(&dir).arg("solve").arg(&model));
    let diagnostics = json["diagnostics"].as_array().unwrap();
    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics[0].as_str().unwrap().contains("never satisfiable"));
    assert_eq!(json["solutions"][0]["valid"], false);
}

#[test]
fn malformed_documents_fail() {
    let dir = TempDir::new().unwrap();
    let model = write_model(&dir, "bad.json", r#"{ "domain": "spin", "objective": [[0, 1]] }"#);
    cli(&dir)
        .arg("solve")
        .arg(&model)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid term key"));

    cli(&dir)
        .args(["solve", "missing.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("reading"));
}

#[test]
fn config_limits_brute_force() {
    let dir = TempDir::new().unwrap();
    let model = write_model(&dir, "spin.json", SPIN_MODEL);
    let config = dir.path().join("small.toml");
    fs::write(&config, "max_bruteforce_variables = 2\n").unwrap();

    cli(&dir)
        .arg("solve")
        .arg(&model)
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("configured limit of 2"));
}

#[test]
fn config_supplies_default_weight() {
    let dir = TempDir::new().unwrap();
    let model = write_model(
        &dir,
        "weightless.json",
        r#"{
            "domain": "binary",
            "objective": [],
            "constraints": [{ "relation": "eq", "polynomial": [[["x"], 1], [[], -1]] }]
        }"#,
    );
    fs::write(dir.path().join("pbo_config.toml"), "lam = 3.0\n").unwrap();

    // 3 * (x - 1)^2 = 3 - 3x
    let json = run_json(cli(&dir).arg("convert").arg(&model).args(["--to", "pubo"]));
    assert_eq!(coefficient(&json, &[]), Some(3.0));
    assert_eq!(coefficient(&json, &[0]), Some(-3.0));
}

#[test]
fn init_config_writes_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("written.toml");
    cli(&dir)
        .arg("init-config")
        .arg("--config")
        .arg(&path)
        .assert()
        .success();
    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains("lam = 1.0"));
    assert!(content.contains("log_trick = true"));
}
