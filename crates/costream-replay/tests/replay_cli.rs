//! Runs the `replay`, `show` and `reset` commands against a temp state dir.

use std::path::Path;

use clap::Parser;
use costream_replay::{Cli, ReplayError, run};
use pretty_assertions::assert_eq;
use serde_json::Value;

const CONFIG: &str = r#"
default_layout = "seed"

[window]
width = 1000
height = 800
orientation = "landscape"
"#;

const SCRIPT: &str = r#"
# move panel 2, then grow panel 3
{"op":"drag","panel":"2","phase":"start"}
{"op":"drag","panel":"2","phase":"end","dx":50,"dy":-20}
{"op":"pointer","panel":"3","kind":"down","x":100,"y":100}
{"op":"pointer","kind":"up","x":150,"y":180}
"#;

fn cli(args: &[&str]) -> Cli {
    Cli::parse_from(std::iter::once("costream-replay").chain(args.iter().copied()))
}

fn replay(dir: &Path, script: &str, extra: &[&str]) -> Result<Value, ReplayError> {
    let script_path = dir.join("script.jsonl");
    std::fs::write(&script_path, script).unwrap();
    let config_path = dir.join("board.toml");
    std::fs::write(&config_path, CONFIG).unwrap();
    let out = dir.join("out").join("summary.json");

    let mut args = vec![
        "replay",
        "--script",
        script_path.to_str().unwrap(),
        "--state-dir",
        dir.join("state").to_str().unwrap(),
        "--config",
        config_path.to_str().unwrap(),
        "--output-json",
        out.to_str().unwrap(),
    ]
    .into_iter()
    .map(str::to_owned)
    .collect::<Vec<_>>();
    args.extend(extra.iter().map(|s| (*s).to_owned()));
    let refs: Vec<&str> = args.iter().map(String::as_str).collect();

    run(cli(&refs))?;
    Ok(serde_json::from_str(&std::fs::read_to_string(out).unwrap()).unwrap())
}

fn rects(summary: &Value) -> Vec<[i64; 4]> {
    summary["panels"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| {
            [
                p["x"].as_i64().unwrap(),
                p["y"].as_i64().unwrap(),
                p["width"].as_i64().unwrap(),
                p["height"].as_i64().unwrap(),
            ]
        })
        .collect()
}

#[test]
fn second_run_boots_from_stored_layout() {
    let dir = tempfile::tempdir().unwrap();

    let first = replay(dir.path(), SCRIPT, &[]).unwrap();
    assert_eq!(first["load_source"], "missing");
    assert_eq!(first["commits"], 2);
    assert_eq!(
        rects(&first),
        vec![[0, 0, 200, 200], [50, 0, 200, 200], [0, 0, 250, 280]]
    );
    assert!(dir.path().join("state").join("costream-layout.json").exists());

    let second = replay(dir.path(), "{\"op\":\"add_panel\"}\n", &[]).unwrap();
    assert_eq!(second["load_source"], "stored");
    assert_eq!(second["panels"][3]["id"], "4");
    assert_eq!(rects(&second)[..3].to_vec(), rects(&first));
}

#[test]
fn strict_replay_fails_with_step_line() {
    let dir = tempfile::tempdir().unwrap();
    let err = replay(
        dir.path(),
        "{\"op\":\"add_panel\"}\n{\"op\":\"detach\",\"panel\":\"1\"}\n{\"op\":\"drag\",\"panel\":\"9\",\"phase\":\"start\"}\n",
        &["--strict"],
    )
    .unwrap_err();
    assert!(matches!(err, ReplayError::StepRejected { step: 3, .. }));
    assert_eq!(err.exit_code(), 3);
}

#[test]
fn malformed_script_is_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = replay(dir.path(), "{\"op\":\"drag\"}\n", &[]).unwrap_err();
    assert!(matches!(err, ReplayError::ScriptParse { line: 1, .. }));
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn reset_removes_stored_layout() {
    let dir = tempfile::tempdir().unwrap();
    replay(dir.path(), SCRIPT, &[]).unwrap();
    let stored = dir.path().join("state").join("costream-layout.json");
    assert!(stored.exists());

    let state_dir = dir.path().join("state");
    run(cli(&["reset", "--state-dir", state_dir.to_str().unwrap()])).unwrap();
    assert!(!stored.exists());

    run(cli(&["show", "--state-dir", state_dir.to_str().unwrap()])).unwrap();
}

#[test]
fn corrupt_state_falls_back_and_is_repaired() {
    let dir = tempfile::tempdir().unwrap();
    let state = dir.path().join("state");
    std::fs::create_dir_all(&state).unwrap();
    std::fs::write(state.join("costream-layout.json"), "not json").unwrap();

    let summary = replay(dir.path(), "{\"op\":\"add_panel\"}\n", &[]).unwrap();
    assert_eq!(summary["load_source"], "malformed");

    let repaired = replay(dir.path(), "", &[]).unwrap();
    assert_eq!(repaired["load_source"], "stored");
    assert_eq!(repaired["panels"].as_array().unwrap().len(), 4);
}

#[test]
fn output_json_directory_is_invalid_argument() {
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("script.jsonl");
    std::fs::write(&script, SCRIPT).unwrap();
    let state = dir.path().join("state");

    let err = run(cli(&[
        "replay",
        "--script",
        script.to_str().unwrap(),
        "--state-dir",
        state.to_str().unwrap(),
        "--output-json",
        dir.path().to_str().unwrap(),
    ]))
    .unwrap_err();
    assert!(matches!(err, ReplayError::InvalidArgument { .. }));
    assert_eq!(err.exit_code(), 2);
    assert!(!state.exists());
}
