use std::io::Write;
use std::process::{Command, Output};

mod common;

fn fuzzstep(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_fuzzstep"))
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .unwrap()
}

fn stdout_lines(output: &Output) -> Vec<String> {
    assert!(
        output.status.success(),
        "fuzzstep failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::to_string)
        .collect()
}

fn config_file(json: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_hash_prints_signature_and_path() {
    let path = common::sample_file_path(common::FOX_AND_CROW);
    let lines = stdout_lines(&fuzzstep(&["hash", path.to_str().unwrap()]));
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with(common::FOX_AND_CROW_SIG));
}

#[test]
fn test_matrix_lists_every_pair() {
    let lines = stdout_lines(&fuzzstep(&["matrix", "3:abc:de", "3:abd:de", "6:abc:de"]));
    assert_eq!(lines, vec!["0 1 0", "0 2 -", "1 2 -"]);
}

#[test]
fn test_matrix_honours_max_pairs() {
    let config = config_file(r#"{"similarity":{"max_pairs":1}}"#);
    let lines = stdout_lines(&fuzzstep(&[
        "--config",
        config.path().to_str().unwrap(),
        "matrix",
        "3:abc:de",
        "3:abd:de",
        "6:abc:de",
    ]));
    assert_eq!(lines, vec!["0 1 0"]);
}

#[test]
fn test_search_ranks_candidates() {
    let args = [
        "search",
        "3:abcdef:xyz",
        "3:abcdeQ:xyQ",
        "6:abcdef:xyz",
        "3:QQQQQQ:QQQQQQQ",
        "3:abcdef:xyz",
    ];
    let lines = stdout_lines(&fuzzstep(&args));
    assert_eq!(lines, vec!["0  3:abcdef:xyz", "1  3:abcdeQ:xyQ"]);
}

#[test]
fn test_search_honours_similarity_config() {
    let config = config_file(r#"{"similarity":{"top_k":1,"max_distance":0}}"#);
    let lines = stdout_lines(&fuzzstep(&[
        "--config",
        config.path().to_str().unwrap(),
        "search",
        "3:abcdef:xyz",
        "3:abcdeQ:xyQ",
        "3:abcdef:xyz",
        "3:abcdef:xyz",
    ]));
    assert_eq!(lines, vec!["0  3:abcdef:xyz"]);

    let config = config_file(r#"{"similarity":{"max_distance":0}}"#);
    let lines = stdout_lines(&fuzzstep(&[
        "--config",
        config.path().to_str().unwrap(),
        "search",
        "3:abcdef:xyz",
        "3:abcdeQ:xyQ",
    ]));
    assert!(lines.is_empty());
}

#[test]
fn test_algos_lists_registered_names() {
    let lines = stdout_lines(&fuzzstep(&["algos"]));
    assert_eq!(lines, vec!["ctph"]);
}

#[test]
fn test_unknown_algo_names_alternatives() {
    let dir = tempfile::tempdir().unwrap();
    let state = dir.path().join("state.json");
    let output = fuzzstep(&[
        "init",
        "--length",
        "10",
        "--state",
        state.to_str().unwrap(),
        "--algo",
        "random",
    ]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("available algorithms: ctph"), "{stderr}");
    assert!(stderr.contains("Algorithm not registered: random"), "{stderr}");
    assert!(!state.exists());
}

#[test]
fn test_init_and_step_through_state_file() {
    let dir = tempfile::tempdir().unwrap();
    let state = dir.path().join("state.json");
    let state_arg = state.to_str().unwrap();

    stdout_lines(&fuzzstep(&["init", "--length", "1", "--state", state_arg]));
    stdout_lines(&fuzzstep(&["step", "--state", state_arg, "--byte", "97"]));
    let lines = stdout_lines(&fuzzstep(&["step", "--state", state_arg, "--byte", "0"]));
    assert_eq!(lines, vec!["3:E:E"]);
}
