use assert_cmd::Command;
use predicates::str::contains;

#[test]
fn quits_cleanly_from_the_prompt() {
    Command::cargo_bin("hearts")
        .unwrap()
        .args(["--seed", "7", "--difficulty", "easy", "--log-level", "warn"])
        .write_stdin("help\nquit\n")
        .assert()
        .success()
        .stdout(contains("Round 1"))
        .stdout(contains("Choose three cards to pass left."))
        .stdout(contains("save <file>"));
}

#[test]
fn saves_a_session_that_resumes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("game.json");
    let path_arg = path.to_str().unwrap();

    Command::cargo_bin("hearts")
        .unwrap()
        .args(["--seed", "3", "--difficulty", "medium", "--log-level", "warn"])
        .write_stdin(format!("save {path_arg}\nquit\n"))
        .assert()
        .success()
        .stdout(contains("Saved to"));

    Command::cargo_bin("hearts")
        .unwrap()
        .args(["--resume", path_arg, "--log-level", "warn"])
        .write_stdin("quit\n")
        .assert()
        .success()
        .stdout(contains("Round 1"));
}

#[test]
fn unknown_difficulty_is_rejected() {
    Command::cargo_bin("hearts")
        .unwrap()
        .args(["--difficulty", "expert"])
        .assert()
        .failure();
}

#[test]
fn reports_the_workspace_version() {
    Command::cargo_bin("hearts")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(contains("hearts 1.0.1"));
}
