use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

const PASSWORD: &str = "test-password-123";

fn bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_ejournal"))
}

struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        Self {
            dir: TempDir::new().expect("temp dir"),
        }
    }

    fn config_path(&self) -> PathBuf {
        self.dir.path().join("config").join("config.toml")
    }

    fn journal_dir(&self) -> PathBuf {
        self.dir.path().join("journal")
    }

    fn command(&self, password: &str) -> Command {
        let mut cmd = Command::new(bin());
        cmd.env("EJOURNAL_CONFIG", self.config_path())
            .env("EJOURNAL_PASSWORD", password)
            .env_remove("EJOURNAL_NEW_PASSWORD")
            .env("HOME", self.dir.path())
            .stdin(Stdio::null());
        cmd
    }

    fn run(&self, args: &[&str]) -> Output {
        self.command(PASSWORD).args(args).output().expect("run ejournal")
    }

    fn init(&self) {
        let journal_dir = self.journal_dir();
        let output = self.run(&[
            "init",
            "--directory",
            journal_dir.to_str().unwrap(),
            "--work-factor",
            "4",
        ]);
        assert_success(&output);
    }
}

fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "stdout: {}\nstderr: {}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn exists(path: &Path) -> bool {
    path.try_exists().unwrap()
}

#[test]
fn test_init_write_show_list() {
    let sandbox = Sandbox::new();
    sandbox.init();
    assert!(exists(&sandbox.config_path()));
    assert!(exists(&sandbox.journal_dir().join("index.cpt")));

    let output = sandbox.run(&[
        "write",
        "--body",
        "First entry",
        "--id",
        "first",
        "--tag",
        "daily",
        "--date",
        "2024-03-01",
    ]);
    assert_success(&output);
    assert!(stdout(&output).contains("first"));

    let output = sandbox.run(&["show", "first", "--json"]);
    assert_success(&output);
    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(value["body"], "First entry");
    assert_eq!(value["date"], "2024-03-01T00:00:00Z");
    assert_eq!(value["tags"][0], "daily");

    let output = sandbox.run(&["list", "--json"]);
    assert_success(&output);
    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(value.as_array().unwrap().len(), 1);
    assert_eq!(value[0]["id"], "first");
}

#[test]
fn test_write_from_stdin() {
    let sandbox = Sandbox::new();
    sandbox.init();

    let mut child = sandbox
        .command(PASSWORD)
        .args(["write", "--stdin", "--id", "piped"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"from a pipe\n")
        .unwrap();
    assert_success(&child.wait_with_output().unwrap());

    let output = sandbox.run(&["show", "piped", "--quiet"]);
    assert_success(&output);
    assert_eq!(stdout(&output).trim(), "from a pipe");
}

#[test]
fn test_list_count_is_newest_first() {
    let sandbox = Sandbox::new();
    sandbox.init();
    for (id, date) in [("a", "2024-01-01"), ("b", "2024-01-03"), ("c", "2024-01-02")] {
        assert_success(&sandbox.run(&["write", "--body", id, "--id", id, "--date", date]));
    }

    let output = sandbox.run(&["list", "--count", "2", "--json"]);
    assert_success(&output);
    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let ids: Vec<&str> = value
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["b", "c"]);
}

#[test]
fn test_wrong_password_exit_code() {
    let sandbox = Sandbox::new();
    sandbox.init();
    assert_success(&sandbox.run(&["write", "--body", "secret", "--id", "s"]));

    let output = sandbox
        .command("wrong-password")
        .args(["show", "s"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(5));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Incorrect password"));
}

#[test]
fn test_missing_config_and_missing_entry() {
    let sandbox = Sandbox::new();

    let output = sandbox.run(&["list"]);
    assert_eq!(output.status.code(), Some(3));

    sandbox.init();
    let output = sandbox.run(&["show", "nope"]);
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn test_invalid_id_exit_code() {
    let sandbox = Sandbox::new();
    sandbox.init();

    let output = sandbox.run(&["write", "--body", "x", "--id", "../escape"]);
    assert_eq!(output.status.code(), Some(4));
}

#[test]
fn test_init_rebuilds_lost_index() {
    let sandbox = Sandbox::new();
    sandbox.init();
    assert_success(&sandbox.run(&["write", "--body", "one", "--id", "one", "--date", "2024-05-01"]));
    assert_success(&sandbox.run(&["write", "--body", "two", "--id", "two", "--date", "2024-05-02"]));

    std::fs::remove_file(sandbox.journal_dir().join("index.cpt")).unwrap();
    let output = sandbox.run(&["list"]);
    assert_eq!(output.status.code(), Some(3));

    assert_success(&sandbox.run(&["init"]));
    let output = sandbox.run(&["list", "--json"]);
    assert_success(&output);
    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(value.as_array().unwrap().len(), 2);
}

#[test]
fn test_rekey_changes_password() {
    let sandbox = Sandbox::new();
    sandbox.init();
    assert_success(&sandbox.run(&["write", "--body", "kept", "--id", "kept"]));
    let before = std::fs::read_to_string(sandbox.config_path()).unwrap();

    let output = sandbox
        .command(PASSWORD)
        .env("EJOURNAL_NEW_PASSWORD", "brand-new-password")
        .args(["rekey"])
        .output()
        .unwrap();
    assert_success(&output);

    assert_ne!(std::fs::read_to_string(sandbox.config_path()).unwrap(), before);
    assert!(!exists(&sandbox.dir.path().join("journal.old")));
    assert!(!exists(&sandbox.dir.path().join("journal.rekey")));

    let output = sandbox
        .command("brand-new-password")
        .args(["show", "kept", "--quiet"])
        .output()
        .unwrap();
    assert_success(&output);
    assert_eq!(stdout(&output).trim(), "kept");

    let output = sandbox.run(&["show", "kept"]);
    assert_eq!(output.status.code(), Some(5));
}

#[test]
fn test_completions() {
    let output = Command::new(bin()).args(["completions", "bash"]).output().unwrap();
    assert_success(&output);
    assert!(stdout(&output).contains("ejournal"));
}

#[test]
fn test_print_recent_entries_in_full() {
    let sandbox = Sandbox::new();
    sandbox.init();
    for (id, date) in [("a", "2024-01-01"), ("b", "2024-01-03"), ("c", "2024-01-02")] {
        let body = format!("body of {}", id);
        assert_success(&sandbox.run(&["write", "--body", &body, "--id", id, "--date", date]));
    }

    let output = sandbox.run(&["print", "--count", "2", "--json"]);
    assert_success(&output);
    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let bodies: Vec<&str> = value
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["body"].as_str().unwrap())
        .collect();
    assert_eq!(bodies, vec!["body of b", "body of c"]);

    let output = sandbox.run(&["print"]);
    assert_success(&output);
    let text = stdout(&output);
    let b = text.find("body of b").unwrap();
    let c = text.find("body of c").unwrap();
    let a = text.find("body of a").unwrap();
    assert!(b < c && c < a, "unexpected order:\n{}", text);
}

#[test]
fn test_import_entry_from_json_file() {
    let sandbox = Sandbox::new();
    sandbox.init();
    let file = sandbox.dir.path().join("entry.json");
    std::fs::write(
        &file,
        r#"{"Id":"imported","Date":"2019-06-01T10:00:00+02:00","Body":"from elsewhere","Tags":null}"#,
    )
    .unwrap();

    let output = sandbox.run(&["import", file.to_str().unwrap(), "--quiet"]);
    assert_success(&output);
    assert_eq!(stdout(&output).trim(), "imported");

    let output = sandbox.run(&["show", "imported", "--json"]);
    assert_success(&output);
    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(value["body"], "from elsewhere");
    assert_eq!(value["date"], "2019-06-01T08:00:00Z");

    std::fs::write(&file, "not json").unwrap();
    let output = sandbox.run(&["import", file.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(4));
}

#[test]
fn test_default_config_lives_under_home() {
    let sandbox = Sandbox::new();
    let journal_dir = sandbox.journal_dir();

    let output = sandbox
        .command(PASSWORD)
        .env_remove("EJOURNAL_CONFIG")
        .env_remove("XDG_CONFIG_HOME")
        .args(["init", "--directory", journal_dir.to_str().unwrap(), "--work-factor", "4"])
        .output()
        .unwrap();
    assert_success(&output);

    assert!(exists(
        &sandbox.dir.path().join(".config").join("ejournal").join("config.toml")
    ));
}
