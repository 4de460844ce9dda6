// Integration tests for the robocfg binary.
// Run with: cargo test -p robocfg-cli --test cli_tests -- --nocapture

use std::path::PathBuf;
use std::process::{Command, Output};

const SOURCE: &str = "\
; KR 210 R2700
BASE_DATA[1]={X 100.0,Y 200.0,Z 300.0,A 0.0,B 0.0,C 90.0}
TOOL_TYPE[1]=#FIXED
TOOL_NAME[1,]=\"Gripper\"
DECL E6AXIS HOME={A1 0.0,A2 -90.0}
";

const TARGET: &str = "\
MACHINE_DEF[1]={NAME[] \"KR 210 R2700\",COOP_KRC_INDEX 1}
BASE_DATA[1]={X 0.0,Y 0.0,Z 0.0,A 0.0,B 0.0,C 0.0}
TOOL_TYPE[1]=#NONE
TOOL_NAME[1,]=\" \"
DECL E6AXIS XHOME={A1 1.0,A2 1.0,E1 5.0}
";

struct Workspace {
    dir: tempfile::TempDir,
}

impl Workspace {
    fn new() -> Self {
        let ws = Self { dir: tempfile::tempdir().unwrap() };
        ws.write("source.dat", SOURCE);
        ws.write("target.dat", TARGET);
        ws
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn write(&self, name: &str, content: &str) {
        std::fs::write(self.path(name), content).unwrap();
    }

    fn read(&self, name: &str) -> String {
        std::fs::read_to_string(self.path(name)).unwrap()
    }

    fn files(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|n| n != "config")
            .collect();
        names.sort();
        names
    }

    fn robocfg(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_robocfg"))
            .current_dir(self.dir.path())
            // Keep the user's settings file out of the tests.
            .env("XDG_CONFIG_HOME", self.path("config"))
            .env("HOME", self.dir.path())
            .args(args)
            .output()
            .expect("run robocfg")
    }
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn assert_success(output: &Output) {
    assert!(output.status.success(), "exit code: {:?}\nstderr: {}", output.status, stderr(output));
}

fn json(output: &Output) -> serde_json::Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(stdout.trim()).unwrap_or_else(|e| panic!("stdout must be JSON: {e}\n{stdout}"))
}

// ===========================================================================
// transfer
// ===========================================================================

#[test]
fn transfer_in_place_rewrites_target() {
    let ws = Workspace::new();
    let output = ws.robocfg(&["transfer", "source.dat", "target.dat", "--in-place"]);
    assert_success(&output);

    let target = ws.read("target.dat");
    assert!(target.contains("BASE_DATA[1]={ X 100.0, Y 200.0, Z 300.0, A 0.0, B 0.0, C 90.0 }"));
    assert!(target.contains("TOOL_TYPE[1]=#FIXED"));
    assert!(target.contains("TOOL_NAME[1,]=\"Gripper\""));
    assert!(target.contains("DECL E6AXIS XHOME={ A1 0.0, A2 -90.0, E1 5.0 }"));
    assert_eq!(target.lines().count(), TARGET.lines().count());

    let err = stderr(&output);
    assert!(err.contains("[INFO] Robot models match."));
    assert!(!err.contains("[DEBUG]"));
}

#[test]
fn transfer_defaults_to_timestamped_copy() {
    let ws = Workspace::new();
    let output = ws.robocfg(&["transfer", "source.dat", "target.dat"]);
    assert_success(&output);

    assert_eq!(ws.read("target.dat"), TARGET);
    let files = ws.files();
    assert_eq!(files.len(), 3, "{files:?}");
    let copy = files.iter().find(|n| n.starts_with("target_") && n.ends_with(".dat")).unwrap();
    assert!(ws.read(copy).contains("TOOL_TYPE[1]=#FIXED"));
}

#[test]
fn transfer_only_selected_kinds() {
    let ws = Workspace::new();
    let output = ws.robocfg(&["transfer", "source.dat", "target.dat", "--in-place", "--only", "tool_type"]);
    assert_success(&output);

    let target = ws.read("target.dat");
    assert!(target.contains("TOOL_TYPE[1]=#FIXED"));
    assert!(target.contains("TOOL_NAME[1,]=\" \""));
    assert!(target.contains("BASE_DATA[1]={X 0.0,Y 0.0,Z 0.0,A 0.0,B 0.0,C 0.0}"));
}

#[test]
fn transfer_json_report() {
    let ws = Workspace::new();
    let output = ws.robocfg(&["transfer", "source.dat", "target.dat", "--in-place", "--json", "--skip", "e6axis"]);
    assert_success(&output);

    let report = json(&output);
    assert_eq!(report["changed"], true);
    assert_eq!(report["written_to"], "target.dat");
    assert_eq!(report["target"], "target.dat");
    assert_eq!(report["model"]["source"], "KR210");
    let kinds: Vec<&str> = report["kinds"].as_array().unwrap().iter().map(|k| k["kind"].as_str().unwrap()).collect();
    assert_eq!(kinds.len(), 7);
    assert!(!kinds.contains(&"E6AXIS"));
    assert!(report["events"].as_array().unwrap().iter().any(|e| e["message"] == "Starting value transfer..."));
}

#[test]
fn transfer_twice_reports_no_change() {
    let ws = Workspace::new();
    assert_success(&ws.robocfg(&["transfer", "source.dat", "target.dat", "--in-place"]));
    let after_first = ws.read("target.dat");

    let output = ws.robocfg(&["transfer", "source.dat", "target.dat", "--in-place", "--json"]);
    assert_success(&output);
    let report = json(&output);
    assert_eq!(report["changed"], false);
    assert!(report["written_to"].is_null());
    assert_eq!(ws.read("target.dat"), after_first);
}

#[test]
fn transfer_with_profile() {
    let ws = Workspace::new();
    ws.write("cell.toml", "only = [\"TOOL_NAME\"]\nin_place = true\n");
    let output = ws.robocfg(&["transfer", "source.dat", "target.dat", "--profile", "cell.toml"]);
    assert_success(&output);

    let target = ws.read("target.dat");
    assert!(target.contains("TOOL_NAME[1,]=\"Gripper\""));
    assert!(target.contains("TOOL_TYPE[1]=#NONE"));
}

#[test]
fn unknown_kind_is_usage_error() {
    let ws = Workspace::new();
    let output = ws.robocfg(&["transfer", "source.dat", "target.dat", "--only", "TOOL"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("robocfg kinds"));
    assert_eq!(ws.read("target.dat"), TARGET);
}

#[test]
fn missing_source_exits_with_read_error() {
    let ws = Workspace::new();
    let output = ws.robocfg(&["transfer", "nope.dat", "target.dat", "--in-place"]);
    assert_eq!(output.status.code(), Some(10));
    assert!(stderr(&output).contains("[ERROR] cannot read"));
}

#[test]
fn model_mismatch_warns_and_continues() {
    let ws = Workspace::new();
    ws.write("source.dat", &SOURCE.replace("KR 210", "KR 16"));
    let output = ws.robocfg(&["transfer", "source.dat", "target.dat", "--in-place"]);
    assert_success(&output);
    assert!(stderr(&output).contains("[WARNING] Robot models do not match."));
    assert!(ws.read("target.dat").contains("TOOL_TYPE[1]=#FIXED"));
}

// ===========================================================================
// purge
// ===========================================================================

#[test]
fn purge_in_place() {
    let ws = Workspace::new();
    let output = ws.robocfg(&["purge", "target.dat", "--in-place", "--only", "tool_type,tool_name"]);
    assert_success(&output);

    let target = ws.read("target.dat");
    assert!(target.contains("TOOL_NAME[1,]=\"\""));
    assert!(target.contains("TOOL_TYPE[1]=#NONE"));
    assert!(target.contains("DECL E6AXIS XHOME={A1 1.0,A2 1.0,E1 5.0}"));
}

// ===========================================================================
// check-model / kinds
// ===========================================================================

#[test]
fn check_model_exit_codes() {
    let ws = Workspace::new();
    assert_success(&ws.robocfg(&["check-model", "source.dat", "target.dat"]));

    ws.write("other.dat", "; KR 6\n");
    let output = ws.robocfg(&["check-model", "other.dat", "target.dat", "--json"]);
    assert_eq!(output.status.code(), Some(3));
    let result = json(&output);
    assert_eq!(result["source"], "KR6");
    assert_eq!(result["target"], "KR210");
}

#[test]
fn kinds_lists_transfer_order() {
    let ws = Workspace::new();
    let output = ws.robocfg(&["kinds"]);
    assert_success(&output);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let kinds: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        kinds,
        vec!["BASE_DATA", "BASE_NAME", "BASE_TYPE", "TOOL_DATA", "TOOL_TYPE", "TOOL_NAME", "LOAD_DATA", "E6AXIS"]
    );

    let output = ws.robocfg(&["kinds", "--json"]);
    assert_eq!(json(&output)[7], "E6AXIS");
}
