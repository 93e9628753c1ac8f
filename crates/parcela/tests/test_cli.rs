#![allow(clippy::disallowed_methods)]

use std::{fs, process::Command};

use tempfile::TempDir;

fn parcela() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_parcela"));
    cmd.env_remove("PARCELA_TARGET")
        .env_remove("PARCELA_DEDUPE_MODULES")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_bundle_is_written_to_stdout() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("entry.js"), "import './b.js';\n").unwrap();
    fs::write(temp_dir.path().join("b.js"), "export default 1;\n").unwrap();

    let output = parcela()
        .current_dir(temp_dir.path())
        .args(["--entry", "entry.js"])
        .output()
        .expect("Failed to run parcela");

    assert!(
        output.status.success(),
        "STDERR:\n{}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("(function (modules) {"));
    assert!(stdout.contains(r#"{"./b.js":1}"#));
}

#[test]
fn test_bundle_is_written_to_output_file() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("entry.js"), "console.log('solo');\n").unwrap();

    let output = parcela()
        .current_dir(temp_dir.path())
        .args(["-e", "entry.js", "-o", "dist/bundle.js", "--target", "es2020"])
        .output()
        .expect("Failed to run parcela");

    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    let bundle = fs::read_to_string(temp_dir.path().join("dist/bundle.js")).unwrap();
    assert!(bundle.contains("console.log"));
}

#[test]
fn test_failure_prints_nothing_to_stdout() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("entry.js"), "import './missing.js';\n").unwrap();

    let output = parcela()
        .current_dir(temp_dir.path())
        .args(["--entry", "entry.js"])
        .output()
        .expect("Failed to run parcela");

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("cannot read source file missing.js"), "{stderr}");
}

#[test]
fn test_project_config_enables_dedupe() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("parcela.toml"), "dedupe-modules = true\n").unwrap();
    fs::write(
        temp_dir.path().join("entry.js"),
        "import './shared.js';\nimport './again.js';\n",
    )
    .unwrap();
    fs::write(temp_dir.path().join("again.js"), "import './shared.js';\n").unwrap();
    fs::write(temp_dir.path().join("shared.js"), "export const x = 1;\n").unwrap();

    let output = parcela()
        .current_dir(temp_dir.path())
        .args(["--entry", "entry.js"])
        .output()
        .expect("Failed to run parcela");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains(r#"{"./shared.js":1,"./again.js":2}"#), "{stdout}");
    assert!(stdout.contains(r#"{"./shared.js":1}"#));
    assert!(!stdout.contains("  3: ["));
}
