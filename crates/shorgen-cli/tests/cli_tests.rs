//! End-to-end tests of the `shorgen` binary.
//!
//! Each test runs the compiled binary against a temporary directory.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

fn shorgen(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_shorgen"))
        .args(args)
        .output()
        .expect("failed to launch shorgen")
}

fn path_str(path: &Path) -> &str {
    path.to_str().expect("temp paths are UTF-8")
}

// ============================================================================
// shor
// ============================================================================

#[test]
fn test_shor_preset_writes_circuit() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("rsa16.qasm");

    let result = shorgen(&[
        "shor",
        "--preset",
        "rsa16",
        "--stride",
        "8",
        "--workers",
        "2",
        "-o",
        path_str(&output),
    ]);
    assert!(result.status.success(), "{}", String::from_utf8_lossy(&result.stderr));

    let text = fs::read_to_string(&output).unwrap();
    assert!(text.starts_with("OPENQASM 2.0;\ninclude \"qelib1.inc\";\nqreg c;\n"));
    assert_eq!(text.matches("// iteration").count(), 4);
    assert!(text.ends_with("h c;\n"));
}

#[test]
fn test_shor_explicit_parameters_and_stats() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("small.qasm");
    let stats = dir.path().join("stats.json");

    let result = shorgen(&[
        "shor",
        "--bits",
        "4",
        "--modulus",
        "15",
        "--base",
        "7",
        "--base-inv",
        "13",
        "--workers",
        "0",
        "--stats",
        path_str(&stats),
        "-o",
        path_str(&output),
    ]);
    assert!(result.status.success(), "{}", String::from_utf8_lossy(&result.stderr));

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&stats).unwrap()).unwrap();
    assert_eq!(json["width"], 4);
    assert_eq!(json["rounds"], 8);
    assert_eq!(json["emitted_rounds"], 8);
    assert_eq!(json["bytes_written"], fs::metadata(&output).unwrap().len());
}

#[test]
fn test_shor_same_seed_same_file_across_modes() {
    let dir = tempfile::tempdir().unwrap();
    let sequential = dir.path().join("seq.qasm");
    let parallel = dir.path().join("par.qasm");

    for (workers, output) in [("0", &sequential), ("3", &parallel)] {
        let result = shorgen(&[
            "shor", "--bits", "6", "--modulus", "55", "--base", "2", "--stride", "3", "--seed",
            "21", "--workers", workers, "-o", path_str(output),
        ]);
        assert!(result.status.success());
    }
    assert_eq!(fs::read(&sequential).unwrap(), fs::read(&parallel).unwrap());
}

#[test]
fn test_shor_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("shorgen.yaml");
    let output = dir.path().join("out.qasm");
    fs::write(&config, "stride: 4\nworkers: 1\nseed: 3\n").unwrap();

    let result = shorgen(&[
        "shor", "--bits", "4", "--modulus", "15", "--base", "2", "--config",
        path_str(&config), "-o", path_str(&output),
    ]);
    assert!(result.status.success());
    let text = fs::read_to_string(&output).unwrap();
    assert_eq!(text.matches("// iteration").count(), 2);
}

#[test]
fn test_shor_rejects_wrong_inverse() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("bad.qasm");
    let result = shorgen(&[
        "shor", "--bits", "4", "--modulus", "15", "--base", "7", "--base-inv", "7", "-o",
        path_str(&output),
    ]);
    assert_eq!(result.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&result.stderr).contains("not congruent to 1"));
}

#[test]
fn test_shor_rejects_non_invertible_base() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("bad.qasm");
    let result = shorgen(&[
        "shor", "--bits", "4", "--modulus", "15", "--base", "5", "-o", path_str(&output),
    ]);
    assert_eq!(result.status.code(), Some(1));
    assert!(!output.exists());
}

#[test]
fn test_shor_unknown_preset() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("x.qasm");
    let result = shorgen(&["shor", "--preset", "rsa4096", "-o", path_str(&output)]);
    assert_eq!(result.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&result.stderr).contains("Unknown preset"));
}

#[test]
fn test_shor_preset_conflicts_with_explicit_values() {
    let result = shorgen(&["shor", "--preset", "rsa16", "--bits", "16", "-o", "x.qasm"]);
    assert!(!result.status.success());
}

// ============================================================================
// qft, presets, version
// ============================================================================

#[test]
fn test_qft_benchmark() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("qft.qasm");
    let result = shorgen(&["qft", "--bits", "8", "-o", path_str(&output)]);
    assert!(result.status.success());

    let text = fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[2], "qreg q[8];");
    // 8 Hadamards and all 28 couplings.
    assert_eq!(lines.len(), 3 + 8 + 28);
}

#[test]
fn test_qft_rejects_missing_directory() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("missing").join("qft.qasm");
    let result = shorgen(&["qft", "--bits", "8", "-o", path_str(&output)]);
    assert_eq!(result.status.code(), Some(1));
}

#[test]
fn test_presets_listing() {
    let result = shorgen(&["presets"]);
    assert!(result.status.success());
    let stdout = String::from_utf8_lossy(&result.stdout);
    for name in ["rsa16", "rsa128", "rsa256"] {
        assert!(stdout.contains(name), "missing {name}");
    }
}

#[test]
fn test_version() {
    let result = shorgen(&["version"]);
    assert!(result.status.success());
    let stdout = String::from_utf8_lossy(&result.stdout);
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
    assert!(stdout.contains("OpenQASM 2.0"));
    // 16-bit key at the default tolerance keeps 27 couplings per qubit.
    assert!(stdout.contains("rsa16: d=27"), "{stdout}");
}

// ============================================================================
// logging
// ============================================================================

#[test]
fn test_verbose_flag_logs_generation() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("qft.qasm");

    let quiet = shorgen(&["qft", "--bits", "4", "-o", path_str(&output)]);
    assert!(quiet.status.success());
    assert!(!String::from_utf8_lossy(&quiet.stderr).contains("writing approximate QFT"));

    let verbose = shorgen(&["-vv", "qft", "--bits", "4", "-o", path_str(&output)]);
    assert!(verbose.status.success());
    let stderr = String::from_utf8_lossy(&verbose.stderr);
    assert!(stderr.contains("writing approximate QFT"), "{stderr}");
    assert!(stderr.contains("approximate QFT written"), "{stderr}");
}

#[test]
fn test_shor_info_log() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("small.qasm");
    let result = shorgen(&[
        "shor", "-v", "--bits", "4", "--modulus", "15", "--base", "7", "-o",
        path_str(&output),
    ]);
    assert!(result.status.success());
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("starting generation"), "{stderr}");
    assert!(!stderr.contains("generation finished"), "debug line at -v: {stderr}");
}
