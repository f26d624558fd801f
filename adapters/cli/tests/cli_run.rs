use std::process::Command;

fn pixel_rail(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_pixel-rail"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to launch pixel-rail")
}

#[test]
fn json_report_describes_a_cleared_level() {
    let output = pixel_rail(&[
        "--width", "5", "--height", "4", "--pattern", "checker", "--capacity", "12", "--json",
    ]);
    assert!(output.status.success(), "{output:?}");

    let report: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is a JSON report");
    assert_eq!(report["status"], "cleared");
    assert_eq!(report["pattern"], "checker");
    assert_eq!(report["pixels"], 20);
    assert_eq!(report["queues"].as_array().map(Vec::len), Some(3));
}

#[test]
fn same_seed_prints_the_same_report() {
    let args = ["--width", "4", "--height", "4", "--capacity", "10", "--seed", "31"];
    let first = pixel_rail(&args);
    let second = pixel_rail(&args);
    assert!(first.status.success(), "{first:?}");
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn failed_generation_exits_non_zero() {
    let output = pixel_rail(&["--width", "3", "--height", "3", "--capacity", "0"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("could not generate a solvable deck"), "{stderr}");
}
