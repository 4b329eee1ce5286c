use std::process::Command;

const BINARY: &str = "jungle-ruins";

#[test]
fn headless_runner_binary_type_checks() {
    let status = Command::new(env!("CARGO"))
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .args(["check", "--quiet", "--bin", BINARY])
        .status()
        .expect("cargo is available to check the headless runner");

    assert!(
        status.success(),
        "the {BINARY} runner with its level, script and logging modules should type-check"
    );
}
