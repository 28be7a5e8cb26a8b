use insta::assert_snapshot;

use crate::common::{TestEnv, stderr, stdout};

#[test]
fn test_windows_lists_ids_newest_marked() {
    let mut env = TestEnv::new();
    env.fake_konsole(&[3, 1, 2], 0);

    let output = env.command().arg("windows").output().unwrap();

    assert!(output.status.success(), "{}", stderr(&output));
    assert_snapshot!(stdout(&output), @r"
    1
    2
    3 (newest)
    ");
}

#[test]
fn test_windows_none_open() {
    let mut env = TestEnv::new();
    env.fake_konsole(&[], 0);

    let output = env.command().arg("windows").output().unwrap();

    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output), "");
    assert_snapshot!(stderr(&output), @"○ No terminal windows open");
}

#[test]
fn test_windows_without_ipc_fails() {
    let env = TestEnv::new();

    let output = env.command().arg("windows").output().unwrap();

    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.starts_with("✗ terminal IPC unavailable"), "{err}");
    assert!(err.contains("newtab-test-no-such-qdbus"), "{err}");
}
