use insta::{Settings, assert_snapshot};
use rstest::rstest;

use crate::common::{TestEnv, stderr, stdout};

const NEW_TAB_CALL: &str = "org.kde.KMainWindow.activateAction new-tab";

/// Snapshot settings that replace the temp working directory with `[WORK]`.
fn work_settings(env: &TestEnv) -> Settings {
    let mut settings = Settings::clone_current();
    settings.add_filter(&regex::escape(&env.work_dir().display().to_string()), "[WORK]");
    settings
}

#[test]
fn test_dry_run_prints_record() {
    let env = TestEnv::new();
    let output = env
        .command()
        .args(["--dry-run", "-e", "echo hi", "-t", "build"])
        .output()
        .unwrap();

    assert!(output.status.success(), "{}", stderr(&output));
    work_settings(&env).bind(|| {
        assert_snapshot!(stdout(&output), @r"
        printf '\033]30;%s\007' build
        cd [WORK]
        echo hi
        ");
    });
    assert!(env.state_files().is_empty());
}

#[test]
fn test_dry_run_quotes_trailing_words() {
    let env = TestEnv::new();
    let output = env
        .command()
        .args(["--dry-run", "--", "echo", "hello world", "it's"])
        .output()
        .unwrap();

    assert!(output.status.success(), "{}", stderr(&output));
    work_settings(&env).bind(|| {
        assert_snapshot!(stdout(&output), @r#"
        cd [WORK]
        echo 'hello world' 'it'\''s'
        "#);
    });
}

#[test]
fn test_dry_run_sources_script_by_absolute_path() {
    let env = TestEnv::new();
    env.write_work_file("setup.sh", "export READY=1\n");
    std::fs::create_dir(env.work_dir().join("sub")).unwrap();

    let output = env
        .command()
        .args(["--dry-run", "-s", "setup.sh", "-d", "sub"])
        .output()
        .unwrap();

    assert!(output.status.success(), "{}", stderr(&output));
    work_settings(&env).bind(|| {
        assert_snapshot!(stdout(&output), @r"
        cd [WORK]/sub
        source [WORK]/setup.sh
        ");
    });
}

#[rstest]
#[case::no_command(&[])]
#[case::blank_command(&["-e", "  "])]
#[case::inline_and_script(&["-e", "ls", "-s", "setup.sh"])]
#[case::inline_and_words(&["-e", "ls", "--", "pwd"])]
#[case::missing_script(&["-s", "missing.sh"])]
#[case::missing_directory(&["-e", "ls", "-d", "nowhere"])]
fn test_usage_errors_write_nothing(#[case] args: &[&str]) {
    let mut env = TestEnv::new();
    env.fake_konsole(&[1], 0);
    env.write_work_file("setup.sh", "true\n");

    let output = env.command().args(args).output().unwrap();

    assert_eq!(output.status.code(), Some(2), "{}", stderr(&output));
    assert!(env.state_files().is_empty());
    assert!(env.ipc_calls().is_empty());
}

#[test]
fn test_missing_script_message() {
    let env = TestEnv::new();
    let output = env.command().args(["-s", "missing.sh"]).output().unwrap();

    assert_eq!(output.status.code(), Some(2));
    assert_snapshot!(stderr(&output), @"✗ Script file missing.sh not found");
}

#[test]
fn test_single_window_gets_tab_and_pending_record() {
    let mut env = TestEnv::new();
    env.fake_konsole(&[1], 0);

    let output = env.command().args(["-e", "echo hi"]).output().unwrap();

    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stderr(&output).trim(), "✓ Opened tab in window 1");
    assert_eq!(
        std::fs::read_to_string(env.pending_path()).unwrap(),
        format!("cd {}\necho hi\n", env.work_dir().display())
    );
    assert_eq!(
        env.ipc_calls(),
        [
            "org.kde.konsole-test".to_string(),
            format!("org.kde.konsole-test /konsole/MainWindow_1 {NEW_TAB_CALL}"),
        ]
    );
}

#[test]
fn test_several_windows_without_terminal_uses_newest() {
    let mut env = TestEnv::new();
    env.fake_konsole(&[1, 3, 2], 0);

    let output = env.command().args(["-e", "true"]).output().unwrap();

    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stderr(&output).contains("Opened tab in window 3"));
    assert_eq!(env.ipc_calls().len(), 2);
    assert!(env.ipc_calls()[1].contains("/konsole/MainWindow_3 "));
}

#[test]
fn test_explicit_window() {
    let mut env = TestEnv::new();
    env.fake_konsole(&[1, 3], 0);

    let output = env.command().args(["-e", "true", "-w", "1"]).output().unwrap();

    assert!(output.status.success(), "{}", stderr(&output));
    assert!(env.ipc_calls()[1].contains("/konsole/MainWindow_1 "));
}

#[test]
fn test_explicit_window_missing() {
    let mut env = TestEnv::new();
    env.fake_konsole(&[1, 3], 0);

    let output = env.command().args(["-e", "true", "-w", "2"]).output().unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert_snapshot!(stderr(&output), @r"
    ✗ No terminal window with id 2
    ↳ Available windows: 1, 3
    ");
    assert!(env.state_files().is_empty());
}

#[test]
fn test_no_ipc_falls_back_to_new_window() {
    let env = TestEnv::new();

    let output = env.command().args(["-e", "echo hi"]).output().unwrap();

    assert!(output.status.success(), "{}", stderr(&output));
    let err = stderr(&output);
    assert!(err.contains("✓ Opened a new terminal window"), "{err}");
    assert!(err.contains("terminal IPC unavailable"), "{err}");
    assert!(!env.pending_path().exists());

    // The launcher script is removed once the grace period (0s here) is up
    assert!(env.wait_for_empty_state(), "{:?}", env.state_files());
}

#[test]
fn test_no_windows_falls_back() {
    let mut env = TestEnv::new();
    env.fake_konsole(&[], 0);

    let output = env.command().args(["-e", "true"]).output().unwrap();

    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stderr(&output).contains("no terminal windows found"));
    assert_eq!(env.ipc_calls().len(), 1);
}

#[test]
fn test_failed_new_tab_withdraws_record_and_falls_back() {
    let mut env = TestEnv::new();
    env.fake_konsole(&[1], 1);

    let output = env.command().args(["-e", "true"]).output().unwrap();

    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stderr(&output).contains("Opened a new terminal window"));
    assert!(!env.pending_path().exists());
    assert_eq!(env.ipc_calls().len(), 2);
}

#[test]
fn test_forced_fallback_skips_ipc() {
    let mut env = TestEnv::new();
    env.fake_konsole(&[1], 0);

    let output = env.command().args(["-f", "-e", "true"]).output().unwrap();

    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stderr(&output).contains("fallback requested"));
    assert!(env.ipc_calls().is_empty());
    assert!(!env.pending_path().exists());
}

#[test]
fn test_missing_emulator_is_runtime_error() {
    let env = TestEnv::new();

    let output = env
        .command()
        .env("NEWTAB_EMULATOR", "newtab-test-no-such-emulator")
        .args(["-e", "true"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Failed to start newtab-test-no-such-emulator"));
}
