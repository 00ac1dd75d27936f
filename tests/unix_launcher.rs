// tests/unix_launcher.rs

#![cfg(unix)]

use std::path::Path;
use std::time::{Duration, Instant};

use apprelay::command::CommandSpec;
use apprelay::errors::RelayError;
use apprelay::exec::unix::{resolve_executable, split_arguments, SpawnLauncher};
use apprelay::exec::ProcessLauncher;
use apprelay_test_utils::with_timeout;

#[test]
fn bare_names_are_found_on_path() {
    let sh = resolve_executable(Path::new("sh")).unwrap();
    assert!(sh.is_absolute());
    assert!(sh.ends_with("sh"));
}

#[test]
fn missing_executables_fail_to_resolve() {
    assert!(matches!(
        resolve_executable(Path::new("/no/such/dir/tool")),
        Err(RelayError::Launch { .. })
    ));
    assert!(matches!(
        resolve_executable(Path::new("apprelay-surely-not-on-path")),
        Err(RelayError::Launch { .. })
    ));
    assert!(resolve_executable(Path::new("")).is_err());
}

#[test]
fn arguments_split_on_posix_quoting_without_operators() {
    let spec = CommandSpec::parse(r#"/bin/tool -c 'exit 3' "two words" ; $(x) &"#);
    assert_eq!(
        split_arguments(&spec).unwrap(),
        vec!["-c", "exit 3", "two words", ";", "$(x)", "&"]
    );

    let spec = CommandSpec::parse("/bin/tool");
    assert!(split_arguments(&spec).unwrap().is_empty());
}

#[tokio::test]
async fn unbalanced_quotes_fail_the_launch() {
    let err = SpawnLauncher
        .launch(&CommandSpec::parse("/bin/sh -c 'exit 3"))
        .unwrap_err();
    assert!(matches!(err, RelayError::Launch { .. }));
}

#[tokio::test]
async fn launch_failure_names_the_path() {
    let err = SpawnLauncher
        .launch(&CommandSpec::parse("/no/such/dir/tool --flag"))
        .unwrap_err();
    assert!(err.to_string().contains("/no/such/dir/tool"));
}

#[tokio::test]
async fn exit_code_is_delivered() {
    let mut handle = SpawnLauncher
        .launch(&CommandSpec::parse("/bin/sh -c 'exit 3'"))
        .unwrap();
    assert!(handle.pid().is_some());

    let notice = handle.take_exit_notice().expect("notice available once");
    assert!(handle.take_exit_notice().is_none());

    let code = with_timeout(notice).await.unwrap();
    assert_eq!(code, Some(3));
    assert!(handle.has_exited());
    handle.release();
}

#[tokio::test]
async fn shell_operators_reach_the_target_as_arguments() {
    // `;` is an argument: `$0 = a`, `$1 = ;`, `$2 = b`.
    let mut handle = SpawnLauncher
        .launch(&CommandSpec::parse("/bin/sh -c 'exit $#' a ; b"))
        .unwrap();
    let code = with_timeout(handle.take_exit_notice().unwrap()).await.unwrap();
    assert_eq!(code, Some(2));
}

#[tokio::test]
async fn trailing_ampersand_does_not_detach_the_target() {
    let started = Instant::now();
    let mut handle = SpawnLauncher
        .launch(&CommandSpec::parse("/bin/sh -c 'sleep 0.3' &"))
        .unwrap();

    let code = with_timeout(handle.take_exit_notice().unwrap()).await.unwrap();
    assert_eq!(code, Some(0));
    assert!(started.elapsed() >= Duration::from_millis(250));
}

#[tokio::test]
async fn released_handle_leaves_process_running() {
    let mut handle = SpawnLauncher
        .launch(&CommandSpec::parse("/bin/sh -c 'sleep 0.2'"))
        .unwrap();
    let notice = handle.take_exit_notice().unwrap();
    handle.release();

    // The waiter was abandoned: the notice sender is dropped, not fired.
    assert!(with_timeout(notice).await.is_err());
}
