// tests/runtime_scenarios.rs

use std::error::Error;
use std::time::Duration;

use apprelay::command::CommandSpec;
use apprelay::engine::{CompletionCause, RelayEvent};
use apprelay::icon::IconOrigin;
use apprelay::status::StatusAction;
use apprelay_test_utils::builders::RelayConfigBuilder;
use apprelay_test_utils::fakes::{FakeLauncher, FakeProcessControl, ScriptedCensus};
use apprelay_test_utils::harness::{harness, FAKE_PROGRAM_PATH};
use apprelay_test_utils::{init_tracing, with_timeout};

type TestResult = Result<(), Box<dyn Error>>;

/// Wait until the runtime has started its `index`-th process.
async fn wait_for_process(launcher: &FakeLauncher, index: usize) -> FakeProcessControl {
    with_timeout(async {
        loop {
            if let Some(process) = launcher.process(index) {
                return process;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
}

#[tokio::test]
async fn quoted_primary_exit_tears_down_without_followup() -> TestResult {
    init_tracing();

    let config = RelayConfigBuilder::new(r#""C:\tools\a.exe" --flag"#).build();
    let h = harness(config, FakeLauncher::new(), ScriptedCensus::default());
    let launcher = h.launcher.clone();

    let run = tokio::spawn(h.runtime.run());

    let primary = wait_for_process(&launcher, 0).await;
    assert_eq!(primary.spec, CommandSpec::new(r"C:\tools\a.exe", "--flag"));
    assert!(primary.exit(0));

    let outcome = with_timeout(run).await??;
    assert_eq!(
        outcome.cause,
        CompletionCause::PrimaryExited { code: Some(0) }
    );
    assert!(!outcome.followup_launched);

    assert_eq!(launcher.attempts().len(), 1);
    assert_eq!(launcher.released(), 1);

    let log = h.surface.log();
    assert_eq!(log.count("hide"), 1);
    assert_eq!(log.count("dispose"), 1);
    assert!(log.errors.is_empty());

    // The primary's executable is not on the mock filesystem, so the
    // program's own icon was used, and released once.
    assert_eq!(log.icon_owned, Some(true));
    assert_eq!(
        h.icons.released(),
        vec![IconOrigin::Associated(FAKE_PROGRAM_PATH.into())]
    );

    Ok(())
}

#[tokio::test]
async fn windowed_primary_completes_when_its_window_closes() -> TestResult {
    init_tracing();

    let config = RelayConfigBuilder::new("a.exe")
        .followup("b.exe")
        .windowed(true)
        .build();
    let h = harness(config, FakeLauncher::new(), ScriptedCensus::counts([1, 0]));
    let launcher = h.launcher.clone();

    // Tick 1 sees one window, tick 2 sees none; the primary stays alive.
    h.tx.send(RelayEvent::Tick).await?;
    h.tx.send(RelayEvent::Tick).await?;

    let outcome = with_timeout(h.runtime.run()).await?;
    assert_eq!(outcome.cause, CompletionCause::WindowsClosed);
    assert!(outcome.followup_launched);
    assert_eq!(h.census.queries(), 2);

    assert_eq!(launcher.attempts_of("a.exe"), 1);
    assert_eq!(launcher.attempts_of("b.exe"), 1);

    // The primary's natural exit arrives after teardown: nothing happens.
    let primary = launcher.process(0).expect("primary was launched");
    primary.exit(0);
    let _ = h.tx.send(RelayEvent::PrimaryExited { code: Some(0) }).await;
    tokio::time::sleep(Duration::from_millis(20)).await;

    assert_eq!(launcher.attempts_of("b.exe"), 1);
    assert_eq!(h.surface.log().count("dispose"), 1);

    Ok(())
}

#[tokio::test]
async fn missing_primary_reports_error_and_terminates() -> TestResult {
    init_tracing();

    let config = RelayConfigBuilder::new("missing.exe --x")
        .followup("b.exe")
        .build();
    let launcher = FakeLauncher::new().with_missing("missing.exe");
    let h = harness(config, launcher, ScriptedCensus::default());

    let outcome = with_timeout(h.runtime.run()).await?;
    assert_eq!(outcome.cause, CompletionCause::LaunchFailed);
    assert!(!outcome.followup_launched);

    assert_eq!(h.launcher.attempts(), vec![CommandSpec::new("missing.exe", "--x")]);
    assert_eq!(h.launcher.attempts_of("b.exe"), 0);

    let log = h.surface.log();
    assert_eq!(log.errors.len(), 1);
    assert!(log.errors[0].1.contains("missing.exe"));
    assert_eq!(log.count("dispose"), 1);
    assert_eq!(h.icons.released().len(), 1);

    Ok(())
}

#[tokio::test]
async fn concurrent_triggers_launch_followup_once() -> TestResult {
    init_tracing();

    let config = RelayConfigBuilder::new("a.exe")
        .followup("b.exe")
        .windowed(true)
        .build();
    let h = harness(config, FakeLauncher::new(), ScriptedCensus::counts([1, 0]));
    let launcher = h.launcher.clone();

    let run = tokio::spawn(h.runtime.run());
    let primary = wait_for_process(&launcher, 0).await;

    let mut triggers = Vec::new();
    for i in 0..32 {
        let tx = h.tx.clone();
        let primary = primary.clone();
        triggers.push(tokio::spawn(async move {
            match i % 3 {
                0 => {
                    let _ = tx.send(RelayEvent::Tick).await;
                }
                1 => {
                    let _ = tx.send(RelayEvent::PrimaryExited { code: Some(0) }).await;
                }
                _ => {
                    primary.exit(0);
                }
            }
        }));
    }
    for trigger in triggers {
        trigger.await?;
    }

    let outcome = with_timeout(run).await??;
    assert!(outcome.cause.launches_followup());
    assert!(outcome.followup_launched);

    assert_eq!(launcher.attempts_of("b.exe"), 1);
    // Primary handle plus the (unwatched) follow-up handle.
    assert_eq!(launcher.released(), 2);

    let log = h.surface.log();
    assert_eq!(log.count("hide"), 1);
    assert_eq!(log.count("dispose"), 1);
    assert_eq!(h.icons.released().len(), 1);

    Ok(())
}

#[tokio::test]
async fn followup_failure_is_reported_but_teardown_proceeds() -> TestResult {
    init_tracing();

    let config = RelayConfigBuilder::new("a.exe")
        .followup("gone.exe")
        .build();
    let launcher = FakeLauncher::new().with_missing("gone.exe");
    let h = harness(config, launcher, ScriptedCensus::default());

    h.tx.send(RelayEvent::PrimaryExited { code: Some(3) }).await?;

    let outcome = with_timeout(h.runtime.run()).await?;
    assert_eq!(outcome.cause, CompletionCause::PrimaryExited { code: Some(3) });
    assert!(!outcome.followup_launched);
    assert_eq!(h.launcher.attempts_of("gone.exe"), 1);

    let log = h.surface.log();
    assert_eq!(log.errors.len(), 1);
    assert_eq!(log.count("hide"), 1);
    assert_eq!(log.count("dispose"), 1);

    Ok(())
}

#[tokio::test]
async fn details_action_lists_windows_and_exit_action_skips_followup() -> TestResult {
    init_tracing();

    let config = RelayConfigBuilder::new("a.exe")
        .followup("b.exe")
        .title("Session")
        .windowed(true)
        .build();
    let h = harness(config, FakeLauncher::new(), ScriptedCensus::counts([3]));

    h.tx.send(RelayEvent::Tick).await?;
    h.tx.send(RelayEvent::ActionInvoked(StatusAction::ShowDetails)).await?;
    h.tx.send(RelayEvent::ActionInvoked(StatusAction::Exit)).await?;

    let outcome = with_timeout(h.runtime.run()).await?;
    assert_eq!(outcome.cause, CompletionCause::UserExit);
    assert!(!outcome.followup_launched);
    assert_eq!(h.launcher.attempts_of("b.exe"), 0);

    let log = h.surface.log();
    assert_eq!(
        log.actions,
        vec![StatusAction::ShowDetails, StatusAction::Exit]
    );
    assert_eq!(log.details.len(), 1);
    assert!(log.details[0].0.starts_with("Session"));
    assert_eq!(
        log.details[0].1,
        vec![
            "window 1".to_string(),
            "window 2".to_string(),
            "(untitled)".to_string(),
        ]
    );
    assert!(log.texts.iter().any(|t| t.contains("windows: 3")));

    Ok(())
}

#[tokio::test]
async fn surface_is_shown_before_launch_and_hidden_before_disposal() -> TestResult {
    init_tracing();

    let config = RelayConfigBuilder::new("a.exe").build();
    let h = harness(config, FakeLauncher::new(), ScriptedCensus::default());

    h.tx.send(RelayEvent::ShutdownRequested).await?;
    with_timeout(h.runtime.run()).await?;

    let calls = h.surface.log().calls;
    let pos = |name: &str| calls.iter().position(|c| *c == name).unwrap();
    assert!(pos("register_action") < pos("show"));
    assert!(pos("show") < pos("set_text"));
    assert!(pos("hide") < pos("dispose"));
    assert_eq!(calls.last(), Some(&"dispose"));

    Ok(())
}
