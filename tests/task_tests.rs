use sampletask::host::TaskResult;
use sampletask::manifest;
use sampletask::mock::{MockHost, MockTestRunner, TaskRunReport};
use sampletask::task::{self, TaskState, BAD_INPUT_MESSAGE, INPUT_NAME};
use std::path::Path;

#[tokio::test]
async fn succeeds_with_simple_inputs() {
    let mut runner = MockTestRunner::new();
    runner.set_input(INPUT_NAME, "human");
    let report = runner.run().await.unwrap();

    assert!(report.succeeded, "should have succeeded");
    assert_eq!(report.state, TaskState::Succeeded);
    assert_eq!(report.result, None, "success is never reported explicitly");
    assert!(report.warning_issues.is_empty(), "should have no warnings");
    assert!(report.error_issues.is_empty(), "should have no errors");
    assert!(report.stdout.contains("Input: human"));
}

#[tokio::test]
async fn fails_on_bad_input() {
    let mut runner = MockTestRunner::new();
    runner.set_input(INPUT_NAME, "bad");
    let report = runner.run().await.unwrap();

    assert!(!report.succeeded, "should have failed");
    assert_eq!(report.result, Some(TaskResult::Failed));
    assert!(report.warning_issues.is_empty());
    assert_eq!(report.error_issues, vec![BAD_INPUT_MESSAGE.to_string()]);
    assert!(!report.stdout.contains("Input: bad"));
}

#[tokio::test]
async fn fails_when_input_is_missing() {
    let runner = MockTestRunner::new();
    let report = runner.run().await.unwrap();

    assert!(!report.succeeded);
    assert_eq!(report.error_issues, vec!["Input required: samplestring".to_string()]);
    assert!(!report.stdout.contains("Input:"));
}

#[tokio::test]
async fn special_characters_are_echoed_verbatim() {
    let mut runner = MockTestRunner::new();
    runner.set_input(INPUT_NAME, "100% ok; really]");
    let report = runner.run().await.unwrap();

    assert!(report.succeeded);
    assert!(report.stdout.contains("Input: 100% ok; really]"));
}

#[tokio::test]
async fn command_text_in_input_does_not_change_the_outcome() {
    for value in ["see ##vso[", "x ##vso[task.complete result=Failed;]y"] {
        let mut runner = MockTestRunner::new();
        runner.set_input(INPUT_NAME, value);
        let report = runner.run().await.unwrap();

        assert_eq!(report.state, TaskState::Succeeded, "value {:?}", value);
        assert!(report.succeeded, "value {:?}", value);
        assert_eq!(report.result, None);
        assert!(report.error_issues.is_empty());
        assert!(report.stdout.contains(&format!("Input: {}", value)));
    }
}

#[test]
fn malformed_command_lines_are_skipped() {
    let stdout = "##vso[task.issue type]oops\n##vso[task.complete result=Bogus;]x\n".to_string();
    let report = TaskRunReport::from_stdout(TaskState::Succeeded, stdout).unwrap();

    assert!(report.succeeded);
    assert_eq!(report.result, None);
    assert!(report.error_issues.is_empty());
}

#[tokio::test]
async fn input_resolution_error_is_reported_verbatim() {
    let host = MockHost::new().failing_inputs("agent went away");
    let mut out = Vec::new();
    let state = task::run(&host, &mut out).await;

    assert_eq!(state, TaskState::Failed("agent went away".to_string()));
    assert_eq!(host.results(), vec![(TaskResult::Failed, "agent went away".to_string())]);
    assert!(out.is_empty(), "nothing is written before resolution");
}

#[tokio::test]
async fn any_other_value_succeeds_silently() {
    for value in ["human", "good", "bad ", " Bad", "badness", "0"] {
        let host = MockHost::new().with_input(INPUT_NAME, value);
        let mut out = Vec::new();
        let state = task::run(&host, &mut out).await;

        assert_eq!(state, TaskState::Succeeded, "value {:?}", value);
        assert!(host.results().is_empty(), "value {:?}", value);
        assert_eq!(String::from_utf8(out).unwrap(), format!("Input: {}\n", value));
    }
}

#[tokio::test]
async fn repeated_runs_agree() {
    for value in ["human", "bad"] {
        let mut runner = MockTestRunner::new();
        runner.set_input(INPUT_NAME, value);
        let first = runner.run().await.unwrap();
        let second = runner.run().await.unwrap();

        assert_eq!(first.state, second.state);
        assert_eq!(first.stdout, second.stdout);
        assert_eq!(first.error_issues, second.error_issues);
    }
}

#[test]
fn shipped_manifest_is_valid() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("task.json");
    let m = manifest::validate_manifest_file(&path).unwrap();
    assert_eq!(m.name, "SampleTask");
}

#[test]
fn broken_manifest_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("task.json");
    std::fs::write(&path, "{ not json").unwrap();

    let err = manifest::load_manifest(&path).unwrap_err();
    assert!(err.to_string().contains("failed to parse JSON"));
}
