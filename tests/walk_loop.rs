//! End-to-end exercise of the pipeline and the continuous runner through
//! the public API, with every external dependency mocked.

use image::RgbImage;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use visaid::pipeline::{PipelineResult, Stage};
use visaid::{
    CdisPipeline, ContinuousRunner, ImagePreprocessor, MockDescriptionClient, MockDevice,
    MockInstructionClient,
};

fn write_photo(path: &Path) {
    RgbImage::from_pixel(320, 240, image::Rgb([200, 180, 160]))
        .save(path)
        .unwrap();
}

struct Scenario {
    device: Arc<MockDevice>,
    describer: Arc<MockDescriptionClient>,
    instructor: Arc<MockInstructionClient>,
    pipeline: Arc<CdisPipeline>,
    _dir: tempfile::TempDir,
}

fn scenario(device: MockDevice) -> Scenario {
    let dir = tempfile::tempdir().unwrap();
    let photo = dir.path().join("walk.jpg");
    write_photo(&photo);

    let device = Arc::new(device.with_photo_path(photo));
    let describer = Arc::new(MockDescriptionClient::with_response(
        "a chair in front of you",
    ));
    let instructor = Arc::new(MockInstructionClient::with_response(
        "step slightly left to avoid the chair",
    ));
    let pipeline = Arc::new(CdisPipeline::new(
        device.clone(),
        ImagePreprocessor::new(85),
        describer.clone(),
        instructor.clone(),
    ));
    Scenario {
        device,
        describer,
        instructor,
        pipeline,
        _dir: dir,
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn walk_cycle_describes_instructs_and_speaks() {
    let s = scenario(MockDevice::new());

    let result = s.pipeline.run_once().await;

    assert_eq!(
        result,
        PipelineResult::Success {
            description: "a chair in front of you".to_string(),
            instruction: "step slightly left to avoid the chair".to_string(),
            spoken: true,
        }
    );
    assert_eq!(s.device.photo_count(), 1);
    assert_eq!(s.describer.call_count(), 1);
    assert_eq!(s.instructor.call_count(), 1);
    assert_eq!(
        s.device.spoken(),
        vec!["step slightly left to avoid the chair"]
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn capture_failure_makes_no_remote_calls() {
    let s = scenario(MockDevice::new().with_capture_failure());

    let result = s.pipeline.run_once().await;

    assert!(matches!(
        result,
        PipelineResult::Failure {
            stage: Stage::Capture,
            ..
        }
    ));
    assert_eq!(s.describer.call_count(), 0);
    assert_eq!(s.instructor.call_count(), 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn runner_delivers_every_cycle_in_order() {
    let s = scenario(MockDevice::new());
    let runner = ContinuousRunner::new(s.pipeline.clone(), Duration::from_millis(10));
    let rx = runner.subscribe();

    assert!(runner.start());
    let mut results = Vec::new();
    for _ in 0..3 {
        results.push(rx.recv_timeout(Duration::from_secs(5)).unwrap());
    }
    runner.stop().await;

    assert!(results.iter().all(|r| matches!(
        r,
        PipelineResult::Success { spoken: true, .. }
    )));
    assert!(s.device.photo_count() >= 3);
}

#[tokio::test(flavor = "multi_thread")]
async fn runner_start_is_idempotent() {
    let s = scenario(MockDevice::new());
    let runner = ContinuousRunner::new(s.pipeline.clone(), Duration::from_secs(60));

    assert!(runner.start());
    assert!(!runner.start());
    assert!(runner.is_running());

    runner.stop().await;
    assert!(!runner.is_running());
}

#[tokio::test(flavor = "multi_thread")]
async fn runner_stops_itself_after_hard_failure() {
    let s = scenario(MockDevice::new().with_capture_failure());
    let runner = ContinuousRunner::new(s.pipeline.clone(), Duration::from_millis(10));
    let rx = runner.subscribe();

    assert!(runner.start());
    let result = rx.recv_timeout(Duration::from_secs(5)).unwrap();
    assert!(result.is_hard_failure());

    // Only the failing invocation ran; the loop did not try again.
    assert!(rx.recv_timeout(Duration::from_millis(300)).is_err());
    assert_eq!(s.device.photo_count(), 1);
    runner.stop().await;
    assert!(!runner.is_running());
}

#[tokio::test(flavor = "multi_thread")]
async fn prompt_stop_runs_at_most_one_cycle() {
    let s = scenario(MockDevice::new());
    let runner = ContinuousRunner::new(s.pipeline.clone(), Duration::from_secs(60));

    assert!(runner.start());
    runner.stop().await;

    assert!(!runner.is_running());
    assert!(s.device.photo_count() <= 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn partial_failure_keeps_the_loop_alive() {
    let dir = tempfile::tempdir().unwrap();
    let photo = dir.path().join("walk.jpg");
    write_photo(&photo);

    let device = Arc::new(MockDevice::new().with_photo_path(photo));
    let pipeline = Arc::new(CdisPipeline::new(
        device.clone(),
        ImagePreprocessor::new(85),
        Arc::new(MockDescriptionClient::with_failure()),
        Arc::new(MockInstructionClient::new()),
    ));
    let runner = ContinuousRunner::new(pipeline, Duration::from_millis(10));
    let rx = runner.subscribe();

    assert!(runner.start());
    let first = rx.recv_timeout(Duration::from_secs(5)).unwrap();
    let second = rx.recv_timeout(Duration::from_secs(5)).unwrap();
    runner.stop().await;

    for result in [first, second] {
        assert!(matches!(
            result,
            PipelineResult::PartialFailure {
                stage: Stage::Describe,
                description: None,
                ..
            }
        ));
    }
}
