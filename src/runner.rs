//! Continuous walk mode: run the pipeline on a fixed cadence.
//!
//! A single background task owns the loop, so results reach every
//! subscriber in invocation order. The runner stops itself on a hard
//! pipeline failure (no photo means no point continuing) and keeps going
//! through partial failures.

use crate::pipeline::{CdisPipeline, PipelineResult};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

/// Drives [`CdisPipeline`] invocations on an interval until stopped.
pub struct ContinuousRunner {
    pipeline: Arc<CdisPipeline>,
    interval: Duration,
    running: Arc<AtomicBool>,
    stop_signal: Arc<Notify>,
    subscribers: Arc<std::sync::Mutex<Vec<crossbeam_channel::Sender<PipelineResult>>>>,
    task: std::sync::Mutex<Option<JoinHandle<()>>>,
}

impl ContinuousRunner {
    pub fn new(pipeline: Arc<CdisPipeline>, interval: Duration) -> Self {
        Self {
            pipeline,
            interval,
            running: Arc::new(AtomicBool::new(false)),
            stop_signal: Arc::new(Notify::new()),
            subscribers: Arc::new(std::sync::Mutex::new(Vec::new())),
            task: std::sync::Mutex::new(None),
        }
    }

    /// Register a results channel. Every result of every invocation after
    /// this call is delivered, in order. Dropped receivers are pruned on
    /// the next publish.
    pub fn subscribe(&self) -> crossbeam_channel::Receiver<PipelineResult> {
        let (tx, rx) = crossbeam_channel::unbounded();
        self.subscribers
            .lock()
            .expect("subscriber lock poisoned")
            .push(tx);
        rx
    }

    /// Whether the loop task is currently live.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Start the loop. Returns false (and does nothing) if it is already
    /// running; a stopped runner can be started again.
    pub fn start(&self) -> bool {
        if self
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            tracing::debug!("walk mode already running");
            return false;
        }

        let pipeline = self.pipeline.clone();
        let interval = self.interval;
        let running = self.running.clone();
        let stop_signal = self.stop_signal.clone();
        let subscribers = self.subscribers.clone();

        let handle = tokio::spawn(async move {
            tracing::info!(interval_secs = interval.as_secs(), "walk mode started");
            while running.load(Ordering::SeqCst) {
                let result = pipeline.run_once().await;
                let hard_failure = result.is_hard_failure();
                publish(&subscribers, result);

                if hard_failure {
                    tracing::error!("stopping walk mode after hard failure");
                    break;
                }

                // Sleep between cycles, but wake immediately on stop().
                // A wake-up alone is not a stop: a permit stored by a
                // stop() that raced a previous exit must not end this
                // session, so the flag decides.
                tokio::select! {
                    _ = stop_signal.notified() => {
                        if !running.load(Ordering::SeqCst) {
                            break;
                        }
                    }
                    _ = tokio::time::sleep(interval) => {}
                }
            }
            running.store(false, Ordering::SeqCst);
            tracing::info!("walk mode stopped");
        });

        *self.task.lock().expect("task lock poisoned") = Some(handle);
        true
    }

    /// Stop the loop and wait for the in-flight invocation to finish.
    /// A no-op when the runner is not running.
    pub async fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
        self.stop_signal.notify_one();
        let handle = self.task.lock().expect("task lock poisoned").take();
        if let Some(handle) = handle
            && let Err(e) = handle.await
        {
            tracing::warn!(error = %e, "walk mode task ended abnormally");
        }
    }
}

fn publish(
    subscribers: &std::sync::Mutex<Vec<crossbeam_channel::Sender<PipelineResult>>>,
    result: PipelineResult,
) {
    let mut subscribers = subscribers.lock().expect("subscriber lock poisoned");
    subscribers.retain(|tx| tx.send(result.clone()).is_ok());
}
