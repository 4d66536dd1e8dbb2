//! Background producers, one thread per tile.
//!
//! A worker calls its generator, publishes the lines into the tile's
//! [`FreshnessQueue`] and waits one period. Pause, resume and stop arrive as
//! [`WorkerCommand`]s over a channel; the thread owns its [`WorkerStatus`].

use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, Once};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use serde_json::json;

use crate::generator::ContentGenerator;
use crate::logging::{LogLevel, Logger, event_with_fields, json_kv};
use crate::metrics::EngineMetrics;
use crate::queue::FreshnessQueue;

const THREAD_PREFIX: &str = "tile-worker-";

/// Lines produced by one generator call.
pub type Payload = Vec<String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerCommand {
    Pause,
    Resume,
    Stop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerStatus {
    Running,
    Paused,
    Stopped,
}

impl WorkerStatus {
    /// Transition table. `Stopped` is terminal.
    pub fn apply(self, command: WorkerCommand) -> WorkerStatus {
        match (self, command) {
            (WorkerStatus::Stopped, _) | (_, WorkerCommand::Stop) => WorkerStatus::Stopped,
            (_, WorkerCommand::Pause) => WorkerStatus::Paused,
            (_, WorkerCommand::Resume) => WorkerStatus::Running,
        }
    }
}

/// Per-worker knobs, filled in by the engine from the tile configuration.
#[derive(Clone)]
pub struct WorkerSettings {
    pub label: String,
    pub period: Duration,
    pub paused_poll: Duration,
    pub start_paused: bool,
    pub logger: Option<Logger>,
    pub metrics: Option<Arc<Mutex<EngineMetrics>>>,
}

impl WorkerSettings {
    pub fn new(label: impl Into<String>, period: Duration) -> Self {
        Self {
            label: label.into(),
            period,
            paused_poll: Duration::from_millis(100),
            start_paused: false,
            logger: None,
            metrics: None,
        }
    }
}

/// Engine-side handle to a worker thread.
pub struct Worker {
    index: usize,
    commands: Sender<WorkerCommand>,
    done: Receiver<()>,
    handle: Option<JoinHandle<()>>,
    status: WorkerStatus,
}

impl Worker {
    pub fn spawn(
        index: usize,
        generator: Box<dyn ContentGenerator>,
        queue: FreshnessQueue<Payload>,
        settings: WorkerSettings,
    ) -> std::io::Result<Self> {
        quiet_worker_panics();
        let (commands, command_rx) = mpsc::channel();
        let (done_tx, done) = mpsc::channel();
        let status = if settings.start_paused {
            WorkerStatus::Paused
        } else {
            WorkerStatus::Running
        };

        let handle = thread::Builder::new()
            .name(format!("{THREAD_PREFIX}{index}"))
            .spawn(move || {
                let mut task = WorkerTask {
                    index,
                    generator,
                    queue,
                    commands: command_rx,
                    settings,
                };
                task.run(status);
                let _ = done_tx.send(());
            })?;

        Ok(Self {
            index,
            commands,
            done,
            handle: Some(handle),
            status,
        })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Status as last commanded by the engine.
    pub fn status(&self) -> WorkerStatus {
        self.status
    }

    pub fn pause(&mut self) {
        self.send(WorkerCommand::Pause);
    }

    pub fn resume(&mut self) {
        self.send(WorkerCommand::Resume);
    }

    pub fn toggle_pause(&mut self) {
        match self.status {
            WorkerStatus::Running => self.pause(),
            WorkerStatus::Paused => self.resume(),
            WorkerStatus::Stopped => {}
        }
    }

    /// Ask the thread to exit once its in-flight generator call returns.
    pub fn stop(&mut self) {
        self.send(WorkerCommand::Stop);
    }

    /// Wait up to `grace` for the thread to finish. A worker stuck inside a
    /// slow generator is detached rather than waited on forever.
    pub fn join(&mut self, grace: Duration) -> bool {
        let finished = match self.done.recv_timeout(grace) {
            Ok(()) | Err(RecvTimeoutError::Disconnected) => true,
            Err(RecvTimeoutError::Timeout) => false,
        };
        if finished {
            if let Some(handle) = self.handle.take() {
                let _ = handle.join();
            }
        } else {
            self.handle.take();
        }
        finished
    }

    fn send(&mut self, command: WorkerCommand) {
        if self.status == WorkerStatus::Stopped {
            return;
        }
        self.status = if self.commands.send(command).is_ok() {
            self.status.apply(command)
        } else {
            WorkerStatus::Stopped
        };
    }
}

struct WorkerTask {
    index: usize,
    generator: Box<dyn ContentGenerator>,
    queue: FreshnessQueue<Payload>,
    commands: Receiver<WorkerCommand>,
    settings: WorkerSettings,
}

impl WorkerTask {
    fn run(&mut self, mut status: WorkerStatus) {
        loop {
            status = match status {
                WorkerStatus::Running => {
                    self.queue.discard_stale();
                    if self.tick() {
                        self.wait(self.settings.period, status)
                    } else {
                        WorkerStatus::Stopped
                    }
                }
                WorkerStatus::Paused => self.wait(self.settings.paused_poll, status),
                WorkerStatus::Stopped => break,
            };
        }
    }

    /// One generator call. Returns false once the queue has been closed.
    fn tick(&mut self) -> bool {
        let generator = &mut self.generator;
        match panic::catch_unwind(AssertUnwindSafe(|| generator.generate())) {
            Ok(Ok(lines)) => self.queue.publish(lines).is_ok(),
            Ok(Err(err)) => {
                self.report_failure("generator_failed", err.message());
                true
            }
            Err(payload) => {
                self.report_failure("generator_panicked", &panic_message(&*payload));
                true
            }
        }
    }

    /// Sleep on the command channel so commands apply without waiting out the period.
    fn wait(&self, timeout: Duration, current: WorkerStatus) -> WorkerStatus {
        let deadline = Instant::now().checked_add(timeout);
        loop {
            let received = match deadline {
                Some(deadline) => self
                    .commands
                    .recv_timeout(deadline.saturating_duration_since(Instant::now())),
                // Past the clock's range: only a command wakes the worker.
                None => self
                    .commands
                    .recv()
                    .map_err(|_| RecvTimeoutError::Disconnected),
            };
            match received {
                Ok(command) => {
                    let next = current.apply(command);
                    if next != current {
                        return next;
                    }
                }
                Err(RecvTimeoutError::Timeout) => return current,
                Err(RecvTimeoutError::Disconnected) => return WorkerStatus::Stopped,
            }
        }
    }

    fn report_failure(&self, message: &str, detail: &str) {
        if let Some(metrics) = self.settings.metrics.as_ref() {
            if let Ok(mut guard) = metrics.lock() {
                guard.record_generator_failure();
            }
        }
        if let Some(logger) = self.settings.logger.as_ref() {
            let event = event_with_fields(
                LogLevel::Warn,
                "tiles::worker",
                message,
                [
                    json_kv("tile", json!(self.index)),
                    json_kv("label", json!(self.settings.label)),
                    json_kv("error", json!(detail)),
                ],
            );
            let _ = logger.log_event(event);
        }
    }
}

/// Keep panics on worker threads off stderr, which would draw over the
/// terminal. The worker reports them through the logger instead. Panics
/// anywhere else still reach the previous hook. Installed once per process.
fn quiet_worker_panics() {
    static INSTALL: Once = Once::new();
    INSTALL.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if !is_worker_thread(thread::current().name()) {
                previous(info);
            }
        }));
    });
}

fn is_worker_thread(name: Option<&str>) -> bool {
    name.is_some_and(|name| name.starts_with(THREAD_PREFIX))
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("generator panicked: {message}")
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("generator panicked: {message}")
    } else {
        "generator panicked".to_string()
    }
}
