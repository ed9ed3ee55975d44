use std::{future::Future, pin::Pin, sync::Arc, time::Duration};

use tokio::{
    task::{self, JoinHandle},
    time::{self, Instant, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;

pub type FireFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

/// Invoked on every firing of an armed timer.
pub type FireCallback = Arc<dyn Fn() -> FireFuture + Send + Sync>;

pub trait TimerHandle: Send {
    /// Releases the timer. Nothing fires after this returns; calling it again is a no-op.
    fn cancel(&mut self);

    /// `false` once cancelled, or once a one-shot timer has fired.
    fn is_armed(&self) -> bool;
}

pub trait Timer: Send + Sync + 'static {
    type Handle: TimerHandle;

    fn arm_once(&self, delay: Duration, on_fire: FireCallback) -> Self::Handle;

    /// First firing happens one `period` after arming. `period` must be non-zero.
    fn arm_every(&self, period: Duration, on_fire: FireCallback) -> Self::Handle;
}

/// Timer primitives backed by tasks on the current tokio runtime.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioTimer;

pub struct TokioTimerHandle {
    task: JoinHandle<()>,
    cancellation_token: CancellationToken,
}

impl TokioTimerHandle {
    fn new(task: JoinHandle<()>, cancellation_token: CancellationToken) -> Self {
        Self {
            task,
            cancellation_token,
        }
    }
}

impl TimerHandle for TokioTimerHandle {
    fn cancel(&mut self) {
        self.cancellation_token.cancel();
        self.task.abort();
    }

    fn is_armed(&self) -> bool {
        !self.cancellation_token.is_cancelled() && !self.task.is_finished()
    }
}

impl Timer for TokioTimer {
    type Handle = TokioTimerHandle;

    fn arm_once(&self, delay: Duration, on_fire: FireCallback) -> Self::Handle {
        let cancellation_token = CancellationToken::new();
        let task_cancellation_token = cancellation_token.child_token();

        let task = task::spawn(async move {
            tokio::select! {
                biased;
                _ = task_cancellation_token.cancelled() => {
                    log::debug!("One-shot timer cancelled before firing.");
                }
                _ = time::sleep(delay) => {
                    on_fire().await;
                }
            }
        });

        TokioTimerHandle::new(task, cancellation_token)
    }

    fn arm_every(&self, period: Duration, on_fire: FireCallback) -> Self::Handle {
        let cancellation_token = CancellationToken::new();
        let task_cancellation_token = cancellation_token.child_token();

        let task = task::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    _ = task_cancellation_token.cancelled() => {
                        log::debug!("Interval timer cancelled.");
                        break;
                    }
                    _ = interval.tick() => {
                        on_fire().await;
                    }
                }
            }
        });

        TokioTimerHandle::new(task, cancellation_token)
    }
}
