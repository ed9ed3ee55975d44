use std::{sync::Arc, time::Duration};

use alarmclock_models::instruction::{ScheduleInstruction, ScheduleRequest};
use chrono::{DateTime, Utc};

use crate::{
    delivery::AlarmNotifier,
    timer::{FireCallback, FireFuture, Timer, TimerHandle},
};

/// One-shot alarms further out than this are not armed locally.
pub const ONE_SHOT_HORIZON: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleKind {
    Interval,
    Timeout,
    None,
}

/// What `schedule` did with a request. Every variant counts as accepted by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleOutcome {
    ArmedInterval { period: Duration },
    ArmedTimeout { delay: Duration },
    DeclinedPast,
    DeclinedBeyondHorizon,
    Rejected { reason: String },
}

impl ScheduleOutcome {
    pub fn is_armed(&self) -> bool {
        matches!(self, Self::ArmedInterval { .. } | Self::ArmedTimeout { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decline {
    Past,
    BeyondHorizon,
}

/// Delay until `fire_at_epoch_ms`, if it lies strictly inside `(now, now + horizon)`.
pub fn one_shot_delay(fire_at_epoch_ms: i64, now: DateTime<Utc>) -> Result<Duration, Decline> {
    let delay_ms = fire_at_epoch_ms.saturating_sub(now.timestamp_millis());
    let delay = u64::try_from(delay_ms)
        .ok()
        .filter(|delay_ms| *delay_ms > 0)
        .map(Duration::from_millis)
        .ok_or(Decline::Past)?;

    if delay >= ONE_SHOT_HORIZON {
        return Err(Decline::BeyondHorizon);
    }

    Ok(delay)
}

struct ActiveSchedule<H> {
    kind: ScheduleKind,
    handle: H,
}

/// Owns the single armed alarm timer of this client.
pub struct ScheduleManager<T: Timer> {
    timer: T,
    notifier: Arc<dyn AlarmNotifier>,
    active: Option<ActiveSchedule<T::Handle>>,
}

impl<T: Timer> ScheduleManager<T> {
    pub fn new(timer: T, notifier: Arc<dyn AlarmNotifier>) -> Self {
        Self {
            timer,
            notifier,
            active: None,
        }
    }

    /// Replaces whatever is armed with `request`. The previous timer is
    /// released before the new one is armed.
    pub fn schedule(&mut self, request: ScheduleRequest) -> ScheduleOutcome {
        self.cancel();

        let ScheduleRequest {
            instruction,
            reason,
        } = request;

        match instruction {
            ScheduleInstruction::Repeating { period_ms } if period_ms > 0 => {
                let period = Duration::from_millis(period_ms);
                let handle = self.timer.arm_every(period, self.fire_callback(reason));
                self.active = Some(ActiveSchedule {
                    kind: ScheduleKind::Interval,
                    handle,
                });

                log::info!("Armed repeating alarm. [period = {period:?}]");
                ScheduleOutcome::ArmedInterval { period }
            }
            ScheduleInstruction::Repeating { .. } => {
                log::warn!("Ignoring repeating alarm with zero period.");
                ScheduleOutcome::Rejected {
                    reason: "Repeat period must be positive.".to_owned(),
                }
            }
            ScheduleInstruction::OneShot { fire_at_epoch_ms } => {
                match one_shot_delay(fire_at_epoch_ms, Utc::now()) {
                    Ok(delay) => {
                        let handle = self.timer.arm_once(delay, self.fire_callback(reason));
                        self.active = Some(ActiveSchedule {
                            kind: ScheduleKind::Timeout,
                            handle,
                        });

                        log::info!("Armed one-shot alarm. [delay = {delay:?}]");
                        ScheduleOutcome::ArmedTimeout { delay }
                    }
                    Err(Decline::Past) => {
                        log::warn!(
                            "Not arming alarm, its time has already passed. [fire_at_epoch_ms = {fire_at_epoch_ms}]"
                        );
                        ScheduleOutcome::DeclinedPast
                    }
                    Err(Decline::BeyondHorizon) => {
                        log::warn!(
                            "Not arming alarm, it is more than {ONE_SHOT_HORIZON:?} away. [fire_at_epoch_ms = {fire_at_epoch_ms}]"
                        );
                        ScheduleOutcome::DeclinedBeyondHorizon
                    }
                }
            }
            ScheduleInstruction::Rejected { reason } => {
                log::warn!("Invalid alarm time, nothing armed. [reason = {reason}]");
                ScheduleOutcome::Rejected { reason }
            }
        }
    }

    /// Releases the armed timer, if any. Safe to call repeatedly.
    pub fn cancel(&mut self) {
        if let Some(mut active) = self.active.take() {
            active.handle.cancel();
            log::info!("Cancelled alarm schedule. [kind = {:?}]", active.kind);
        }
    }

    /// Kind of the timer that can still fire. A one-shot that already fired reports `None`.
    pub fn active_kind(&self) -> ScheduleKind {
        match &self.active {
            Some(active) if active.handle.is_armed() => active.kind,
            _ => ScheduleKind::None,
        }
    }

    fn fire_callback(&self, reason: String) -> FireCallback {
        let notifier = Arc::clone(&self.notifier);
        let reason: Arc<str> = reason.into();

        Arc::new(move || -> FireFuture {
            let notifier = Arc::clone(&notifier);
            let reason = Arc::clone(&reason);
            Box::pin(async move {
                log::info!("Alarm fired. [reason = {reason}]");
                notifier.notify(&reason).await;
            })
        })
    }
}

impl<T: Timer> Drop for ScheduleManager<T> {
    fn drop(&mut self) {
        self.cancel();
    }
}
