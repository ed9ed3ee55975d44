use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleInstruction {
    Repeating { period_ms: u64 },
    OneShot { fire_at_epoch_ms: i64 },
    Rejected { reason: String },
}

impl ScheduleInstruction {
    pub fn repeating(period_ms: u64) -> Self {
        if period_ms == 0 {
            return Self::rejected("Repeat period must be positive.");
        }

        Self::Repeating { period_ms }
    }

    pub fn one_shot(fire_at: DateTime<Utc>) -> Self {
        let fire_at_epoch_ms = fire_at.timestamp_millis();
        if fire_at_epoch_ms <= 0 {
            return Self::rejected(format!("Alarm time {fire_at} is not after the epoch."));
        }

        Self::OneShot { fire_at_epoch_ms }
    }

    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected {
            reason: reason.into(),
        }
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }
}

/// A parsed instruction together with the text to deliver when it fires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleRequest {
    pub instruction: ScheduleInstruction,
    pub reason: String,
}

impl ScheduleRequest {
    pub fn new(instruction: ScheduleInstruction, reason: impl Into<String>) -> Self {
        Self {
            instruction,
            reason: reason.into(),
        }
    }
}
