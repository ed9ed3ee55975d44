pub mod delivery;
pub mod manager;
pub mod parser;
pub mod timer;

pub use delivery::{
    AlarmNotifier, FallbackAlert, NoNotificationChannel, NotificationChannel,
    NotificationDispatcher, NotificationPermission,
};
pub use manager::{ScheduleKind, ScheduleManager, ScheduleOutcome};
pub use parser::DirectiveParser;
pub use timer::{Timer, TimerHandle, TokioTimer};
