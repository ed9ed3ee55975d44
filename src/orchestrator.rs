use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use alarmclock_interpreter::{AlarmInterpreter, InterpreterError, InterpreterResponse};
use alarmclock_models::{directive::AlarmDirective, instruction::ScheduleRequest};
use alarmclock_scheduler::{
    DirectiveParser, ScheduleKind, ScheduleManager, ScheduleOutcome, Timer,
};

pub const UNREACHABLE_MESSAGE: &str =
    "⚠️ Could not reach the alarm server. Check that it is deployed and reachable.";
const STATUS_ERROR_MESSAGE: &str = "Alarm service responded with error";
const UNKNOWN_ERROR_MESSAGE: &str = "Something went wrong";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestOutcome {
    /// Blank input; nothing was sent.
    Ignored,
    /// The interpreter answered with a directive. A directive that could not be
    /// armed still lands here.
    Scheduled {
        directive: AlarmDirective,
        schedule: ScheduleOutcome,
    },
    /// The interpreter failed; the previously armed alarm is left as it was.
    Failed { message: String },
}

/// Shared view of whether an interpreter request is in flight.
#[derive(Debug, Clone, Default)]
pub struct BusyIndicator(Arc<AtomicBool>);

impl BusyIndicator {
    pub fn is_busy(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn enter(&self) -> InFlight {
        self.0.store(true, Ordering::SeqCst);
        InFlight(self.clone())
    }
}

/// Clears the flag when the request completes or its future is dropped.
struct InFlight(BusyIndicator);

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.0.store(false, Ordering::SeqCst);
    }
}

pub struct AlarmRequestOrchestrator<T: Timer> {
    interpreter: Arc<dyn AlarmInterpreter>,
    parser: DirectiveParser,
    manager: ScheduleManager<T>,
    busy: BusyIndicator,
}

impl<T: Timer> AlarmRequestOrchestrator<T> {
    pub fn new(
        interpreter: Arc<dyn AlarmInterpreter>,
        parser: DirectiveParser,
        manager: ScheduleManager<T>,
    ) -> Self {
        Self {
            interpreter,
            parser,
            manager,
            busy: BusyIndicator::default(),
        }
    }

    pub async fn handle_request(&mut self, text: &str) -> RequestOutcome {
        if text.trim().is_empty() {
            return RequestOutcome::Ignored;
        }

        let response = {
            let _in_flight = self.busy.enter();
            self.interpreter.interpret(text).await
        };

        match response {
            Ok(InterpreterResponse::Success { alarm_time, reason }) => {
                let directive =
                    AlarmDirective::new(alarm_time.unwrap_or_default(), reason.unwrap_or_default());
                let instruction = self.parser.parse(&directive);
                log::info!(
                    "Interpreted alarm request. [alarm_time = {:?}, instruction = {instruction:?}]",
                    directive.time_expression()
                );

                let schedule = self
                    .manager
                    .schedule(ScheduleRequest::new(instruction, directive.reason()));

                RequestOutcome::Scheduled {
                    directive,
                    schedule,
                }
            }
            Ok(InterpreterResponse::Error { message }) => {
                log::warn!("Interpreter could not handle the request. [message = {message:?}]");
                RequestOutcome::Failed {
                    message: message.unwrap_or_else(|| UNKNOWN_ERROR_MESSAGE.to_owned()),
                }
            }
            Err(error) => {
                log::error!("Alarm request failed. [error = {error}]");
                RequestOutcome::Failed {
                    message: failure_message(&error),
                }
            }
        }
    }

    pub fn busy_indicator(&self) -> BusyIndicator {
        self.busy.clone()
    }

    pub fn active_kind(&self) -> ScheduleKind {
        self.manager.active_kind()
    }

    /// Releases the armed alarm; the manager cancels on drop.
    pub fn shutdown(self) {
        log::info!(
            "Shutting down alarm orchestrator. [active = {:?}]",
            self.manager.active_kind()
        );
    }
}

fn failure_message(error: &InterpreterError) -> String {
    match error {
        InterpreterError::Unreachable(_) => UNREACHABLE_MESSAGE.to_owned(),
        InterpreterError::Status { body, .. } if !body.trim().is_empty() => body.clone(),
        InterpreterError::Status { .. } => STATUS_ERROR_MESSAGE.to_owned(),
        other => other.to_string(),
    }
}
