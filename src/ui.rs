use std::io::{self, Write};

use alarmclock_scheduler::FallbackAlert;

use crate::orchestrator::RequestOutcome;

/// Rings the terminal bell and prints the alarm to stderr.
pub struct TerminalAlert;

impl FallbackAlert for TerminalAlert {
    fn alert(&self, text: &str) {
        let mut stderr = io::stderr().lock();
        let _ = writeln!(stderr, "\x07⏰ {text}");
        let _ = stderr.flush();
    }
}

/// What the input loop does with one `next_line` result.
#[derive(Debug, PartialEq, Eq)]
pub enum Input {
    Line(String),
    /// Unreadable line; the loop keeps going.
    Skip,
    End,
}

pub fn read_input(line: io::Result<Option<String>>) -> Input {
    match line {
        Ok(Some(line)) => Input::Line(line),
        Ok(None) => Input::End,
        Err(error) if error.kind() == io::ErrorKind::InvalidData => {
            log::warn!("Skipping input line that is not valid UTF-8. [error = {error}]");
            Input::Skip
        }
        Err(error) => {
            log::error!("Could not read input, no more requests will be taken. [error = {error}]");
            Input::End
        }
    }
}

pub fn prompt() {
    let mut stdout = io::stdout().lock();
    let _ = write!(stdout, "> ");
    let _ = stdout.flush();
}

pub fn render(outcome: &RequestOutcome) -> Option<String> {
    match outcome {
        RequestOutcome::Ignored => None,
        RequestOutcome::Scheduled { directive, .. } => Some(format!(
            "✅ Alarm set successfully!\n⏰ Alarm Time: {}\n📌 Reason: {}\n(You will be notified when it goes off)",
            directive.time_expression(),
            directive.reason()
        )),
        RequestOutcome::Failed { message } if message.is_empty() => {
            Some("❌ Something went wrong".to_owned())
        }
        RequestOutcome::Failed { message } => Some(format!("❌ {message}")),
    }
}
