mod client;
mod response;

pub use client::{AlarmInterpreter, HttpAlarmInterpreter, InterpreterError};
pub use reqwest::StatusCode;
pub use response::InterpreterResponse;
