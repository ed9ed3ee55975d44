use serde::{Deserialize, Serialize};

/// Body returned by the interpreter, tagged by its `status` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum InterpreterResponse {
    Success {
        #[serde(default)]
        alarm_time: Option<String>,
        #[serde(default)]
        reason: Option<String>,
    },
    Error {
        #[serde(default)]
        message: Option<String>,
    },
}

#[derive(Debug, Serialize)]
pub(crate) struct InterpretRequest<'a> {
    pub text: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_body_is_decoded() {
        let body = r#"{"status":"success","alarm_time":"every 30 minutes","reason":"drink water"}"#;

        let response: InterpreterResponse = serde_json::from_str(body).unwrap();

        assert_eq!(
            response,
            InterpreterResponse::Success {
                alarm_time: Some("every 30 minutes".to_owned()),
                reason: Some("drink water".to_owned()),
            }
        );
    }

    #[test]
    fn success_body_without_fields_is_decoded() {
        let response: InterpreterResponse =
            serde_json::from_str(r#"{"status":"success"}"#).unwrap();

        assert_eq!(
            response,
            InterpreterResponse::Success {
                alarm_time: None,
                reason: None,
            }
        );
    }

    #[test]
    fn error_body_is_decoded() {
        let response: InterpreterResponse =
            serde_json::from_str(r#"{"status":"error","message":"Could not understand"}"#)
                .unwrap();

        assert_eq!(
            response,
            InterpreterResponse::Error {
                message: Some("Could not understand".to_owned()),
            }
        );
    }

    #[test]
    fn unknown_status_is_an_error() {
        assert!(serde_json::from_str::<InterpreterResponse>(r#"{"status":"pending"}"#).is_err());
    }
}
