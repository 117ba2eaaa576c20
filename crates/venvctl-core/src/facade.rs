use serde_json::{json, Value};

use crate::context::CommandInfo;
use crate::outcome::{CommandStatus, ExecutionOutcome};

#[must_use]
pub fn to_json_response(info: CommandInfo, outcome: &ExecutionOutcome) -> Value {
    let status = match outcome.status {
        CommandStatus::Ok => "ok",
        CommandStatus::UserError => "user-error",
        CommandStatus::Failure => "error",
    };
    let details = match &outcome.details {
        Value::Object(_) => outcome.details.clone(),
        Value::Null => json!({}),
        other => json!({ "value": other }),
    };
    json!({
        "status": status,
        "message": format_status_message(info, &outcome.message),
        "details": details,
    })
}

#[must_use]
pub fn format_status_message(info: CommandInfo, message: &str) -> String {
    let prefix = format!("venvctl {}", info.name);
    if message.is_empty() {
        prefix
    } else if message.starts_with(&prefix) {
        message.to_string()
    } else {
        format!("{prefix}: {message}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_message_is_prefixed_once() {
        let info = CommandInfo::new("list");
        assert_eq!(
            format_status_message(info, "Found 0 virtual environment(s)"),
            "venvctl list: Found 0 virtual environment(s)"
        );
        assert_eq!(
            format_status_message(info, "venvctl list: already prefixed"),
            "venvctl list: already prefixed"
        );
        assert_eq!(format_status_message(info, ""), "venvctl list");
    }

    #[test]
    fn json_response_wraps_non_object_details() {
        let info = CommandInfo::new("remove");
        let outcome = ExecutionOutcome::failure("boom", Value::String("oops".into()));
        let payload = to_json_response(info, &outcome);
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["details"]["value"], "oops");
    }
}
