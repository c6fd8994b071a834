use serde::Deserialize;

use super::Homework;
use crate::error::PollError;

const REVIEWED_TEMPLATE_PREFIX: &str = "У вас проверили работу";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeworkStatus {
    Rejected,
    Approved,
    Reviewing,
}

impl HomeworkStatus {
    pub fn from_api(status: &str) -> Option<Self> {
        match status {
            "rejected" => Some(HomeworkStatus::Rejected),
            "approved" => Some(HomeworkStatus::Approved),
            "reviewing" => Some(HomeworkStatus::Reviewing),
            _ => None,
        }
    }

    pub fn verdict(self) -> &'static str {
        match self {
            HomeworkStatus::Rejected => "К сожалению в работе нашлись ошибки.",
            HomeworkStatus::Approved => {
                "Ревьюеру всё понравилось, можно приступать к следующему уроку."
            }
            HomeworkStatus::Reviewing => "Работа взята в ревью",
        }
    }
}

/// How to treat a status missing from the verdict table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusMode {
    /// Fail with [`PollError::UnexpectedStatus`].
    #[default]
    Strict,
    /// Report it as approved and log a warning.
    Lenient,
}

/// Render the chat message for a reviewed homework.
pub fn parse_homework_status(homework: &Homework, mode: StatusMode) -> Result<String, PollError> {
    let status = match (HomeworkStatus::from_api(&homework.status), mode) {
        (Some(status), _) => status,
        (None, StatusMode::Lenient) => {
            tracing::warn!(
                status = %homework.status,
                homework = %homework.homework_name,
                "Unknown homework status, reporting as approved"
            );
            HomeworkStatus::Approved
        }
        (None, StatusMode::Strict) => {
            return Err(PollError::UnexpectedStatus {
                status: homework.status.clone(),
            })
        }
    };

    Ok(format!(
        "{} \"{}\"!\n\n{}",
        REVIEWED_TEMPLATE_PREFIX,
        homework.homework_name,
        status.verdict()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn homework(name: &str, status: &str) -> Homework {
        Homework {
            homework_name: name.to_string(),
            status: status.to_string(),
        }
    }

    #[test]
    fn test_approved_message() {
        let message =
            parse_homework_status(&homework("proj1", "approved"), StatusMode::Strict).unwrap();
        assert_eq!(
            message,
            "У вас проверили работу \"proj1\"!\n\nРевьюеру всё понравилось, можно приступать к следующему уроку."
        );
    }

    #[test]
    fn test_rejected_message() {
        let message =
            parse_homework_status(&homework("hw05", "rejected"), StatusMode::Strict).unwrap();
        assert_eq!(
            message,
            "У вас проверили работу \"hw05\"!\n\nК сожалению в работе нашлись ошибки."
        );
    }

    #[test]
    fn test_every_known_status_uses_its_own_verdict() {
        for (raw, status) in [
            ("rejected", HomeworkStatus::Rejected),
            ("approved", HomeworkStatus::Approved),
            ("reviewing", HomeworkStatus::Reviewing),
        ] {
            for mode in [StatusMode::Strict, StatusMode::Lenient] {
                let message = parse_homework_status(&homework("x", raw), mode).unwrap();
                assert_eq!(
                    message,
                    format!("У вас проверили работу \"x\"!\n\n{}", status.verdict())
                );
            }
        }
    }

    #[test]
    fn test_strict_rejects_unknown_status() {
        let err =
            parse_homework_status(&homework("proj1", "lost"), StatusMode::Strict).unwrap_err();
        match err {
            PollError::UnexpectedStatus { status } => assert_eq!(status, "lost"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_lenient_reports_unknown_as_approved() {
        let message =
            parse_homework_status(&homework("proj1", "lost"), StatusMode::Lenient).unwrap();
        assert!(message.ends_with(HomeworkStatus::Approved.verdict()));
    }

    #[test]
    fn test_lenient_keeps_reviewing_distinct() {
        let message =
            parse_homework_status(&homework("proj1", "reviewing"), StatusMode::Lenient).unwrap();
        assert!(message.ends_with("Работа взята в ревью"));
        assert!(!message.contains(HomeworkStatus::Approved.verdict()));
    }

    #[test]
    fn test_status_mode_from_toml_value() {
        #[derive(Deserialize)]
        struct Wrapper {
            mode: StatusMode,
        }
        let parsed: Wrapper = toml::from_str("mode = \"lenient\"").unwrap();
        assert_eq!(parsed.mode, StatusMode::Lenient);
    }
}
