// Notification payloads posted back to the chat platform's response URL.

use serde::Serialize;

use crate::domain::entities::run_summary::{RunSummary, SeverityColor};

/// Messages are visible to the whole channel, not only the invoking user.
pub const RESPONSE_TYPE_IN_CHANNEL: &str = "in_channel";

pub const SUMMARY_TITLE: &str = "Summary Test Result";
pub const STARTED_TITLE: &str = "Newman Test Run Started";
pub const COMMAND_ERROR_TITLE: &str = "Newman Command Error";
pub const RUN_ERROR_TITLE: &str = "Newman Run Error";

const NO_TARGET_SPECIFIED: &str = "No Collection/Environment specified";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotificationPayload {
    pub response_type: &'static str,
    pub attachments: Vec<Attachment>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attachment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<String>,
    pub color: &'static str,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    pub mrkdwn: bool,
    pub fields: Vec<AttachmentField>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttachmentField {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub value: String,
    pub short: bool,
}

impl AttachmentField {
    fn short(title: &str, value: impl ToString) -> Self {
        Self {
            title: Some(title.to_string()),
            value: value.to_string(),
            short: true,
        }
    }

    fn long(title: &str, value: impl ToString) -> Self {
        Self {
            title: Some(title.to_string()),
            value: value.to_string(),
            short: false,
        }
    }

    fn untitled(value: impl ToString) -> Self {
        Self {
            title: None,
            value: value.to_string(),
            short: false,
        }
    }
}

/// Display context that is not part of the run summary itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PayloadContext {
    pub collection_name: Option<String>,
    pub environment_name: Option<String>,
    pub report_link_url: Option<String>,
}

impl PayloadContext {
    /// One-line description of what ran; falls back when neither name is known.
    pub fn description(&self) -> String {
        match (
            self.collection_name.as_deref(),
            self.environment_name.as_deref(),
        ) {
            (None, None) => NO_TARGET_SPECIFIED.to_string(),
            (collection, environment) => format!(
                "Collection: *{}* | Environment: *{}*",
                collection.unwrap_or("not specified"),
                environment.unwrap_or("not specified"),
            ),
        }
    }
}

/// Builds every payload the relay sends.
pub struct NotificationBuilder;

impl NotificationBuilder {
    /// Render the final run summary.
    pub fn summary(summary: &RunSummary, context: &PayloadContext) -> NotificationPayload {
        let fields = vec![
            AttachmentField::short("Total Run Duration", &summary.duration_humanized),
            AttachmentField::short("No. Of Iterations", summary.iteration_count),
            AttachmentField::short("No. Of Requests", summary.request_count),
            AttachmentField::short("No. Of Assertions", summary.effective_assertion_count),
            AttachmentField::short("No. Of Failures", summary.failure_count),
            AttachmentField::short("Pass Rate", format!("{}%", summary.pass_rate_label())),
            AttachmentField::short("Av. Response Time", &summary.average_response_time),
            AttachmentField::short("Result", summary.outcome.as_str()),
            AttachmentField::long("Skipped Tests", &summary.skipped_list_text),
            AttachmentField::long("Test Failures", &summary.failure_list_text),
        ];

        Self::single(Attachment {
            fallback: Some("Newman Run Summary".to_string()),
            color: summary.severity_color.as_str(),
            title: SUMMARY_TITLE.to_string(),
            title_link: context.report_link_url.clone(),
            text: Some(context.description()),
            mrkdwn: true,
            fields,
        })
    }

    /// Acknowledgment sent once the command has been accepted.
    pub fn started() -> NotificationPayload {
        Self::single(Attachment {
            fallback: None,
            color: SeverityColor::Good.as_str(),
            title: STARTED_TITLE.to_string(),
            title_link: None,
            text: None,
            mrkdwn: true,
            fields: vec![AttachmentField::untitled(
                "The Summary Report will be with you _very_ soon",
            )],
        })
    }

    /// The command could not be parsed or its names could not be resolved.
    pub fn command_error(message: &str) -> NotificationPayload {
        Self::danger(COMMAND_ERROR_TITLE, message)
    }

    /// The runner failed after the run was acknowledged.
    pub fn run_error(message: &str) -> NotificationPayload {
        Self::danger(RUN_ERROR_TITLE, message)
    }

    fn danger(title: &str, message: &str) -> NotificationPayload {
        Self::single(Attachment {
            fallback: None,
            color: SeverityColor::Danger.as_str(),
            title: title.to_string(),
            title_link: None,
            text: None,
            mrkdwn: true,
            fields: vec![AttachmentField::untitled(message)],
        })
    }

    fn single(attachment: Attachment) -> NotificationPayload {
        NotificationPayload {
            response_type: RESPONSE_TYPE_IN_CHANNEL,
            attachments: vec![attachment],
        }
    }
}
