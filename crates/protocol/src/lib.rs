use anyhow::Result;
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

pub const COMMAND_API_VERSION: u32 = 1;

/// Commands a chat front-end can forward. Aliases accept the bot's slash names.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FilterCommand {
    #[serde(alias = "filters", alias = "filter")]
    Add,
    AddOne,
    List,
    Page,
    Search,
    Stop,
    Restart,
    Count,
    /// Welcome message sent on `/start`.
    Start,
    Help,
}

impl FilterCommand {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::AddOne => "add_one",
            Self::List => "list",
            Self::Page => "page",
            Self::Search => "search",
            Self::Stop => "stop",
            Self::Restart => "restart",
            Self::Count => "count",
            Self::Start => "start",
            Self::Help => "help",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema)]
pub struct CommandRequest {
    /// Chat identifier; JSON integers (Telegram ids) are accepted too.
    #[serde(deserialize_with = "string_or_integer")]
    #[schemars(with = "String")]
    pub chat_id: String,
    pub command: FilterCommand,
    #[serde(default)]
    pub args: String,
    /// One-based page number for `page`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
}

fn string_or_integer<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) if n.is_i64() || n.is_u64() => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "chat_id must be a string or an integer, got {other}"
        ))),
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum CommandStatus {
    Ok,
    Error,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema)]
pub struct ErrorEnvelope {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, JsonSchema)]
pub struct CommandResponse {
    pub status: CommandStatus,
    /// Ready-to-send chat text.
    pub text: String,
    #[serde(default)]
    pub data: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorEnvelope>,
}

impl CommandResponse {
    #[must_use]
    pub fn ok(text: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            status: CommandStatus::Ok,
            text: text.into(),
            data,
            error: None,
        }
    }

    #[must_use]
    pub fn error(
        code: impl Into<String>,
        text: impl Into<String>,
        message: impl Into<String>,
        hint: Option<String>,
    ) -> Self {
        Self {
            status: CommandStatus::Error,
            text: text.into(),
            data: serde_json::Value::Null,
            error: Some(ErrorEnvelope {
                code: code.into(),
                message: message.into(),
                hint,
            }),
        }
    }

    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == CommandStatus::Ok
    }
}

/// Read-only snapshot served on `GET /health`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema)]
pub struct HealthReport {
    pub status: String,
    pub version: String,
    pub api_version: u32,
    pub backend: String,
    pub partition: String,
    pub order: String,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scopes: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
    pub write_lock_wait_ms_last: u64,
    pub write_lock_wait_ms_max: u64,
}

pub fn serialize_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(Into::into)
}
