//! Client-side actions.
//!
//! Actions are plain descriptions attached to event fields such as a
//! button's `onClick`. They are serialized with an `action` discriminator:
//!
//! ```text
//! {"action": "setState", "key": "count", "value": "{{ count + 1 }}"}
//! ```

use serde::Serialize;
use serde_json::Value;

use crate::prop::Prop;
use crate::validate::{validate_state_key, Result};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Action {
    SetState {
        key: String,
        value: Prop,
    },
    ToggleState {
        key: String,
    },
    AppendState {
        key: String,
        value: Prop,
    },
    ShowToast {
        message: Prop,
        #[serde(skip_serializing_if = "Option::is_none")]
        variant: Option<String>,
    },
    OpenLink {
        url: Prop,
    },
    /// Server-bound: invokes a tool on the host and runs follow-up actions.
    #[serde(rename_all = "camelCase")]
    CallTool {
        tool: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        arguments: Option<Prop>,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        on_success: Vec<Action>,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        on_error: Vec<Action>,
    },
}

impl Action {
    pub fn set_state(key: &str, value: impl Into<Prop>) -> Result<Action> {
        validate_state_key("key", key)?;
        Ok(Action::SetState {
            key: key.to_string(),
            value: value.into(),
        })
    }

    pub fn toggle_state(key: &str) -> Result<Action> {
        validate_state_key("key", key)?;
        Ok(Action::ToggleState {
            key: key.to_string(),
        })
    }

    pub fn append_state(key: &str, value: impl Into<Prop>) -> Result<Action> {
        validate_state_key("key", key)?;
        Ok(Action::AppendState {
            key: key.to_string(),
            value: value.into(),
        })
    }

    pub fn show_toast(message: impl Into<Prop>) -> Action {
        Action::ShowToast {
            message: message.into(),
            variant: None,
        }
    }

    pub fn show_toast_with_variant(message: impl Into<Prop>, variant: &str) -> Action {
        Action::ShowToast {
            message: message.into(),
            variant: Some(variant.to_string()),
        }
    }

    pub fn open_link(url: impl Into<Prop>) -> Action {
        Action::OpenLink { url: url.into() }
    }

    pub fn call_tool<K, V, I>(
        tool: &str,
        arguments: I,
        on_success: Vec<Action>,
        on_error: Vec<Action>,
    ) -> Action
    where
        K: Into<String>,
        V: Into<Prop>,
        I: IntoIterator<Item = (K, V)>,
    {
        let arguments: Vec<(String, Prop)> = arguments
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        Action::CallTool {
            tool: tool.to_string(),
            arguments: (!arguments.is_empty()).then_some(Prop::Map(arguments)),
            on_success,
            on_error,
        }
    }

    pub fn to_value(&self) -> Value {
        // Every payload is a string-keyed map of plain values.
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

impl From<Action> for Prop {
    fn from(action: Action) -> Self {
        Prop::Json(action.to_value())
    }
}
