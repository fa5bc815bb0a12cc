//! Snippet definitions: the typed request side of the command channel.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ChannelError;

/// One read-only or side-effecting operation against a remote document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Snippet {
    Exists { selector: String },
    Click { selector: String },
    ReadText { selector: String },
    ReadValue { selector: String },
    ReadAttribute { selector: String, name: String },
    IsDisabled { selector: String },
    IsChecked { selector: String },
    SetValue { selector: String, value: String },
    SetChecked { selector: String, checked: bool },
    SetDisplay { selector: String, display: String },
    ConsoleLog { message: String },
    ReadyState,
    Location,
}

/// Declared result shape of a snippet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResultShape {
    Unit,
    Flag,
    Text,
}

/// Decoded response of a snippet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SnippetResult {
    Unit,
    Flag(bool),
    Text(Option<String>),
}

impl SnippetResult {
    pub fn flag(&self) -> Option<bool> {
        match self {
            SnippetResult::Flag(value) => Some(*value),
            _ => None,
        }
    }
}

impl Snippet {
    pub fn exists(selector: impl Into<String>) -> Self {
        Snippet::Exists {
            selector: selector.into(),
        }
    }

    pub fn click(selector: impl Into<String>) -> Self {
        Snippet::Click {
            selector: selector.into(),
        }
    }

    pub fn read_text(selector: impl Into<String>) -> Self {
        Snippet::ReadText {
            selector: selector.into(),
        }
    }

    pub fn read_value(selector: impl Into<String>) -> Self {
        Snippet::ReadValue {
            selector: selector.into(),
        }
    }

    pub fn read_attribute(selector: impl Into<String>, name: impl Into<String>) -> Self {
        Snippet::ReadAttribute {
            selector: selector.into(),
            name: name.into(),
        }
    }

    pub fn is_disabled(selector: impl Into<String>) -> Self {
        Snippet::IsDisabled {
            selector: selector.into(),
        }
    }

    pub fn is_checked(selector: impl Into<String>) -> Self {
        Snippet::IsChecked {
            selector: selector.into(),
        }
    }

    pub fn set_value(selector: impl Into<String>, value: impl Into<String>) -> Self {
        Snippet::SetValue {
            selector: selector.into(),
            value: value.into(),
        }
    }

    pub fn set_checked(selector: impl Into<String>, checked: bool) -> Self {
        Snippet::SetChecked {
            selector: selector.into(),
            checked,
        }
    }

    pub fn set_display(selector: impl Into<String>, display: impl Into<String>) -> Self {
        Snippet::SetDisplay {
            selector: selector.into(),
            display: display.into(),
        }
    }

    pub fn console_log(message: impl Into<String>) -> Self {
        Snippet::ConsoleLog {
            message: message.into(),
        }
    }

    /// Short name used for logging and metric labels.
    pub fn kind(&self) -> &'static str {
        match self {
            Snippet::Exists { .. } => "exists",
            Snippet::Click { .. } => "click",
            Snippet::ReadText { .. } => "read_text",
            Snippet::ReadValue { .. } => "read_value",
            Snippet::ReadAttribute { .. } => "read_attribute",
            Snippet::IsDisabled { .. } => "is_disabled",
            Snippet::IsChecked { .. } => "is_checked",
            Snippet::SetValue { .. } => "set_value",
            Snippet::SetChecked { .. } => "set_checked",
            Snippet::SetDisplay { .. } => "set_display",
            Snippet::ConsoleLog { .. } => "console_log",
            Snippet::ReadyState => "ready_state",
            Snippet::Location => "location",
        }
    }

    pub fn selector(&self) -> Option<&str> {
        match self {
            Snippet::Exists { selector }
            | Snippet::Click { selector }
            | Snippet::ReadText { selector }
            | Snippet::ReadValue { selector }
            | Snippet::ReadAttribute { selector, .. }
            | Snippet::IsDisabled { selector }
            | Snippet::IsChecked { selector }
            | Snippet::SetValue { selector, .. }
            | Snippet::SetChecked { selector, .. }
            | Snippet::SetDisplay { selector, .. } => Some(selector),
            Snippet::ConsoleLog { .. } | Snippet::ReadyState | Snippet::Location => None,
        }
    }

    pub fn shape(&self) -> ResultShape {
        match self {
            Snippet::Exists { .. } | Snippet::IsDisabled { .. } | Snippet::IsChecked { .. } => {
                ResultShape::Flag
            }
            Snippet::ReadText { .. }
            | Snippet::ReadValue { .. }
            | Snippet::ReadAttribute { .. }
            | Snippet::ReadyState
            | Snippet::Location => ResultShape::Text,
            Snippet::Click { .. }
            | Snippet::SetValue { .. }
            | Snippet::SetChecked { .. }
            | Snippet::SetDisplay { .. }
            | Snippet::ConsoleLog { .. } => ResultShape::Unit,
        }
    }

    /// Renders the snippet as a self-contained JavaScript expression.
    ///
    /// Caller-supplied strings are embedded only as JSON literals.
    pub fn to_expression(&self) -> String {
        match self {
            Snippet::Exists { selector } => {
                format!("document.querySelector({}) !== null", literal(selector))
            }
            Snippet::Click { selector } => with_required_element(selector, "el.click();"),
            Snippet::ReadText { selector } => {
                with_optional_element(selector, "return el ? el.textContent : null;")
            }
            Snippet::ReadValue { selector } => {
                with_optional_element(selector, "return el && typeof el.value === 'string' ? el.value : null;")
            }
            Snippet::ReadAttribute { selector, name } => with_optional_element(
                selector,
                &format!("return el ? el.getAttribute({}) : null;", literal(name)),
            ),
            Snippet::IsDisabled { selector } => {
                with_optional_element(selector, "return el === null || el.disabled === true;")
            }
            Snippet::IsChecked { selector } => {
                with_optional_element(selector, "return el !== null && el.checked === true;")
            }
            Snippet::SetValue { selector, value } => with_required_element(
                selector,
                &format!(
                    "el.value = {}; el.dispatchEvent(new Event('input', {{ bubbles: true }}));",
                    literal(value)
                ),
            ),
            Snippet::SetChecked { selector, checked } => with_required_element(
                selector,
                &format!(
                    "el.checked = {}; el.dispatchEvent(new Event('change', {{ bubbles: true }}));",
                    checked
                ),
            ),
            Snippet::SetDisplay { selector, display } => with_optional_element(
                selector,
                &format!(
                    "if (el) {{ el.style.display = {}; }} return null;",
                    literal(display)
                ),
            ),
            Snippet::ConsoleLog { message } => {
                format!("(() => {{ console.log({}); return null; }})()", literal(message))
            }
            Snippet::ReadyState => "document.readyState".to_string(),
            Snippet::Location => "window.location.href".to_string(),
        }
    }

    /// Checks a raw evaluation value against the declared shape.
    pub fn decode(&self, value: Value) -> Result<SnippetResult, ChannelError> {
        match (self.shape(), value) {
            (ResultShape::Unit, _) => Ok(SnippetResult::Unit),
            (ResultShape::Flag, Value::Bool(flag)) => Ok(SnippetResult::Flag(flag)),
            (ResultShape::Text, Value::String(text)) => Ok(SnippetResult::Text(Some(text))),
            (ResultShape::Text, Value::Null) => Ok(SnippetResult::Text(None)),
            (_, other) => Err(ChannelError::UnexpectedShape {
                kind: self.kind(),
                value: other.to_string(),
            }),
        }
    }
}

fn literal(value: &str) -> String {
    // serializing a &str cannot fail
    serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string())
}

fn with_optional_element(selector: &str, body: &str) -> String {
    format!(
        "(() => {{ const el = document.querySelector({}); {} }})()",
        literal(selector),
        body
    )
}

fn with_required_element(selector: &str, body: &str) -> String {
    let selector = literal(selector);
    format!(
        "(() => {{ const el = document.querySelector({sel}); if (!el) {{ throw new Error('element not found: ' + {sel}); }} {body} return null; }})()",
        sel = selector,
        body = body,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn values_are_embedded_as_json_literals() {
        let pgn = "[Event \"Live\"]\n1. e4 `${alert(1)}` e5";
        let expression = Snippet::set_value("[name='pgn']", pgn).to_expression();

        let encoded = serde_json::to_string(pgn).unwrap();
        assert!(expression.contains(&encoded));
        // the raw newline never reaches the script
        assert!(!expression.contains('\n'));
        assert!(expression.contains("document.querySelector(\"[name='pgn']\")"));
    }

    #[test]
    fn selectors_with_quotes_are_escaped() {
        let expression = Snippet::exists("[data-test-element=\"user\"]").to_expression();
        assert_eq!(
            expression,
            r#"document.querySelector("[data-test-element=\"user\"]") !== null"#
        );
    }

    #[test]
    fn decode_checks_shape() {
        let exists = Snippet::exists(".share");
        assert_eq!(exists.decode(json!(true)).unwrap(), SnippetResult::Flag(true));
        assert!(matches!(
            exists.decode(json!("yes")),
            Err(ChannelError::UnexpectedShape { kind: "exists", .. })
        ));

        let read = Snippet::read_value("[name='pgn']");
        assert_eq!(read.decode(Value::Null).unwrap(), SnippetResult::Text(None));
        assert_eq!(
            read.decode(json!("1. e4")).unwrap(),
            SnippetResult::Text(Some("1. e4".to_string()))
        );

        let click = Snippet::click(".submit");
        assert_eq!(click.decode(Value::Null).unwrap(), SnippetResult::Unit);
    }

    #[test]
    fn snippets_serialize_with_op_tag() {
        let value = serde_json::to_value(Snippet::set_checked("#toggle", true)).unwrap();
        assert_eq!(
            value,
            json!({ "op": "set_checked", "selector": "#toggle", "checked": true })
        );
        assert_eq!(Snippet::ReadyState.selector(), None);
        assert_eq!(Snippet::click(".submit").selector(), Some(".submit"));
    }
}
