//! Wire types for the W3C WebDriver protocol.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Key under which W3C drivers return element references.
pub const ELEMENT_KEY: &str = "element-6066-11e4-a07c-4bdd3e8c0ebb";

/// The Enter key as a WebDriver key code.
pub const KEY_ENTER: &str = "\u{E007}";

/// How to locate an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    /// CSS selector.
    Css(String),
    /// XPath expression.
    XPath(String),
}

impl Locator {
    /// CSS selector locator.
    pub fn css(selector: impl Into<String>) -> Self {
        Locator::Css(selector.into())
    }

    /// XPath locator.
    pub fn xpath(expr: impl Into<String>) -> Self {
        Locator::XPath(expr.into())
    }

    /// The W3C location strategy name.
    pub fn strategy(&self) -> &'static str {
        match self {
            Locator::Css(_) => "css selector",
            Locator::XPath(_) => "xpath",
        }
    }

    /// The selector or expression.
    pub fn value(&self) -> &str {
        match self {
            Locator::Css(v) | Locator::XPath(v) => v,
        }
    }

    /// Request body for the find-element commands.
    pub fn to_body(&self) -> Value {
        json!({ "using": self.strategy(), "value": self.value() })
    }
}

impl std::fmt::Display for Locator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} '{}'", self.strategy(), self.value())
    }
}

/// A reference to an element inside a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementRef(pub String);

impl ElementRef {
    /// The driver-assigned element id.
    pub fn id(&self) -> &str {
        &self.0
    }

    /// Parse an element reference object.
    pub fn from_value(value: &Value) -> Option<Self> {
        value
            .get(ELEMENT_KEY)
            .and_then(Value::as_str)
            .map(|id| ElementRef(id.to_string()))
    }

    /// Serialize as a script argument.
    pub fn to_value(&self) -> Value {
        json!({ ELEMENT_KEY: self.0 })
    }
}

/// Envelope around every W3C response body.
#[derive(Debug, Deserialize)]
pub struct W3cResponse {
    #[serde(default)]
    pub value: Value,
}

/// Error object found in `value` for failed commands.
#[derive(Debug, Deserialize)]
pub struct W3cError {
    pub error: String,
    #[serde(default)]
    pub message: String,
}

/// Result of a new-session command.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSession {
    pub session_id: String,
    #[serde(default)]
    pub capabilities: Value,
}

/// Body of a new-session command for Chrome.
#[derive(Debug, Serialize)]
pub struct NewSessionRequest {
    pub capabilities: Value,
}

impl NewSessionRequest {
    /// Chrome capabilities with the given browser arguments.
    pub fn chrome(args: &[String]) -> Self {
        Self {
            capabilities: json!({
                "alwaysMatch": {
                    "browserName": "chrome",
                    "goog:chromeOptions": { "args": args }
                }
            }),
        }
    }
}
