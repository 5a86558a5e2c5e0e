//! WebDriver HTTP client and browser sessions.

use std::time::{Duration, Instant};

use reqwest::{Client, Method, StatusCode};
use serde_json::{json, Value};
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::config::DriverConfig;
use crate::error::WebDriverError;
use crate::types::{ElementRef, Locator, NewSession, NewSessionRequest, W3cError, W3cResponse};

/// Client for a WebDriver server.
#[derive(Clone)]
pub struct WebDriverClient {
    http: Client,
    config: DriverConfig,
}

impl WebDriverClient {
    /// Connect to the driver, verifying it answers its status endpoint.
    pub async fn connect(config: DriverConfig) -> Result<Self, WebDriverError> {
        let http = Client::builder()
            .timeout(config.command_timeout)
            .build()
            .map_err(WebDriverError::Http)?;

        let client = Self { http, config };

        if client.is_ready().await? {
            info!("Connected to WebDriver at {}", client.config.base());
            Ok(client)
        } else {
            Err(WebDriverError::Connection(format!(
                "driver at {} is not ready",
                client.config.base()
            )))
        }
    }

    /// Query the driver's readiness.
    pub async fn is_ready(&self) -> Result<bool, WebDriverError> {
        let response = self
            .http
            .get(self.config.status_url())
            .send()
            .await
            .map_err(|e| WebDriverError::Connection(format!("status request failed: {}", e)))?;

        if !response.status().is_success() {
            return Ok(false);
        }

        let body: W3cResponse = response.json().await?;
        Ok(body
            .value
            .get("ready")
            .and_then(Value::as_bool)
            .unwrap_or(true))
    }

    /// Start a new browser session.
    pub async fn new_session(&self) -> Result<Session, WebDriverError> {
        let request = NewSessionRequest::chrome(&self.config.effective_args());
        let value = send_command(
            &self.http,
            Method::POST,
            &self.config.session_url(),
            Some(serde_json::to_value(&request)?),
        )
        .await?;

        let created: NewSession = serde_json::from_value(value)?;
        info!("Started browser session {}", created.session_id);

        Ok(Session {
            http: self.http.clone(),
            url: format!("{}/{}", self.config.session_url(), created.session_id),
            id: created.session_id,
            poll_interval: self.config.poll_interval,
        })
    }

    /// Get the configuration.
    pub fn config(&self) -> &DriverConfig {
        &self.config
    }
}

impl std::fmt::Debug for WebDriverClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebDriverClient")
            .field("config", &self.config)
            .finish()
    }
}

/// A live browser session.
#[derive(Debug, Clone)]
pub struct Session {
    http: Client,
    url: String,
    id: String,
    poll_interval: Duration,
}

impl Session {
    /// The driver-assigned session id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Load a URL in the current window.
    pub async fn navigate(&self, url: &str) -> Result<(), WebDriverError> {
        self.post("/url", json!({ "url": url })).await.map(drop)
    }

    /// Reload the current page.
    pub async fn refresh(&self) -> Result<(), WebDriverError> {
        self.post("/refresh", json!({})).await.map(drop)
    }

    /// Get the current page URL.
    pub async fn current_url(&self) -> Result<String, WebDriverError> {
        let value = self.get("/url").await?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    /// Find the first element matching a locator.
    pub async fn find_element(&self, locator: &Locator) -> Result<ElementRef, WebDriverError> {
        let value = self.post("/element", locator.to_body()).await?;
        parse_element(&value)
    }

    /// Find all elements matching a locator.
    pub async fn find_elements(&self, locator: &Locator) -> Result<Vec<ElementRef>, WebDriverError> {
        let value = self.post("/elements", locator.to_body()).await?;
        parse_elements(&value)
    }

    /// Find the first matching descendant of an element.
    pub async fn find_element_from(
        &self,
        parent: &ElementRef,
        locator: &Locator,
    ) -> Result<ElementRef, WebDriverError> {
        let path = format!("/element/{}/element", parent.id());
        let value = self.post(&path, locator.to_body()).await?;
        parse_element(&value)
    }

    /// Find all matching descendants of an element.
    pub async fn find_elements_from(
        &self,
        parent: &ElementRef,
        locator: &Locator,
    ) -> Result<Vec<ElementRef>, WebDriverError> {
        let path = format!("/element/{}/elements", parent.id());
        let value = self.post(&path, locator.to_body()).await?;
        parse_elements(&value)
    }

    /// Poll until an element matching the locator is present.
    pub async fn wait_for(
        &self,
        locator: &Locator,
        timeout: Duration,
    ) -> Result<ElementRef, WebDriverError> {
        let start = Instant::now();

        loop {
            match self.find_element(locator).await {
                Ok(element) => return Ok(element),
                Err(e) if e.is_missing_element() => {
                    if start.elapsed() >= timeout {
                        return Err(WebDriverError::Timeout(format!(
                            "{} not present after {:?}",
                            locator, timeout
                        )));
                    }
                }
                Err(e) => return Err(e),
            }

            sleep(self.poll_interval).await;
        }
    }

    /// Click an element.
    pub async fn click(&self, element: &ElementRef) -> Result<(), WebDriverError> {
        let path = format!("/element/{}/click", element.id());
        self.post(&path, json!({})).await.map(drop)
    }

    /// Type text into an element.
    pub async fn send_keys(&self, element: &ElementRef, text: &str) -> Result<(), WebDriverError> {
        let path = format!("/element/{}/value", element.id());
        self.post(&path, json!({ "text": text })).await.map(drop)
    }

    /// Clear an editable element.
    pub async fn clear(&self, element: &ElementRef) -> Result<(), WebDriverError> {
        let path = format!("/element/{}/clear", element.id());
        self.post(&path, json!({})).await.map(drop)
    }

    /// Get the rendered text of an element.
    pub async fn text(&self, element: &ElementRef) -> Result<String, WebDriverError> {
        let value = self.get(&format!("/element/{}/text", element.id())).await?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    /// Get an attribute of an element, `None` if absent.
    pub async fn attribute(
        &self,
        element: &ElementRef,
        name: &str,
    ) -> Result<Option<String>, WebDriverError> {
        let value = self
            .get(&format!("/element/{}/attribute/{}", element.id(), name))
            .await?;
        Ok(value.as_str().map(str::to_string))
    }

    /// Run a synchronous script in the page.
    pub async fn execute_script(&self, script: &str, args: Vec<Value>) -> Result<Value, WebDriverError> {
        self.post("/execute/sync", json!({ "script": script, "args": args }))
            .await
    }

    /// End the session and close the browser.
    pub async fn delete(&self) -> Result<(), WebDriverError> {
        debug!("Deleting session {}", self.id);
        send_command(&self.http, Method::DELETE, &self.url, None)
            .await
            .map(drop)
    }

    async fn get(&self, path: &str) -> Result<Value, WebDriverError> {
        send_command(&self.http, Method::GET, &format!("{}{}", self.url, path), None).await
    }

    async fn post(&self, path: &str, body: Value) -> Result<Value, WebDriverError> {
        send_command(
            &self.http,
            Method::POST,
            &format!("{}{}", self.url, path),
            Some(body),
        )
        .await
    }
}

/// Send one command and unwrap the W3C `value`.
async fn send_command(
    http: &Client,
    method: Method,
    url: &str,
    body: Option<Value>,
) -> Result<Value, WebDriverError> {
    debug!("WebDriver {} {}", method, url);

    let mut request = http.request(method, url);
    if let Some(body) = body {
        request = request.json(&body);
    }

    let response = request.send().await.map_err(|e| {
        if e.is_timeout() {
            WebDriverError::Timeout(format!("driver did not answer: {}", e))
        } else {
            WebDriverError::Connection(format!("request to driver failed: {}", e))
        }
    })?;

    let status = response.status();
    let text = response.text().await?;
    parse_response(status, &text)
}

/// Decode a driver response body, mapping W3C error objects.
pub(crate) fn parse_response(status: StatusCode, body: &str) -> Result<Value, WebDriverError> {
    let parsed: Result<W3cResponse, _> = serde_json::from_str(body);

    match parsed {
        Ok(response) if status.is_success() => Ok(response.value),
        Ok(response) => match serde_json::from_value::<W3cError>(response.value) {
            Ok(error) => Err(WebDriverError::from_w3c(&error.error, error.message)),
            Err(_) => Err(WebDriverError::Protocol {
                error: status.to_string(),
                message: body.to_string(),
            }),
        },
        Err(e) if status.is_success() => Err(WebDriverError::Json(e)),
        Err(_) => {
            warn!("Unparseable driver error body (HTTP {})", status);
            Err(WebDriverError::Protocol {
                error: status.to_string(),
                message: body.to_string(),
            })
        }
    }
}

fn parse_element(value: &Value) -> Result<ElementRef, WebDriverError> {
    ElementRef::from_value(value).ok_or_else(|| WebDriverError::Protocol {
        error: "invalid element reference".to_string(),
        message: value.to_string(),
    })
}

fn parse_elements(value: &Value) -> Result<Vec<ElementRef>, WebDriverError> {
    let items = value.as_array().ok_or_else(|| WebDriverError::Protocol {
        error: "expected element list".to_string(),
        message: value.to_string(),
    })?;

    items.iter().map(parse_element).collect()
}
