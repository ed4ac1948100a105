//! [`FormDriver`] over the W3C WebDriver HTTP protocol.
//!
//! Talks to a driver server that is already running (chromedriver,
//! geckodriver). One [`WebDriverClient`] owns one browser session.

use std::time::Duration;

use reqwest::Method;
use reqwest::blocking::Client;
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::driver::{ElementHandle, FormDriver};
use crate::error::DriverError;

/// Key under which W3C drivers return element references.
const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4a4b6d6f6e61";

/// Page loads taking longer than this fail instead of hanging.
const PAGE_LOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP timeout for a single driver command; must exceed the page load bound.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Default chromedriver address.
pub const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:9515";

/// Browser the driver server should launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Browser {
    #[default]
    Chrome,
    Firefox,
}

/// Capabilities requested when the session starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserOptions {
    pub browser: Browser,
    pub headless: bool,
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self {
            browser: Browser::Chrome,
            headless: true,
        }
    }
}

impl BrowserOptions {
    fn capabilities(&self) -> Value {
        let page_load = u64::try_from(PAGE_LOAD_TIMEOUT.as_millis()).unwrap_or(u64::MAX);
        let mut always_match = json!({
            "timeouts": { "pageLoad": page_load },
        });
        match self.browser {
            Browser::Chrome => {
                always_match["browserName"] = json!("chrome");
                let args: Vec<&str> = if self.headless {
                    vec!["--headless=new", "--disable-gpu"]
                } else {
                    Vec::new()
                };
                always_match["goog:chromeOptions"] = json!({ "args": args });
            }
            Browser::Firefox => {
                always_match["browserName"] = json!("firefox");
                let args: Vec<&str> = if self.headless {
                    vec!["-headless"]
                } else {
                    Vec::new()
                };
                always_match["moz:firefoxOptions"] = json!({ "args": args });
            }
        }
        json!({ "capabilities": { "alwaysMatch": always_match } })
    }
}

/// A live WebDriver session.
pub struct WebDriverClient {
    client: Client,
    /// Driver server base URL, without trailing slash.
    server: String,
    session_id: Option<String>,
}

impl WebDriverClient {
    /// Start a new browser session on the driver server at `server`.
    pub fn connect(server: &str, options: &BrowserOptions) -> Result<Self, DriverError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        let mut driver = Self {
            client,
            server: server.trim_end_matches('/').to_string(),
            session_id: None,
        };
        let value = driver.send(Method::POST, "/session", Some(options.capabilities()))?;
        let session_id = value
            .get("sessionId")
            .and_then(Value::as_str)
            .ok_or_else(|| DriverError::Protocol("new session response has no sessionId".to_string()))?
            .to_string();
        debug!(%session_id, browser = ?options.browser, headless = options.headless, "browser session started");
        driver.session_id = Some(session_id);
        Ok(driver)
    }

    #[must_use]
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    fn session_path(&self, suffix: &str) -> Result<String, DriverError> {
        let id = self.session_id.as_deref().ok_or(DriverError::SessionClosed)?;
        Ok(format!("/session/{id}{suffix}"))
    }

    /// Send one command and unwrap the `value` member of the answer.
    fn send(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value, DriverError> {
        let url = format!("{}{path}", self.server);
        let mut request = self.client.request(method, &url);
        if let Some(body) = body {
            request = request.json(&body);
        }
        let response = request.send()?;
        let status = response.status();
        let payload: Value = serde_json::from_str(&response.text()?)?;
        let value = payload.get("value").cloned().unwrap_or(Value::Null);
        if status.is_success() {
            return Ok(value);
        }
        Err(DriverError::Command {
            status: status.as_u16(),
            error: value
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("unknown error")
                .to_string(),
            message: value
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        })
    }

    fn element_path(&self, element: &ElementHandle, action: &str) -> Result<String, DriverError> {
        self.session_path(&format!("/element/{}{action}", element.id()))
    }
}

impl FormDriver for WebDriverClient {
    fn open(&mut self, url: &str) -> Result<(), DriverError> {
        let path = self.session_path("/url")?;
        self.send(Method::POST, &path, Some(json!({ "url": url })))?;
        Ok(())
    }

    fn find(&mut self, selector: &str) -> Result<Option<ElementHandle>, DriverError> {
        let path = self.session_path("/element")?;
        let body = json!({ "using": "css selector", "value": selector });
        match self.send(Method::POST, &path, Some(body)) {
            Ok(value) => value
                .get(ELEMENT_KEY)
                .and_then(Value::as_str)
                .map(|id| Some(ElementHandle::new(id)))
                .ok_or_else(|| DriverError::Protocol(format!("no element reference for '{selector}'"))),
            Err(DriverError::Command { error, .. }) if error == "no such element" => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn click(&mut self, element: &ElementHandle) -> Result<(), DriverError> {
        let path = self.element_path(element, "/click")?;
        self.send(Method::POST, &path, Some(json!({})))?;
        Ok(())
    }

    fn type_text(&mut self, element: &ElementHandle, text: &str) -> Result<(), DriverError> {
        let path = self.element_path(element, "/value")?;
        self.send(Method::POST, &path, Some(json!({ "text": text })))?;
        Ok(())
    }

    fn read_text(&mut self, element: &ElementHandle) -> Result<String, DriverError> {
        let path = self.element_path(element, "/text")?;
        let value = self.send(Method::GET, &path, None)?;
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| DriverError::Protocol("element text is not a string".to_string()))
    }

    fn close(&mut self) -> Result<(), DriverError> {
        let path = self.session_path("")?;
        self.session_id = None;
        self.send(Method::DELETE, &path, None)?;
        Ok(())
    }
}

impl Drop for WebDriverClient {
    fn drop(&mut self) {
        if self.session_id.is_some() {
            if let Err(error) = self.close() {
                warn!(%error, "failed to end browser session on drop");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headless_chrome_capabilities() {
        let caps = BrowserOptions::default().capabilities();
        let always = &caps["capabilities"]["alwaysMatch"];
        assert_eq!(always["browserName"], "chrome");
        assert_eq!(always["timeouts"]["pageLoad"], 30_000);
        let args = always["goog:chromeOptions"]["args"].as_array().unwrap();
        assert!(args.iter().any(|a| a == "--headless=new"));
    }

    #[test]
    fn test_visible_firefox_capabilities() {
        let options = BrowserOptions {
            browser: Browser::Firefox,
            headless: false,
        };
        let caps = options.capabilities();
        let always = &caps["capabilities"]["alwaysMatch"];
        assert_eq!(always["browserName"], "firefox");
        assert!(always["moz:firefoxOptions"]["args"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_commands_after_close_are_rejected() {
        let mut driver = WebDriverClient {
            client: Client::new(),
            server: DEFAULT_WEBDRIVER_URL.to_string(),
            session_id: None,
        };
        assert!(matches!(
            driver.open("https://example.test"),
            Err(DriverError::SessionClosed)
        ));
        assert!(matches!(driver.close(), Err(DriverError::SessionClosed)));
    }
}
