//! Playwright-backed page driver
//!
//! A single `node` process runs a small bridge script that owns the browser.
//! Requests and responses travel as JSON lines over the child's stdin and
//! stdout, one request in flight at a time.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::process::{Command, Stdio};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout, Command as TokioCommand};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::driver::PageDriver;
use crate::error::{E2eError, E2eResult};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Browser {
    #[default]
    Chromium,
    Firefox,
    Webkit,
}

impl Browser {
    pub fn as_str(&self) -> &'static str {
        match self {
            Browser::Chromium => "chromium",
            Browser::Firefox => "firefox",
            Browser::Webkit => "webkit",
        }
    }
}

/// Playwright configuration
#[derive(Debug, Clone)]
pub struct PlaywrightConfig {
    pub base_url: String,
    pub browser: Browser,
    pub headless: bool,
    pub viewport_width: u32,
    pub viewport_height: u32,
    pub timeout_ms: u64,
}

impl Default for PlaywrightConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080".to_string(),
            browser: Browser::Chromium,
            headless: true,
            viewport_width: 1280,
            viewport_height: 720,
            timeout_ms: 30_000,
        }
    }
}

const BRIDGE_TEMPLATE: &str = r#"
const { chromium, firefox, webkit } = require('playwright');
const readline = require('readline');

const reply = (message) => process.stdout.write(JSON.stringify(message) + '\n');

(async () => {
  const browser = await __BROWSER__.launch({ headless: __HEADLESS__ });
  const context = await browser.newContext({
    viewport: { width: __WIDTH__, height: __HEIGHT__ }
  });
  context.setDefaultTimeout(__TIMEOUT__);
  const page = await context.newPage();
  const baseUrl = __BASE_URL__;

  const handlers = {
    goto: async (r) => {
      await page.goto(/^https?:\/\//.test(r.url) ? r.url : baseUrl + r.url);
      return null;
    },
    count: (r) => page.locator(r.selector).count(),
    visible: (r) => page.locator(r.selector).first().isVisible(),
    enabled: (r) => page.locator(r.selector).first().isEnabled(),
    value: (r) => page.locator(r.selector).first().inputValue(),
    options: async (r) => {
      const labels = await page.locator(r.selector).first().locator('option').allTextContents();
      return labels.map((label) => label.trim());
    },
    select: async (r) => {
      await page.locator(r.selector).first().selectOption(r.value);
      return null;
    },
  };

  reply({ id: 0, ok: true, result: null });

  const lines = readline.createInterface({ input: process.stdin });
  for await (const line of lines) {
    if (!line.trim()) continue;
    const request = JSON.parse(line);
    if (request.op === 'close') break;
    try {
      const result = await handlers[request.op](request);
      reply({ id: request.id, ok: true, result: result === undefined ? null : result });
    } catch (error) {
      reply({ id: request.id, ok: false, error: error.message });
    }
  }
  await browser.close();
})().catch((error) => {
  console.error(error.message);
  process.exit(1);
});
"#;

/// Bridge script for `config`
pub fn build_bridge_script(config: &PlaywrightConfig) -> String {
    let base_url = serde_json::Value::String(config.base_url.clone()).to_string();
    BRIDGE_TEMPLATE
        .replace("__BROWSER__", config.browser.as_str())
        .replace("__HEADLESS__", if config.headless { "true" } else { "false" })
        .replace("__WIDTH__", &config.viewport_width.to_string())
        .replace("__HEIGHT__", &config.viewport_height.to_string())
        .replace("__TIMEOUT__", &config.timeout_ms.to_string())
        .replace("__BASE_URL__", &base_url)
}

#[derive(Debug, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
enum Request<'a> {
    Goto { url: &'a str },
    Count { selector: &'a str },
    Visible { selector: &'a str },
    Enabled { selector: &'a str },
    Value { selector: &'a str },
    Options { selector: &'a str },
    Select { selector: &'a str, value: &'a str },
    Close,
}

#[derive(Debug, Serialize)]
struct Envelope<'a> {
    id: u64,
    #[serde(flatten)]
    request: Request<'a>,
}

#[derive(Debug, Deserialize)]
struct Response {
    id: u64,
    ok: bool,
    #[serde(default)]
    result: serde_json::Value,
    #[serde(default)]
    error: Option<String>,
}

struct Bridge {
    child: Child,
    stdin: ChildStdin,
    stdout: Lines<BufReader<ChildStdout>>,
    next_id: u64,
}

impl Bridge {
    async fn send(&mut self, id: u64, request: Request<'_>) -> E2eResult<()> {
        let mut line = serde_json::to_string(&Envelope { id, request })?;
        line.push('\n');
        self.stdin.write_all(line.as_bytes()).await?;
        self.stdin.flush().await?;
        Ok(())
    }

    async fn receive(&mut self) -> E2eResult<Response> {
        loop {
            match self.stdout.next_line().await? {
                Some(line) if line.trim().is_empty() => continue,
                Some(line) => return Ok(serde_json::from_str(&line)?),
                None => return Err(E2eError::Playwright("bridge process exited".to_string())),
            }
        }
    }
}

/// Page driver backed by a live Playwright browser
pub struct PlaywrightDriver {
    config: PlaywrightConfig,
    bridge: Mutex<Bridge>,
}

impl PlaywrightDriver {
    /// Start the browser bridge and wait until the page is ready
    pub async fn launch(config: PlaywrightConfig) -> E2eResult<Self> {
        Self::check_playwright_installed()?;

        let script = build_bridge_script(&config);
        let mut child = TokioCommand::new("node")
            .arg("-e")
            .arg(&script)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| E2eError::Playwright("bridge stdin unavailable".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| E2eError::Playwright("bridge stdout unavailable".to_string()))?;

        let mut bridge = Bridge {
            child,
            stdin,
            stdout: BufReader::new(stdout).lines(),
            next_id: 0,
        };

        let ready = bridge.receive().await?;
        if !ready.ok {
            return Err(E2eError::Playwright(
                ready.error.unwrap_or_else(|| "bridge failed to start".to_string()),
            ));
        }
        info!(browser = config.browser.as_str(), base_url = %config.base_url, "browser ready");

        Ok(Self {
            config,
            bridge: Mutex::new(bridge),
        })
    }

    /// Check if Playwright is installed
    fn check_playwright_installed() -> E2eResult<()> {
        let output = Command::new("npx")
            .args(["playwright", "--version"])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();

        match output {
            Ok(status) if status.success() => Ok(()),
            _ => Err(E2eError::PlaywrightNotFound),
        }
    }

    pub fn config(&self) -> &PlaywrightConfig {
        &self.config
    }

    async fn call<T: DeserializeOwned>(&self, request: Request<'_>) -> E2eResult<T> {
        let mut bridge = self.bridge.lock().await;
        bridge.next_id += 1;
        let id = bridge.next_id;
        debug!(id, request = ?request, "bridge request");

        bridge.send(id, request).await?;
        let response = bridge.receive().await?;

        if response.id != id {
            return Err(E2eError::Playwright(format!(
                "response {} does not answer request {}",
                response.id, id
            )));
        }
        if !response.ok {
            return Err(E2eError::Driver(
                response.error.unwrap_or_else(|| "unknown bridge error".to_string()),
            ));
        }
        Ok(serde_json::from_value(response.result)?)
    }

    /// Close the browser and wait for the bridge to exit
    pub async fn close(self) -> E2eResult<()> {
        let mut bridge = self.bridge.into_inner();
        let id = bridge.next_id + 1;
        bridge.send(id, Request::Close).await?;
        let status = bridge.child.wait().await?;
        if !status.success() {
            warn!(%status, "browser bridge exited abnormally");
        }
        Ok(())
    }
}

#[async_trait]
impl PageDriver for PlaywrightDriver {
    async fn goto(&self, url: &str) -> E2eResult<()> {
        let _: serde_json::Value = self.call(Request::Goto { url }).await?;
        Ok(())
    }

    async fn locate_count(&self, selector: &str) -> E2eResult<usize> {
        self.call(Request::Count { selector }).await
    }

    async fn is_visible(&self, selector: &str) -> E2eResult<bool> {
        self.call(Request::Visible { selector }).await
    }

    async fn is_enabled(&self, selector: &str) -> E2eResult<bool> {
        self.call(Request::Enabled { selector }).await
    }

    async fn read_value(&self, selector: &str) -> E2eResult<String> {
        self.call(Request::Value { selector }).await
    }

    async fn read_options(&self, selector: &str) -> E2eResult<Vec<String>> {
        self.call(Request::Options { selector }).await
    }

    async fn select(&self, selector: &str, value: &str) -> E2eResult<()> {
        let _: serde_json::Value = self.call(Request::Select { selector, value }).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bridge_script_uses_config() {
        let config = PlaywrightConfig {
            base_url: "http://quotes.test/app".to_string(),
            browser: Browser::Webkit,
            headless: false,
            viewport_width: 1024,
            viewport_height: 768,
            timeout_ms: 5000,
        };
        let script = build_bridge_script(&config);
        assert!(script.contains("await webkit.launch({ headless: false })"));
        assert!(script.contains("width: 1024, height: 768"));
        assert!(script.contains("setDefaultTimeout(5000)"));
        assert!(script.contains(r#"const baseUrl = "http://quotes.test/app";"#));
        assert!(!script.contains("__"));
    }

    #[test]
    fn test_request_wire_format() {
        let envelope = Envelope {
            id: 7,
            request: Request::Select {
                selector: "select[name=\"transactionType\"]",
                value: "03",
            },
        };
        let json: serde_json::Value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["op"], "select");
        assert_eq!(json["value"], "03");

        let close = serde_json::to_value(Envelope { id: 8, request: Request::Close }).unwrap();
        assert_eq!(close, serde_json::json!({ "id": 8, "op": "close" }));
    }

    #[test]
    fn test_error_response_parses() {
        let response: Response =
            serde_json::from_str(r#"{"id":3,"ok":false,"error":"Timeout 5000ms exceeded"}"#).unwrap();
        assert!(!response.ok);
        assert_eq!(response.error.as_deref(), Some("Timeout 5000ms exceeded"));
        assert!(response.result.is_null());
    }
}
