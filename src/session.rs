use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::{anyhow, bail, Context};
use async_trait::async_trait;
use log::{debug, info};
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};

use crate::jid::Jid;
use crate::types::OutgoingMessage;

/// An authenticated connection to the messaging network.
///
/// Implementations do their own synchronization; handlers call into a shared
/// `Arc<dyn Session>` concurrently without any extra locking.
#[async_trait]
pub trait Session: Send + Sync {
    async fn transmit(&self, to: &Jid, message: &OutgoingMessage) -> anyhow::Result<()>;

    async fn is_connected(&self) -> bool;

    async fn disconnect(&self);
}

/// Body of `POST /api/send`. `recipient` and `message` are the bridge's
/// existing group-send fields; `mentions` is the extension the bridge must
/// honour by setting the mentioned JIDs on the outgoing message's context
/// info. A bridge without it delivers the text with no mention.
#[derive(Serialize)]
struct BridgeSendRequest<'a> {
    recipient: &'a Jid,
    message: &'a str,
    mentions: &'a [String],
}

#[derive(Deserialize)]
struct BridgeSendResponse {
    #[serde(default = "default_success")]
    success: bool,
    #[serde(default)]
    message: Option<String>,
}

fn default_success() -> bool {
    true
}

/// Session backed by the bridge process that owns the paired session store.
pub struct BridgeSession {
    http: Client,
    send_url: Url,
    health_url: Url,
    closed: AtomicBool,
}

impl BridgeSession {
    /// Endpoints are resolved under `bridge_url`, keeping any path prefix.
    pub fn new(bridge_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let mut base = Url::parse(bridge_url)
            .with_context(|| format!("Invalid bridge URL: {}", bridge_url))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            send_url: base.join("api/send")?,
            health_url: base.join("api/health")?,
            closed: AtomicBool::new(false),
        })
    }
}

#[async_trait]
impl Session for BridgeSession {
    async fn transmit(&self, to: &Jid, message: &OutgoingMessage) -> anyhow::Result<()> {
        if self.closed.load(Ordering::Acquire) {
            bail!("not connected");
        }

        let body = BridgeSendRequest {
            recipient: to,
            message: &message.text,
            mentions: &message.mentioned_jids,
        };
        let resp = self
            .http
            .post(self.send_url.clone())
            .json(&body)
            .send()
            .await
            .context("bridge request failed")?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .context("failed to read bridge response")?;
        let parsed = serde_json::from_str::<BridgeSendResponse>(&text).ok();

        if !status.is_success() {
            let detail = parsed.and_then(|r| r.message).unwrap_or(text);
            return Err(anyhow!("bridge returned {}: {}", status, detail.trim()));
        }
        if let Some(BridgeSendResponse {
            success: false,
            message,
        }) = parsed
        {
            return Err(anyhow!(
                "bridge rejected message: {}",
                message.unwrap_or_else(|| "unknown error".to_string())
            ));
        }

        debug!("Bridge accepted message for {}", to);
        Ok(())
    }

    async fn is_connected(&self) -> bool {
        if self.closed.load(Ordering::Acquire) {
            return false;
        }
        match self.http.get(self.health_url.clone()).send().await {
            Ok(_) => true,
            Err(e) => {
                debug!("Bridge probe failed: {}", e);
                false
            }
        }
    }

    async fn disconnect(&self) {
        if !self.closed.swap(true, Ordering::AcqRel) {
            info!("Session released");
        }
    }
}
