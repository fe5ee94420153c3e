use std::time::Duration;

use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(
    name = "whatsapp-sender",
    version,
    about = "HTTP API for sending WhatsApp group messages with @mentions"
)]
pub struct Config {
    /// Address to bind the HTTP server to
    #[arg(long, env = "SENDER_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to bind the HTTP server to
    #[arg(long, env = "SENDER_PORT", default_value_t = 8081)]
    pub port: u16,

    /// Base URL of the bridge that holds the paired WhatsApp session
    #[arg(long, env = "WHATSAPP_BRIDGE_URL", default_value = "http://localhost:8080")]
    pub bridge_url: String,

    #[arg(long, env = "WHATSAPP_BRIDGE_TIMEOUT_SECS", default_value_t = 30)]
    pub bridge_timeout_secs: u64,

    /// Require `Authorization: Bearer <key>` on send requests
    #[arg(long, env = "SENDER_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,
}

impl Config {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn bridge_timeout(&self) -> Duration {
        Duration::from_secs(self.bridge_timeout_secs)
    }

    /// An empty key disables auth, same as leaving it unset.
    pub fn api_key(&self) -> Option<String> {
        self.api_key.clone().filter(|k| !k.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::try_parse_from(["whatsapp-sender"]).unwrap();
        assert_eq!(config.bind_addr(), "0.0.0.0:8081");
        assert_eq!(config.bridge_url, "http://localhost:8080");
        assert_eq!(config.bridge_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn flags_override() {
        let config = Config::try_parse_from([
            "whatsapp-sender",
            "--host",
            "127.0.0.1",
            "--port",
            "9000",
            "--api-key",
            "",
        ])
        .unwrap();
        assert_eq!(config.bind_addr(), "127.0.0.1:9000");
        assert_eq!(config.api_key(), None);
    }
}
