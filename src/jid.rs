use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

pub const USER_SERVER: &str = "s.whatsapp.net";
pub const GROUP_SERVER: &str = "g.us";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JidServer {
    User,
    Group,
}

impl JidServer {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => USER_SERVER,
            Self::Group => GROUP_SERVER,
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum JidError {
    #[error("missing '@' separator")]
    MissingSeparator,
    #[error("empty user part")]
    EmptyUser,
    #[error("empty server part")]
    EmptyServer,
    #[error("unknown server '{0}'")]
    UnknownServer(String),
}

/// A WhatsApp address, either an individual (`user@s.whatsapp.net`) or a
/// group (`id@g.us`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Jid {
    user: String,
    server: JidServer,
}

impl Jid {
    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn is_group(&self) -> bool {
        self.server == JidServer::Group
    }
}

impl FromStr for Jid {
    type Err = JidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (user, server) = s.trim().rsplit_once('@').ok_or(JidError::MissingSeparator)?;
        if user.is_empty() {
            return Err(JidError::EmptyUser);
        }
        let server = match server {
            "" => return Err(JidError::EmptyServer),
            USER_SERVER => JidServer::User,
            GROUP_SERVER => JidServer::Group,
            other => return Err(JidError::UnknownServer(other.to_string())),
        };
        Ok(Self {
            user: user.to_string(),
            server,
        })
    }
}

impl fmt::Display for Jid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.user, self.server.as_str())
    }
}

impl Serialize for Jid {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(self)
    }
}
