//! Client configuration.
//!
//! A [`Config`] is built once at startup and never mutated afterwards; the
//! reconnect loop hands the same value to every session it creates.
//!
//! # Example
//!
//! ```
//! use slirc_bot::config::{Config, TlsConfig};
//!
//! let mut config = Config::new("irc.example.com", 6697, "DevBot", "#dev");
//! config.connection.tls = Some(TlsConfig::default());
//! config.identity.nickserv_password = Some("hunter2".to_string());
//! config.channel.key = Some("secret".to_string());
//!
//! assert!(config.validate().is_ok());
//! ```

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{ClientError, Result};

/// Delay before reconnecting after a session ends.
pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_secs(10);

/// Delay before rejoining the channel after being kicked.
pub const DEFAULT_REJOIN_DELAY: Duration = Duration::from_secs(3);

/// Complete client configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    /// Where and how to connect.
    pub connection: ConnectionConfig,
    /// Who to register as.
    pub identity: Identity,
    /// Channel to join after registration and after kicks.
    pub channel: ChannelTarget,
    /// Delay schedule between connection attempts.
    pub reconnect: ReconnectPolicy,
    /// Pause between being kicked and rejoining.
    #[cfg_attr(feature = "serde", serde(with = "duration_secs"))]
    pub rejoin_delay: Duration,
}

impl Config {
    /// Create a configuration with the given server, nickname and channel.
    ///
    /// The username defaults to the lowercased nickname.
    pub fn new(host: &str, port: u16, nickname: &str, channel: &str) -> Self {
        Self {
            connection: ConnectionConfig {
                host: host.to_owned(),
                port,
                ..ConnectionConfig::default()
            },
            identity: Identity {
                nickname: nickname.to_owned(),
                username: nickname.to_ascii_lowercase(),
                ..Identity::default()
            },
            channel: ChannelTarget::new(channel),
            ..Config::default()
        }
    }

    /// Check that the configuration can be used to register.
    pub fn validate(&self) -> Result<()> {
        if self.connection.host.is_empty() {
            return Err(ClientError::Config("server host is empty".into()));
        }
        if self.connection.port == 0 {
            return Err(ClientError::Config("server port is 0".into()));
        }
        if !is_single_token(&self.identity.nickname) {
            return Err(ClientError::Config(format!(
                "invalid nickname: {:?}",
                self.identity.nickname
            )));
        }
        if !is_single_token(&self.identity.username) {
            return Err(ClientError::Config(format!(
                "invalid username: {:?}",
                self.identity.username
            )));
        }
        if !is_single_token(&self.channel.name) {
            return Err(ClientError::Config(format!(
                "invalid channel: {:?}",
                self.channel.name
            )));
        }
        if let (Some(bind), Some(family)) = (self.connection.bind, self.connection.family.required())
        {
            if !family.accepts(&SocketAddr::new(bind, 0)) {
                return Err(ClientError::Config(format!(
                    "bind address {} does not match address family {:?}",
                    bind, family
                )));
            }
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            connection: ConnectionConfig::default(),
            identity: Identity::default(),
            channel: ChannelTarget::new("#dev"),
            reconnect: ReconnectPolicy::default(),
            rejoin_delay: DEFAULT_REJOIN_DELAY,
        }
    }
}

fn is_single_token(s: &str) -> bool {
    !s.is_empty() && !s.contains(char::is_whitespace)
}

/// Socket-level connection settings.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ConnectionConfig {
    /// Server hostname or IP address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Which resolved addresses may be used.
    pub family: AddressFamily,
    /// Local (virtual host) address to bind before connecting.
    pub bind: Option<IpAddr>,
    /// TLS settings; `None` connects in plain text.
    pub tls: Option<TlsConfig>,
    /// Server password sent with `PASS`.
    pub password: Option<String>,
}

impl ConnectionConfig {
    /// `host:port`, for logs and error messages.
    pub fn server_addr(&self) -> String {
        if self.host.contains(':') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: "irc.server.com".to_owned(),
            port: 6667,
            family: AddressFamily::default(),
            bind: None,
            tls: None,
            password: None,
        }
    }
}

/// Address family preference for the outgoing socket.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum AddressFamily {
    /// First resolved address, whatever its family.
    #[default]
    Any,
    /// IPv4 only.
    Ipv4,
    /// IPv6 only.
    Ipv6,
}

impl AddressFamily {
    /// Whether `addr` may be used under this preference.
    pub fn accepts(self, addr: &SocketAddr) -> bool {
        match self {
            Self::Any => true,
            Self::Ipv4 => addr.is_ipv4(),
            Self::Ipv6 => addr.is_ipv6(),
        }
    }

    fn required(self) -> Option<Self> {
        match self {
            Self::Any => None,
            other => Some(other),
        }
    }
}

/// TLS settings.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TlsConfig {
    /// PEM file with the client certificate chain (and optionally the key).
    pub client_cert: Option<PathBuf>,
    /// PEM file with the client private key, if not inside `client_cert`.
    pub client_key: Option<PathBuf>,
    /// Verify the server certificate against the system roots.
    pub verify_certificate: bool,
}

impl Default for TlsConfig {
    fn default() -> Self {
        Self {
            client_cert: None,
            client_key: None,
            verify_certificate: true,
        }
    }
}

/// Registration identity and credentials.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Identity {
    /// Desired nickname.
    pub nickname: String,
    /// Username (ident).
    pub username: String,
    /// Real name / GECOS.
    pub realname: String,
    /// NickServ password used for `RECOVER` and `IDENTIFY`.
    pub nickserv_password: Option<String>,
    /// Credentials for `OPER`.
    pub oper: Option<OperCredentials>,
}

/// IRC operator credentials.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OperCredentials {
    /// Operator name.
    pub name: String,
    /// Operator password.
    pub password: String,
}

/// The channel the bot keeps itself in.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChannelTarget {
    /// Channel name, e.g. `#dev`.
    pub name: String,
    /// Channel key, if the channel is `+k`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub key: Option<String>,
}

impl ChannelTarget {
    /// A channel without a key.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            key: None,
        }
    }
}

/// Delay schedule between connection attempts.
///
/// With the default multiplier of 1 every retry waits `delay`. A larger
/// multiplier grows the delay geometrically up to `max_delay`. Retries never
/// stop either way.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ReconnectPolicy {
    /// First (and, with multiplier 1, every) delay.
    #[cfg_attr(feature = "serde", serde(with = "duration_secs"))]
    pub delay: Duration,
    /// Upper bound on the delay.
    #[cfg_attr(feature = "serde", serde(with = "duration_secs"))]
    pub max_delay: Duration,
    /// Growth factor applied after each failed attempt.
    pub multiplier: u32,
}

impl ReconnectPolicy {
    /// The same delay before every attempt.
    pub fn fixed(delay: Duration) -> Self {
        Self {
            delay,
            max_delay: delay,
            multiplier: 1,
        }
    }

    /// Delay growing by `multiplier` each attempt, capped at `max_delay`.
    pub fn exponential(delay: Duration, max_delay: Duration, multiplier: u32) -> Self {
        Self {
            delay,
            max_delay: max_delay.max(delay),
            multiplier: multiplier.max(1),
        }
    }
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self::fixed(DEFAULT_RECONNECT_DELAY)
    }
}

#[cfg(feature = "serde")]
mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_secs)
    }
}
