//! Keeping the bot connected.
//!
//! [`Reconnector`] runs sessions back to back forever. After each one ends
//! it reports the error through `on_disconnect`, waits according to the
//! configured [`ReconnectPolicy`], and connects again.

use std::convert::Infallible;
use std::time::Duration;

use tracing::{info, warn};

use crate::config::{Config, ReconnectPolicy};
use crate::error::{ClientError, Result};
use crate::handlers::Handlers;
use crate::session::Session;
use crate::transport::{Connector, TcpConnector};

/// Connect with the real TCP/TLS connector and never give up.
///
/// Only fails up front, if the configuration is invalid or the TLS
/// certificates cannot be loaded.
pub async fn run(config: Config, handlers: Handlers) -> Result<Infallible> {
    config.validate()?;
    let connector = TcpConnector::new(config.connection.clone())?;
    Ok(Reconnector::new(connector, config, handlers).run().await)
}

/// Runs one [`Session`] at a time, forever.
pub struct Reconnector<C> {
    connector: C,
    config: Config,
    handlers: Handlers,
    attempts: u64,
}

impl<C: Connector> Reconnector<C> {
    /// Create a reconnector. Nothing happens until [`run`](Self::run).
    pub fn new(connector: C, config: Config, handlers: Handlers) -> Self {
        Self {
            connector,
            config,
            handlers,
            attempts: 0,
        }
    }

    /// Connect, run the session, wait, repeat.
    pub async fn run(mut self) -> Infallible {
        let mut backoff = Backoff::new(self.config.reconnect.clone());
        loop {
            let (error, registered) = self.attempt().await;
            if registered {
                backoff.reset();
            }

            self.handlers.disconnect(&error);
            let delay = backoff.next_delay();
            warn!(
                attempt = self.attempts,
                error = %error,
                delay = ?delay,
                "disconnected, reconnecting"
            );
            tokio::time::sleep(delay).await;
        }
    }

    /// One full connection attempt. Returns why it ended and whether it got
    /// as far as registration.
    async fn attempt(&mut self) -> (ClientError, bool) {
        self.attempts += 1;
        info!(attempt = self.attempts, "connection attempt");

        let mut session =
            match Session::connect(&mut self.connector, &self.config, &mut self.handlers).await {
                Ok(session) => session,
                Err(e) => return (e, false),
            };
        let error = session.run().await;
        (error, session.was_registered())
    }
}

/// Delay schedule derived from a [`ReconnectPolicy`].
#[derive(Clone, Debug)]
struct Backoff {
    policy: ReconnectPolicy,
    current: Duration,
}

impl Backoff {
    fn new(policy: ReconnectPolicy) -> Self {
        let current = policy.delay;
        Self { policy, current }
    }

    /// The delay to wait now; grows the next one.
    fn next_delay(&mut self) -> Duration {
        let delay = self.current;
        self.current = delay
            .checked_mul(self.policy.multiplier)
            .unwrap_or(self.policy.max_delay)
            .min(self.policy.max_delay);
        delay
    }

    fn reset(&mut self) {
        self.current = self.policy.delay;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_backoff() {
        let mut backoff = Backoff::new(ReconnectPolicy::default());
        for _ in 0..5 {
            assert_eq!(backoff.next_delay(), Duration::from_secs(10));
        }
    }

    #[test]
    fn test_exponential_backoff_caps_and_resets() {
        let policy =
            ReconnectPolicy::exponential(Duration::from_secs(1), Duration::from_secs(10), 2);
        let mut backoff = Backoff::new(policy);

        let delays: Vec<u64> = (0..6).map(|_| backoff.next_delay().as_secs()).collect();
        assert_eq!(delays, vec![1, 2, 4, 8, 10, 10]);

        backoff.reset();
        assert_eq!(backoff.next_delay(), Duration::from_secs(1));
    }

    #[test]
    fn test_backoff_overflow_saturates() {
        let policy = ReconnectPolicy::exponential(Duration::MAX / 2, Duration::MAX, u32::MAX);
        let mut backoff = Backoff::new(policy);
        backoff.next_delay();
        assert_eq!(backoff.next_delay(), Duration::MAX);
    }

    #[tokio::test]
    async fn test_run_rejects_invalid_config() {
        let config = Config::new("irc.example.com", 6667, "Dev Bot", "#dev");
        let result = run(config, Handlers::new()).await;
        assert!(matches!(result, Err(ClientError::Config(_))));
    }
}
