//! A minimal bot.
//!
//! ```text
//! cargo run --example bot -- irc.libera.chat 6697 DevBot '#dev' --tls
//! ```
//!
//! Set `RUST_LOG=slirc_bot=debug` to see every line on the wire.

use slirc_bot::{reconnect, Config, CtcpKind, Ctcp, Handlers, TlsConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

const VERSION: &str = concat!("slirc-bot ", env!("CARGO_PKG_VERSION"));

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let host = args.first().map_or("irc.server.com", String::as_str);
    let port = args.get(1).map_or(Ok(6667), |p| p.parse())?;
    let nickname = args.get(2).map_or("DevBot", String::as_str);
    let channel = args.get(3).map_or("#dev", String::as_str);

    let mut config = Config::new(host, port, nickname, channel);
    config.identity.realname = "slirc-bot demo".to_string();
    if args.iter().any(|a| a == "--tls") {
        config.connection.tls = Some(TlsConfig::default());
    }
    if let Ok(password) = std::env::var("NICKSERV_PASSWORD") {
        config.identity.nickserv_password = Some(password);
    }

    let handlers = Handlers::new()
        .on_connect(|_| info!("connected and joined"))
        .on_message(|out, nick, chan, msg| {
            info!(%nick, %chan, %msg, "message");
            if msg == "!test" {
                out.privmsg(chan, "It works!");
            }
        })
        .on_private(|out, nick, msg| {
            info!(%nick, %msg, "private message");
            out.privmsg(nick, &format!("You said: {msg}"));
        })
        .on_ctcp(|out, nick, _chan, msg| {
            let Some(ctcp) = Ctcp::parse(msg) else {
                return;
            };
            match ctcp.kind {
                CtcpKind::Version => out.ctcp_reply(nick, &format!("VERSION {VERSION}")),
                CtcpKind::Ping => {
                    out.ctcp_reply(nick, &format!("PING {}", ctcp.params.unwrap_or_default()))
                }
                _ => info!(%nick, kind = %ctcp.kind, "unhandled ctcp"),
            }
        })
        .on_invite(|out, nick, chan| {
            info!(%nick, %chan, "invited");
            out.join(chan, None);
        })
        .on_kick(|_, nick, chan, kicked| info!(%nick, %chan, %kicked, "kick"))
        .on_disconnect(|e| info!(error = %e, "disconnected"));

    match reconnect::run(config, handlers).await? {}
}
