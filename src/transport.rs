//! Opening the socket.
//!
//! A [`Connector`] produces one fresh byte stream per connection attempt.
//! [`TcpConnector`] is the real one: DNS lookup, address family selection,
//! optional bind address, TCP keepalive and optional TLS. Tests plug in
//! their own connectors backed by in-memory pipes.

pub(crate) mod tls;

use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};
use tokio::net::{lookup_host, TcpSocket, TcpStream};
use tokio_rustls::client::TlsStream;
use tokio_rustls::TlsConnector;
use tracing::{debug, warn};

use crate::config::ConnectionConfig;
use crate::error::{ClientError, Result};

/// Source of connected streams.
pub trait Connector {
    /// The stream a successful attempt yields.
    type Stream: AsyncRead + AsyncWrite + Unpin + Send;

    /// Open a new connection.
    fn connect(&mut self) -> impl Future<Output = Result<Self::Stream>> + Send;
}

/// Connects over TCP, optionally wrapped in TLS.
pub struct TcpConnector {
    config: ConnectionConfig,
    tls: Option<TlsConnector>,
}

impl TcpConnector {
    /// Prepare a connector. TLS certificates are loaded here.
    pub fn new(config: ConnectionConfig) -> Result<Self> {
        let tls = match &config.tls {
            Some(settings) => Some(TlsConnector::from(Arc::new(tls::client_config(settings)?))),
            None => None,
        };
        Ok(Self { config, tls })
    }

    /// The settings this connector uses.
    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    async fn open(&self) -> Result<TcpStream> {
        let server = self.config.server_addr();
        let connect_err = |source: io::Error| ClientError::Connect {
            addr: server.clone(),
            source,
        };

        let family = self.config.family;
        let addr = lookup_host((self.config.host.as_str(), self.config.port))
            .await
            .map_err(connect_err)?
            .find(|addr| family.accepts(addr))
            .ok_or_else(|| {
                connect_err(io::Error::new(
                    io::ErrorKind::AddrNotAvailable,
                    format!("no {family:?} address found"),
                ))
            })?;

        let socket = match addr {
            SocketAddr::V4(_) => TcpSocket::new_v4(),
            SocketAddr::V6(_) => TcpSocket::new_v6(),
        }
        .map_err(connect_err)?;
        if let Some(bind) = self.config.bind {
            socket.bind(SocketAddr::new(bind, 0)).map_err(connect_err)?;
        }

        let stream = socket.connect(addr).await.map_err(connect_err)?;
        if let Err(e) = enable_keepalive(&stream) {
            warn!("failed to enable TCP keepalive: {}", e);
        }
        debug!(%addr, "tcp connected");
        Ok(stream)
    }
}

impl Connector for TcpConnector {
    type Stream = MaybeTlsStream;

    async fn connect(&mut self) -> Result<MaybeTlsStream> {
        let tcp = self.open().await?;
        let Some(connector) = &self.tls else {
            return Ok(MaybeTlsStream::Plain(tcp));
        };

        let name = tls::server_name(&self.config.host)?;
        let stream = connector
            .connect(name, tcp)
            .await
            .map_err(|e| ClientError::Tls(e.to_string()))?;
        debug!(host = %self.config.host, "tls handshake complete");
        Ok(MaybeTlsStream::Tls(Box::new(stream)))
    }
}

fn enable_keepalive(stream: &TcpStream) -> io::Result<()> {
    use socket2::{SockRef, TcpKeepalive};

    let sock = SockRef::from(stream);
    let keepalive = TcpKeepalive::new()
        .with_time(Duration::from_secs(120))
        .with_interval(Duration::from_secs(30));

    sock.set_tcp_keepalive(&keepalive)
}

/// A TCP stream with or without TLS.
#[derive(Debug)]
pub enum MaybeTlsStream {
    /// Plain text.
    Plain(TcpStream),
    /// TLS over TCP.
    Tls(Box<TlsStream<TcpStream>>),
}

impl MaybeTlsStream {
    /// True for the TLS variant.
    pub fn is_tls(&self) -> bool {
        matches!(self, Self::Tls(_))
    }
}

impl AsyncRead for MaybeTlsStream {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        match self.get_mut() {
            Self::Plain(s) => Pin::new(s).poll_read(cx, buf),
            Self::Tls(s) => Pin::new(s.as_mut()).poll_read(cx, buf),
        }
    }
}

impl AsyncWrite for MaybeTlsStream {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        match self.get_mut() {
            Self::Plain(s) => Pin::new(s).poll_write(cx, buf),
            Self::Tls(s) => Pin::new(s.as_mut()).poll_write(cx, buf),
        }
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            Self::Plain(s) => Pin::new(s).poll_flush(cx),
            Self::Tls(s) => Pin::new(s.as_mut()).poll_flush(cx),
        }
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            Self::Plain(s) => Pin::new(s).poll_shutdown(cx),
            Self::Tls(s) => Pin::new(s.as_mut()).poll_shutdown(cx),
        }
    }
}
