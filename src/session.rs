//! Session seam: verb-level operations on one authenticated, encrypted
//! SMTP connection, plus the production connector.

use std::fmt;

use async_trait::async_trait;
use tokio::net::TcpStream;
use tokio_rustls::client::TlsStream;

use crate::config::{TlsMode, TransportConfig};

/// A reply the server used to refuse an operation, or a transport-level
/// failure while exchanging it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionError {
    /// SMTP reply code, when the server answered at all.
    pub code: Option<u16>,
    /// Server reply text, or a transport diagnostic.
    pub message: String,
}

impl SessionError {
    /// A negative server reply.
    pub fn reply(code: u16, message: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            message: message.into(),
        }
    }

    /// A failure below the protocol: socket, TLS, timeout.
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "{code} {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for SessionError {}

impl From<mail_send::Error> for SessionError {
    fn from(err: mail_send::Error) -> Self {
        match err {
            mail_send::Error::UnexpectedReply(reply) => Self::reply(reply.code, reply.message),
            other => Self::transport(other.to_string()),
        }
    }
}

/// Verb-level operations on one connected, authenticated SMTP session.
///
/// One session maps to one delivery attempt; the transport issues exactly
/// one command at a time and never reuses a session across calls.
/// Implementations own the wire format, TLS, and authentication; the
/// transport owns command ordering and outcome bookkeeping.
#[async_trait]
pub trait SmtpSession: Send {
    /// Issue `MAIL FROM` with an already-quoted reverse-path.
    async fn mail_from(&mut self, address: &str) -> Result<(), SessionError>;

    /// Issue `RCPT TO` with an already-quoted forward-path.
    async fn rcpt_to(&mut self, address: &str) -> Result<(), SessionError>;

    /// Issue `DATA` and wait for the go-ahead.
    async fn data(&mut self) -> Result<(), SessionError>;

    /// Stream the rendered message, including the end-of-data sequence.
    async fn send_wire(&mut self, bytes: &[u8]) -> Result<(), SessionError>;

    /// Collect the server's verdict on the transmitted message.
    async fn end_data(&mut self) -> Result<(), SessionError>;

    /// Text of the most recent server reply.
    fn last_reply(&self) -> &str;

    /// Issue `QUIT`. The session is unusable afterwards.
    async fn quit(&mut self) -> Result<(), SessionError>;
}

/// Opens one authenticated session per delivery attempt.
#[async_trait]
pub trait Connector: Send + Sync {
    type Session: SmtpSession;

    /// Connect, negotiate TLS, and authenticate per `config`.
    async fn connect(&self, config: &TransportConfig) -> Result<Self::Session, SessionError>;
}

/// Production connector: TCP, TLS, and AUTH through [`mail_send`].
///
/// [`TlsMode::StartTls`] upgrades a plaintext connection after the
/// greeting, [`TlsMode::Implicit`] negotiates TLS before the first byte;
/// the session is encrypted before credentials are sent either way.
#[derive(Debug, Clone, Copy, Default)]
pub struct SmtpConnector;

#[async_trait]
impl Connector for SmtpConnector {
    type Session = SmtpClientSession;

    async fn connect(&self, config: &TransportConfig) -> Result<Self::Session, SessionError> {
        let mut builder = mail_send::SmtpClientBuilder::new(config.host.clone(), config.port)
            .implicit_tls(matches!(config.tls, TlsMode::Implicit))
            .credentials((config.username.clone(), config.password.clone()));
        if let Some(helo) = &config.helo {
            builder = builder.helo_host(helo.clone());
        }

        let client = builder.connect().await?;

        Ok(SmtpClientSession {
            client,
            last_reply: String::new(),
        })
    }
}

/// Session driven through [`mail_send::SmtpClient`].
pub struct SmtpClientSession {
    client: mail_send::SmtpClient<TlsStream<TcpStream>>,
    last_reply: String,
}

impl SmtpClientSession {
    async fn command(&mut self, line: String) -> Result<(), SessionError> {
        let reply = self.client.cmd(line.as_bytes()).await?;
        self.last_reply = reply.message.clone();
        if reply.is_positive_completion() {
            Ok(())
        } else {
            Err(SessionError::reply(reply.code, reply.message))
        }
    }
}

#[async_trait]
impl SmtpSession for SmtpClientSession {
    async fn mail_from(&mut self, address: &str) -> Result<(), SessionError> {
        self.command(format!("MAIL FROM:<{address}>\r\n")).await
    }

    async fn rcpt_to(&mut self, address: &str) -> Result<(), SessionError> {
        self.command(format!("RCPT TO:<{address}>\r\n")).await
    }

    async fn data(&mut self) -> Result<(), SessionError> {
        let reply = self.client.cmd(b"DATA\r\n".as_ref()).await?;
        self.last_reply = reply.message.clone();
        // 354: server is ready for the message bytes
        if reply.code == 354 {
            Ok(())
        } else {
            Err(SessionError::reply(reply.code, reply.message))
        }
    }

    async fn send_wire(&mut self, bytes: &[u8]) -> Result<(), SessionError> {
        // write_message applies dot-stuffing and the terminating dot
        self.client
            .write_message(bytes)
            .await
            .map_err(|err| SessionError::transport(err.to_string()))
    }

    async fn end_data(&mut self) -> Result<(), SessionError> {
        let reply = self.client.read().await?;
        self.last_reply = reply.message.clone();
        if reply.is_positive_completion() {
            Ok(())
        } else {
            Err(SessionError::reply(reply.code, reply.message))
        }
    }

    fn last_reply(&self) -> &str {
        &self.last_reply
    }

    async fn quit(&mut self) -> Result<(), SessionError> {
        self.client.cmd(b"QUIT\r\n".as_ref()).await?;
        Ok(())
    }
}
