//! Delivery orchestration: one session per call, per-recipient error
//! isolation, tri-state outcome.

use std::fmt;

use crate::address::quote;
use crate::config::TransportConfig;
use crate::envelope::Envelope;
use crate::error::DeliveryError;
use crate::message::Sendable;
use crate::session::{Connector, SessionError, SmtpConnector, SmtpSession};

/// Per-recipient verdict from the RCPT phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipientOutcome {
    /// The recipient as submitted, before quoting.
    pub address: String,
    /// Whether the server accepted `RCPT TO` for this address.
    pub accepted: bool,
    /// Reply code for rejected recipients, when the server sent one.
    pub code: Option<u16>,
    /// Server reply text for rejected recipients.
    pub reply: Option<String>,
}

impl RecipientOutcome {
    fn accepted(address: &str) -> Self {
        Self {
            address: address.to_owned(),
            accepted: true,
            code: None,
            reply: None,
        }
    }

    fn rejected(address: &str, error: SessionError) -> Self {
        Self {
            address: address.to_owned(),
            accepted: false,
            code: error.code,
            reply: Some(error.message),
        }
    }
}

impl fmt::Display for RecipientOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.accepted {
            return write!(f, "{}: accepted", self.address);
        }
        write!(f, "{}:", self.address)?;
        if let Some(code) = self.code {
            write!(f, " {code}")?;
        }
        match &self.reply {
            Some(reply) => write!(f, " {reply}"),
            None => Ok(()),
        }
    }
}

/// Outcome of a delivery that transmitted the message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// Every recipient was accepted.
    Sent {
        /// The server's final reply text.
        reply: String,
    },
    /// The message went to the accepted subset; the rest were refused
    /// during the RCPT phase. Only reachable with
    /// [`TransportConfig::allow_partial`].
    Partial {
        /// The server's final reply text.
        reply: String,
        /// The refused recipients, in submission order.
        rejected: Vec<RecipientOutcome>,
    },
}

impl Delivery {
    /// True when at least one recipient was refused.
    pub fn is_partial(&self) -> bool {
        matches!(self, Self::Partial { .. })
    }

    /// The server's final reply text.
    pub fn reply(&self) -> &str {
        match self {
            Self::Sent { reply } | Self::Partial { reply, .. } => reply,
        }
    }
}

/// SMTP submission transport.
///
/// Holds immutable configuration only, so a single transport may serve
/// concurrent [`deliver`](Self::deliver) calls; each call opens its own
/// connection.
#[derive(Debug, Clone)]
pub struct SmtpTransport<C = SmtpConnector> {
    config: TransportConfig,
    connector: C,
}

impl SmtpTransport {
    /// Transport backed by the production TLS connector.
    pub fn new(config: TransportConfig) -> Self {
        Self::with_connector(config, SmtpConnector)
    }
}

impl<C: Connector> SmtpTransport<C> {
    /// Transport backed by a caller-supplied connector (alternative
    /// backends, tests).
    pub fn with_connector(config: TransportConfig, connector: C) -> Self {
        Self { config, connector }
    }

    /// The configuration this transport was built with.
    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// Deliver `message` to the envelope recipients over one SMTP session.
    ///
    /// The dialogue is `MAIL FROM`, one `RCPT TO` per valid recipient,
    /// then `DATA`. Recipient rejections never abort the RCPT loop; they
    /// decide the outcome afterwards:
    ///
    /// - no rejections → [`Delivery::Sent`]
    /// - rejections, at least one recipient accepted, and
    ///   [`TransportConfig::allow_partial`] set → the message goes to the
    ///   accepted subset, [`Delivery::Partial`]
    /// - anything else → the matching [`DeliveryError`] kind, before any
    ///   message data is sent
    ///
    /// Sender rejection is a hard stop regardless of the partial policy.
    /// Once the RCPT phase has decided the outcome, transmission-phase
    /// errors (DATA, message bytes, QUIT) do not change it.
    pub async fn deliver(
        &self,
        message: &impl Sendable,
        envelope: &Envelope,
    ) -> Result<Delivery, DeliveryError> {
        let recipients: Vec<&str> = envelope.valid_recipients().collect();
        if recipients.is_empty() {
            return Err(DeliveryError::NoValidRecipients);
        }

        let mut session = self
            .connector
            .connect(&self.config)
            .await
            .map_err(DeliveryError::ConnectionFailed)?;
        tracing::debug!(host = %self.config.host, port = self.config.port, "session established");

        if let Err(reply) = session.mail_from(&quote(&envelope.from)).await {
            let _ = session.quit().await;
            return Err(DeliveryError::SenderRejected(reply));
        }

        let mut outcomes = Vec::with_capacity(recipients.len());
        for &address in &recipients {
            match session.rcpt_to(&quote(address)).await {
                Ok(()) => outcomes.push(RecipientOutcome::accepted(address)),
                Err(error) => {
                    tracing::warn!(
                        recipient = %address,
                        code = ?error.code,
                        reply = %error.message,
                        "recipient rejected"
                    );
                    outcomes.push(RecipientOutcome::rejected(address, error));
                }
            }
        }

        let (accepted, rejected): (Vec<_>, Vec<_>) =
            outcomes.into_iter().partition(|outcome| outcome.accepted);

        if !rejected.is_empty() {
            if accepted.is_empty() {
                let _ = session.quit().await;
                return Err(DeliveryError::AllRecipientsRejected(rejected));
            }
            if !self.config.allow_partial {
                let _ = session.quit().await;
                return Err(DeliveryError::SomeRecipientsRejected(rejected));
            }
        }

        let reply = transmit(&mut session, message).await;

        if rejected.is_empty() {
            Ok(Delivery::Sent { reply })
        } else {
            Ok(Delivery::Partial { reply, rejected })
        }
    }
}

/// Run the transmission phase and return the final reply text.
///
/// The outcome was decided by RCPT bookkeeping: a failure anywhere in
/// DATA, the message bytes, or QUIT must not turn an accepted delivery
/// into an error, so everything here is logged and swallowed.
async fn transmit<S: SmtpSession>(session: &mut S, message: &impl Sendable) -> String {
    let sent = async {
        session.data().await?;
        session.send_wire(&message.to_wire()).await?;
        session.end_data().await
    }
    .await;

    if let Err(error) = sent {
        tracing::warn!(%error, "transmission error ignored after accepted RCPT phase");
    }

    let reply = session.last_reply().to_owned();
    let _ = session.quit().await;
    reply
}
