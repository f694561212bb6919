//! SMTP envelope: the sender and recipients used on the wire, distinct
//! from the message's `From`/`To` headers.

use serde::{Deserialize, Serialize};

/// The SMTP-level sender and recipient addresses for one delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    /// Reverse-path handed to `MAIL FROM`.
    pub from: String,
    /// Forward-paths for `RCPT TO`, in submission order.
    pub to: Vec<String>,
}

impl Envelope {
    /// Create an envelope from a sender and any iterable of recipients.
    pub fn new(from: impl Into<String>, to: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            from: from.into(),
            to: to.into_iter().map(Into::into).collect(),
        }
    }

    /// The recipients that are non-empty after trimming, in submission
    /// order. Blank entries are skipped rather than rejected; delivery
    /// requires at least one survivor.
    pub fn valid_recipients(&self) -> impl Iterator<Item = &str> {
        self.to
            .iter()
            .map(|addr| addr.trim())
            .filter(|addr| !addr.is_empty())
    }
}
