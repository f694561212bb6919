//! Delivery failure kinds.

use thiserror::Error;

use crate::session::SessionError;
use crate::transport::RecipientOutcome;

/// A delivery attempt that transmitted nothing.
///
/// Partial success is not an error: deliveries that reached a subset of
/// recipients come back as [`Delivery::Partial`](crate::Delivery::Partial)
/// and must be matched explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeliveryError {
    /// Connecting, securing, or authenticating the session failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(SessionError),

    /// The envelope had no non-blank recipients; nothing was attempted.
    #[error("envelope has no valid recipients")]
    NoValidRecipients,

    /// The server refused `MAIL FROM`. No recipient was evaluated.
    #[error("sender rejected: {0}")]
    SenderRejected(SessionError),

    /// Every recipient was refused during the RCPT phase; no data sent.
    #[error("{}", describe_rejections("all recipients rejected", .0))]
    AllRecipientsRejected(Vec<RecipientOutcome>),

    /// Some recipients were refused and partial delivery is disallowed;
    /// no data sent.
    #[error("{}", describe_rejections("delivery refused", .0))]
    SomeRecipientsRejected(Vec<RecipientOutcome>),
}

impl DeliveryError {
    /// Outcomes for the recipients the server refused, in submission
    /// order. Empty for the kinds that never reached the RCPT phase.
    pub fn rejected_recipients(&self) -> &[RecipientOutcome] {
        match self {
            Self::AllRecipientsRejected(rejected) | Self::SomeRecipientsRejected(rejected) => {
                rejected
            }
            _ => &[],
        }
    }
}

/// One refused recipient reads as its own server reply; several collapse
/// to a count plus the addresses.
fn describe_rejections(what: &str, rejected: &[RecipientOutcome]) -> String {
    match rejected {
        [single] => format!("{what}: {single}"),
        many => format!(
            "{what}: {} recipients refused ({})",
            many.len(),
            many.iter()
                .map(|outcome| outcome.address.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::DeliveryError;
    use crate::transport::RecipientOutcome;

    fn refused(address: &str) -> RecipientOutcome {
        RecipientOutcome {
            address: address.to_owned(),
            accepted: false,
            code: Some(550),
            reply: Some("5.1.1 user unknown".to_owned()),
        }
    }

    #[test]
    fn single_rejection_surfaces_the_server_reply() {
        let err = DeliveryError::SomeRecipientsRejected(vec![refused("bob@example.com")]);
        assert_eq!(
            err.to_string(),
            "delivery refused: bob@example.com: 550 5.1.1 user unknown"
        );
    }

    #[test]
    fn several_rejections_collapse_to_an_aggregate() {
        let err = DeliveryError::AllRecipientsRejected(vec![
            refused("a@example.com"),
            refused("b@example.com"),
        ]);
        assert_eq!(
            err.to_string(),
            "all recipients rejected: 2 recipients refused (a@example.com, b@example.com)"
        );
    }
}
