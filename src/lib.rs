//! Authenticated SMTP mail submission with per-recipient error isolation.
//!
//! One [`SmtpTransport::deliver`] call opens one encrypted, authenticated
//! session, walks the SMTP dialogue (`MAIL FROM`, one `RCPT TO` per
//! recipient, `DATA`), and reports one of three outcomes: everything
//! delivered ([`Delivery::Sent`]), delivered to a subset
//! ([`Delivery::Partial`], opt-in), or a structured failure
//! ([`DeliveryError`]).
//!
//! # Quick Start
//!
//! ```ignore
//! // 1. Configure the transport
//! let transport = SmtpTransport::new(
//!     TransportConfig::new("smtp.example.com", "user", "secret").allow_partial(true),
//! );
//!
//! // 2. Compose with lettre, or hand over raw RFC 5322 bytes
//! let message = lettre::Message::builder()
//!     .from("Maint <maint@example.com>".parse()?)
//!     .to("User <user@example.com>".parse()?)
//!     .subject("Scheduled maintenance")
//!     .body(String::from("Starting at 02:00 UTC."))?;
//!
//! // 3. Deliver
//! let envelope = Envelope::new("maint@example.com", ["user@example.com", "ops@example.com"]);
//! match transport.deliver(&message, &envelope).await? {
//!     Delivery::Sent { reply } => println!("delivered: {reply}"),
//!     Delivery::Partial { rejected, .. } => println!("delivered, {} refused", rejected.len()),
//! }
//! ```
//!
//! # Environment Variables
//!
//! [`TransportConfig::from_env`] reads:
//!
//! | Variable | Required | Description |
//! |----------|----------|-------------|
//! | `SMTP_HOST` | Yes | SMTP server hostname |
//! | `SMTP_PORT` | No | Port (default: 587) |
//! | `SMTP_USERNAME` | Yes | Username for authentication |
//! | `SMTP_PASSWORD` | Yes | Password for authentication |
//! | `SMTP_HELO` | No | HELO/EHLO identity override |
//! | `SMTP_TLS` | No | `starttls` (default) or `implicit` |
//! | `SMTP_ALLOW_PARTIAL` | No | Deliver to the accepted subset (default: false) |

pub mod address;
pub mod config;
pub mod envelope;
pub mod error;
pub mod message;
pub mod session;
pub mod transport;

pub use config::{ConfigError, TlsMode, TransportConfig};
pub use envelope::Envelope;
pub use error::DeliveryError;
pub use message::Sendable;
pub use session::{Connector, SessionError, SmtpConnector, SmtpSession};
pub use transport::{Delivery, RecipientOutcome, SmtpTransport};
