//! Message payload seam: anything that renders to RFC 5322 wire bytes.

/// A fully composed message that can be rendered to its wire form.
///
/// The transport never inspects or mutates the payload; composing and
/// serializing messages belongs to a message builder such as
/// [`lettre::Message`].
pub trait Sendable {
    /// Render the message to the byte stream sent after `DATA`.
    fn to_wire(&self) -> Vec<u8>;
}

impl Sendable for Vec<u8> {
    fn to_wire(&self) -> Vec<u8> {
        self.clone()
    }
}

impl Sendable for &[u8] {
    fn to_wire(&self) -> Vec<u8> {
        self.to_vec()
    }
}

impl Sendable for String {
    fn to_wire(&self) -> Vec<u8> {
        self.as_bytes().to_vec()
    }
}

impl Sendable for &str {
    fn to_wire(&self) -> Vec<u8> {
        self.as_bytes().to_vec()
    }
}

impl Sendable for lettre::Message {
    fn to_wire(&self) -> Vec<u8> {
        self.formatted()
    }
}

#[cfg(test)]
mod tests {
    use super::Sendable;

    #[test]
    fn lettre_message_renders_to_wire() {
        let message = lettre::Message::builder()
            .from("a@example.com".parse().unwrap())
            .to("b@example.com".parse().unwrap())
            .subject("maintenance window")
            .body(String::from("starting at 02:00 UTC"))
            .unwrap();

        let wire = String::from_utf8(message.to_wire()).unwrap();
        assert!(wire.contains("Subject: maintenance window"));
        assert!(wire.contains("starting at 02:00 UTC"));
    }

    #[test]
    fn raw_bytes_pass_through() {
        let raw = b"From: a@example.com\r\n\r\nhi".to_vec();
        assert_eq!(raw.to_wire(), raw);
    }
}
