//! Local-part quoting for addresses sent in SMTP commands.

use std::borrow::Cow;

/// Quote the local-part of `addr` if it is not safe to send bare in a
/// `MAIL FROM` or `RCPT TO` command.
///
/// The local-part is everything before the *last* `@`; addresses in the
/// wild occasionally contain more than one, and the last one wins. A
/// local-part consisting solely of `[A-Za-z0-9_.+-]` and not starting
/// with a dot passes through unchanged; anything else is wrapped in
/// double quotes before the address is reassembled.
///
/// An address without any `@` is handled best-effort: the whole string is
/// treated as the local-part with an empty domain, the quoting check
/// still applies, and no separator is appended.
pub fn quote(addr: &str) -> Cow<'_, str> {
    let (local, domain) = match addr.rsplit_once('@') {
        Some((local, domain)) => (local, Some(domain)),
        None => (addr, None),
    };

    if !needs_quoting(local) {
        return Cow::Borrowed(addr);
    }

    match domain {
        Some(domain) => Cow::Owned(format!("\"{local}\"@{domain}")),
        None => Cow::Owned(format!("\"{local}\"")),
    }
}

fn needs_quoting(local: &str) -> bool {
    local.starts_with('.')
        || local
            .chars()
            .any(|c| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '+' | '-')))
}
