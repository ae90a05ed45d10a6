//! Text formats: PEM key armor and the encoded message wire format.

pub mod message;
pub mod pem;

pub use message::{unwrap, wrap};
pub use pem::{PemBlock, PemError};

/// Splits ASCII text into lines of at most `width` characters.
pub(crate) fn fold(text: &str, width: usize) -> Vec<&str> {
    debug_assert!(text.is_ascii());

    let mut lines = Vec::with_capacity(text.len() / width + 1);
    let mut rest = text;
    while !rest.is_empty() {
        let (line, tail) = rest.split_at(width.min(rest.len()));
        lines.push(line);
        rest = tail;
    }
    lines
}
