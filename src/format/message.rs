//! Encoded message wire format.
//!
//! ```text
//! -----BEGIN ENCODED MESSAGE-----
//! <standard base64 of the ciphertext, 40 characters per line>
//! -----END ENCODED MESSAGE-----
//! ```
//!
//! Decoding drops every line containing `-`, which is how the delimiter
//! lines are recognised. The standard base64 alphabet never produces `-`;
//! changing either rule is a wire format break.

use base64::{Engine, engine::general_purpose::STANDARD};
use log::trace;

use super::fold;
use crate::error::{Error, Result};

pub const MESSAGE_BEGIN: &str = "-----BEGIN ENCODED MESSAGE-----";
pub const MESSAGE_END: &str = "-----END ENCODED MESSAGE-----";
/// Number of base64 characters per message line.
pub const MESSAGE_LINE_WIDTH: usize = 40;

/// Armors raw ciphertext as an encoded message.
pub fn wrap(cipher: &[u8]) -> String {
    let encoded = STANDARD.encode(cipher);
    let body = fold(&encoded, MESSAGE_LINE_WIDTH).join("\n");
    trace!("wrapped {} ciphertext bytes", cipher.len());

    format!("{MESSAGE_BEGIN}\n{body}\n{MESSAGE_END}\n")
}

/// Recovers the raw ciphertext from an encoded message.
///
/// # Errors
///
/// Returns [`Error::MessageDecodeFailed`] if the remaining lines are not
/// valid standard base64.
pub fn unwrap(text: &str) -> Result<Vec<u8>> {
    let encoded: String = text.lines().filter(|line| !line.contains('-')).collect();

    let cipher = STANDARD
        .decode(encoded.as_bytes())
        .map_err(Error::MessageDecodeFailed)?;
    trace!("unwrapped {} ciphertext bytes", cipher.len());

    Ok(cipher)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn wrap_produces_delimited_40_column_body() {
        let text = wrap(&[0xA5; 100]);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.first(), Some(&MESSAGE_BEGIN));
        assert_eq!(lines.last(), Some(&MESSAGE_END));
        assert!(text.ends_with('\n'));

        let body = &lines[1..lines.len() - 1];
        // 100 bytes encode to 136 characters
        assert_eq!(body.len(), 4);
        assert!(body[..3].iter().all(|l| l.len() == MESSAGE_LINE_WIDTH));
        assert_eq!(body[3].len(), 16);
    }

    #[test]
    fn wrap_is_deterministic() {
        assert_eq!(wrap(b"same input"), wrap(b"same input"));
    }

    #[test]
    fn wrap_empty_input() {
        let text = wrap(&[]);
        assert_eq!(text, format!("{MESSAGE_BEGIN}\n\n{MESSAGE_END}\n"));
        assert!(unwrap(&text).unwrap().is_empty());
    }

    #[test]
    fn unwrap_ignores_dash_lines() {
        let text = "-- sent by a friend --\nSGVsbG8s\nIHdvcmxk\n-----END-----\n";
        assert_eq!(unwrap(text).unwrap(), b"Hello, world");
    }

    #[test]
    fn unwrap_accepts_crlf_line_endings() {
        let text = wrap(b"windows").replace('\n', "\r\n");
        assert_eq!(unwrap(&text).unwrap(), b"windows");
    }

    #[test]
    fn malformed_base64_fails() {
        let text = format!("{MESSAGE_BEGIN}\nnot*base64*at*all\n{MESSAGE_END}\n");
        assert!(matches!(unwrap(&text), Err(Error::MessageDecodeFailed(_))));
    }

    #[test]
    fn plain_text_is_not_a_message() {
        assert!(matches!(
            unwrap("Test Message"),
            Err(Error::MessageDecodeFailed(_))
        ));
    }

    proptest! {
        #[test]
        fn unwrap_inverts_wrap(bytes in proptest::collection::vec(any::<u8>(), 0..2048)) {
            prop_assert_eq!(unwrap(&wrap(&bytes)).unwrap(), bytes);
        }
    }
}
