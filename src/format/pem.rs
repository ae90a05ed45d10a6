//! PEM armor for RSA key material.
//!
//! Encoding goes through the RFC 7468 encoder shipped with `rsa`. Decoding
//! is lenient: a single labelled block without encapsulated headers, any
//! body line width, text before the BEGIN line and after the END line
//! ignored.

use base64::{DecodeError, Engine, engine::general_purpose::STANDARD};
use rsa::pkcs8::der::pem::{self, LineEnding};
use thiserror::Error;
use zeroize::Zeroizing;

/// Label of PKCS#1 private key blocks.
pub const PRIVATE_KEY_LABEL: &str = "RSA Private Key";
/// Label of SubjectPublicKeyInfo public key blocks.
pub const PUBLIC_KEY_LABEL: &str = "RSA Public Key";
/// Width of base64 body lines (RFC 7468).
pub const PEM_LINE_WIDTH: usize = 64;

const BEGIN: &str = "BEGIN";
const END: &str = "END";
const DASHES: &str = "-----";

#[derive(Debug, Error)]
pub enum PemError {
    #[error("missing a pre encapsulation boundary")]
    MissingBegin,

    #[error("missing a post encapsulation boundary")]
    MissingEnd,

    #[error("label doesn't match: BEGIN {begin}, END {end}")]
    LabelMismatch { begin: String, end: String },

    #[error("base64 decode: {0}")]
    Base64(#[source] DecodeError),

    #[error("PEM encode: {0}")]
    Encode(pem::Error),
}

/// A decoded PEM block. The binary contents are wiped on drop.
pub struct PemBlock {
    label: String,
    contents: Zeroizing<Vec<u8>>,
}

impl PemBlock {
    /// Creates a block holding a copy of `contents`.
    pub fn new(label: &str, contents: &[u8]) -> Self {
        Self {
            label: label.to_string(),
            contents: Zeroizing::new(contents.to_vec()),
        }
    }

    /// Returns the label between `BEGIN`/`END` and the dashes.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the decoded binary contents.
    pub fn contents(&self) -> &[u8] {
        &self.contents
    }

    /// Renders the block with 64 column body lines and LF line endings.
    ///
    /// # Errors
    ///
    /// Fails if the label is not a valid RFC 7468 label.
    pub fn encode(&self) -> Result<String, PemError> {
        pem::encode_string(&self.label, LineEnding::LF, &self.contents).map_err(PemError::Encode)
    }

    /// Parses the first PEM block found in `text`.
    ///
    /// # Errors
    ///
    /// Fails if either boundary is missing, the labels differ, or the body
    /// is not valid base64.
    pub fn decode(text: &str) -> Result<Self, PemError> {
        let mut lines = text.lines().map(str::trim);

        let label = lines
            .by_ref()
            .find_map(|line| boundary_label(line, BEGIN))
            .ok_or(PemError::MissingBegin)?;

        let mut body = Zeroizing::new(String::new());
        for line in lines {
            if let Some(end) = boundary_label(line, END) {
                if end != label {
                    return Err(PemError::LabelMismatch {
                        begin: label.to_string(),
                        end: end.to_string(),
                    });
                }

                let contents = STANDARD.decode(body.as_bytes()).map_err(PemError::Base64)?;
                return Ok(Self {
                    label: label.to_string(),
                    contents: Zeroizing::new(contents),
                });
            }
            body.push_str(line);
        }

        Err(PemError::MissingEnd)
    }
}

/// Returns the label of a `-----<kind> <label>-----` line.
fn boundary_label<'a>(line: &'a str, kind: &str) -> Option<&'a str> {
    line.strip_prefix(DASHES)?
        .strip_prefix(kind)?
        .strip_prefix(' ')?
        .strip_suffix(DASHES)
}
