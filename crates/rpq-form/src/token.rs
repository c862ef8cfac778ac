//! Compact state tokens: the answer record as URL-safe unpadded base64 over
//! its JSON form, suitable for a location fragment.

use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use thiserror::Error;

use crate::answers::AnswerRecord;

/// Tokens are written without padding; decoding accepts historical padded
/// tokens as well.
const TOKEN_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("token does not hold an answer record: {0}")]
    Record(#[from] serde_json::Error),
}

/// Encodes the record as a state token. An empty record encodes to `None`
/// so callers can clear the fragment instead of publishing `"{}"`.
pub fn encode(record: &AnswerRecord) -> Result<Option<String>, TokenError> {
    if record.is_empty() {
        return Ok(None);
    }
    let json = serde_json::to_vec(record)?;
    Ok(Some(TOKEN_ENGINE.encode(json)))
}

/// Decodes a state token back into an answer record. A leading `#` is
/// tolerated so raw location fragments can be passed through.
pub fn decode(token: &str) -> Result<AnswerRecord, TokenError> {
    let token = token.strip_prefix('#').unwrap_or(token);
    let json = TOKEN_ENGINE.decode(token)?;
    Ok(serde_json::from_slice(&json)?)
}

/// Fragment handling at page load: no fragment or a malformed token starts
/// a blank questionnaire rather than failing.
pub fn decode_fragment(fragment: Option<&str>) -> AnswerRecord {
    let Some(token) = fragment else {
        return AnswerRecord::default();
    };
    let token = token.strip_prefix('#').unwrap_or(token);
    if token.is_empty() {
        return AnswerRecord::default();
    }
    match decode(token) {
        Ok(record) => record,
        Err(error) => {
            tracing::warn!(%error, "discarding unreadable state token");
            AnswerRecord::default()
        }
    }
}
