use curator_core::{FailureKind, FetchError};
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Application code the member and curation read endpoints answer with.
pub const SUCCESS_CODE: &str = "200-4";

/// `{ code, msg, data }` wrapper every backend response uses.
#[derive(Debug, Deserialize)]
struct Envelope {
    code: Option<String>,
    msg: Option<String>,
    data: Option<serde_json::Value>,
}

/// Which application codes count as success.
#[derive(Debug, Clone, Copy)]
pub enum SuccessPolicy<'a> {
    /// Code must be present and one of these.
    Exact(&'a [String]),
    /// Any `2xx-n` code, or none at all.
    AnyTwoHundred,
}

impl SuccessPolicy<'_> {
    fn accepts(&self, code: Option<&str>) -> bool {
        match self {
            SuccessPolicy::Exact(codes) => {
                code.is_some_and(|code| codes.iter().any(|accepted| accepted == code))
            }
            SuccessPolicy::AnyTwoHundred => code.map_or(true, |code| code.starts_with('2')),
        }
    }
}

/// Decodes an envelope body and returns its `data` payload.
pub fn decode_envelope<T: DeserializeOwned>(
    body: &str,
    policy: SuccessPolicy<'_>,
) -> Result<T, FetchError> {
    let envelope: Envelope = serde_json::from_str(body)
        .map_err(|err| FetchError::malformed(format!("Invalid JSON in response: {err}")))?;

    if !policy.accepts(envelope.code.as_deref()) {
        let code = envelope.code.unwrap_or_default();
        let message = envelope
            .msg
            .filter(|msg| !msg.trim().is_empty())
            .unwrap_or_else(|| format!("request failed with code {code}"));
        return Err(FetchError::new(FailureKind::Application { code }, message));
    }

    let data = envelope
        .data
        .ok_or_else(|| FetchError::malformed("response has no data"))?;
    serde_json::from_value(data)
        .map_err(|err| FetchError::malformed(format!("unexpected data shape: {err}")))
}

/// Best-effort `msg` of an error body, for HTTP status failures.
pub fn envelope_message(body: &str) -> Option<String> {
    serde_json::from_str::<Envelope>(body)
        .ok()?
        .msg
        .filter(|msg| !msg.trim().is_empty())
}
