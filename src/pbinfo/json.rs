//! JSON decoding with precise error locations.

use serde::de::DeserializeOwned;

use super::errors::DecodeError;

/// Deserialize `body`, reporting the JSON path and position of the first mismatch.
pub fn decode_json<T: DeserializeOwned>(body: &str) -> Result<T, DecodeError> {
    let jd = &mut serde_json::Deserializer::from_str(body);
    serde_path_to_error::deserialize(jd).map_err(|err| {
        let path = err.path().to_string();
        let inner = err.into_inner();
        let (line, column) = (inner.line(), inner.column());

        let msg = inner.to_string();
        let loc = format!(" at line {line} column {column}");
        let message = msg.strip_suffix(&loc).unwrap_or(&msg).to_string();

        DecodeError {
            path,
            line,
            column,
            message,
        }
    })
}
