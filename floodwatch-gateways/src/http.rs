use floodwatch_core::gateways::{Error, Result};
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;

// A blocking client must neither be created nor dropped within
// an async context, so every request gets its own.
pub fn client() -> Client {
    Client::new()
}

pub fn network_error(err: reqwest::Error) -> Error {
    Error::Network(err.into())
}

/// Unsuccessful responses are turned into errors
/// that carry the response body.
pub fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    Err(Error::Status {
        code: status.as_u16(),
        body,
    })
}

pub fn send(request: RequestBuilder) -> Result<Response> {
    let response = request.send().map_err(network_error)?;
    check_status(response)
}

pub fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T> {
    let text = send(request)?.text().map_err(network_error)?;
    parse_json(&text)
}

pub fn parse_json<T: DeserializeOwned>(text: &str) -> Result<T> {
    serde_json::from_str(text).map_err(|err| Error::InvalidResponse(err.to_string()))
}
