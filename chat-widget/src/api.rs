use futures::future::{select, Either};
use gloo_net::http::Request;
use gloo_timers::future::TimeoutFuture;
use shared_types::{parse_reply_body, ChatRequest, TransportError};

/// POST one message to the chat backend and return the decoded reply payload.
///
/// Gives up with [`TransportError::Timeout`] after `timeout_ms`; the request
/// itself is left to settle in the background.
pub async fn send_chat_message(
    endpoint: &str,
    request: &ChatRequest,
    timeout_ms: u32,
) -> Result<serde_json::Value, TransportError> {
    let exchange = Box::pin(post_chat_request(endpoint, request));

    match select(exchange, TimeoutFuture::new(timeout_ms)).await {
        Either::Left((result, _)) => result,
        Either::Right(_) => Err(TransportError::Timeout(timeout_ms)),
    }
}

async fn post_chat_request(
    endpoint: &str,
    request: &ChatRequest,
) -> Result<serde_json::Value, TransportError> {
    let response = Request::post(endpoint)
        .header("Accept", "application/json")
        .json(request)
        .map_err(|e| TransportError::Encode(e.to_string()))?
        .send()
        .await
        .map_err(|e| TransportError::Network(e.to_string()))?;

    check_status(response.status())?;

    let body = response
        .text()
        .await
        .map_err(|e| TransportError::Network(format!("failed to read response: {e}")))?;

    Ok(parse_reply_body(&body))
}

/// Anything outside 2xx is a failed exchange; the body is not read.
pub fn check_status(status: u16) -> Result<(), TransportError> {
    if (200..300).contains(&status) {
        Ok(())
    } else {
        Err(TransportError::Status(status))
    }
}
