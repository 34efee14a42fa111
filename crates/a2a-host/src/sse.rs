use std::convert::Infallible;

use a2a_wire::{JsonRpcId, JsonRpcResponse};
use axum::response::sse::{Event as SseEvent, KeepAlive, Sse};
use tokio_stream::{Stream, StreamExt};

use crate::event_queue::EventStream;

/// Turns a task event stream into an SSE response. Every frame is a full
/// JSON-RPC success envelope echoing the request id, so streaming clients
/// parse the same shape as unary responses.
pub fn sse_response(
    events: EventStream,
    request_id: JsonRpcId,
) -> Sse<impl Stream<Item = Result<SseEvent, Infallible>>> {
    let frames = events.map(move |event| {
        let result = serde_json::to_value(&event).unwrap_or_default();
        let response = JsonRpcResponse::success(request_id.clone(), result);
        let data = serde_json::to_string(&response).unwrap_or_default();
        Ok(SseEvent::default()
            .id(uuid::Uuid::new_v4().to_string())
            .data(data))
    });

    Sse::new(frames).keep_alive(KeepAlive::default())
}
