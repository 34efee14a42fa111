use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;
use serde::Serialize;

use a2a_wire::{
    A2AError, JsonRpcId, JsonRpcRequest, JsonRpcResponse, MessageSendParams, TaskIdParams,
    TaskPushNotificationConfig, TaskQueryParams,
};

use crate::router::ServerState;
use crate::sse::sse_response;

/// JSON-RPC endpoint behind `POST /`.
///
/// Transport-level failures (unparseable body, wrong envelope, unknown
/// method, bad params) and handler errors all come back as HTTP 200 with a
/// JSON-RPC error object. `message/stream` and `tasks/resubscribe` switch
/// the response to SSE once their params decode.
pub async fn jsonrpc_endpoint(State(state): State<ServerState>, body: String) -> Response {
    let raw: serde_json::Value = match serde_json::from_str(&body) {
        Ok(raw) => raw,
        Err(_) => {
            let response = JsonRpcResponse::failure(JsonRpcId::Null, (&A2AError::ParseError).into());
            return Json(response).into_response();
        }
    };

    // The id is pulled out first so even envelope rejections echo it.
    let request_id = raw
        .get("id")
        .cloned()
        .and_then(|id| serde_json::from_value::<JsonRpcId>(id).ok())
        .unwrap_or(JsonRpcId::Null);

    if raw.get("jsonrpc").and_then(serde_json::Value::as_str) != Some("2.0") {
        let error = A2AError::InvalidRequest("jsonrpc version must be \"2.0\"".into());
        return Json(JsonRpcResponse::failure(request_id, (&error).into())).into_response();
    }
    let request: JsonRpcRequest = match serde_json::from_value(raw) {
        Ok(request) => request,
        Err(err) => {
            let error = A2AError::InvalidRequest(err.to_string());
            return Json(JsonRpcResponse::failure(request_id, (&error).into())).into_response();
        }
    };

    let params = request.params.unwrap_or(serde_json::Value::Null);
    let response = match request.method.as_str() {
        "message/send" => handle_message_send(&state, request_id, &params).await,
        "message/stream" => return handle_message_stream(&state, request_id, &params).await,
        "tasks/get" => handle_get_task(&state, request_id, &params).await,
        "tasks/cancel" => handle_cancel_task(&state, request_id, &params).await,
        "tasks/resubscribe" => return handle_resubscribe(&state, request_id, &params).await,
        "tasks/pushNotificationConfig/set" => {
            handle_set_push_config(&state, request_id, &params).await
        }
        "tasks/pushNotificationConfig/get" => {
            handle_get_push_config(&state, request_id, &params).await
        }
        method => {
            let error = A2AError::MethodNotFound(method.to_string());
            JsonRpcResponse::failure(request_id, (&error).into())
        }
    };
    Json(response).into_response()
}

fn decode_params<T: DeserializeOwned>(
    request_id: &JsonRpcId,
    params: &serde_json::Value,
) -> Result<T, JsonRpcResponse> {
    serde_json::from_value(params.clone()).map_err(|err| {
        let error = A2AError::InvalidParams(err.to_string());
        JsonRpcResponse::failure(request_id.clone(), (&error).into())
    })
}

fn success_response<T: Serialize>(request_id: JsonRpcId, value: &T) -> JsonRpcResponse {
    JsonRpcResponse::success(request_id, serde_json::to_value(value).unwrap_or_default())
}

async fn handle_message_send(
    state: &ServerState,
    request_id: JsonRpcId,
    params: &serde_json::Value,
) -> JsonRpcResponse {
    let params: MessageSendParams = match decode_params(&request_id, params) {
        Ok(params) => params,
        Err(response) => return response,
    };
    match state.handler.on_message_send(params).await {
        Ok(event) => success_response(request_id, &event),
        Err(err) => JsonRpcResponse::failure(request_id, (&err).into()),
    }
}

async fn handle_message_stream(
    state: &ServerState,
    request_id: JsonRpcId,
    params: &serde_json::Value,
) -> Response {
    let params: MessageSendParams = match decode_params(&request_id, params) {
        Ok(params) => params,
        Err(response) => return Json(response).into_response(),
    };
    match state.handler.on_message_stream(params).await {
        Ok(events) => sse_response(events, request_id).into_response(),
        Err(err) => Json(JsonRpcResponse::failure(request_id, (&err).into())).into_response(),
    }
}

async fn handle_get_task(
    state: &ServerState,
    request_id: JsonRpcId,
    params: &serde_json::Value,
) -> JsonRpcResponse {
    let params: TaskQueryParams = match decode_params(&request_id, params) {
        Ok(params) => params,
        Err(response) => return response,
    };
    match state.handler.on_get_task(params).await {
        Ok(task) => success_response(request_id, &task),
        Err(err) => JsonRpcResponse::failure(request_id, (&err).into()),
    }
}

async fn handle_cancel_task(
    state: &ServerState,
    request_id: JsonRpcId,
    params: &serde_json::Value,
) -> JsonRpcResponse {
    let params: TaskIdParams = match decode_params(&request_id, params) {
        Ok(params) => params,
        Err(response) => return response,
    };
    match state.handler.on_cancel_task(params).await {
        Ok(task) => success_response(request_id, &task),
        Err(err) => JsonRpcResponse::failure(request_id, (&err).into()),
    }
}

async fn handle_resubscribe(
    state: &ServerState,
    request_id: JsonRpcId,
    params: &serde_json::Value,
) -> Response {
    let params: TaskIdParams = match decode_params(&request_id, params) {
        Ok(params) => params,
        Err(response) => return Json(response).into_response(),
    };
    match state.handler.on_resubscribe(params).await {
        Ok(events) => sse_response(events, request_id).into_response(),
        Err(err) => Json(JsonRpcResponse::failure(request_id, (&err).into())).into_response(),
    }
}

async fn handle_set_push_config(
    state: &ServerState,
    request_id: JsonRpcId,
    params: &serde_json::Value,
) -> JsonRpcResponse {
    let params: TaskPushNotificationConfig = match decode_params(&request_id, params) {
        Ok(params) => params,
        Err(response) => return response,
    };
    match state.handler.on_set_push_config(params).await {
        Ok(config) => success_response(request_id, &config),
        Err(err) => JsonRpcResponse::failure(request_id, (&err).into()),
    }
}

async fn handle_get_push_config(
    state: &ServerState,
    request_id: JsonRpcId,
    params: &serde_json::Value,
) -> JsonRpcResponse {
    let params: TaskIdParams = match decode_params(&request_id, params) {
        Ok(params) => params,
        Err(response) => return response,
    };
    match state.handler.on_get_push_config(params).await {
        Ok(config) => success_response(request_id, &config),
        Err(err) => JsonRpcResponse::failure(request_id, (&err).into()),
    }
}
