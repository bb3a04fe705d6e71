use rst_common::standard::serde_json::Value;
use rst_common::with_http_tokio::axum::extract::State;
use rst_common::with_http_tokio::axum::http::StatusCode;
use rst_common::with_http_tokio::axum::response::{IntoResponse, Response};
use rst_common::with_http_tokio::axum::Json;
use rst_common::with_logging::log::{error, warn};

use hubrouter_core::didcomm::{DIDCommMsg, Decision};

use crate::apps::Delivery;
use crate::common::types::CommonError;

use super::types::{
    DIDCommInvitationResp, ErrorResponse, HealthCheckResp, MessageAcceptedResp,
};
use super::Operation;

pub async fn health_check() -> Json<HealthCheckResp> {
    Json(HealthCheckResp::success())
}

pub async fn generate_invitation(State(operation): State<Operation>) -> Response {
    match operation.issue_invitation().await {
        Ok(invitation) => (StatusCode::OK, Json(DIDCommInvitationResp { invitation })).into_response(),
        Err(err) => {
            let message = format!("failed to create router invitation - err={}", err);
            error!("{}", message);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(message)),
            )
                .into_response()
        }
    }
}

pub async fn receive_message(
    State(operation): State<Operation>,
    Json(payload): Json<Value>,
) -> Response {
    let msg = match DIDCommMsg::try_from(payload) {
        Ok(msg) => msg,
        Err(err) => return failure(StatusCode::BAD_REQUEST, err.to_string()),
    };

    match operation.deliver(msg).await {
        Ok(Delivery::Decided(Decision::Continue(_))) => accepted("continue", None),
        Ok(Delivery::Decided(Decision::Stop(reason))) => accepted("stop", Some(reason)),
        Ok(Delivery::Queued) => accepted("queued", None),
        Err(err @ (CommonError::UnroutableMessage(_) | CommonError::ValidationError(_))) => {
            warn!("inbound message rejected: {}", err);
            failure(StatusCode::BAD_REQUEST, err.to_string())
        }
        Err(err) => {
            error!("inbound message failed: {}", err);
            failure(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}

pub async fn check_topics(State(operation): State<Operation>) -> Response {
    match operation.check_topics().await {
        Ok(notification) => (StatusCode::OK, Json(notification)).into_response(),
        Err(err) => {
            let message = format!("failed to check topics - err={}", err);
            error!("{}", message);
            failure(StatusCode::INTERNAL_SERVER_ERROR, message)
        }
    }
}

fn accepted(status: &str, reason: Option<String>) -> Response {
    let body = MessageAcceptedResp {
        status: status.to_string(),
        reason,
    };

    (StatusCode::ACCEPTED, Json(body)).into_response()
}

fn failure(code: StatusCode, message: String) -> Response {
    (code, Json(ErrorResponse::new(message))).into_response()
}
