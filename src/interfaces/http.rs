use crate::application::gateway::PaymentGateway;
use crate::domain::payment::{PaymentRequest, PaymentStatus, ProcessingResult};
use crate::error::GatewayError;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<PaymentGateway>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/payments", post(process_payment))
        .route("/api/payments/:id", get(get_payment))
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
struct RejectedResponse {
    status: PaymentStatus,
    errors: Vec<String>,
}

async fn process_payment(
    State(state): State<AppState>,
    Json(request): Json<PaymentRequest>,
) -> Response {
    info!("received payment request");

    // Format validation happens here at the boundary; the core only
    // re-checks business rules.
    if let Err(failures) = request.validate() {
        let errors = format_failures(failures);
        warn!(?errors, "request failed format validation");
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                message: "Validation failed".to_string(),
                errors: Some(errors),
            }),
        )
            .into_response();
    }

    match state.gateway.process_payment(&request).await {
        Ok(ProcessingResult::Rejected(errors)) => (
            StatusCode::BAD_REQUEST,
            Json(RejectedResponse {
                status: PaymentStatus::Rejected,
                errors,
            }),
        )
            .into_response(),
        Ok(ProcessingResult::Processed(record)) => {
            let status = if record.status == PaymentStatus::Authorized {
                StatusCode::CREATED
            } else {
                StatusCode::OK
            };
            (status, Json(record)).into_response()
        }
        Err(err) => err.into_response(),
    }
}

async fn get_payment(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    info!(%id, "retrieving payment");
    match state.gateway.get_payment(id).await {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(err) => err.into_response(),
    }
}

fn format_failures(failures: ValidationErrors) -> Vec<String> {
    let mut errors: Vec<String> = failures
        .field_errors()
        .into_iter()
        .map(|(field, field_errors)| {
            let detail = field_errors
                .first()
                .and_then(|e| e.message.as_ref())
                .map(|m| m.to_string())
                .unwrap_or_else(|| "invalid value".to_string());
            format!("{field}: {detail}")
        })
        .collect();
    errors.sort();
    errors
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        match self {
            GatewayError::PaymentNotFound(id) => {
                warn!(%id, "payment not found");
                (
                    StatusCode::NOT_FOUND,
                    Json(ErrorResponse {
                        message: format!("Payment not found: {id}"),
                        errors: None,
                    }),
                )
                    .into_response()
            }
            GatewayError::BankUnavailable { .. } => {
                error!("bank unavailable: {}", self);
                // Attempt counts and transport details stay internal.
                (
                    StatusCode::BAD_GATEWAY,
                    Json(ErrorResponse {
                        message: "Payment processor unavailable. Please try again later."
                            .to_string(),
                        errors: None,
                    }),
                )
                    .into_response()
            }
        }
    }
}
