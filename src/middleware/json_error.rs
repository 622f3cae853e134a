use axum::{
    body::{Body, to_bytes},
    extract::Request,
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{error::AppError, response::JsonApiResponse};

// extractor rejection texts are short; anything larger is not one
const MAX_REJECTION_BODY_BYTES: usize = 16 * 1024;

/// Extractor rejections (malformed JSON bodies, wrong content types, bad
/// path parameters) bypass `AppError` and would reach clients as plain
/// text. This layer rewraps any non-JSON error response into the standard
/// `{status, code, message, data}` envelope, so a missing field in a login
/// body reports `validation_error` like every other invalid input.
pub async fn json_error_middleware(req: Request, next: Next) -> Response {
    let response = next.run(req).await;
    let status = response.status();
    if !(status.is_client_error() || status.is_server_error()) || is_json(&response) {
        return response;
    }

    let (_, body) = response.into_parts();
    let message = rejection_message(body, status).await;
    JsonApiResponse::from_error(&error_for(status, message)).into_response()
}

fn is_json(response: &Response) -> bool {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/json"))
}

async fn rejection_message(body: Body, status: StatusCode) -> String {
    let text = match to_bytes(body, MAX_REJECTION_BODY_BYTES).await {
        Ok(bytes) => String::from_utf8_lossy(&bytes).trim().to_string(),
        Err(_) => String::new(),
    };
    if text.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string()
    } else {
        text
    }
}

fn error_for(status: StatusCode, message: String) -> AppError {
    match status {
        StatusCode::UNAUTHORIZED => AppError::unauthenticated(message),
        StatusCode::FORBIDDEN => AppError::forbidden(message),
        StatusCode::NOT_FOUND => AppError::not_found("Resource not found"),
        // a body the extractor could not parse is an input problem, 400
        status if status.is_client_error() => AppError::validation(message),
        _ => AppError::internal("Internal server error"),
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::error_for;
    use crate::response::status_for;

    #[test]
    fn unparseable_bodies_become_validation_errors() {
        let err = error_for(
            StatusCode::UNPROCESSABLE_ENTITY,
            "Failed to deserialize the JSON body".to_string(),
        );
        assert_eq!(err.code(), "validation_error");
        assert_eq!(status_for(&err), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn server_errors_never_leak_their_body() {
        let err = error_for(
            StatusCode::INTERNAL_SERVER_ERROR,
            "stack trace".to_string(),
        );
        assert_eq!(err.message(), "Internal server error");
    }
}
