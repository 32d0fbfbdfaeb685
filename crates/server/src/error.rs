use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use droidview_adb::AdbError;
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ServerError>;

/// Errors surfaced to HTTP clients as `{"error": ...}` JSON bodies.
///
/// These are request-level failures only. Per-event errors inside a running
/// mirroring session travel over the WebSocket as protocol messages and
/// never reach this type.
#[derive(Debug, Error)]
pub enum ServerError {
	#[error("{0}")]
	BadRequest(String),

	#[error("{0}")]
	NotFound(String),

	#[error("invalid multipart upload: {0}")]
	Multipart(#[from] axum::extract::multipart::MultipartError),

	#[error(transparent)]
	Adb(#[from] AdbError),

	#[error(transparent)]
	Io(#[from] std::io::Error),
}

impl ServerError {
	fn status(&self) -> StatusCode {
		match self {
			ServerError::BadRequest(_) | ServerError::Multipart(_) => StatusCode::BAD_REQUEST,
			ServerError::NotFound(_) => StatusCode::NOT_FOUND,
			ServerError::Adb(err) if err.is_path_missing() => StatusCode::NOT_FOUND,
			ServerError::Adb(_) | ServerError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}
}

impl IntoResponse for ServerError {
	fn into_response(self) -> Response {
		let status = self.status();
		(status, Json(json!({ "error": self.to_string() }))).into_response()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn missing_device_path_maps_to_not_found() {
		let err = ServerError::from(AdbError::PathMissing {
			path: "/sdcard/nope".into(),
		});
		assert_eq!(err.status(), StatusCode::NOT_FOUND);
	}

	#[test]
	fn adb_failure_maps_to_internal_error() {
		let err = ServerError::from(AdbError::CommandFailed {
			command: "devices".into(),
			detail: "server not running".into(),
		});
		assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
	}

	#[test]
	fn bad_request_keeps_its_message() {
		let err = ServerError::BadRequest("filePath query parameter is required".into());
		assert_eq!(err.status(), StatusCode::BAD_REQUEST);
		assert_eq!(err.to_string(), "filePath query parameter is required");
	}
}
