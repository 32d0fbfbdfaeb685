//! Logcat endpoints.

use std::time::{SystemTime, UNIX_EPOCH};

use axum::Json;
use axum::extract::{Path, State};
use axum::response::Response;
use serde_json::{Value, json};
use tracing::debug;

use crate::error::Result;
use crate::handlers::files::attachment;
use crate::state::AppState;

/// `GET /api/logcat/{device_id}` - dumps the device log buffer and returns
/// it as a text attachment.
pub async fn download_logcat(
	State(state): State<AppState>,
	Path(device_id): Path<String>,
) -> Result<Response> {
	let dump = state.adb.logcat_dump(&device_id).await?;
	let filename = format!(
		"logcat_{}_{}.txt",
		device_id.replace(':', "_"),
		unix_seconds()
	);
	debug!(target = "droidview", device = %device_id, bytes = dump.len(), "logcat dumped");
	Ok(attachment(&filename, "text/plain; charset=utf-8", dump))
}

/// `POST /api/logcat/clear/{device_id}` - clears the device log buffer.
pub async fn clear_logcat(
	State(state): State<AppState>,
	Path(device_id): Path<String>,
) -> Result<Json<Value>> {
	state.adb.logcat_clear(&device_id).await?;
	Ok(Json(json!({
		"message": format!("Logcat buffer cleared successfully for device {device_id}"),
	})))
}

fn unix_seconds() -> u64 {
	SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.map(|elapsed| elapsed.as_secs())
		.unwrap_or(0)
}
