//! Device control endpoints.

use axum::Json;
use axum::extract::{Path, State};
use serde_json::{Value, json};

use crate::error::Result;
use crate::state::AppState;

/// `POST /api/device/wake/{device_id}` - sends `KEYCODE_WAKEUP`.
pub async fn wake_device(
	State(state): State<AppState>,
	Path(device_id): Path<String>,
) -> Result<Json<Value>> {
	state.adb.wake(&device_id).await?;
	Ok(Json(json!({
		"message": format!("Wake-up keyevent sent to device {device_id}"),
	})))
}

/// `POST /api/device/home/{device_id}` - sends `KEYCODE_HOME`.
pub async fn home_device(
	State(state): State<AppState>,
	Path(device_id): Path<String>,
) -> Result<Json<Value>> {
	state.adb.home(&device_id).await?;
	Ok(Json(json!({
		"message": format!("Home keyevent sent to device {device_id}"),
	})))
}
