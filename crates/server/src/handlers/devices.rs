use axum::Json;
use axum::extract::State;
use droidview_adb::DeviceInfo;

use crate::error::Result;
use crate::state::AppState;

/// `GET /api/devices` - every device adb currently sees, ready or not.
pub async fn list_devices(State(state): State<AppState>) -> Result<Json<Vec<DeviceInfo>>> {
	Ok(Json(state.adb.devices().await?))
}
