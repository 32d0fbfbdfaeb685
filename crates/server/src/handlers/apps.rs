//! Package management endpoints.

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::debug;

use crate::error::{Result, ServerError};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct AppsQuery {
	filter: Option<String>,
}

/// `GET /api/apps/{device_id}?filter=third_party` - installed package names.
pub async fn list_apps(
	State(state): State<AppState>,
	Path(device_id): Path<String>,
	Query(query): Query<AppsQuery>,
) -> Result<Json<Value>> {
	let third_party_only = query.filter.as_deref() == Some("third_party");
	let packages = state.adb.packages(&device_id, third_party_only).await?;
	Ok(Json(json!({ "packages": packages })))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UninstallRequest {
	#[serde(default)]
	package_name: String,
	#[serde(default)]
	keep_data: bool,
}

/// `POST /api/apps/uninstall/{device_id}` - `pm uninstall`, optionally
/// keeping the app's data and caches (`keepData`).
pub async fn uninstall_app(
	State(state): State<AppState>,
	Path(device_id): Path<String>,
	Json(req): Json<UninstallRequest>,
) -> Result<Json<Value>> {
	if req.package_name.is_empty() {
		return Err(ServerError::BadRequest(
			"packageName in request body is required".into(),
		));
	}

	let output = state
		.adb
		.uninstall(&device_id, &req.package_name, req.keep_data)
		.await?;
	debug!(target = "droidview", device = %device_id, package = %req.package_name, "package uninstalled");
	Ok(Json(json!({
		"message": "Uninstallation command executed",
		"details": output,
		"packageName": req.package_name,
	})))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForceStopRequest {
	#[serde(default)]
	package_name: String,
}

/// `POST /api/apps/stop/{device_id}` - `am force-stop`.
pub async fn force_stop_app(
	State(state): State<AppState>,
	Path(device_id): Path<String>,
	Json(req): Json<ForceStopRequest>,
) -> Result<Json<Value>> {
	if req.package_name.is_empty() {
		return Err(ServerError::BadRequest(
			"packageName in request body is required".into(),
		));
	}

	let output = state.adb.force_stop(&device_id, &req.package_name).await?;
	debug!(target = "droidview", device = %device_id, package = %req.package_name, "package force-stopped");
	Ok(Json(json!({
		"message": "Force-stop command executed",
		"details": output,
	})))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallRequest {
	#[serde(default)]
	apk_path: String,
}

/// `POST /api/apk/install/{device_id}` - installs an APK from a path on the
/// server with `-r -g` (reinstall, grant runtime permissions).
pub async fn install_apk(
	State(state): State<AppState>,
	Path(device_id): Path<String>,
	Json(req): Json<InstallRequest>,
) -> Result<Json<Value>> {
	if req.apk_path.is_empty() {
		return Err(ServerError::BadRequest(
			"apkPath in request body is required".into(),
		));
	}

	let apk = std::path::Path::new(&req.apk_path);
	if !tokio::fs::try_exists(apk).await? {
		return Err(ServerError::NotFound(format!(
			"APK file not found on server: {}",
			req.apk_path
		)));
	}

	let output = state.adb.install(&device_id, apk).await?;
	debug!(target = "droidview", device = %device_id, apk = %req.apk_path, "apk installed");
	Ok(Json(json!({
		"message": "APK installation command executed",
		"details": output,
	})))
}
