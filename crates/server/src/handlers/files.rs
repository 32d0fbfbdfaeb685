//! File browsing and transfer endpoints.

use std::path::PathBuf;

use axum::Json;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::error::{Result, ServerError};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ListQuery {
	path: Option<String>,
}

/// `GET /api/files/list/{device_id}?path=` - directory listing, defaulting
/// to `/sdcard/`.
pub async fn list_files(
	State(state): State<AppState>,
	Path(device_id): Path<String>,
	Query(query): Query<ListQuery>,
) -> Result<Json<Value>> {
	let path = normalize_dir(query.path.as_deref().unwrap_or("/sdcard/"));
	let files = state.adb.list_files(&device_id, &path).await?;
	Ok(Json(json!({ "path": path, "files": files })))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadQuery {
	file_path: Option<String>,
}

/// `GET /api/files/download/{device_id}?filePath=` - pulls one file off the
/// device and returns it as an attachment. The staged copy lives in a temp
/// dir that is removed when the handler returns.
pub async fn download_file(
	State(state): State<AppState>,
	Path(device_id): Path<String>,
	Query(query): Query<DownloadQuery>,
) -> Result<Response> {
	let remote = query
		.file_path
		.filter(|path| !path.is_empty())
		.ok_or_else(|| ServerError::BadRequest("File path is required".into()))?;

	let staging = tempfile::tempdir()?;
	let local = state.adb.pull(&device_id, &remote, staging.path()).await?;
	let body = tokio::fs::read(&local).await?;

	let filename = local
		.file_name()
		.map(|name| name.to_string_lossy().into_owned())
		.unwrap_or_else(|| "download".to_string());
	debug!(target = "droidview", device = %device_id, file = %remote, bytes = body.len(), "file downloaded");
	Ok(attachment(&filename, "application/octet-stream", body))
}

/// `POST /api/files/upload/{device_id}` - multipart upload streamed chunk by
/// chunk into a temp staging file, then pushed to `remoteDirPath` on the
/// device. Payloads are APK-sized, so the body is never held in memory.
pub async fn upload_file(
	State(state): State<AppState>,
	Path(device_id): Path<String>,
	mut multipart: Multipart,
) -> Result<Json<Value>> {
	let staging = tempfile::tempdir()?;
	let mut remote_dir: Option<String> = None;
	let mut staged: Option<(PathBuf, String, u64)> = None;

	while let Some(mut field) = multipart.next_field().await? {
		let name = field.name().map(str::to_owned);
		match name.as_deref() {
			Some("remoteDirPath") => remote_dir = Some(field.text().await?),
			Some("file") => {
				let filename = field
					.file_name()
					.map(|name| base_name(name).to_string())
					.filter(|name| !name.is_empty())
					.unwrap_or_else(|| "upload".to_string());
				let local = staging.path().join(&filename);
				let mut out = tokio::fs::File::create(&local).await?;
				let mut written = 0u64;
				while let Some(chunk) = field.chunk().await? {
					out.write_all(&chunk).await?;
					written += chunk.len() as u64;
				}
				out.flush().await?;
				staged = Some((local, filename, written));
			}
			_ => continue,
		}
	}

	let mut remote_dir = remote_dir.filter(|dir| !dir.is_empty()).ok_or_else(|| {
		ServerError::BadRequest(
			"Remote directory path (remoteDirPath) is required in form data".into(),
		)
	})?;
	let (local, filename, written) = staged.ok_or_else(|| {
		ServerError::BadRequest("Uploaded file (file) is required in form data".into())
	})?;

	if !remote_dir.ends_with('/') {
		remote_dir.push('/');
	}
	let remote_path = format!("{remote_dir}{filename}");
	state.adb.push(&device_id, &local, &remote_path).await?;

	debug!(target = "droidview", device = %device_id, file = %remote_path, bytes = written, "file uploaded");
	Ok(Json(json!({
		"message": "File uploaded successfully to device",
		"filePath": remote_path,
		"filename": filename,
	})))
}

/// Directory paths always carry a leading and a trailing slash.
fn normalize_dir(path: &str) -> String {
	let mut path = if path.starts_with('/') {
		path.to_string()
	} else {
		format!("/{path}")
	};
	if !path.ends_with('/') {
		path.push('/');
	}
	path
}

/// Final path component of a client-supplied filename. Browsers send bare
/// names, but nothing stops a caller from sending separators.
fn base_name(name: &str) -> &str {
	name.rsplit(['/', '\\']).next().unwrap_or(name)
}

pub(super) fn attachment(filename: &str, content_type: &str, body: Vec<u8>) -> Response {
	(
		[
			(header::CONTENT_TYPE, content_type.to_string()),
			(
				header::CONTENT_DISPOSITION,
				format!("attachment; filename=\"{filename}\""),
			),
		],
		body,
	)
		.into_response()
}
