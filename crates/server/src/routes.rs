//! HTTP route table.

use axum::Router;
use axum::extract::{DefaultBodyLimit, Path, State, WebSocketUpgrade};
use axum::response::Response;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;

use crate::handlers;
use crate::session;
use crate::state::AppState;

/// Builds the full route table over `state`.
pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/api/health", get(handlers::health::health))
		.route("/api/devices", get(handlers::devices::list_devices))
		.route("/api/screen/{device_id}", get(screen_ws))
		.route(
			"/api/files/list/{device_id}",
			get(handlers::files::list_files),
		)
		.route(
			"/api/files/download/{device_id}",
			get(handlers::files::download_file),
		)
		// Uploads carry whole APKs and media files; the default request
		// body cap would reject them.
		.route(
			"/api/files/upload/{device_id}",
			post(handlers::files::upload_file).layer(DefaultBodyLimit::disable()),
		)
		.route("/api/apps/{device_id}", get(handlers::apps::list_apps))
		.route(
			"/api/apps/uninstall/{device_id}",
			post(handlers::apps::uninstall_app),
		)
		.route(
			"/api/apps/stop/{device_id}",
			post(handlers::apps::force_stop_app),
		)
		.route(
			"/api/apk/install/{device_id}",
			post(handlers::apps::install_apk),
		)
		.route(
			"/api/logcat/{device_id}",
			get(handlers::logcat::download_logcat),
		)
		.route(
			"/api/logcat/clear/{device_id}",
			post(handlers::logcat::clear_logcat),
		)
		.route(
			"/api/device/wake/{device_id}",
			post(handlers::device::wake_device),
		)
		.route(
			"/api/device/home/{device_id}",
			post(handlers::device::home_device),
		)
		.layer(CorsLayer::permissive())
		.with_state(state)
}

/// Upgrades `GET /api/screen/{device_id}` and hands the socket to a
/// mirroring session.
async fn screen_ws(
	ws: WebSocketUpgrade,
	Path(device_id): Path<String>,
	State(state): State<AppState>,
) -> Response {
	ws.on_upgrade(move |socket| {
		session::run(
			socket,
			device_id,
			state.screen,
			state.input,
			state.frame_interval,
		)
	})
}
