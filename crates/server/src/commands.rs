//! Subcommand dispatch.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result};
use colored::Colorize;
use droidview_adb::Adb;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

use crate::cli::{Cli, Commands};
use crate::routes;
use crate::state::AppState;

pub async fn dispatch(cli: Cli) -> Result<()> {
	let adb = match &cli.adb {
		Some(path) => Adb::with_program(path),
		None => Adb::new().context("Locating adb")?,
	};
	debug!(target = "droidview", adb = %adb.program().display(), "using adb");

	match cli.command {
		Commands::Serve {
			host,
			port,
			frame_interval_ms,
		} => serve(adb, &host, port, Duration::from_millis(frame_interval_ms)).await,
		Commands::Devices => devices(adb).await,
	}
}

async fn serve(adb: Adb, host: &str, port: u16, frame_interval: Duration) -> Result<()> {
	let addr: SocketAddr = format!("{host}:{port}")
		.parse()
		.with_context(|| format!("Invalid host/port combination: {host}:{port}"))?;

	let state = AppState::new(adb, frame_interval);
	let app = routes::router(state);

	let listener = TcpListener::bind(addr)
		.await
		.with_context(|| format!("Failed to bind {addr}"))?;

	info!(
		target = "droidview",
		host,
		port,
		frame_interval_ms = frame_interval.as_millis() as u64,
		"device bridge listening"
	);

	axum::serve(listener, app)
		.with_graceful_shutdown(shutdown_signal())
		.await
		.context("Server error")
}

async fn devices(adb: Adb) -> Result<()> {
	let devices = adb.devices().await.context("Listing devices")?;
	if devices.is_empty() {
		println!("No devices attached.");
		return Ok(());
	}
	for device in devices {
		let status = if device.is_ready() {
			device.status.green()
		} else {
			device.status.red()
		};
		println!("{}\t{status}", device.id);
	}
	Ok(())
}

async fn shutdown_signal() {
	let ctrl_c = async {
		if tokio::signal::ctrl_c().await.is_err() {
			warn!(target = "droidview", "failed to install Ctrl+C handler");
			std::future::pending::<()>().await;
		}
	};

	#[cfg(unix)]
	let terminate = async {
		use tokio::signal::unix::{SignalKind, signal};
		match signal(SignalKind::terminate()) {
			Ok(mut sigterm) => {
				sigterm.recv().await;
			}
			Err(err) => {
				warn!(target = "droidview", error = %err, "failed to install SIGTERM handler");
				std::future::pending::<()>().await;
			}
		}
	};

	#[cfg(not(unix))]
	let terminate = std::future::pending::<()>();

	tokio::select! {
		_ = ctrl_c => info!(target = "droidview", "received Ctrl+C, shutting down"),
		_ = terminate => info!(target = "droidview", "received SIGTERM, shutting down"),
	}
}
