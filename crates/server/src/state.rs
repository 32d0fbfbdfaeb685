//! Shared server state and the adb-backed session collaborators.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use droidview_adb::Adb;
use droidview_protocol::InputCommand;

use crate::session::{InputSink, ScreenSource};

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
	/// Client for the REST surface (files, apps, logcat, device control).
	pub adb: Arc<Adb>,
	/// Frame producer for mirroring sessions.
	pub screen: Arc<dyn ScreenSource>,
	/// Command consumer for mirroring sessions.
	pub input: Arc<dyn InputSink>,
	/// Delay between screen captures on a mirroring session.
	pub frame_interval: Duration,
}

impl AppState {
	/// Wires both session seams to the real adb client.
	pub fn new(adb: Adb, frame_interval: Duration) -> Self {
		let adb = Arc::new(adb);
		Self {
			screen: Arc::new(AdbScreen(Arc::clone(&adb))),
			input: Arc::new(AdbInput(Arc::clone(&adb))),
			adb,
			frame_interval,
		}
	}

	/// Builds state with caller-supplied session seams, keeping the REST
	/// surface on `adb`. Lets tests script captures and record dispatched
	/// commands without a device.
	pub fn with_seams(
		adb: Adb,
		screen: Arc<dyn ScreenSource>,
		input: Arc<dyn InputSink>,
		frame_interval: Duration,
	) -> Self {
		Self {
			adb: Arc::new(adb),
			screen,
			input,
			frame_interval,
		}
	}
}

struct AdbScreen(Arc<Adb>);

#[async_trait]
impl ScreenSource for AdbScreen {
	async fn capture(&self, device_id: &str) -> anyhow::Result<Vec<u8>> {
		Ok(self.0.screencap(device_id).await?)
	}
}

struct AdbInput(Arc<Adb>);

#[async_trait]
impl InputSink for AdbInput {
	async fn inject(&self, device_id: &str, command: &InputCommand) -> anyhow::Result<()> {
		Ok(self.0.inject(device_id, command).await?)
	}
}
