//! Device-facing shapes shared with the HTTP API.

use serde::{Deserialize, Serialize};

/// One row of `adb devices` output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
	/// Serial number or emulator id, e.g. `emulator-5554`.
	pub id: String,
	/// Connection state as adb reports it: `device`, `offline`, `unauthorized`.
	pub status: String,
}

impl DeviceInfo {
	/// Whether the device is connected and accepting commands.
	pub fn is_ready(&self) -> bool {
		self.status == "device"
	}
}

/// One entry of a device directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEntry {
	/// Base name, without the trailing slash `ls -p` prints for directories.
	pub name: String,
	pub is_dir: bool,
}
