//! Finding a usable `adb` executable.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::debug;

use crate::error::{AdbError, Result};

#[cfg(not(windows))]
const ADB_EXE: &str = "adb";
#[cfg(windows)]
const ADB_EXE: &str = "adb.exe";

/// Locates the `adb` executable.
///
/// Candidates are tried in order:
/// 1. `ADB` environment variable (explicit override)
/// 2. `ANDROID_HOME` / `ANDROID_SDK_ROOT` platform-tools directory
/// 3. `adb` on `PATH`
/// 4. Common SDK install locations
///
/// Each candidate must survive `adb version` before it is accepted, so a
/// stale SDK path does not shadow a working install further down the list.
///
/// # Errors
///
/// Returns [`AdbError::NotFound`] when no candidate is usable.
pub fn find_adb() -> Result<PathBuf> {
	if let Some(path) = try_env_override() {
		return Ok(path);
	}
	if let Some(path) = try_sdk_dirs() {
		return Ok(path);
	}
	if let Some(path) = try_path_lookup() {
		return Ok(path);
	}
	if let Some(path) = try_common_locations() {
		return Ok(path);
	}
	Err(AdbError::NotFound)
}

fn try_env_override() -> Option<PathBuf> {
	let path = PathBuf::from(std::env::var_os("ADB")?);
	accept("ADB", path)
}

fn try_sdk_dirs() -> Option<PathBuf> {
	for var in ["ANDROID_HOME", "ANDROID_SDK_ROOT"] {
		if let Some(sdk) = std::env::var_os(var) {
			let candidate = Path::new(&sdk).join("platform-tools").join(ADB_EXE);
			if let Some(path) = accept(var, candidate) {
				return Some(path);
			}
		}
	}
	None
}

fn try_path_lookup() -> Option<PathBuf> {
	accept("PATH", which::which(ADB_EXE).ok()?)
}

fn try_common_locations() -> Option<PathBuf> {
	for candidate in common_locations() {
		if let Some(path) = accept("common location", candidate) {
			return Some(path);
		}
	}
	None
}

#[cfg(not(windows))]
fn common_locations() -> Vec<PathBuf> {
	let mut locations = vec![
		PathBuf::from("/usr/local/bin/adb"),
		PathBuf::from("/usr/bin/adb"),
		PathBuf::from("/opt/homebrew/bin/adb"),
	];
	if let Some(home) = dirs::home_dir() {
		// Default SDK locations of Android Studio on Linux and macOS.
		locations.push(home.join("Android/Sdk/platform-tools/adb"));
		locations.push(home.join("Library/Android/sdk/platform-tools/adb"));
	}
	locations
}

#[cfg(windows)]
fn common_locations() -> Vec<PathBuf> {
	let mut locations = Vec::new();
	if let Some(data) = dirs::data_local_dir() {
		locations.push(
			data.join("Android")
				.join("Sdk")
				.join("platform-tools")
				.join(ADB_EXE),
		);
	}
	locations
}

fn accept(source: &str, candidate: PathBuf) -> Option<PathBuf> {
	if !candidate.exists() {
		return None;
	}
	let usable = adb_is_usable(&candidate);
	debug!(
		target = "droidview.adb",
		source,
		path = %candidate.display(),
		usable,
		"adb candidate"
	);
	usable.then_some(candidate)
}

/// A candidate is usable when `adb version` exits successfully.
fn adb_is_usable(adb: &Path) -> bool {
	Command::new(adb)
		.arg("version")
		.stdout(Stdio::null())
		.stderr(Stdio::null())
		.status()
		.map(|status| status.success())
		.unwrap_or(false)
}

#[cfg(test)]
mod tests {
	#[cfg(unix)]
	use std::fs;
	#[cfg(unix)]
	use std::os::unix::fs::PermissionsExt;
	#[cfg(unix)]
	use std::path::Path;

	#[cfg(unix)]
	use tempfile::TempDir;

	use super::*;

	#[cfg(unix)]
	fn write_mock_adb(path: &Path, exit_code: i32) {
		let script = format!("#!/bin/sh\nexit {exit_code}\n");
		fs::write(path, script).unwrap();
		let mut perms = fs::metadata(path).unwrap().permissions();
		perms.set_mode(0o755);
		fs::set_permissions(path, perms).unwrap();
	}

	#[test]
	fn find_adb_tolerates_missing_install() {
		match find_adb() {
			Ok(path) => {
				println!("Found adb at: {:?}", path);
				assert!(path.exists());
			}
			Err(AdbError::NotFound) => {
				println!("adb not found (expected without platform-tools installed)");
			}
			Err(e) => panic!("Unexpected error: {:?}", e),
		}
	}

	#[cfg(unix)]
	#[test]
	fn usable_probe_accepts_working_binary() {
		let temp = TempDir::new().unwrap();
		let adb = temp.path().join("adb");
		write_mock_adb(&adb, 0);
		assert!(adb_is_usable(&adb));
	}

	#[cfg(unix)]
	#[test]
	fn usable_probe_rejects_failing_binary() {
		let temp = TempDir::new().unwrap();
		let adb = temp.path().join("adb");
		write_mock_adb(&adb, 1);
		assert!(!adb_is_usable(&adb));
	}

	#[cfg(unix)]
	#[test]
	fn accept_skips_missing_candidate() {
		let temp = TempDir::new().unwrap();
		assert_eq!(accept("test", temp.path().join("no-such-adb")), None);
	}

	#[cfg(unix)]
	#[test]
	fn accept_keeps_usable_candidate() {
		let temp = TempDir::new().unwrap();
		let adb = temp.path().join("adb");
		write_mock_adb(&adb, 0);
		assert_eq!(accept("test", adb.clone()), Some(adb));
	}
}
