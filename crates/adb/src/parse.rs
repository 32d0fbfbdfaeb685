//! Parsers for adb's line-oriented output formats.
//!
//! These are deliberately forgiving: adb mixes banners, daemon restart
//! notices, and carriage returns into its output depending on platform and
//! version, and none of that should reach the API.

use crate::types::{DeviceInfo, FileEntry};

/// Parses `adb devices` output.
///
/// The banner line and anything that is not a `<serial>\t<state>` pair
/// (daemon restart notices, blank lines) is skipped.
pub fn parse_devices(output: &str) -> Vec<DeviceInfo> {
	output
		.lines()
		.map(str::trim)
		.filter(|line| !line.is_empty() && !line.contains("List of devices attached"))
		.filter_map(|line| {
			let mut fields = line.split_whitespace();
			match (fields.next(), fields.next(), fields.next()) {
				(Some(id), Some(status), None) => Some(DeviceInfo {
					id: id.to_string(),
					status: status.to_string(),
				}),
				_ => None,
			}
		})
		.collect()
}

/// Parses `ls -p` output into directory entries.
///
/// `-p` marks directories with a trailing `/`. Blank lines and the `.` and
/// `..` entries are skipped.
pub fn parse_file_listing(output: &str) -> Vec<FileEntry> {
	output
		.lines()
		.map(str::trim)
		.filter(|line| !line.is_empty())
		.filter_map(|line| {
			let is_dir = line.ends_with('/');
			let name = line.trim_end_matches('/');
			if name.is_empty() || name == "." || name == ".." {
				return None;
			}
			Some(FileEntry {
				name: name.to_string(),
				is_dir,
			})
		})
		.collect()
}

/// Parses `pm list packages` output, stripping the `package:` prefix.
/// Lines without the prefix are diagnostic noise and are dropped.
pub fn parse_packages(output: &str) -> Vec<String> {
	output
		.lines()
		.map(str::trim)
		.filter_map(|line| line.strip_prefix("package:"))
		.map(str::to_string)
		.collect()
}
