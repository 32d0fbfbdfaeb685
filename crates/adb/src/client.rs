//! Typed async client for adb subcommands.

use std::path::{Path, PathBuf};
use std::process::Output;

use droidview_protocol::InputCommand;
use tokio::process::Command;
use tracing::debug;

use crate::error::{AdbError, Result};
use crate::locate;
use crate::parse;
use crate::types::{DeviceInfo, FileEntry};

/// Handle on a located `adb` executable.
///
/// Cheap to clone. Every call spawns a fresh `adb` process and captures its
/// output, so one handle can serve any number of devices concurrently; the
/// adb server daemon does its own request serialization per device.
#[derive(Debug, Clone)]
pub struct Adb {
	program: PathBuf,
}

impl Adb {
	/// Locates `adb` (see [`locate::find_adb`]) and wraps it.
	pub fn new() -> Result<Self> {
		Ok(Self {
			program: locate::find_adb()?,
		})
	}

	/// Wraps an explicit `adb` path, skipping the search.
	pub fn with_program(program: impl Into<PathBuf>) -> Self {
		Self {
			program: program.into(),
		}
	}

	/// Path of the wrapped executable.
	pub fn program(&self) -> &Path {
		&self.program
	}

	/// Lists attached devices (`adb devices`).
	pub async fn devices(&self) -> Result<Vec<DeviceInfo>> {
		let stdout = self.run(&["devices"]).await?;
		Ok(parse::parse_devices(&String::from_utf8_lossy(&stdout)))
	}

	/// Captures the screen as a PNG (`adb exec-out screencap -p`).
	///
	/// `exec-out` bypasses the shell pty, so stdout is the raw PNG byte
	/// stream without CR mangling.
	pub async fn screencap(&self, serial: &str) -> Result<Vec<u8>> {
		self.run(&["-s", serial, "exec-out", "screencap", "-p"])
			.await
	}

	/// Injects an input event (`adb shell input ...`).
	pub async fn inject(&self, serial: &str, command: &InputCommand) -> Result<()> {
		let mut args: Vec<String> = vec![
			"-s".into(),
			serial.into(),
			"shell".into(),
			"input".into(),
		];
		match command {
			InputCommand::InputTap { x, y } => {
				args.push("tap".into());
				args.push(x.to_string());
				args.push(y.to_string());
			}
			InputCommand::InputText { text } => {
				args.push("text".into());
				args.push(text.clone());
			}
			InputCommand::InputKeyevent { keycode } => {
				args.push("keyevent".into());
				args.push(keycode.clone());
			}
			InputCommand::InputSwipe {
				x1,
				y1,
				x2,
				y2,
				duration,
			} => {
				args.push("swipe".into());
				for value in [x1, y1, x2, y2, duration] {
					args.push(value.to_string());
				}
			}
		}
		let argv: Vec<&str> = args.iter().map(String::as_str).collect();
		self.run(&argv).await?;
		Ok(())
	}

	/// Lists a device directory (`adb shell ls -p`).
	///
	/// Some devices exit nonzero from `ls` even when the listing is fine, so
	/// the exit status is ignored; stderr is scanned for the missing-path
	/// markers instead and everything else is parsed from stdout.
	pub async fn list_files(&self, serial: &str, path: &str) -> Result<Vec<FileEntry>> {
		let output = self
			.output(&["-s", serial, "shell", "ls", "-p", path])
			.await?;
		let stderr = String::from_utf8_lossy(&output.stderr);
		if path_missing(&stderr) {
			return Err(AdbError::PathMissing {
				path: path.to_string(),
			});
		}
		Ok(parse::parse_file_listing(&String::from_utf8_lossy(
			&output.stdout,
		)))
	}

	/// Copies a device file into `dest_dir` (`adb pull`), returning the
	/// local path. A partial file is removed when the copy fails.
	pub async fn pull(&self, serial: &str, remote: &str, dest_dir: &Path) -> Result<PathBuf> {
		tokio::fs::create_dir_all(dest_dir).await?;
		let name = remote
			.rsplit('/')
			.find(|part| !part.is_empty())
			.unwrap_or("download");
		let local = dest_dir.join(name);
		let local_str = local.to_string_lossy();
		let result = self
			.run(&["-s", serial, "pull", remote, local_str.as_ref()])
			.await;
		if let Err(err) = result {
			let _ = tokio::fs::remove_file(&local).await;
			if err_mentions_missing_path(&err) {
				return Err(AdbError::PathMissing {
					path: remote.to_string(),
				});
			}
			return Err(err);
		}
		Ok(local)
	}

	/// Copies a local file onto the device (`adb push`).
	pub async fn push(&self, serial: &str, local: &Path, remote: &str) -> Result<()> {
		let local_str = local.to_string_lossy();
		self.run(&["-s", serial, "push", local_str.as_ref(), remote])
			.await?;
		Ok(())
	}

	/// Installs a server-local APK (`adb install -r -g`), returning adb's
	/// combined output. `-r` replaces an existing install, `-g` grants
	/// runtime permissions.
	pub async fn install(&self, serial: &str, apk: &Path) -> Result<String> {
		let apk_str = apk.to_string_lossy();
		let args = ["-s", serial, "install", "-r", "-g", apk_str.as_ref()];
		let output = self.output(&args).await?;
		let combined = combined_text(&output);
		if !output.status.success() {
			return Err(AdbError::CommandFailed {
				command: args.join(" "),
				detail: combined,
			});
		}
		Ok(combined)
	}

	/// Lists installed packages (`adb shell pm list packages`), optionally
	/// only third-party ones (`-3`).
	pub async fn packages(&self, serial: &str, third_party_only: bool) -> Result<Vec<String>> {
		let mut args = vec!["-s", serial, "shell", "pm", "list", "packages"];
		if third_party_only {
			args.push("-3");
		}
		let stdout = self.run(&args).await?;
		Ok(parse::parse_packages(&String::from_utf8_lossy(&stdout)))
	}

	/// Uninstalls a package (`adb shell pm uninstall`). `keep_data` adds
	/// `-k`, preserving the app's data and caches for a later reinstall.
	pub async fn uninstall(&self, serial: &str, package: &str, keep_data: bool) -> Result<String> {
		let mut args = vec!["-s", serial, "shell", "pm", "uninstall"];
		if keep_data {
			args.push("-k");
		}
		args.push(package);
		let output = self.output(&args).await?;
		let combined = combined_text(&output);
		if !output.status.success() {
			return Err(AdbError::CommandFailed {
				command: args.join(" "),
				detail: combined,
			});
		}
		Ok(combined)
	}

	/// Force-stops an app (`adb shell am force-stop`).
	pub async fn force_stop(&self, serial: &str, package: &str) -> Result<String> {
		let args = ["-s", serial, "shell", "am", "force-stop", package];
		let output = self.output(&args).await?;
		let combined = combined_text(&output);
		if !output.status.success() {
			return Err(AdbError::CommandFailed {
				command: args.join(" "),
				detail: combined,
			});
		}
		Ok(combined)
	}

	/// Clears the device log buffer (`adb logcat -c`).
	pub async fn logcat_clear(&self, serial: &str) -> Result<()> {
		self.run(&["-s", serial, "logcat", "-c"]).await?;
		Ok(())
	}

	/// Dumps the current log buffer (`adb logcat -d`).
	///
	/// An empty buffer can exit nonzero with a silent stderr; that still
	/// yields the (empty) dump. A failed exit that also wrote to stderr is a
	/// real error, whatever made it to stdout.
	pub async fn logcat_dump(&self, serial: &str) -> Result<Vec<u8>> {
		let args = ["-s", serial, "logcat", "-d"];
		let output = self.output(&args).await?;
		if !output.status.success() && !output.stderr.is_empty() {
			return Err(command_failed(&args, &output));
		}
		if !output.stderr.is_empty() {
			let warnings = String::from_utf8_lossy(&output.stderr);
			debug!(target = "droidview.adb", stderr = %warnings.trim(), "logcat warnings");
		}
		Ok(output.stdout)
	}

	/// Wakes the screen (`input keyevent KEYCODE_WAKEUP`).
	pub async fn wake(&self, serial: &str) -> Result<()> {
		self.run(&["-s", serial, "shell", "input", "keyevent", "KEYCODE_WAKEUP"])
			.await?;
		Ok(())
	}

	/// Returns to the home screen (`input keyevent KEYCODE_HOME`).
	pub async fn home(&self, serial: &str) -> Result<()> {
		self.run(&["-s", serial, "shell", "input", "keyevent", "KEYCODE_HOME"])
			.await?;
		Ok(())
	}

	async fn output(&self, args: &[&str]) -> Result<Output> {
		debug!(target = "droidview.adb", command = %args.join(" "), "adb");
		Command::new(&self.program)
			.args(args)
			.output()
			.await
			.map_err(|source| AdbError::Launch {
				command: args.join(" "),
				source,
			})
	}

	/// Runs a subcommand and returns stdout, failing on nonzero exit.
	async fn run(&self, args: &[&str]) -> Result<Vec<u8>> {
		let output = self.output(args).await?;
		if !output.status.success() {
			return Err(command_failed(args, &output));
		}
		Ok(output.stdout)
	}
}

/// Markers adb and Android's shell print when a path cannot be listed or
/// pulled. `ls` says "No such file or directory", `pull` says the remote
/// object "does not exist".
fn path_missing(stderr: &str) -> bool {
	stderr.contains("No such file or directory")
		|| stderr.contains("Not a directory")
		|| stderr.contains("does not exist")
}

fn err_mentions_missing_path(err: &AdbError) -> bool {
	match err {
		AdbError::CommandFailed { detail, .. } => path_missing(detail),
		_ => false,
	}
}

fn command_failed(args: &[&str], output: &Output) -> AdbError {
	let detail = combined_text(output);
	AdbError::CommandFailed {
		command: args.join(" "),
		detail: if detail.is_empty() {
			output.status.to_string()
		} else {
			detail
		},
	}
}

fn combined_text(output: &Output) -> String {
	let stdout = String::from_utf8_lossy(&output.stdout);
	let stderr = String::from_utf8_lossy(&output.stderr);
	let mut text = stdout.trim().to_string();
	let stderr = stderr.trim();
	if !stderr.is_empty() {
		if !text.is_empty() {
			text.push('\n');
		}
		text.push_str(stderr);
	}
	text
}

#[cfg(test)]
mod tests {
	use std::fs;
	#[cfg(unix)]
	use std::os::unix::fs::PermissionsExt;
	use std::path::Path;

	use tempfile::TempDir;

	use super::*;

	#[cfg(unix)]
	fn write_script(path: &Path, body: &str) {
		let script = format!("#!/bin/sh\n{body}\n");
		fs::write(path, script).unwrap();
		let mut perms = fs::metadata(path).unwrap().permissions();
		perms.set_mode(0o755);
		fs::set_permissions(path, perms).unwrap();
	}

	#[cfg(unix)]
	#[test]
	fn program_path_is_kept_verbatim() {
		let adb = Adb::with_program("/opt/sdk/platform-tools/adb");
		assert_eq!(adb.program(), Path::new("/opt/sdk/platform-tools/adb"));
	}

	#[cfg(unix)]
	#[tokio::test]
	async fn screencap_returns_raw_stdout_bytes() {
		let temp = TempDir::new().unwrap();
		let script = temp.path().join("adb");
		write_script(&script, "printf 'PNGDATA'");
		let adb = Adb::with_program(&script);
		let bytes = adb.screencap("emulator-5554").await.unwrap();
		assert_eq!(bytes, b"PNGDATA");
	}

	#[cfg(unix)]
	#[tokio::test]
	async fn failed_command_carries_stderr_detail() {
		let temp = TempDir::new().unwrap();
		let script = temp.path().join("adb");
		write_script(&script, "echo \"error: device 'ghost' not found\" >&2\nexit 1");
		let adb = Adb::with_program(&script);
		let err = adb.screencap("ghost").await.unwrap_err();
		match err {
			AdbError::CommandFailed { command, detail } => {
				assert!(command.contains("screencap"));
				assert!(detail.contains("not found"));
			}
			other => panic!("unexpected error: {other:?}"),
		}
	}

	#[cfg(unix)]
	#[tokio::test]
	async fn devices_parses_rows_end_to_end() {
		let temp = TempDir::new().unwrap();
		let script = temp.path().join("adb");
		write_script(
			&script,
			"printf 'List of devices attached\\nemulator-5554\\tdevice\\n'",
		);
		let adb = Adb::with_program(&script);
		let devices = adb.devices().await.unwrap();
		assert_eq!(devices.len(), 1);
		assert_eq!(devices[0].id, "emulator-5554");
		assert!(devices[0].is_ready());
	}

	#[cfg(unix)]
	#[tokio::test]
	async fn list_files_maps_missing_path_marker() {
		let temp = TempDir::new().unwrap();
		let script = temp.path().join("adb");
		write_script(
			&script,
			"echo 'ls: /nope: No such file or directory' >&2\nexit 1",
		);
		let adb = Adb::with_program(&script);
		let err = adb.list_files("emulator-5554", "/nope/").await.unwrap_err();
		assert!(err.is_path_missing());
	}

	#[cfg(unix)]
	#[tokio::test]
	async fn list_files_tolerates_nonzero_exit_with_clean_stderr() {
		let temp = TempDir::new().unwrap();
		let script = temp.path().join("adb");
		write_script(&script, "printf 'DCIM/\\nnotes.txt\\n'\nexit 1");
		let adb = Adb::with_program(&script);
		let entries = adb.list_files("emulator-5554", "/sdcard/").await.unwrap();
		assert_eq!(entries.len(), 2);
	}

	#[cfg(unix)]
	#[tokio::test]
	async fn logcat_dump_tolerates_empty_buffer_exit() {
		let temp = TempDir::new().unwrap();
		let script = temp.path().join("adb");
		write_script(&script, "exit 1");
		let adb = Adb::with_program(&script);
		let dump = adb.logcat_dump("emulator-5554").await.unwrap();
		assert!(dump.is_empty());
	}

	#[cfg(unix)]
	#[tokio::test]
	async fn logcat_dump_fails_when_stderr_reports_an_error() {
		let temp = TempDir::new().unwrap();
		let script = temp.path().join("adb");
		write_script(
			&script,
			"printf 'partial dump\\n'\necho 'logcat: read failure' >&2\nexit 1",
		);
		let adb = Adb::with_program(&script);
		let err = adb.logcat_dump("emulator-5554").await.unwrap_err();
		match err {
			AdbError::CommandFailed { detail, .. } => assert!(detail.contains("read failure")),
			other => panic!("unexpected error: {other:?}"),
		}
	}

	#[cfg(unix)]
	#[tokio::test]
	async fn inject_swipe_passes_all_arguments() {
		let temp = TempDir::new().unwrap();
		let script = temp.path().join("adb");
		let log = temp.path().join("args.log");
		write_script(&script, &format!("echo \"$@\" >> {}", log.display()));
		let adb = Adb::with_program(&script);
		let command = InputCommand::InputSwipe {
			x1: 10,
			y1: 20,
			x2: 30,
			y2: 40,
			duration: 300,
		};
		adb.inject("emulator-5554", &command).await.unwrap();
		let logged = fs::read_to_string(&log).unwrap();
		assert_eq!(
			logged.trim(),
			"-s emulator-5554 shell input swipe 10 20 30 40 300"
		);
	}
}
