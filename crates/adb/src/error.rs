use thiserror::Error;

pub type Result<T> = std::result::Result<T, AdbError>;

/// Errors from locating or running the `adb` executable.
#[derive(Debug, Error)]
pub enum AdbError {
	#[error(
		"adb executable not found; install Android platform-tools or point the ADB environment variable at it"
	)]
	NotFound,

	#[error("failed to launch `adb {command}`: {source}")]
	Launch {
		command: String,
		#[source]
		source: std::io::Error,
	},

	#[error("`adb {command}` failed: {detail}")]
	CommandFailed { command: String, detail: String },

	#[error("device path not found: {path}")]
	PathMissing { path: String },

	#[error(transparent)]
	Io(#[from] std::io::Error),
}

impl AdbError {
	/// Whether this error means the remote path does not exist, as opposed
	/// to adb itself failing.
	pub fn is_path_missing(&self) -> bool {
		matches!(self, AdbError::PathMissing { .. })
	}
}
