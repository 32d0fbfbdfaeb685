//! Input commands sent by the viewer client.
//!
//! Every client-to-server message on a screen WebSocket is a JSON text frame
//! tagged by `type`:
//!
//! ```json
//! {"type": "input_tap", "x": 540, "y": 960}
//! ```
//!
//! Decoding is strict about shape (unknown tags and wrong field types fail)
//! but deliberately lenient about values: a command that decodes cleanly may
//! still fail [`is_valid`](InputCommand::is_valid), in which case the server
//! drops it without a reply. Deployed viewer clients rely on that silence.

use serde::{Deserialize, Serialize};

/// Swipe duration in milliseconds applied when the client omits the field or
/// sends a non-positive value.
pub const DEFAULT_SWIPE_DURATION_MS: i32 = 300;

/// Input command addressed to the device that owns the session.
///
/// Coordinates are absolute pixels in the device's natural orientation, as
/// consumed by `adb shell input`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputCommand {
	/// Single tap at an absolute screen position.
	InputTap {
		/// Horizontal pixel offset from the left edge.
		x: i32,
		/// Vertical pixel offset from the top edge.
		y: i32,
	},
	/// Type a string through the device input service.
	InputText {
		/// Literal text to type. Must be non-empty.
		text: String,
	},
	/// Press a single key.
	InputKeyevent {
		/// Android key name (`"KEYCODE_HOME"`) or numeric code (`"3"`).
		keycode: String,
	},
	/// Drag from one point to another.
	InputSwipe {
		/// Start of the gesture.
		x1: i32,
		y1: i32,
		/// End of the gesture.
		x2: i32,
		y2: i32,
		/// Gesture duration in milliseconds; omitted or non-positive values
		/// fall back to [`DEFAULT_SWIPE_DURATION_MS`].
		#[serde(default)]
		duration: i32,
	},
}

impl InputCommand {
	/// Wire name of this command, i.e. the value of its `type` tag.
	pub fn kind(&self) -> &'static str {
		match self {
			Self::InputTap { .. } => "input_tap",
			Self::InputText { .. } => "input_text",
			Self::InputKeyevent { .. } => "input_keyevent",
			Self::InputSwipe { .. } => "input_swipe",
		}
	}

	/// Whether the command's parameters are dispatchable: coordinates
	/// non-negative, text and keycode non-empty.
	pub fn is_valid(&self) -> bool {
		match self {
			Self::InputTap { x, y } => *x >= 0 && *y >= 0,
			Self::InputText { text } => !text.is_empty(),
			Self::InputKeyevent { keycode } => !keycode.is_empty(),
			Self::InputSwipe { x1, y1, x2, y2, .. } => {
				*x1 >= 0 && *y1 >= 0 && *x2 >= 0 && *y2 >= 0
			}
		}
	}

	/// Fills in defaults for fields the client may omit.
	///
	/// Currently only the swipe duration, which becomes
	/// [`DEFAULT_SWIPE_DURATION_MS`] when missing or non-positive. Applied
	/// before dispatch so input sinks never see a zero-length gesture.
	pub fn with_defaults(mut self) -> Self {
		if let Self::InputSwipe { duration, .. } = &mut self {
			if *duration <= 0 {
				*duration = DEFAULT_SWIPE_DURATION_MS;
			}
		}
		self
	}
}
