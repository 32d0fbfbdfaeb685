//! Replies sent to the viewer client.
//!
//! The server talks back over two kinds of frame: binary frames carrying raw
//! screen captures, and the JSON text frames defined here. Every dispatched
//! input command is answered with exactly one command-specific ack; failures
//! the client should see become [`ServerMessage::Error`].

use serde::{Deserialize, Serialize};

use crate::InputCommand;

/// Status value carried by every ack.
pub const STATUS_SUCCESS: &str = "success";

/// Text message from the server to the viewer client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
	/// Confirms a tap was dispatched.
	InputTapAck { status: String },
	/// Confirms typed text was dispatched, echoing it back.
	InputTextAck { status: String, text: String },
	/// Confirms a key press was dispatched, echoing the key.
	InputKeyeventAck { status: String, keycode: String },
	/// Confirms a swipe was dispatched.
	InputSwipeAck { status: String },
	/// Something the client should know about went wrong: a capture failed,
	/// a message did not decode, or the device rejected a command. The
	/// session stays open after an error.
	Error { message: String },
}

impl ServerMessage {
	/// Builds the success ack matching `command`.
	pub fn ack(command: &InputCommand) -> Self {
		let status = STATUS_SUCCESS.to_string();
		match command {
			InputCommand::InputTap { .. } => Self::InputTapAck { status },
			InputCommand::InputText { text } => Self::InputTextAck {
				status,
				text: text.clone(),
			},
			InputCommand::InputKeyevent { keycode } => Self::InputKeyeventAck {
				status,
				keycode: keycode.clone(),
			},
			InputCommand::InputSwipe { .. } => Self::InputSwipeAck { status },
		}
	}

	/// Builds an [`Error`](Self::Error) reply.
	pub fn error(message: impl Into<String>) -> Self {
		Self::Error {
			message: message.into(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn tap_ack_serializes_with_type_tag() {
		let json = serde_json::to_string(&ServerMessage::ack(&InputCommand::InputTap {
			x: 1,
			y: 2,
		}))
		.unwrap();
		assert_eq!(json, r#"{"type":"input_tap_ack","status":"success"}"#);
	}

	#[test]
	fn text_ack_echoes_the_text() {
		let cmd = InputCommand::InputText {
			text: "hello world".into(),
		};
		let json = serde_json::to_string(&ServerMessage::ack(&cmd)).unwrap();
		assert!(json.contains(r#""type":"input_text_ack""#));
		assert!(json.contains(r#""text":"hello world""#));
		assert!(json.contains(r#""status":"success""#));
	}

	#[test]
	fn keyevent_ack_echoes_the_keycode() {
		let cmd = InputCommand::InputKeyevent {
			keycode: "KEYCODE_HOME".into(),
		};
		let json = serde_json::to_string(&ServerMessage::ack(&cmd)).unwrap();
		assert!(json.contains(r#""type":"input_keyevent_ack""#));
		assert!(json.contains(r#""keycode":"KEYCODE_HOME""#));
	}

	#[test]
	fn swipe_ack_carries_only_status() {
		let cmd = InputCommand::InputSwipe {
			x1: 0,
			y1: 0,
			x2: 1,
			y2: 1,
			duration: 300,
		};
		let json = serde_json::to_string(&ServerMessage::ack(&cmd)).unwrap();
		assert_eq!(json, r#"{"type":"input_swipe_ack","status":"success"}"#);
	}

	#[test]
	fn error_serializes_message() {
		let json = serde_json::to_string(&ServerMessage::error("Screen capture failed")).unwrap();
		assert_eq!(
			json,
			r#"{"type":"error","message":"Screen capture failed"}"#
		);
	}
}
