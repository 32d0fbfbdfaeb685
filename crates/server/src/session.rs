//! Device screen mirroring session over one WebSocket connection.
//!
//! A session binds one socket to one device and runs three tasks until the
//! peer goes away or a transport write fails:
//!
//! - the frame pump captures the screen on a fixed tick and emits binary
//!   frames
//! - the command intake reads input commands, dispatches them to the
//!   device, and emits acks
//! - the writer owns the socket's send half and serializes everything the
//!   other two produce
//!
//! All outbound traffic funnels through the writer's channel, so frames and
//! replies can never interleave mid-write, and a slow client applies
//! backpressure to capture instead of piling up frames.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::extract::ws::{Message, WebSocket};
use droidview_protocol::{InputCommand, ServerMessage};
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Outbound channel capacity. One slot keeps at most a single frame queued
/// behind the in-flight write; when the queue is full the pump blocks and
/// the next tick is delayed instead of frames accumulating.
const OUTBOUND_QUEUE: usize = 1;

/// How long the writer gets to flush queued replies and close the socket
/// after the session ends, before it is cut off.
const WRITER_GRACE: Duration = Duration::from_secs(2);

/// Produces screen frames for a device.
#[async_trait]
pub trait ScreenSource: Send + Sync {
	/// Captures the current screen as encoded image bytes. An empty buffer
	/// means there is nothing to show; callers skip it rather than send it.
	async fn capture(&self, device_id: &str) -> anyhow::Result<Vec<u8>>;
}

/// Delivers input commands to a device.
#[async_trait]
pub trait InputSink: Send + Sync {
	async fn inject(&self, device_id: &str, command: &InputCommand) -> anyhow::Result<()>;
}

/// Runs a mirroring session until it terminates, then closes the socket.
///
/// Returns only once every task has stopped and the transport is closed, on
/// every exit path: client disconnect, read error, or write failure. Errors
/// inside the session are reported to the client or logged, never returned.
pub async fn run(
	socket: WebSocket,
	device_id: String,
	screen: Arc<dyn ScreenSource>,
	input: Arc<dyn InputSink>,
	frame_interval: Duration,
) {
	info!(target = "droidview.session", device = %device_id, "viewer connected");

	let (ws_tx, ws_rx) = socket.split();
	let (out_tx, out_rx) = mpsc::channel::<Message>(OUTBOUND_QUEUE);

	let mut writer = tokio::spawn(write_outbound(ws_tx, out_rx));
	let pump = tokio::spawn(pump_frames(
		screen,
		device_id.clone(),
		frame_interval,
		out_tx.clone(),
	));
	let mut intake = tokio::spawn(read_commands(ws_rx, input, device_id.clone(), out_tx));

	// First terminator wins: the intake finishing means the client went
	// away or sent a close; the writer finishing means a send failed.
	let writer_done = tokio::select! {
		_ = &mut intake => false,
		_ = &mut writer => true,
	};

	pump.abort();
	intake.abort();

	// With the pump and intake gone every sender is dropped, so the writer
	// drains whatever is queued, sends a close frame, and exits on its own.
	// Cut it off if the peer has stopped reading. A writer that terminated
	// the session has already yielded its output and must not be polled
	// again.
	if !writer_done && tokio::time::timeout(WRITER_GRACE, &mut writer).await.is_err() {
		writer.abort();
	}

	info!(target = "droidview.session", device = %device_id, "session closed");
}

/// Owns the send half. Everything outbound funnels through `rx`; the first
/// failed write ends the session.
async fn write_outbound(mut ws_tx: SplitSink<WebSocket, Message>, mut rx: mpsc::Receiver<Message>) {
	while let Some(msg) = rx.recv().await {
		if let Err(err) = ws_tx.send(msg).await {
			debug!(target = "droidview.session", error = %err, "websocket write failed");
			return;
		}
	}
	// All producers are gone; close the socket properly.
	let _ = ws_tx.close().await;
}

/// Captures and emits one frame per tick. A capture that overruns the
/// interval delays the next tick rather than stacking captures.
async fn pump_frames(
	screen: Arc<dyn ScreenSource>,
	device_id: String,
	frame_interval: Duration,
	out: mpsc::Sender<Message>,
) {
	let mut ticker = tokio::time::interval(frame_interval);
	ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

	loop {
		ticker.tick().await;

		let frame = match screen.capture(&device_id).await {
			Ok(frame) => frame,
			Err(err) => {
				warn!(target = "droidview.session", device = %device_id, error = %err, "screen capture failed");
				let report = ServerMessage::error(format!("Screencap failed: {err}"));
				if out.send(text(&report)).await.is_err() {
					return;
				}
				continue;
			}
		};

		if frame.is_empty() {
			debug!(target = "droidview.session", device = %device_id, "empty capture, skipping frame");
			continue;
		}

		if out.send(Message::Binary(frame.into())).await.is_err() {
			// Writer is gone, the session is ending.
			return;
		}
	}
}

/// Reads the receive half until the client goes away, dispatching every
/// decoded command and queueing exactly one reply per dispatch.
async fn read_commands(
	mut ws_rx: SplitStream<WebSocket>,
	input: Arc<dyn InputSink>,
	device_id: String,
	out: mpsc::Sender<Message>,
) {
	while let Some(next) = ws_rx.next().await {
		let raw = match next {
			Ok(Message::Text(raw)) => raw,
			Ok(Message::Close(_)) => {
				debug!(target = "droidview.session", device = %device_id, "client sent close");
				break;
			}
			Ok(Message::Binary(_)) => {
				debug!(target = "droidview.session", device = %device_id, "ignoring binary message from client");
				continue;
			}
			// Ping/pong are answered by the transport.
			Ok(_) => continue,
			Err(err) => {
				debug!(target = "droidview.session", device = %device_id, error = %err, "websocket read failed");
				break;
			}
		};

		let command: InputCommand = match serde_json::from_str(&raw) {
			Ok(command) => command,
			Err(err) => {
				warn!(target = "droidview.session", device = %device_id, error = %err, "undecodable input message");
				let reply = ServerMessage::error(format!("Invalid JSON format: {err}"));
				if out.send(text(&reply)).await.is_err() {
					break;
				}
				continue;
			}
		};

		if !command.is_valid() {
			// Commands that decode but carry unusable parameters are
			// dropped without a reply; deployed clients depend on the
			// silence.
			debug!(target = "droidview.session", device = %device_id, command = command.kind(), "dropping command with invalid parameters");
			continue;
		}

		let command = command.with_defaults();
		let reply = match input.inject(&device_id, &command).await {
			Ok(()) => {
				debug!(target = "droidview.session", device = %device_id, command = command.kind(), "input dispatched");
				ServerMessage::ack(&command)
			}
			Err(err) => {
				warn!(target = "droidview.session", device = %device_id, command = command.kind(), error = %err, "input dispatch failed");
				ServerMessage::error(format!("Failed to execute {}: {err}", command.kind()))
			}
		};
		if out.send(text(&reply)).await.is_err() {
			break;
		}
	}
}

fn text(msg: &ServerMessage) -> Message {
	let json = serde_json::to_string(msg).expect("ServerMessage is always serializable");
	Message::Text(json.into())
}
