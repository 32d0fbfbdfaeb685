//! Locating and driving the `adb` executable.
//!
//! Everything that touches an Android device goes through this crate:
//! finding a usable `adb` binary ([`locate`]), running its subcommands with
//! captured output ([`Adb`]), and parsing the line-oriented formats those
//! subcommands print ([`parse`]).

pub mod client;
pub mod error;
pub mod locate;
pub mod parse;
pub mod types;

pub use client::Adb;
pub use error::{AdbError, Result};
pub use types::{DeviceInfo, FileEntry};
