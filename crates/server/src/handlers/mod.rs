//! REST handlers over the adb capability layer.

pub mod apps;
pub mod device;
pub mod devices;
pub mod files;
pub mod health;
pub mod logcat;
