//! # Platform Spawn Options
//!
//! File: cli/src/common/process/platform.rs
//!
//! Per-OS adjustments applied to every `Command` before it is spawned. On
//! Windows children are created without a console window so that running a
//! linter from a GUI host does not flash a terminal. Elsewhere nothing needs
//! to change.
//!
use std::process::Command;

/// Platform-specific spawn configuration.
pub trait SpawnPlatform {
    fn configure(&self, command: &mut Command);
}

/// Spawns children without a visible console window.
#[cfg(windows)]
#[derive(Debug, Default, Clone, Copy)]
pub struct WindowsPlatform;

#[cfg(windows)]
impl SpawnPlatform for WindowsPlatform {
    fn configure(&self, command: &mut Command) {
        use std::os::windows::process::CommandExt;
        const CREATE_NO_WINDOW: u32 = 0x0800_0000;
        command.creation_flags(CREATE_NO_WINDOW);
    }
}

/// Leaves the command untouched.
#[cfg_attr(windows, allow(dead_code))]
#[derive(Debug, Default, Clone, Copy)]
pub struct PosixPlatform;

impl SpawnPlatform for PosixPlatform {
    fn configure(&self, _command: &mut Command) {}
}

/// The implementation selected for the target OS.
#[cfg(windows)]
pub type NativePlatform = WindowsPlatform;
/// The implementation selected for the target OS.
#[cfg(not(windows))]
pub type NativePlatform = PosixPlatform;
