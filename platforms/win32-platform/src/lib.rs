//! Win32 implementation of the ProjGuard platform interface.
//!
//! Raw FFI through `windows-sys`, kept behind the thin wrappers in
//! [`winwrap`]. The crate is empty on non-Windows targets so the
//! workspace builds everywhere.
#![warn(clippy::pedantic)]
#![allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::must_use_candidate
)]

#[cfg(windows)]
mod platform;
#[cfg(windows)]
mod winwrap;

#[cfg(windows)]
pub use platform::Win32Platform;
