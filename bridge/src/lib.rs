//! C ABI export layer over the libopus encoder control interface.
//!
//! Hosts that can call native functions by name, but cannot see
//! `opus_defines.h` or use the variadic `opus_encoder_ctl`, get two things:
//!
//! - `constants`: `get_opus_*_address` exports, each returning the address of
//!   an immutable `int32` holding one libopus constant.
//! - `encoder` / `decoder`: `bridge_*` exports, each forwarding one control
//!   request on an opaque handle and returning the libopus status code.
//!
//! Handles are created and destroyed by libopus itself. This crate only
//! borrows them for the duration of a call and keeps no state of its own.
//!
//! # Example
//!
//! ```no_run
//! use opusgate_bridge::{constants, encoder, ffi};
//!
//! let mut error = 0;
//! let st = unsafe { ffi::opus_encoder_create(48000, 1, ffi::OPUS_APPLICATION_VOIP, &mut error) };
//!
//! let ok = unsafe { *constants::get_opus_ok_address() };
//! let status = unsafe { encoder::bridge_encoder_set_bitrate(st, 64000) };
//! assert_eq!(status, ok);
//!
//! unsafe { ffi::opus_encoder_destroy(st) };
//! ```

pub mod constants;
pub mod decoder;
pub mod encoder;
pub mod ffi;

pub use constants::{Constant, TABLE};
