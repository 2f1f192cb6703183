//! Encoder control bridge.
//!
//! Each export forwards exactly one `opus_encoder_ctl` request and returns
//! the status code libopus produced. Nothing is validated or translated here.
//!
//! # Safety
//!
//! Every function in this module shares the same contract:
//!
//! - `st` must come from `opus_encoder_create` (or `opus_encoder_init`) and
//!   must not have been destroyed. The handle is borrowed for the duration
//!   of the call only.
//! - Out-pointers must be either null (libopus then reports `OPUS_BAD_ARG`)
//!   or writable for one `opus_int32`. They are not retained.
//! - Calls against the same handle must not overlap; callers serialize.

use std::os::raw::c_int;

use tracing::trace;

use crate::ffi::{self, OpusEncoder, OpusInt32};

/// Enables (1) or disables (0) discontinuous transmission.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn bridge_encoder_set_dtx(st: *mut OpusEncoder, use_dtx: OpusInt32) -> c_int {
    trace!(use_dtx, "bridge: set dtx");
    unsafe { ffi::opus_encoder_ctl(st, ffi::OPUS_SET_DTX_REQUEST, use_dtx) }
}

/// Reads the configured DTX flag.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn bridge_encoder_get_dtx(st: *mut OpusEncoder, dtx: *mut OpusInt32) -> c_int {
    unsafe { ffi::opus_encoder_ctl(st, ffi::OPUS_GET_DTX_REQUEST, dtx) }
}

/// Reads whether the last encoded frame was a DTX frame.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn bridge_encoder_get_in_dtx(st: *mut OpusEncoder, in_dtx: *mut OpusInt32) -> c_int {
    unsafe { ffi::opus_encoder_ctl(st, ffi::OPUS_GET_IN_DTX_REQUEST, in_dtx) }
}

/// Reads the sample rate the encoder was created with.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn bridge_encoder_get_sample_rate(
    st: *mut OpusEncoder,
    sample_rate: *mut OpusInt32,
) -> c_int {
    unsafe { ffi::opus_encoder_ctl(st, ffi::OPUS_GET_SAMPLE_RATE_REQUEST, sample_rate) }
}

/// Sets the target bitrate in bits per second, or `OPUS_AUTO` / `OPUS_BITRATE_MAX`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn bridge_encoder_set_bitrate(st: *mut OpusEncoder, bitrate: OpusInt32) -> c_int {
    trace!(bitrate, "bridge: set bitrate");
    unsafe { ffi::opus_encoder_ctl(st, ffi::OPUS_SET_BITRATE_REQUEST, bitrate) }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn bridge_encoder_get_bitrate(st: *mut OpusEncoder, bitrate: *mut OpusInt32) -> c_int {
    unsafe { ffi::opus_encoder_ctl(st, ffi::OPUS_GET_BITRATE_REQUEST, bitrate) }
}

/// Sets the computational complexity (0-10).
#[unsafe(no_mangle)]
pub unsafe extern "C" fn bridge_encoder_set_complexity(st: *mut OpusEncoder, complexity: OpusInt32) -> c_int {
    trace!(complexity, "bridge: set complexity");
    unsafe { ffi::opus_encoder_ctl(st, ffi::OPUS_SET_COMPLEXITY_REQUEST, complexity) }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn bridge_encoder_get_complexity(
    st: *mut OpusEncoder,
    complexity: *mut OpusInt32,
) -> c_int {
    unsafe { ffi::opus_encoder_ctl(st, ffi::OPUS_GET_COMPLEXITY_REQUEST, complexity) }
}

/// Caps the bandpass the encoder may select automatically.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn bridge_encoder_set_max_bandwidth(st: *mut OpusEncoder, max_bw: OpusInt32) -> c_int {
    trace!(max_bw, "bridge: set max bandwidth");
    unsafe { ffi::opus_encoder_ctl(st, ffi::OPUS_SET_MAX_BANDWIDTH_REQUEST, max_bw) }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn bridge_encoder_get_max_bandwidth(
    st: *mut OpusEncoder,
    max_bw: *mut OpusInt32,
) -> c_int {
    unsafe { ffi::opus_encoder_ctl(st, ffi::OPUS_GET_MAX_BANDWIDTH_REQUEST, max_bw) }
}

/// Enables (1) or disables (0) in-band forward error correction.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn bridge_encoder_set_inband_fec(st: *mut OpusEncoder, fec: OpusInt32) -> c_int {
    trace!(fec, "bridge: set inband fec");
    unsafe { ffi::opus_encoder_ctl(st, ffi::OPUS_SET_INBAND_FEC_REQUEST, fec) }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn bridge_encoder_get_inband_fec(st: *mut OpusEncoder, fec: *mut OpusInt32) -> c_int {
    unsafe { ffi::opus_encoder_ctl(st, ffi::OPUS_GET_INBAND_FEC_REQUEST, fec) }
}

/// Sets the expected packet loss percentage (0-100).
#[unsafe(no_mangle)]
pub unsafe extern "C" fn bridge_encoder_set_packet_loss_perc(
    st: *mut OpusEncoder,
    loss_perc: OpusInt32,
) -> c_int {
    trace!(loss_perc, "bridge: set packet loss perc");
    unsafe { ffi::opus_encoder_ctl(st, ffi::OPUS_SET_PACKET_LOSS_PERC_REQUEST, loss_perc) }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn bridge_encoder_get_packet_loss_perc(
    st: *mut OpusEncoder,
    loss_perc: *mut OpusInt32,
) -> c_int {
    unsafe { ffi::opus_encoder_ctl(st, ffi::OPUS_GET_PACKET_LOSS_PERC_REQUEST, loss_perc) }
}

/// Enables (1) or disables (0) variable bitrate.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn bridge_encoder_set_vbr(st: *mut OpusEncoder, vbr: OpusInt32) -> c_int {
    trace!(vbr, "bridge: set vbr");
    unsafe { ffi::opus_encoder_ctl(st, ffi::OPUS_SET_VBR_REQUEST, vbr) }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn bridge_encoder_get_vbr(st: *mut OpusEncoder, vbr: *mut OpusInt32) -> c_int {
    unsafe { ffi::opus_encoder_ctl(st, ffi::OPUS_GET_VBR_REQUEST, vbr) }
}

/// Enables (1) or disables (0) constrained VBR.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn bridge_encoder_set_vbr_constraint(
    st: *mut OpusEncoder,
    vbr_constraint: OpusInt32,
) -> c_int {
    trace!(vbr_constraint, "bridge: set vbr constraint");
    unsafe { ffi::opus_encoder_ctl(st, ffi::OPUS_SET_VBR_CONSTRAINT_REQUEST, vbr_constraint) }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn bridge_encoder_get_vbr_constraint(
    st: *mut OpusEncoder,
    vbr_constraint: *mut OpusInt32,
) -> c_int {
    unsafe { ffi::opus_encoder_ctl(st, ffi::OPUS_GET_VBR_CONSTRAINT_REQUEST, vbr_constraint) }
}

/// Resets the codec state as if freshly initialized. Configured knobs are kept.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn bridge_encoder_reset_state(st: *mut OpusEncoder) -> c_int {
    trace!("bridge: reset encoder state");
    unsafe { ffi::opus_encoder_ctl(st, ffi::OPUS_RESET_STATE) }
}
