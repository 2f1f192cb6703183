//! Decoder control bridge.

use std::os::raw::c_int;

use crate::ffi::{self, OpusDecoder, OpusInt32};

/// Reads the duration, in samples per channel, of the last decoded packet.
///
/// # Safety
///
/// `st` must be a live decoder handle and `samples` null or writable for one
/// `opus_int32`. Neither pointer is retained.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn bridge_decoder_get_last_packet_duration(
    st: *mut OpusDecoder,
    samples: *mut OpusInt32,
) -> c_int {
    unsafe { ffi::opus_decoder_ctl(st, ffi::OPUS_GET_LAST_PACKET_DURATION_REQUEST, samples) }
}
