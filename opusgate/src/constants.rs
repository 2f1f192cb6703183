//! Late-bound libopus constants.
//!
//! Values are read once per process through the bridge's exported
//! `get_opus_*_address` accessors rather than compiled in, so the client
//! always agrees with the bridge it talks to.

use once_cell::sync::Lazy;
use opusgate_bridge::constants as exports;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Every constant the bridge exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Constants {
    pub ok: i32,
    pub bad_arg: i32,
    pub buffer_too_small: i32,
    pub internal_error: i32,
    pub invalid_packet: i32,
    pub unimplemented: i32,
    pub invalid_state: i32,
    pub alloc_fail: i32,

    pub bandwidth_narrowband: i32,
    pub bandwidth_mediumband: i32,
    pub bandwidth_wideband: i32,
    pub bandwidth_superwideband: i32,
    pub bandwidth_fullband: i32,

    pub auto: i32,
    pub bitrate_max: i32,

    pub application_voip: i32,
    pub application_audio: i32,
    pub application_restricted_lowdelay: i32,
}

fn read(getter: extern "C" fn() -> *const i32) -> i32 {
    // The bridge returns addresses of immutable statics.
    unsafe { *getter() }
}

impl Constants {
    fn load() -> Self {
        let c = Self {
            ok: read(exports::get_opus_ok_address),
            bad_arg: read(exports::get_opus_bad_arg_address),
            buffer_too_small: read(exports::get_opus_buffer_too_small_address),
            internal_error: read(exports::get_opus_internal_error_address),
            invalid_packet: read(exports::get_opus_invalid_packet_address),
            unimplemented: read(exports::get_opus_unimplemented_address),
            invalid_state: read(exports::get_opus_invalid_state_address),
            alloc_fail: read(exports::get_opus_alloc_fail_address),

            bandwidth_narrowband: read(exports::get_opus_bandwidth_narrowband_address),
            bandwidth_mediumband: read(exports::get_opus_bandwidth_mediumband_address),
            bandwidth_wideband: read(exports::get_opus_bandwidth_wideband_address),
            bandwidth_superwideband: read(exports::get_opus_bandwidth_superwideband_address),
            bandwidth_fullband: read(exports::get_opus_bandwidth_fullband_address),

            auto: read(exports::get_opus_auto_address),
            bitrate_max: read(exports::get_opus_bitrate_max_address),

            application_voip: read(exports::get_opus_application_voip_address),
            application_audio: read(exports::get_opus_application_audio_address),
            application_restricted_lowdelay: read(
                exports::get_opus_application_restricted_lowdelay_address,
            ),
        };
        debug!(ok = c.ok, voip = c.application_voip, "opus: constants loaded");
        c
    }
}

static CONSTANTS: Lazy<Constants> = Lazy::new(Constants::load);

/// Returns the process-wide constant table.
pub fn constants() -> &'static Constants {
    &CONSTANTS
}

/// Audio bandpass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bandwidth {
    /// 4 kHz bandpass.
    Narrowband,
    /// 6 kHz bandpass.
    Mediumband,
    /// 8 kHz bandpass.
    Wideband,
    /// 12 kHz bandpass.
    Superwideband,
    /// 20 kHz bandpass.
    Fullband,
}

impl Bandwidth {
    /// All tiers, narrowest first.
    pub const ALL: [Bandwidth; 5] = [
        Self::Narrowband,
        Self::Mediumband,
        Self::Wideband,
        Self::Superwideband,
        Self::Fullband,
    ];

    pub fn to_raw(self) -> i32 {
        let c = constants();
        match self {
            Self::Narrowband => c.bandwidth_narrowband,
            Self::Mediumband => c.bandwidth_mediumband,
            Self::Wideband => c.bandwidth_wideband,
            Self::Superwideband => c.bandwidth_superwideband,
            Self::Fullband => c.bandwidth_fullband,
        }
    }

    pub fn from_raw(value: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|bw| bw.to_raw() == value)
    }

    /// Upper edge of the bandpass in Hz.
    pub fn cutoff_hz(self) -> u32 {
        match self {
            Self::Narrowband => 4_000,
            Self::Mediumband => 6_000,
            Self::Wideband => 8_000,
            Self::Superwideband => 12_000,
            Self::Fullband => 20_000,
        }
    }
}

/// Opus application type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Application {
    /// Best quality for voice signals.
    VoIP,
    /// Best quality for non-voice signals.
    Audio,
    /// Minimum possible coding delay.
    RestrictedLowdelay,
}

impl Application {
    pub fn to_raw(self) -> i32 {
        let c = constants();
        match self {
            Self::VoIP => c.application_voip,
            Self::Audio => c.application_audio,
            Self::RestrictedLowdelay => c.application_restricted_lowdelay,
        }
    }
}
