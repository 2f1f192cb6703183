//! Exported constant table.
//!
//! Each libopus constant lives in its own `static` cell and is exported as a
//! zero-argument function returning the cell's address. A host without the
//! opus headers calls the accessor once and reads four bytes from the
//! returned address. Cells are never written after load.

use crate::ffi;

/// One entry of the exported constant table.
#[derive(Debug, Clone, Copy)]
pub struct Constant {
    /// Symbolic name as spelled in `opus_defines.h`.
    pub name: &'static str,
    /// The exported accessor.
    pub address: extern "C" fn() -> *const i32,
}

impl Constant {
    /// Reads the value through the exported address.
    pub fn value(&self) -> i32 {
        // Accessors only ever return the address of a static cell.
        unsafe { *(self.address)() }
    }
}

macro_rules! constant_table {
    ($( $(#[$doc:meta])* $name:literal => $cell:ident, $getter:ident = $value:expr; )*) => {
        $(
            static $cell: i32 = $value;

            $(#[$doc])*
            #[unsafe(no_mangle)]
            pub extern "C" fn $getter() -> *const i32 {
                &$cell
            }
        )*

        /// Every exported constant, in export order.
        pub static TABLE: &[Constant] = &[
            $( Constant { name: $name, address: $getter }, )*
        ];
    };
}

constant_table! {
    /// 4 kHz bandpass.
    "OPUS_BANDWIDTH_NARROWBAND" => BANDWIDTH_NARROWBAND,
        get_opus_bandwidth_narrowband_address = ffi::OPUS_BANDWIDTH_NARROWBAND;
    /// 6 kHz bandpass.
    "OPUS_BANDWIDTH_MEDIUMBAND" => BANDWIDTH_MEDIUMBAND,
        get_opus_bandwidth_mediumband_address = ffi::OPUS_BANDWIDTH_MEDIUMBAND;
    /// 8 kHz bandpass.
    "OPUS_BANDWIDTH_WIDEBAND" => BANDWIDTH_WIDEBAND,
        get_opus_bandwidth_wideband_address = ffi::OPUS_BANDWIDTH_WIDEBAND;
    /// 12 kHz bandpass.
    "OPUS_BANDWIDTH_SUPERWIDEBAND" => BANDWIDTH_SUPERWIDEBAND,
        get_opus_bandwidth_superwideband_address = ffi::OPUS_BANDWIDTH_SUPERWIDEBAND;
    /// 20 kHz bandpass.
    "OPUS_BANDWIDTH_FULLBAND" => BANDWIDTH_FULLBAND,
        get_opus_bandwidth_fullband_address = ffi::OPUS_BANDWIDTH_FULLBAND;
    /// Let the encoder pick (bitrate, bandwidth, signal).
    "OPUS_AUTO" => AUTO,
        get_opus_auto_address = ffi::OPUS_AUTO;
    /// Use as much bitrate as the packet size allows.
    "OPUS_BITRATE_MAX" => BITRATE_MAX,
        get_opus_bitrate_max_address = ffi::OPUS_BITRATE_MAX;

    "OPUS_OK" => OK,
        get_opus_ok_address = ffi::OPUS_OK;
    "OPUS_BAD_ARG" => BAD_ARG,
        get_opus_bad_arg_address = ffi::OPUS_BAD_ARG;
    "OPUS_BUFFER_TOO_SMALL" => BUFFER_TOO_SMALL,
        get_opus_buffer_too_small_address = ffi::OPUS_BUFFER_TOO_SMALL;
    "OPUS_INTERNAL_ERROR" => INTERNAL_ERROR,
        get_opus_internal_error_address = ffi::OPUS_INTERNAL_ERROR;
    "OPUS_INVALID_PACKET" => INVALID_PACKET,
        get_opus_invalid_packet_address = ffi::OPUS_INVALID_PACKET;
    "OPUS_UNIMPLEMENTED" => UNIMPLEMENTED,
        get_opus_unimplemented_address = ffi::OPUS_UNIMPLEMENTED;
    "OPUS_INVALID_STATE" => INVALID_STATE,
        get_opus_invalid_state_address = ffi::OPUS_INVALID_STATE;
    "OPUS_ALLOC_FAIL" => ALLOC_FAIL,
        get_opus_alloc_fail_address = ffi::OPUS_ALLOC_FAIL;

    /// Best quality for voice signals.
    "OPUS_APPLICATION_VOIP" => APPLICATION_VOIP,
        get_opus_application_voip_address = ffi::OPUS_APPLICATION_VOIP;
    /// Best quality for non-voice signals.
    "OPUS_APPLICATION_AUDIO" => APPLICATION_AUDIO,
        get_opus_application_audio_address = ffi::OPUS_APPLICATION_AUDIO;
    /// Minimum possible coding delay.
    "OPUS_APPLICATION_RESTRICTED_LOWDELAY" => APPLICATION_RESTRICTED_LOWDELAY,
        get_opus_application_restricted_lowdelay_address = ffi::OPUS_APPLICATION_RESTRICTED_LOWDELAY;
}

/// Finds a table entry by its symbolic name.
pub fn lookup(name: &str) -> Option<&'static Constant> {
    TABLE.iter().find(|c| c.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn read(getter: extern "C" fn() -> *const i32) -> i32 {
        unsafe { *getter() }
    }

    #[test]
    fn test_golden_values() {
        assert_eq!(read(get_opus_bandwidth_narrowband_address), 1101);
        assert_eq!(read(get_opus_bandwidth_mediumband_address), 1102);
        assert_eq!(read(get_opus_bandwidth_wideband_address), 1103);
        assert_eq!(read(get_opus_bandwidth_superwideband_address), 1104);
        assert_eq!(read(get_opus_bandwidth_fullband_address), 1105);
        assert_eq!(read(get_opus_auto_address), -1000);
        assert_eq!(read(get_opus_bitrate_max_address), -1);

        assert_eq!(read(get_opus_ok_address), 0);
        assert_eq!(read(get_opus_bad_arg_address), -1);
        assert_eq!(read(get_opus_buffer_too_small_address), -2);
        assert_eq!(read(get_opus_internal_error_address), -3);
        assert_eq!(read(get_opus_invalid_packet_address), -4);
        assert_eq!(read(get_opus_unimplemented_address), -5);
        assert_eq!(read(get_opus_invalid_state_address), -6);
        assert_eq!(read(get_opus_alloc_fail_address), -7);

        assert_eq!(read(get_opus_application_voip_address), 2048);
        assert_eq!(read(get_opus_application_audio_address), 2049);
        assert_eq!(read(get_opus_application_restricted_lowdelay_address), 2051);
    }

    #[test]
    fn test_table_covers_every_export() {
        assert_eq!(TABLE.len(), 18);
        let names: HashSet<_> = TABLE.iter().map(|c| c.name).collect();
        assert_eq!(names.len(), TABLE.len());
    }

    #[test]
    fn test_addresses_are_stable_and_distinct() {
        let first: Vec<_> = TABLE.iter().map(|c| (c.address)()).collect();
        let second: Vec<_> = TABLE.iter().map(|c| (c.address)()).collect();
        assert_eq!(first, second);

        let unique: HashSet<_> = first.iter().map(|p| *p as usize).collect();
        assert_eq!(unique.len(), first.len());
        assert!(first.iter().all(|p| !p.is_null()));
    }

    #[test]
    fn test_bandwidth_ordering() {
        let wb = get_opus_bandwidth_wideband_address();
        let swb = get_opus_bandwidth_superwideband_address();
        assert_ne!(wb, swb);
        assert!(unsafe { *swb } > unsafe { *wb });

        let tiers = [
            "OPUS_BANDWIDTH_NARROWBAND",
            "OPUS_BANDWIDTH_MEDIUMBAND",
            "OPUS_BANDWIDTH_WIDEBAND",
            "OPUS_BANDWIDTH_SUPERWIDEBAND",
            "OPUS_BANDWIDTH_FULLBAND",
        ];
        let values: Vec<i32> = tiers.iter().map(|n| lookup(n).unwrap().value()).collect();
        assert!(values.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_lookup() {
        assert_eq!(lookup("OPUS_BAD_ARG").unwrap().value(), ffi::OPUS_BAD_ARG);
        assert_eq!(
            lookup("OPUS_APPLICATION_AUDIO").unwrap().value(),
            ffi::OPUS_APPLICATION_AUDIO
        );
        assert!(lookup("OPUS_SIGNAL_VOICE").is_none());
    }
}
