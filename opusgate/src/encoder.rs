//! Opus encoder.

use std::os::raw::c_int;
use std::ptr;

use opusgate_bridge::encoder as bridge;
use opusgate_bridge::ffi::{self, OpusEncoder as OpusEncoderHandle};
use tracing::debug;

use crate::constants::{constants, Application, Bandwidth};
use crate::error::{check, Error, Result};

type SetFn = unsafe extern "C" fn(*mut OpusEncoderHandle, i32) -> c_int;
type GetFn = unsafe extern "C" fn(*mut OpusEncoderHandle, *mut i32) -> c_int;

/// Opus encoder.
///
/// Every control knob goes through the exported bridge functions, so this
/// type exercises exactly the surface a foreign host sees.
pub struct Encoder {
    sample_rate: i32,
    channels: i32,
    handle: *mut OpusEncoderHandle,
}

// Safety: libopus encoder state has no thread affinity. Mutation goes
// through `&mut self`, which serializes access to the handle.
unsafe impl Send for Encoder {}

impl Drop for Encoder {
    fn drop(&mut self) {
        if !self.handle.is_null() {
            unsafe { ffi::opus_encoder_destroy(self.handle) };
            self.handle = ptr::null_mut();
            debug!("opus: encoder destroyed");
        }
    }
}

impl Encoder {
    /// Creates a new Opus encoder.
    ///
    /// # Parameters
    /// - `sample_rate`: Sample rate (8000, 12000, 16000, 24000, or 48000)
    /// - `channels`: Number of channels (1 or 2)
    /// - `application`: Intended application type
    pub fn new(sample_rate: i32, channels: i32, application: Application) -> Result<Self> {
        if channels != 1 && channels != 2 {
            return Err(Error::InvalidChannels(channels));
        }

        let mut error: i32 = 0;
        let handle = unsafe {
            ffi::opus_encoder_create(sample_rate, channels, application.to_raw(), &mut error)
        };
        if handle.is_null() || error != constants().ok {
            return Err(Error::from_code(error));
        }

        debug!(sample_rate, channels, ?application, "opus: encoder created");
        Ok(Self {
            sample_rate,
            channels,
            handle,
        })
    }

    /// Creates a new VoIP encoder.
    pub fn new_voip(sample_rate: i32, channels: i32) -> Result<Self> {
        Self::new(sample_rate, channels, Application::VoIP)
    }

    /// Creates a new audio encoder.
    pub fn new_audio(sample_rate: i32, channels: i32) -> Result<Self> {
        Self::new(sample_rate, channels, Application::Audio)
    }

    /// Returns the number of channels.
    pub fn channels(&self) -> i32 {
        self.channels
    }

    /// Returns the raw encoder handle for hosts that call the bridge directly.
    ///
    /// The handle stays owned by this `Encoder`.
    pub fn handle(&self) -> *mut OpusEncoderHandle {
        self.handle
    }

    /// Returns the frame size for 20ms frames.
    pub fn frame_size_20ms(&self) -> i32 {
        self.sample_rate * 20 / 1000
    }

    fn check_pcm(&self, len: usize, out_len: usize) -> Result<usize> {
        if len == 0 {
            return Err(Error::EmptyPcm);
        }
        if out_len == 0 {
            return Err(Error::EmptyBuffer);
        }
        let channels = self.channels as usize;
        if len % channels != 0 {
            return Err(Error::ChannelMismatch { len, channels });
        }
        Ok(len / channels)
    }

    /// Encodes interleaved PCM into `data`. Returns number of bytes written.
    pub fn encode(&mut self, pcm: &[i16], data: &mut [u8]) -> Result<usize> {
        let frame_size = self.check_pcm(pcm.len(), data.len())?;
        let n = unsafe {
            ffi::opus_encode(
                self.handle,
                pcm.as_ptr(),
                frame_size as c_int,
                data.as_mut_ptr(),
                data.len() as i32,
            )
        };
        Ok(check(n)? as usize)
    }

    /// Encodes interleaved float PCM into `data`. Returns number of bytes written.
    pub fn encode_float(&mut self, pcm: &[f32], data: &mut [u8]) -> Result<usize> {
        let frame_size = self.check_pcm(pcm.len(), data.len())?;
        let n = unsafe {
            ffi::opus_encode_float(
                self.handle,
                pcm.as_ptr(),
                frame_size as c_int,
                data.as_mut_ptr(),
                data.len() as i32,
            )
        };
        Ok(check(n)? as usize)
    }

    // --- Generic CTL getters/setters ---

    fn set_ctl(&mut self, f: SetFn, value: i32) -> Result<()> {
        check(unsafe { f(self.handle, value) })?;
        Ok(())
    }

    fn get_ctl(&self, f: GetFn) -> Result<i32> {
        let mut value: i32 = 0;
        check(unsafe { f(self.handle, &mut value) })?;
        Ok(value)
    }

    fn set_flag(&mut self, f: SetFn, on: bool) -> Result<()> {
        self.set_ctl(f, i32::from(on))
    }

    fn get_flag(&self, f: GetFn) -> Result<bool> {
        Ok(self.get_ctl(f)? != 0)
    }

    // --- Specific CTL functions ---

    /// Configures the encoder's use of discontinuous transmission (DTX).
    pub fn set_dtx(&mut self, dtx: bool) -> Result<()> {
        self.set_flag(bridge::bridge_encoder_set_dtx, dtx)
    }

    /// Reports whether this encoder is configured to use DTX.
    pub fn dtx(&self) -> Result<bool> {
        self.get_flag(bridge::bridge_encoder_get_dtx)
    }

    /// Reports whether the last encoded frame was a comfort noise update or
    /// was not encoded because of DTX.
    pub fn in_dtx(&self) -> Result<bool> {
        self.get_flag(bridge::bridge_encoder_get_in_dtx)
    }

    /// Returns the encoder sample rate in Hz, as reported by libopus.
    pub fn sample_rate(&self) -> Result<i32> {
        self.get_ctl(bridge::bridge_encoder_get_sample_rate)
    }

    /// Sets the target bitrate in bits per second.
    pub fn set_bitrate(&mut self, bitrate: i32) -> Result<()> {
        self.set_ctl(bridge::bridge_encoder_set_bitrate, bitrate)
    }

    /// Lets the encoder pick the bitrate.
    pub fn set_bitrate_to_auto(&mut self) -> Result<()> {
        self.set_ctl(bridge::bridge_encoder_set_bitrate, constants().auto)
    }

    /// Uses as much bitrate as the output buffer allows.
    pub fn set_bitrate_to_max(&mut self) -> Result<()> {
        self.set_ctl(bridge::bridge_encoder_set_bitrate, constants().bitrate_max)
    }

    /// Returns the bitrate in bits per second.
    pub fn bitrate(&self) -> Result<i32> {
        self.get_ctl(bridge::bridge_encoder_get_bitrate)
    }

    /// Sets the encoder complexity (0-10).
    pub fn set_complexity(&mut self, complexity: i32) -> Result<()> {
        self.set_ctl(bridge::bridge_encoder_set_complexity, complexity)
    }

    pub fn complexity(&self) -> Result<i32> {
        self.get_ctl(bridge::bridge_encoder_get_complexity)
    }

    /// Configures the maximum bandpass the encoder will select automatically.
    pub fn set_max_bandwidth(&mut self, max_bw: Bandwidth) -> Result<()> {
        self.set_ctl(bridge::bridge_encoder_set_max_bandwidth, max_bw.to_raw())
    }

    pub fn max_bandwidth(&self) -> Result<Bandwidth> {
        let raw = self.get_ctl(bridge::bridge_encoder_get_max_bandwidth)?;
        Bandwidth::from_raw(raw).ok_or(Error::UnknownBandwidth(raw))
    }

    /// Configures in-band forward error correction (FEC).
    pub fn set_inband_fec(&mut self, fec: bool) -> Result<()> {
        self.set_flag(bridge::bridge_encoder_set_inband_fec, fec)
    }

    pub fn inband_fec(&self) -> Result<bool> {
        self.get_flag(bridge::bridge_encoder_get_inband_fec)
    }

    /// Configures the expected packet loss percentage (0-100).
    pub fn set_packet_loss_perc(&mut self, loss_perc: i32) -> Result<()> {
        self.set_ctl(bridge::bridge_encoder_set_packet_loss_perc, loss_perc)
    }

    pub fn packet_loss_perc(&self) -> Result<i32> {
        self.get_ctl(bridge::bridge_encoder_get_packet_loss_perc)
    }

    /// Configures variable bitrate (VBR).
    pub fn set_vbr(&mut self, vbr: bool) -> Result<()> {
        self.set_flag(bridge::bridge_encoder_set_vbr, vbr)
    }

    pub fn vbr(&self) -> Result<bool> {
        self.get_flag(bridge::bridge_encoder_get_vbr)
    }

    /// Configures constrained VBR.
    pub fn set_vbr_constraint(&mut self, constraint: bool) -> Result<()> {
        self.set_flag(bridge::bridge_encoder_set_vbr_constraint, constraint)
    }

    pub fn vbr_constraint(&self) -> Result<bool> {
        self.get_flag(bridge::bridge_encoder_get_vbr_constraint)
    }

    /// Resets the codec state to that of a freshly initialized encoder.
    /// Configured knobs are kept.
    pub fn reset(&mut self) -> Result<()> {
        check(unsafe { bridge::bridge_encoder_reset_state(self.handle) })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Status;

    #[test]
    fn test_encoder_create() {
        let enc = Encoder::new_voip(16000, 1).unwrap();
        assert_eq!(enc.sample_rate().unwrap(), 16000);
        assert_eq!(enc.channels(), 1);
        assert_eq!(enc.frame_size_20ms(), 320);
        assert!(!enc.handle().is_null());
    }

    #[test]
    fn test_encoder_create_with_application() {
        assert!(Encoder::new(16000, 1, Application::VoIP).is_ok());
        assert!(Encoder::new(48000, 2, Application::Audio).is_ok());
        assert!(Encoder::new(48000, 1, Application::RestrictedLowdelay).is_ok());
    }

    #[test]
    fn test_encoder_invalid_channels() {
        let err = Encoder::new_voip(16000, 3).err().unwrap();
        assert!(matches!(err, Error::InvalidChannels(3)));
    }

    #[test]
    fn test_encoder_invalid_sample_rate() {
        let err = Encoder::new_voip(44100, 1).err().unwrap();
        assert_eq!(err.status(), Some(Status::BadArg));
    }

    #[test]
    fn test_encode() {
        let mut enc = Encoder::new_voip(16000, 1).unwrap();
        let pcm = vec![0i16; 320];
        let mut buf = vec![0u8; 4000];
        let n = enc.encode(&pcm, &mut buf).unwrap();
        assert!(n > 0 && n <= buf.len());
    }

    #[test]
    fn test_encode_float_stereo() {
        let mut enc = Encoder::new_audio(48000, 2).unwrap();
        let pcm: Vec<f32> = (0..960 * 2)
            .map(|i| ((i / 2) as f32 * 440.0 * 2.0 * std::f32::consts::PI / 48000.0).sin() * 0.3)
            .collect();
        let mut buf = vec![0u8; 4000];
        let n = enc.encode_float(&pcm, &mut buf).unwrap();
        assert!(n > 0);
    }

    #[test]
    fn test_encode_rejects_bad_input() {
        let mut enc = Encoder::new_voip(16000, 2).unwrap();
        let mut buf = vec![0u8; 4000];
        assert!(matches!(enc.encode(&[], &mut buf), Err(Error::EmptyPcm)));
        assert!(matches!(enc.encode(&[0; 640], &mut []), Err(Error::EmptyBuffer)));
        assert!(matches!(
            enc.encode(&[0; 641], &mut buf),
            Err(Error::ChannelMismatch { len: 641, channels: 2 })
        ));
    }

    #[test]
    fn test_encode_invalid_frame_size() {
        let mut enc = Encoder::new_voip(16000, 1).unwrap();
        let mut buf = vec![0u8; 4000];
        // 7 samples is not a legal Opus frame duration.
        let err = enc.encode(&[0; 7], &mut buf).unwrap_err();
        assert_eq!(err.status(), Some(Status::BadArg));
    }

    #[test]
    fn test_set_bitrate() {
        let mut enc = Encoder::new_voip(48000, 1).unwrap();
        enc.set_bitrate(64000).unwrap();
        assert_eq!(enc.bitrate().unwrap(), 64000);

        let err = enc.set_bitrate(-5).unwrap_err();
        assert_eq!(err.status(), Some(Status::BadArg));
    }

    #[test]
    fn test_bitrate_sentinels() {
        let mut enc = Encoder::new_voip(48000, 1).unwrap();
        enc.set_bitrate_to_auto().unwrap();
        assert!(enc.bitrate().unwrap() > 0);
        enc.set_bitrate_to_max().unwrap();
        assert!(enc.bitrate().unwrap() > 0);
    }

    #[test]
    fn test_set_complexity() {
        let mut enc = Encoder::new_voip(16000, 1).unwrap();
        enc.set_complexity(5).unwrap();
        assert_eq!(enc.complexity().unwrap(), 5);

        let err = enc.set_complexity(11).unwrap_err();
        assert_eq!(err.status(), Some(Status::BadArg));
        assert_eq!(err.status().unwrap().code(), constants().bad_arg);
        assert_eq!(enc.complexity().unwrap(), 5);
    }

    #[test]
    fn test_max_bandwidth() {
        let mut enc = Encoder::new_audio(48000, 2).unwrap();
        assert_eq!(enc.max_bandwidth().unwrap(), Bandwidth::Fullband);
        for bw in Bandwidth::ALL {
            enc.set_max_bandwidth(bw).unwrap();
            assert_eq!(enc.max_bandwidth().unwrap(), bw);
        }
    }

    #[test]
    fn test_flags() {
        let mut enc = Encoder::new_voip(16000, 1).unwrap();
        assert!(!enc.dtx().unwrap());
        assert!(!enc.inband_fec().unwrap());
        assert!(enc.vbr().unwrap());
        assert!(enc.vbr_constraint().unwrap());

        enc.set_dtx(true).unwrap();
        enc.set_inband_fec(true).unwrap();
        enc.set_vbr(false).unwrap();
        enc.set_vbr_constraint(false).unwrap();

        assert!(enc.dtx().unwrap());
        assert!(enc.inband_fec().unwrap());
        assert!(!enc.vbr().unwrap());
        assert!(!enc.vbr_constraint().unwrap());
    }

    #[test]
    fn test_packet_loss_perc() {
        let mut enc = Encoder::new_voip(16000, 1).unwrap();
        enc.set_packet_loss_perc(30).unwrap();
        assert_eq!(enc.packet_loss_perc().unwrap(), 30);
        assert!(enc.set_packet_loss_perc(101).is_err());
        assert!(enc.set_packet_loss_perc(-1).is_err());
        assert_eq!(enc.packet_loss_perc().unwrap(), 30);
    }

    #[test]
    fn test_in_dtx_after_silence() {
        let mut enc = Encoder::new_voip(16000, 1).unwrap();
        enc.set_dtx(true).unwrap();
        assert!(!enc.in_dtx().unwrap());

        let pcm = vec![0i16; 320];
        let mut buf = vec![0u8; 4000];
        let mut entered = false;
        for _ in 0..50 {
            enc.encode(&pcm, &mut buf).unwrap();
            if enc.in_dtx().unwrap() {
                entered = true;
                break;
            }
        }
        assert!(entered);

        enc.reset().unwrap();
        assert!(!enc.in_dtx().unwrap());
        assert!(enc.dtx().unwrap());
    }

    #[test]
    fn test_reset_keeps_configuration() {
        let mut enc = Encoder::new_voip(48000, 1).unwrap();
        enc.set_bitrate(40000).unwrap();
        enc.set_complexity(3).unwrap();
        enc.set_packet_loss_perc(10).unwrap();

        enc.reset().unwrap();

        assert_eq!(enc.bitrate().unwrap(), 40000);
        assert_eq!(enc.complexity().unwrap(), 3);
        assert_eq!(enc.packet_loss_perc().unwrap(), 10);
        assert_eq!(enc.sample_rate().unwrap(), 48000);
    }

    #[test]
    fn test_encoder_multiple_frames() {
        let mut enc = Encoder::new_voip(16000, 1).unwrap();
        let pcm = vec![0i16; 320];
        let mut buf = vec![0u8; 4000];
        for _ in 0..10 {
            assert!(enc.encode(&pcm, &mut buf).is_ok());
        }
    }
}
