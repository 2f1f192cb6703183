//! Opus decoder.

use std::os::raw::{c_int, c_uchar};
use std::ptr;

use opusgate_bridge::decoder as bridge;
use opusgate_bridge::ffi::{self, OpusDecoder as OpusDecoderHandle};
use tracing::debug;

use crate::constants::constants;
use crate::error::{check, Error, Result};

/// Opus decoder.
pub struct Decoder {
    sample_rate: i32,
    channels: i32,
    handle: *mut OpusDecoderHandle,
}

// Safety: The decoder handle is not shared across threads.
unsafe impl Send for Decoder {}

impl Drop for Decoder {
    fn drop(&mut self) {
        if !self.handle.is_null() {
            unsafe { ffi::opus_decoder_destroy(self.handle) };
            self.handle = ptr::null_mut();
            debug!("opus: decoder destroyed");
        }
    }
}

impl Decoder {
    /// Creates a new Opus decoder.
    ///
    /// # Parameters
    /// - `sample_rate`: Sample rate to decode at (8000, 12000, 16000, 24000, or 48000)
    /// - `channels`: Number of channels (1 or 2)
    pub fn new(sample_rate: i32, channels: i32) -> Result<Self> {
        if channels != 1 && channels != 2 {
            return Err(Error::InvalidChannels(channels));
        }

        let mut error: i32 = 0;
        let handle = unsafe { ffi::opus_decoder_create(sample_rate, channels, &mut error) };
        if handle.is_null() || error != constants().ok {
            return Err(Error::from_code(error));
        }

        debug!(sample_rate, channels, "opus: decoder created");
        Ok(Self {
            sample_rate,
            channels,
            handle,
        })
    }

    /// Returns the sample rate.
    pub fn sample_rate(&self) -> i32 {
        self.sample_rate
    }

    /// Returns the number of channels.
    pub fn channels(&self) -> i32 {
        self.channels
    }

    /// Frame size in samples per channel that fits in an output buffer of `len`.
    fn frame_size(&self, len: usize) -> Result<c_int> {
        if len == 0 {
            return Err(Error::EmptyBuffer);
        }
        let channels = self.channels as usize;
        if len % channels != 0 {
            return Err(Error::ChannelMismatch { len, channels });
        }
        Ok((len / channels) as c_int)
    }

    fn packet(data: Option<&[u8]>) -> (*const c_uchar, i32) {
        match data {
            Some(d) if !d.is_empty() => (d.as_ptr(), d.len() as i32),
            _ => (ptr::null(), 0),
        }
    }

    fn decode_i16(&mut self, data: Option<&[u8]>, pcm: &mut [i16], fec: bool) -> Result<usize> {
        let frame_size = self.frame_size(pcm.len())?;
        let (data_ptr, data_len) = Self::packet(data);
        let n = unsafe {
            ffi::opus_decode(
                self.handle,
                data_ptr,
                data_len,
                pcm.as_mut_ptr(),
                frame_size,
                c_int::from(fec),
            )
        };
        Ok(check(n)? as usize)
    }

    fn decode_f32(&mut self, data: Option<&[u8]>, pcm: &mut [f32], fec: bool) -> Result<usize> {
        let frame_size = self.frame_size(pcm.len())?;
        let (data_ptr, data_len) = Self::packet(data);
        let n = unsafe {
            ffi::opus_decode_float(
                self.handle,
                data_ptr,
                data_len,
                pcm.as_mut_ptr(),
                frame_size,
                c_int::from(fec),
            )
        };
        Ok(check(n)? as usize)
    }

    /// Decodes a packet into interleaved PCM. Returns samples per channel.
    pub fn decode(&mut self, data: &[u8], pcm: &mut [i16]) -> Result<usize> {
        if data.is_empty() {
            return Err(Error::EmptyPacket);
        }
        self.decode_i16(Some(data), pcm, false)
    }

    /// Decodes a packet into interleaved float PCM. Returns samples per channel.
    pub fn decode_float(&mut self, data: &[u8], pcm: &mut [f32]) -> Result<usize> {
        if data.is_empty() {
            return Err(Error::EmptyPacket);
        }
        self.decode_f32(Some(data), pcm, false)
    }

    /// Recovers the previous, lost frame from the in-band FEC data in `data`.
    ///
    /// `pcm` must be exactly the duration of the lost frame.
    pub fn decode_fec(&mut self, data: &[u8], pcm: &mut [i16]) -> Result<usize> {
        self.decode_i16(Some(data), pcm, true)
    }

    pub fn decode_fec_float(&mut self, data: &[u8], pcm: &mut [f32]) -> Result<usize> {
        self.decode_f32(Some(data), pcm, true)
    }

    /// Performs packet loss concealment for a lost packet of `pcm.len()` samples.
    pub fn decode_plc(&mut self, pcm: &mut [i16]) -> Result<usize> {
        self.decode_i16(None, pcm, false)
    }

    pub fn decode_plc_float(&mut self, pcm: &mut [f32]) -> Result<usize> {
        self.decode_f32(None, pcm, false)
    }

    /// Duration, in samples per channel, of the last decoded packet.
    pub fn last_packet_duration(&self) -> Result<i32> {
        let mut samples: i32 = 0;
        check(unsafe { bridge::bridge_decoder_get_last_packet_duration(self.handle, &mut samples) })?;
        Ok(samples)
    }
}
