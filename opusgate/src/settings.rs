//! Serializable encoder settings.
//!
//! A host usually keeps its encoder configuration in a config file. The
//! settings here mirror the control knobs one-to-one; absent fields leave
//! the encoder's current value alone.
//!
//! ```json
//! { "bitrate": "auto", "complexity": 8, "max_bandwidth": "wideband", "inband_fec": true }
//! ```

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::constants::Bandwidth;
use crate::encoder::Encoder;
use crate::error::Result;

/// Target bitrate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bitrate {
    /// Let the encoder pick.
    Auto,
    /// As much as the output buffer allows.
    Max,
    /// Bits per second.
    #[serde(untagged)]
    Bits(i32),
}

/// Encoder control knobs. `None` means "leave as is".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bitrate: Option<Bitrate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complexity: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_bandwidth: Option<Bandwidth>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inband_fec: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub packet_loss_perc: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dtx: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vbr: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vbr_constraint: Option<bool>,
}

impl EncoderSettings {
    /// Parses settings from JSON.
    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Serializes settings to JSON, omitting unset knobs.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Applies every present knob. Stops at the first rejected value; knobs
    /// applied before it stay applied.
    pub fn apply(&self, enc: &mut Encoder) -> Result<()> {
        self.apply_inner(enc).inspect_err(|e| warn!(error = %e, "opus: apply encoder settings failed"))
    }

    fn apply_inner(&self, enc: &mut Encoder) -> Result<()> {
        match self.bitrate {
            Some(Bitrate::Auto) => enc.set_bitrate_to_auto()?,
            Some(Bitrate::Max) => enc.set_bitrate_to_max()?,
            Some(Bitrate::Bits(bps)) => enc.set_bitrate(bps)?,
            None => {}
        }
        if let Some(complexity) = self.complexity {
            enc.set_complexity(complexity)?;
        }
        if let Some(bw) = self.max_bandwidth {
            enc.set_max_bandwidth(bw)?;
        }
        if let Some(fec) = self.inband_fec {
            enc.set_inband_fec(fec)?;
        }
        if let Some(loss) = self.packet_loss_perc {
            enc.set_packet_loss_perc(loss)?;
        }
        if let Some(dtx) = self.dtx {
            enc.set_dtx(dtx)?;
        }
        if let Some(vbr) = self.vbr {
            enc.set_vbr(vbr)?;
        }
        if let Some(constraint) = self.vbr_constraint {
            enc.set_vbr_constraint(constraint)?;
        }
        Ok(())
    }

    /// Reads every knob back from a live encoder.
    ///
    /// The bitrate is always reported in bits per second, even when the
    /// encoder was set to auto or max.
    pub fn capture(enc: &Encoder) -> Result<Self> {
        Ok(Self {
            bitrate: Some(Bitrate::Bits(enc.bitrate()?)),
            complexity: Some(enc.complexity()?),
            max_bandwidth: Some(enc.max_bandwidth()?),
            inband_fec: Some(enc.inband_fec()?),
            packet_loss_perc: Some(enc.packet_loss_perc()?),
            dtx: Some(enc.dtx()?),
            vbr: Some(enc.vbr()?),
            vbr_constraint: Some(enc.vbr_constraint()?),
        })
    }
}
