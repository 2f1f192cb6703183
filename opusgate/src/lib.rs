//! Safe Rust client of the opusgate control bridge.
//!
//! This crate is the consumer the bridge was built for: it reads libopus'
//! constants through the exported `get_opus_*_address` accessors and drives
//! every encoder knob through the exported `bridge_encoder_*` functions,
//! turning negative status codes into typed errors.
//!
//! - `constants`: late-bound constant table, `Bandwidth`, `Application`
//! - `encoder` / `decoder`: owned libopus handles with typed controls
//! - `settings`: serde-configurable encoder knobs
//!
//! # Example
//!
//! ```no_run
//! use opusgate::{Bandwidth, Encoder, EncoderSettings};
//!
//! let mut encoder = Encoder::new_voip(48000, 1)?;
//! encoder.set_bitrate(64000)?;
//! encoder.set_max_bandwidth(Bandwidth::Wideband)?;
//! assert_eq!(encoder.bitrate()?, 64000);
//!
//! let settings = EncoderSettings::from_json(r#"{"inband_fec": true, "packet_loss_perc": 10}"#)?;
//! settings.apply(&mut encoder)?;
//! # Ok::<(), opusgate::Error>(())
//! ```
//!
//! # Threading
//!
//! `Encoder` and `Decoder` are `Send` but not `Sync`. libopus state must not
//! be touched from two threads at once; `&mut self` on every mutating call
//! enforces that for Rust callers.

pub mod constants;
pub mod decoder;
pub mod encoder;
mod error;
pub mod settings;

pub use constants::{constants, Application, Bandwidth, Constants};
pub use decoder::Decoder;
pub use encoder::Encoder;
pub use error::{Error, Result, Status};
pub use settings::{Bitrate, EncoderSettings};

/// Returns the version string of the linked libopus.
pub fn version() -> String {
    opusgate_bridge::ffi::version_string()
}
