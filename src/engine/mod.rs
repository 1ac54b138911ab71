//! Transcoding engine invocations: normalize profile and stream-copy concat

use serde::{Deserialize, Serialize};

pub mod copy;
pub mod progress;
pub mod reencode;

pub use copy::ConcatCommand;
pub use progress::NormalizeProgress;
pub use reencode::NormalizeCommand;

/// Flags shared by every engine invocation
pub(crate) const COMMON_FLAGS: [&str; 6] = [
    "-hide_banner",
    "-nostdin",
    "-nostats",
    "-loglevel",
    "error",
    "-y",
];

/// Canonical codec/container profile every input is normalized to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EncodingProfile {
    /// Video encoder
    pub video_codec: String,
    /// Encoder speed preset
    pub preset: String,
    /// Constant Rate Factor (0-51)
    pub crf: u8,
    /// Output pixel format
    pub pixel_format: String,
    /// Audio encoder
    pub audio_codec: String,
    /// Audio bitrate (ffmpeg notation, e.g. `192k`)
    pub audio_bitrate: String,
    /// Audio sample rate in Hz
    pub audio_sample_rate: u32,
    /// Audio channel count
    pub audio_channels: u8,
}

impl Default for EncodingProfile {
    fn default() -> Self {
        Self {
            video_codec: "libx264".to_string(),
            preset: "veryfast".to_string(),
            crf: 18,
            pixel_format: "yuv420p".to_string(),
            audio_codec: "aac".to_string(),
            audio_bitrate: "192k".to_string(),
            audio_sample_rate: 48_000,
            audio_channels: 2,
        }
    }
}

impl EncodingProfile {
    /// Check the profile for values the engine would reject
    pub fn validate(&self) -> Result<(), String> {
        if self.crf > 51 {
            return Err(format!("crf must be between 0 and 51, got {}", self.crf));
        }
        for (name, value) in [
            ("video_codec", &self.video_codec),
            ("preset", &self.preset),
            ("pixel_format", &self.pixel_format),
            ("audio_codec", &self.audio_codec),
            ("audio_bitrate", &self.audio_bitrate),
        ] {
            if value.trim().is_empty() {
                return Err(format!("encoding.{} must not be empty", name));
            }
        }
        if self.audio_sample_rate == 0 {
            return Err("encoding.audio_sample_rate must be positive".to_string());
        }
        if self.audio_channels == 0 {
            return Err("encoding.audio_channels must be at least 1".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile_is_valid() {
        let profile = EncodingProfile::default();
        assert!(profile.validate().is_ok());
        assert_eq!(profile.audio_sample_rate, 48_000);
        assert_eq!(profile.audio_channels, 2);
        assert_eq!(profile.pixel_format, "yuv420p");
    }

    #[test]
    fn test_profile_validation_rejects_bad_values() {
        let mut profile = EncodingProfile::default();
        profile.crf = 52;
        assert!(profile.validate().is_err());

        let mut profile = EncodingProfile::default();
        profile.audio_codec = "  ".to_string();
        assert!(profile.validate().unwrap_err().contains("audio_codec"));

        let mut profile = EncodingProfile::default();
        profile.audio_channels = 0;
        assert!(profile.validate().is_err());
    }
}
