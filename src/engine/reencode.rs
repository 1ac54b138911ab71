//! Normalizing re-encode: one input to the canonical profile

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::engine::{EncodingProfile, COMMON_FLAGS};

/// Re-encode invocation turning any input into the canonical profile
#[derive(Debug, Clone)]
pub struct NormalizeCommand {
    input: PathBuf,
    output: PathBuf,
    profile: EncodingProfile,
}

impl NormalizeCommand {
    /// Create a new normalize command
    pub fn new(input: &Path, output: &Path, profile: &EncodingProfile) -> Self {
        Self {
            input: input.to_path_buf(),
            output: output.to_path_buf(),
            profile: profile.clone(),
        }
    }

    /// Engine arguments, without the program name.
    ///
    /// `+genpts` is an input option so it must come before `-i`.
    pub fn args(&self) -> Vec<OsString> {
        let p = &self.profile;
        let mut args: Vec<OsString> = COMMON_FLAGS.iter().copied().map(OsString::from).collect();

        args.extend(["-fflags", "+genpts", "-i"].map(OsString::from));
        args.push(self.input.clone().into_os_string());

        let crf = p.crf.to_string();
        let sample_rate = p.audio_sample_rate.to_string();
        let channels = p.audio_channels.to_string();
        args.extend(
            [
                "-avoid_negative_ts",
                "make_zero",
                "-c:v",
                p.video_codec.as_str(),
                "-preset",
                p.preset.as_str(),
                "-crf",
                crf.as_str(),
                "-pix_fmt",
                p.pixel_format.as_str(),
                "-c:a",
                p.audio_codec.as_str(),
                "-b:a",
                p.audio_bitrate.as_str(),
                "-ar",
                sample_rate.as_str(),
                "-ac",
                channels.as_str(),
                "-movflags",
                "+faststart",
            ]
            .map(OsString::from),
        );
        args.push(self.output.clone().into_os_string());
        args
    }
}
