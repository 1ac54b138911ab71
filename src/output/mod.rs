//! Output artifacts: the demuxer playlist and the final compiled file

pub mod playlist;
pub mod writer;

pub use playlist::{render_playlist, write_playlist};
pub use writer::{OutputWriter, StagedOutput};
