//! Data models for the application
//!
//! Style options, session state, upload files and subtitle tracks.

mod session;
mod style;
pub mod subtitles;
mod video_file;

// Re-export all models for convenient imports
pub use session::*;
pub use style::*;
pub use subtitles::{SubtitleCue, SubtitleTrack};
pub use video_file::*;
