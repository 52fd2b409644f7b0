//! Reelcaps Core Library
//!
//! This crate provides the domain models, error types and configuration
//! shared by the API client, the session orchestrator and the CLI.

pub mod config;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::{AuthMode, ClientConfig};
pub use error::{LogLevel, SessionError, SessionResult};
pub use models::{
    BinaryAsset, BlobHandle, EngineParameters, FontFile, FontSize, LetterSpacing, LineSpacing,
    Session, SessionId, StrokeColor, StrokeWidth, StyleConfig, StyleConfigStore, SubtitleCue,
    SubtitleTrack, VideoFile, VIDEO_CONTENT_TYPE,
};
