use thiserror::Error;

/// Failures of the fire-and-forget side effects (font, audio).
/// None of them are fatal; each carries its own recovery policy at the call site.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BalloonError {
    #[error("font '{path}' failed to load: {reason}")]
    FontLoad { path: String, reason: String },
    #[error("font data could not be parsed: {0}")]
    FontParse(String),
    #[error("greeting text '{0}' produced no visible glyphs")]
    EmptyText(String),
    #[error("text outline could not be filled: {0}")]
    Tessellation(String),
    #[error("pop sound '{path}' unavailable: {reason}")]
    AudioUnavailable { path: String, reason: String },
    #[error("WebGPU is not available in this browser")]
    WebGpuUnavailable,
}
