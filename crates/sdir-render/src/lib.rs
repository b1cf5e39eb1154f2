//! Render dispatch.
//!
//! Sends one scene prompt to the external video generation API and
//! extracts the resulting video URL. Duration is snapped to the backend's
//! supported values; resolution and aspect ratio are fixed.

pub mod client;
pub mod config;
pub mod credentials;
pub mod error;

pub use client::{extract_video_url, RenderClient, RenderOutcome, VIDEO_URL_FIELDS};
pub use config::RenderConfig;
pub use credentials::RenderCredentials;
pub use error::{RenderError, RenderResult};
