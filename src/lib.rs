#![forbid(unsafe_code)]

//! Core pieces of the YT comment export tooling.
//!
//! The crate fetches video metadata and paginated comment threads from the
//! YouTube Data API v3, accumulates them in a session object, and derives
//! filtered views that can be exported as CSV. Binaries only orchestrate;
//! every rule worth testing lives in these modules.

pub mod client;
pub mod config;
pub mod error;
pub mod export;
pub mod filter;
pub mod model;
pub mod session;
pub mod video_id;
