//! Outbound calls to the plant.id identification API.
//!
//! - [`client`]: the HTTP client that uploads an image and interprets the response
//! - [`models`]: request and response payloads as they appear on the wire

pub mod client;
pub mod models;

pub use client::{IdentificationClient, interpret_response};
pub use models::{IdentificationResult, IdentifyRequest, Suggestion};
