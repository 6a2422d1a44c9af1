//! HTTP request handlers.
//!
//! - [`identify`]: the upload form and the identification flow behind it
//!
//! Handlers return [`crate::errors::Result`]; user-facing failures turn into a flash message and
//! a redirect back to the form when converted into a response.

pub mod identify;
