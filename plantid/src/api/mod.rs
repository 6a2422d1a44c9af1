//! HTTP layer.
//!
//! - **[`handlers`]**: Axum route handlers for the upload form
//!
//! # Routes
//!
//! - `GET /`: the upload form, plus any pending flash message
//! - `POST /`: upload an image and render its identification
//! - `GET /static/*`: previously uploaded images
//! - `GET /healthz`: liveness check

pub mod handlers;
