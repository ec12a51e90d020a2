//! # Seal Viewer API
//!
//! HTTP client for the seal image backend.
//!
//! The backend exposes a small REST surface:
//!
//! - `POST /auth` - exchange credentials for a signed identity token
//! - `POST /auth/refresh` - exchange a refresh token for a fresh identity token
//! - `GET /seals/{sealId}/images` - list images with time-limited access URLs
//! - `GET`/`PUT` `/seals/{sealId}/images/{imageKey}` - single-object fetch/upload
//! - `POST /seals/{sealId}/images/{imageKey}/upload-url` - pre-signed write URL
//!
//! The client performs no retries and no caching; every call is a fresh
//! authenticated lookup. Failures are reported through the [`ApiError`]
//! taxonomy so callers can distinguish "server said no" from "could not
//! reach server".

pub mod client;
pub mod error;
pub mod types;

pub use client::ApiClient;
pub use error::ApiError;
pub use types::{AuthResponse, ImageDescriptor, UploadUrl};
