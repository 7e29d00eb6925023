//! # API Client
//!
//! Typed async client for the Labora backend REST API.
//!
//! Handles:
//! - authentication (`/api/auth/login`, `/api/auth/register`)
//! - material listing, statistics and detail
//! - create/update as multipart forms with an optional image, and delete
//!
//! Every call except login/register carries the bearer token of the caller's
//! [`SessionContext`](labora_core::SessionContext). Responses are unwrapped from the backend's
//! `{ "data": ... }` envelope; failures surface the backend's `message` unchanged.

#![warn(rust_2018_idioms)]

mod auth;
mod client;
mod image;
mod materials;

#[cfg(test)]
mod test_server;

pub use client::ApiClient;
pub use image::ImageUpload;

use labora_core::CoreError;
use std::path::PathBuf;

pub const LOGIN_PATH: &str = "/api/auth/login";
pub const REGISTER_PATH: &str = "/api/auth/register";
pub const MATERIALS_PATH: &str = "/api/materials";
pub const MY_MATERIALS_PATH: &str = "/api/materials/my-materials";
pub const STATS_PATH: &str = "/api/materials/stats";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response (connection refused, timeout, ...).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    /// The backend answered with a non-2xx status.
    #[error("{message} (HTTP {status})")]
    Api { status: u16, message: String },
    #[error("failed to decode {what}: {source}")]
    Decode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("{0}")]
    MissingData(&'static str),
    #[error("failed to read image {}: {source}", .path.display())]
    ImageRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Rejected before any request was sent.
    #[error(transparent)]
    Validation(#[from] CoreError),
}

impl ApiError {
    /// The text to show the user.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Api { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Api { status, .. } => Some(*status),
            ApiError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
