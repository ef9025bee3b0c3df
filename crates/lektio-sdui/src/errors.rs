// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of Lektio.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

use thiserror::Error;

/// Errors from the SDUI timetable API client.
#[derive(Debug, Error)]
pub enum SduiError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Transport failure: network error, timeout, or undecodable body.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Non-success HTTP status from the SDUI API.
    #[error("SDUI API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("SDUI API rejected the bearer token")]
    AuthenticationFailed,
}

pub type SduiResult<T> = Result<T, SduiError>;
