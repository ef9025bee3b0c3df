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

/// Errors signalled by the timetable projector.
///
/// Missing fields inside individual lesson records never error; they degrade
/// to per-field defaults. Only a structurally wrong payload (something that
/// is not a list of records at all) escalates, since that is a caller
/// contract violation rather than a runtime condition.
#[derive(Debug, Error)]
pub enum ProjectionError {
    #[error("invalid timetable payload: expected a JSON array of lessons, got {0}")]
    InvalidInput(&'static str),
}
