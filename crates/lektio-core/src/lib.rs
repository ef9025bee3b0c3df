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

pub mod errors;
pub mod projector;
pub mod traits;
pub mod types;

pub use errors::ProjectionError;
pub use projector::{KIND_CANCELED, TimetableProjector, str_at, value_at};
pub use traits::{StateSink, TimetableSource};
pub use types::{LessonEntry, Projection};
