/*
This file is part of the Point Density Mapping Tool
Copyright (C) 2022 Novel-T

The Point Density Mapping Tool is free software: you can redistribute it and/or modify
it under the terms of the GNU General Public License as published by
the Free Software Foundation, either version 3 of the License, or
(at your option) any later version.

This program is distributed in the hope that it will be useful,
but WITHOUT ANY WARRANTY; without even the implied warranty of
MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
GNU General Public License for more details.

You should have received a copy of the GNU General Public License
along with this program.  If not, see <http://www.gnu.org/licenses/>.
*/
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the pipeline steps.  Each one is terminal to the
/// step that raised it; there is no retry or partial recovery.
#[derive(Error, Debug)]
pub enum VectorError {
    #[error("layer component not found: {0}")]
    NotFound(PathBuf),

    #[error("bad layer data: {0}")]
    Format(String),

    #[error("unsupported projection: EPSG:{0}")]
    UnsupportedProjection(u32),

    #[error("destination already exists: {0} (pass overwrite to replace)")]
    AlreadyExists(PathBuf),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Shapefile(#[from] shapefile::Error),
}

pub type Result<T> = std::result::Result<T, VectorError>;
