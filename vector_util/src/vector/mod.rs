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

pub mod aggregate;
pub mod clip;
pub mod grid;
pub mod intersection;
pub mod transform;

pub use aggregate::{aggregate_into_polygons, Reduction};
pub use clip::{clip, ClipMode};
pub use grid::build_grid;
pub use intersection::trim_to_boundary;
pub use transform::{transform_coord, transform_feature_set, Srs};
