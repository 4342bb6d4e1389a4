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

//! Conversions between the shapefile record types and the geo-types
//! structs the rest of the crate computes on.

mod geo_to_shp;
mod shp_to_geo;

pub use geo_to_shp::{multi_line_to_shp, multi_polygon_to_shp, point_to_shp};
pub use shp_to_geo::shapes_to_geometry_seq;
