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
use std::time::Instant;

use geo::{BooleanOps, BoundingRect, Contains, Intersects};
use geo_types::{MultiPolygon, Polygon};

use crate::error::{Result, VectorError};
use crate::feature_set::{FeatureSet, GeometrySeq};
use crate::util::print_remaining_time;

/// Trims a polygon layer (typically grid cells) to an irregular
/// boundary:
/// - cells fully inside the boundary are kept untouched
/// - cells disjoint from the boundary are dropped
/// - straddling cells are replaced by their boolean intersection
///
/// Attribute rows follow the surviving cells.
pub fn trim_to_boundary(cells: &FeatureSet, boundary: &FeatureSet) -> Result<FeatureSet> {
    if cells.srs != boundary.srs {
        return Err(VectorError::Format(format!(
            "layers are in different reference systems ({} vs {})",
            cells.srs, boundary.srs
        )));
    }

    let cell_polys = cells.polygons()?;
    let boundary_mp = MultiPolygon::new(
        boundary
            .polygons()?
            .iter()
            .flat_map(|mp| mp.0.iter().cloned())
            .collect::<Vec<Polygon<f64>>>(),
    );
    if boundary_mp.0.is_empty() {
        return Err(VectorError::Format("boundary layer is empty".to_string()));
    }
    let boundary_bbox = boundary_mp.bounding_rect();

    let now = Instant::now();
    let mut last_output = Instant::now();

    let mut keep: Vec<usize> = Vec::new();
    let mut trimmed: Vec<MultiPolygon<f64>> = Vec::new();

    for (i, cell) in cell_polys.iter().enumerate() {
        if last_output.elapsed().as_secs() >= 3 {
            last_output = Instant::now();
            print_remaining_time(&now, i as u32, cell_polys.len() as u32);
        }

        let bbox_hit = match (cell.bounding_rect(), boundary_bbox) {
            (Some(c), Some(b)) => c.intersects(&b),
            _ => false,
        };
        if !bbox_hit || !boundary_mp.intersects(cell) {
            continue;
        }

        if boundary_mp.contains(cell) {
            //fully inside, keep the cell bit for bit
            keep.push(i);
            trimmed.push(cell.clone());
            continue;
        }

        let clipped = boundary_mp.intersection(cell);
        if !clipped.0.is_empty() {
            keep.push(i);
            trimmed.push(clipped);
        }
    }

    FeatureSet::new(
        GeometrySeq::Polygons(trimmed),
        cells.table.select_rows(&keep),
        cells.srs,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;
    use geo::Area;
    use geo_types::{Coord, Rect};

    use crate::vector::grid::build_grid;
    use crate::vector::transform::Srs;
    use crate::feature_set::AttributeTable;

    fn triangle_boundary() -> FeatureSet {
        //right triangle over the lower left half of [0,4]x[0,4]
        let tri = Polygon::new(
            geo_types::LineString::new(vec![
                Coord { x: 0.0, y: 0.0 },
                Coord { x: 4.0, y: 0.0 },
                Coord { x: 0.0, y: 4.0 },
                Coord { x: 0.0, y: 0.0 },
            ]),
            Vec::new(),
        );
        FeatureSet::new(
            GeometrySeq::Polygons(vec![MultiPolygon::new(vec![tri])]),
            AttributeTable::empty(1),
            Srs::LonLat,
        )
        .unwrap()
    }

    #[test]
    fn test_trim_grid_to_triangle() {
        let extent = Rect::new(Coord { x: 0.0, y: 0.0 }, Coord { x: 4.0, y: 4.0 });
        let grid = build_grid(extent, 4, 4, Srs::LonLat).unwrap();
        let boundary = triangle_boundary();

        let trimmed = trim_to_boundary(&grid, &boundary).unwrap();

        //the far corner cells are gone entirely
        assert!(trimmed.len() < grid.len());

        //total area now matches the triangle
        let total: f64 = trimmed
            .polygons()
            .unwrap()
            .iter()
            .map(|mp| mp.unsigned_area())
            .sum();
        assert!(approx_eq!(f64, 8.0, total, epsilon = 1e-6));
    }

    #[test]
    fn test_inside_cells_unchanged() {
        let extent = Rect::new(Coord { x: 0.0, y: 0.0 }, Coord { x: 4.0, y: 4.0 });
        let grid = build_grid(extent, 4, 4, Srs::LonLat).unwrap();
        let boundary = triangle_boundary();

        let trimmed = trim_to_boundary(&grid, &boundary).unwrap();

        //cell (row 0, col 0) spans [0,1]x[0,1], strictly inside the
        //triangle, and must come through coordinate for coordinate
        let id0 = trimmed
            .table
            .rows()
            .iter()
            .position(|r| r[1].as_f64() == Some(0.0) && r[2].as_f64() == Some(0.0))
            .unwrap();
        let original = &grid.polygons().unwrap()[0];
        let kept = &trimmed.polygons().unwrap()[id0];
        assert_eq!(original, kept);
    }

    #[test]
    fn test_outside_cells_dropped() {
        let extent = Rect::new(Coord { x: 0.0, y: 0.0 }, Coord { x: 4.0, y: 4.0 });
        let grid = build_grid(extent, 4, 4, Srs::LonLat).unwrap();
        let boundary = triangle_boundary();

        let trimmed = trim_to_boundary(&grid, &boundary).unwrap();

        //cell (3,3) spans [3,4]x[3,4], disjoint from the triangle
        assert!(!trimmed
            .table
            .rows()
            .iter()
            .any(|r| r[1].as_f64() == Some(3.0) && r[2].as_f64() == Some(3.0)));
    }
}
