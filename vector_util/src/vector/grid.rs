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
use geo_types::{Coord, LineString, MultiPolygon, Polygon, Rect};

use crate::error::{Result, VectorError};
use crate::feature_set::{AttrValue, AttributeTable, Column, ColumnKind, FeatureSet, GeometrySeq};
use crate::util::get_index_width_len;
use crate::vector::transform::Srs;

/// Cell edge positions along one axis.  The outermost edges are pinned
/// to the extent bounds so the grid's bounding box is exactly the input
/// extent (naive min + i*step accumulates float error on the far edge).
fn edges(min: f64, max: f64, cells: usize) -> Vec<f64> {
    let span = max - min;
    let mut e: Vec<f64> = (0..=cells)
        .map(|i| min + span * i as f64 / cells as f64)
        .collect();
    e[0] = min;
    e[cells] = max;
    e
}

/// Tiles `extent` with a regular rows x cols polygon grid in `srs`.
/// Cells are emitted row major starting at the south west corner, with
/// `id` (zero padded label), `row` and `col` attributes.
pub fn build_grid(extent: Rect<f64>, rows: usize, cols: usize, srs: Srs) -> Result<FeatureSet> {
    if rows == 0 || cols == 0 {
        return Err(VectorError::Format(
            "grid needs at least one cell per axis".to_string(),
        ));
    }

    let xs = edges(extent.min().x, extent.max().x, cols);
    let ys = edges(extent.min().y, extent.max().y, rows);

    let id_width = get_index_width_len(rows * cols);

    let mut cells = Vec::with_capacity(rows * cols);
    let mut attr_rows = Vec::with_capacity(rows * cols);

    for row in 0..rows {
        for col in 0..cols {
            let (x0, x1) = (xs[col], xs[col + 1]);
            let (y0, y1) = (ys[row], ys[row + 1]);

            let ring = LineString::new(vec![
                Coord { x: x0, y: y0 },
                Coord { x: x1, y: y0 },
                Coord { x: x1, y: y1 },
                Coord { x: x0, y: y1 },
                Coord { x: x0, y: y0 },
            ]);
            cells.push(MultiPolygon::new(vec![Polygon::new(ring, Vec::new())]));

            let idx = row * cols + col;
            attr_rows.push(vec![
                AttrValue::Text(format!("c{:0width$}", idx, width = id_width)),
                AttrValue::Number(row as f64),
                AttrValue::Number(col as f64),
            ]);
        }
    }

    let table = AttributeTable::new(
        vec![
            Column::new("id", ColumnKind::Text),
            Column::new("row", ColumnKind::Number),
            Column::new("col", ColumnKind::Number),
        ],
        attr_rows,
    )?;

    FeatureSet::new(GeometrySeq::Polygons(cells), table, srs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_count_is_k_squared() {
        let extent = Rect::new(Coord { x: 0.0, y: 0.0 }, Coord { x: 10.0, y: 10.0 });
        let grid = build_grid(extent, 7, 7, Srs::LonLat).unwrap();
        assert_eq!(49, grid.len());
    }

    #[test]
    fn test_union_bbox_equals_extent() {
        //deliberately awkward bounds, the far edges must still land exactly
        let extent = Rect::new(
            Coord { x: 0.1, y: -3.3 },
            Coord { x: 0.3, y: 7.7 },
        );
        let grid = build_grid(extent, 9, 9, Srs::LonLat).unwrap();

        let bbox = grid.extent().unwrap();
        assert_eq!(extent.min(), bbox.min());
        assert_eq!(extent.max(), bbox.max());
    }

    #[test]
    fn test_row_col_attributes() {
        let extent = Rect::new(Coord { x: 0.0, y: 0.0 }, Coord { x: 4.0, y: 4.0 });
        let grid = build_grid(extent, 2, 2, Srs::LonLat).unwrap();

        //row major: last cell is row 1, col 1
        let last = grid.table.rows().last().unwrap();
        assert_eq!(AttrValue::Text("c3".to_string()), last[0]);
        assert_eq!(Some(1.0), last[1].as_f64());
        assert_eq!(Some(1.0), last[2].as_f64());
    }

    #[test]
    fn test_zero_cells_rejected() {
        let extent = Rect::new(Coord { x: 0.0, y: 0.0 }, Coord { x: 1.0, y: 1.0 });
        assert!(build_grid(extent, 0, 5, Srs::LonLat).is_err());
    }
}
