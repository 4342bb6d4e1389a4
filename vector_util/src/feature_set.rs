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
use geo::BoundingRect;
use geo_types::{MultiLineString, MultiPolygon, Point, Rect};

use crate::error::{Result, VectorError};
use crate::vector::transform::Srs;

/// One attribute cell.  `Null` is what an aggregation writes for a polygon
/// with no matches; it must be normalized away before rendering/export.
#[derive(Clone, Debug, PartialEq)]
pub enum AttrValue {
    Text(String),
    Number(f64),
    Null,
}

impl AttrValue {
    pub fn is_null(&self) -> bool {
        matches!(self, AttrValue::Null)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttrValue::Number(n) => Some(*n),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Number,
}

#[derive(Clone, Debug)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
}

impl Column {
    pub fn new<S: Into<String>>(name: S, kind: ColumnKind) -> Self {
        Column { name: name.into(), kind }
    }
}

/// Row-per-shape attribute table.  Invariant: every row has exactly
/// `columns.len()` values, and row i describes shape i of the owning
/// `FeatureSet`.
#[derive(Clone, Debug)]
pub struct AttributeTable {
    columns: Vec<Column>,
    rows: Vec<Vec<AttrValue>>,
}

impl AttributeTable {
    pub fn new(columns: Vec<Column>, rows: Vec<Vec<AttrValue>>) -> Result<Self> {
        for (i, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(VectorError::Format(format!(
                    "attribute row {} has {} values, expected {}",
                    i,
                    row.len(),
                    columns.len()
                )));
            }
        }
        Ok(AttributeTable { columns, rows })
    }

    /// A table with no columns and `len` empty rows.
    pub fn empty(len: usize) -> Self {
        AttributeTable {
            columns: Vec::new(),
            rows: vec![Vec::new(); len],
        }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<AttrValue>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name)
            .ok_or_else(|| VectorError::Format(format!("no column named {}", name)))
    }

    pub fn value(&self, row: usize, name: &str) -> Result<&AttrValue> {
        let ci = self.require_column(name)?;
        Ok(&self.rows[row][ci])
    }

    /// Values of a numeric column; `Null` cells come back as `None`.
    pub fn numeric_column(&self, name: &str) -> Result<Vec<Option<f64>>> {
        let ci = self.require_column(name)?;
        if self.columns[ci].kind != ColumnKind::Number {
            return Err(VectorError::Format(format!("column {} is not numeric", name)));
        }
        Ok(self.rows.iter().map(|r| r[ci].as_f64()).collect())
    }

    /// Appends a column.  Value count must match the row count.
    pub fn push_column(&mut self, column: Column, values: Vec<AttrValue>) -> Result<()> {
        if values.len() != self.rows.len() {
            return Err(VectorError::Format(format!(
                "column {} has {} values for {} rows",
                column.name,
                values.len(),
                self.rows.len()
            )));
        }
        self.columns.push(column);
        for (row, v) in self.rows.iter_mut().zip(values) {
            row.push(v);
        }
        Ok(())
    }

    /// Replaces `Null` with 0 in the named numeric column, returning how
    /// many cells were touched.  Aggregation results go through this before
    /// rendering or export.
    pub fn fill_null_with_zero(&mut self, name: &str) -> Result<usize> {
        let ci = self.require_column(name)?;
        if self.columns[ci].kind != ColumnKind::Number {
            return Err(VectorError::Format(format!("column {} is not numeric", name)));
        }
        let mut filled = 0;
        for row in self.rows.iter_mut() {
            if row[ci].is_null() {
                row[ci] = AttrValue::Number(0.0);
                filled += 1;
            }
        }
        Ok(filled)
    }

    /// New table containing the given rows, in the given order.
    pub fn select_rows(&self, keep: &[usize]) -> AttributeTable {
        AttributeTable {
            columns: self.columns.clone(),
            rows: keep.iter().map(|&i| self.rows[i].clone()).collect(),
        }
    }
}

/// The shapes of one layer.  One collection holds one geometry type;
/// multi variants cover the single case too.
#[derive(Clone, Debug)]
pub enum GeometrySeq {
    Points(Vec<Point<f64>>),
    Lines(Vec<MultiLineString<f64>>),
    Polygons(Vec<MultiPolygon<f64>>),
}

fn merge_rect(acc: Option<Rect<f64>>, r: Rect<f64>) -> Option<Rect<f64>> {
    match acc {
        None => Some(r),
        Some(a) => {
            let min = geo_types::coord! {
                x: a.min().x.min(r.min().x),
                y: a.min().y.min(r.min().y),
            };
            let max = geo_types::coord! {
                x: a.max().x.max(r.max().x),
                y: a.max().y.max(r.max().y),
            };
            Some(Rect::new(min, max))
        }
    }
}

impl GeometrySeq {
    pub fn len(&self) -> usize {
        match self {
            GeometrySeq::Points(v) => v.len(),
            GeometrySeq::Lines(v) => v.len(),
            GeometrySeq::Polygons(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            GeometrySeq::Points(_) => "point",
            GeometrySeq::Lines(_) => "line",
            GeometrySeq::Polygons(_) => "polygon",
        }
    }

    /// Minimal axis aligned rectangle containing every shape, None when
    /// the collection is empty.
    pub fn extent(&self) -> Option<Rect<f64>> {
        let mut acc = None;
        match self {
            GeometrySeq::Points(v) => {
                for p in v {
                    acc = merge_rect(acc, p.bounding_rect());
                }
            }
            GeometrySeq::Lines(v) => {
                for l in v {
                    if let Some(r) = l.bounding_rect() {
                        acc = merge_rect(acc, r);
                    }
                }
            }
            GeometrySeq::Polygons(v) => {
                for p in v {
                    if let Some(r) = p.bounding_rect() {
                        acc = merge_rect(acc, r);
                    }
                }
            }
        }
        acc
    }
}

/// A layer in memory: shapes, the attribute row per shape, and the
/// reference system every coordinate is expressed in.
#[derive(Clone, Debug)]
pub struct FeatureSet {
    pub shapes: GeometrySeq,
    pub table: AttributeTable,
    pub srs: Srs,
}

impl FeatureSet {
    pub fn new(shapes: GeometrySeq, table: AttributeTable, srs: Srs) -> Result<Self> {
        if shapes.len() != table.len() {
            return Err(VectorError::Format(format!(
                "{} shapes but {} attribute rows",
                shapes.len(),
                table.len()
            )));
        }
        Ok(FeatureSet { shapes, table, srs })
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn extent(&self) -> Option<Rect<f64>> {
        self.shapes.extent()
    }

    /// The polygon shapes, or a Format error when the layer is not a
    /// polygon layer.
    pub fn polygons(&self) -> Result<&[MultiPolygon<f64>]> {
        match &self.shapes {
            GeometrySeq::Polygons(v) => Ok(v),
            other => Err(VectorError::Format(format!(
                "expected a polygon layer, got a {} layer",
                other.kind_name()
            ))),
        }
    }

    /// Subset by shape index, attribute rows follow their shapes.
    pub fn select(&self, keep: &[usize]) -> FeatureSet {
        let shapes = match &self.shapes {
            GeometrySeq::Points(v) => {
                GeometrySeq::Points(keep.iter().map(|&i| v[i]).collect())
            }
            GeometrySeq::Lines(v) => {
                GeometrySeq::Lines(keep.iter().map(|&i| v[i].clone()).collect())
            }
            GeometrySeq::Polygons(v) => {
                GeometrySeq::Polygons(keep.iter().map(|&i| v[i].clone()).collect())
            }
        };
        FeatureSet {
            shapes,
            table: self.table.select_rows(keep),
            srs: self.srs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::coord;

    #[test]
    fn test_row_width_checked() {
        let columns = vec![Column::new("name", ColumnKind::Text)];
        let rows = vec![vec![
            AttrValue::Text("a".to_string()),
            AttrValue::Number(1.0),
        ]];
        assert!(AttributeTable::new(columns, rows).is_err());
    }

    #[test]
    fn test_shape_row_count_checked() {
        let shapes = GeometrySeq::Points(vec![Point::new(0.0, 0.0)]);
        let table = AttributeTable::empty(2);
        assert!(FeatureSet::new(shapes, table, Srs::LonLat).is_err());
    }

    #[test]
    fn test_fill_null_with_zero() {
        let mut table = AttributeTable::new(
            vec![Column::new("count", ColumnKind::Number)],
            vec![
                vec![AttrValue::Number(3.0)],
                vec![AttrValue::Null],
                vec![AttrValue::Null],
            ],
        )
        .unwrap();

        let filled = table.fill_null_with_zero("count").unwrap();
        assert_eq!(2, filled);
        assert!(table.rows().iter().all(|r| !r[0].is_null()));
        assert_eq!(Some(0.0), table.rows()[1][0].as_f64());
    }

    #[test]
    fn test_extent_merges_shapes() {
        let shapes = GeometrySeq::Points(vec![
            Point::new(1.0, 5.0),
            Point::new(-2.0, 3.0),
            Point::new(4.0, -1.0),
        ]);
        let extent = shapes.extent().unwrap();
        assert_eq!(extent.min(), coord! { x: -2.0, y: -1.0 });
        assert_eq!(extent.max(), coord! { x: 4.0, y: 5.0 });
    }

    #[test]
    fn test_select_keeps_rows_with_shapes() {
        let shapes = GeometrySeq::Points(vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(2.0, 2.0),
        ]);
        let table = AttributeTable::new(
            vec![Column::new("id", ColumnKind::Number)],
            vec![
                vec![AttrValue::Number(0.0)],
                vec![AttrValue::Number(1.0)],
                vec![AttrValue::Number(2.0)],
            ],
        )
        .unwrap();
        let fs = FeatureSet::new(shapes, table, Srs::LonLat).unwrap();

        let sub = fs.select(&[2, 0]);
        assert_eq!(2, sub.len());
        assert_eq!(Some(2.0), sub.table.rows()[0][0].as_f64());
        assert_eq!(Some(0.0), sub.table.rows()[1][0].as_f64());
    }
}
