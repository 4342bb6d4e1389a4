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
use std::fs::{create_dir_all, remove_file};
use std::path::{Path, PathBuf};

use log::warn;
use shapefile::dbase::{FieldName, FieldValue, Record, TableWriterBuilder};

use crate::convert::{multi_line_to_shp, multi_polygon_to_shp, point_to_shp};
use crate::error::{Result, VectorError};
use crate::feature_set::{AttrValue, AttributeTable, ColumnKind, FeatureSet, GeometrySeq};

//dbf needs at least one field; layers with an empty table get this one
const SYNTHETIC_FID: &str = "fid";

fn field_name(name: &str) -> Result<FieldName> {
    FieldName::try_from(name)
        .map_err(|e| VectorError::Format(format!("bad column name {}: {:?}", name, e)))
}

fn text_width(table: &AttributeTable, column: usize) -> u8 {
    let max = table
        .rows()
        .iter()
        .map(|r| match &r[column] {
            AttrValue::Text(s) => s.len(),
            _ => 0,
        })
        .max()
        .unwrap_or(0);
    max.clamp(1, 254) as u8
}

fn record_for(table: &AttributeTable, row: usize) -> Record {
    let mut record = Record::default();

    if table.columns().is_empty() {
        record.insert(
            SYNTHETIC_FID.to_string(),
            FieldValue::Numeric(Some(row as f64)),
        );
        return record;
    }

    for (ci, column) in table.columns().iter().enumerate() {
        let value = &table.rows()[row][ci];
        let field = match (column.kind, value) {
            (ColumnKind::Text, AttrValue::Text(s)) => FieldValue::Character(Some(s.clone())),
            (ColumnKind::Text, AttrValue::Number(n)) => {
                FieldValue::Character(Some(n.to_string()))
            }
            (ColumnKind::Text, AttrValue::Null) => FieldValue::Character(None),
            (ColumnKind::Number, AttrValue::Number(n)) => FieldValue::Numeric(Some(*n)),
            (ColumnKind::Number, AttrValue::Null) => FieldValue::Numeric(None),
            (ColumnKind::Number, AttrValue::Text(s)) => {
                warn!("text value {:?} in numeric column {}", s, column.name);
                FieldValue::Numeric(s.parse().ok())
            }
        };
        record.insert(column.name.clone(), field);
    }

    record
}

fn component_paths(dir: &Path, layer: &str) -> Vec<PathBuf> {
    ["shp", "shx", "dbf", "prj"]
        .iter()
        .map(|ext| dir.join(format!("{}.{}", layer, ext)))
        .collect()
}

/// Writes a `FeatureSet` as `dir/layer.shp|.shx|.dbf|.prj`.
///
/// Any component already on disk fails with AlreadyExists unless
/// `overwrite` is set, in which case stale components are removed first.
pub fn write_layer(fs: &FeatureSet, dir: &Path, layer: &str, overwrite: bool) -> Result<()> {
    create_dir_all(dir)?;

    let components = component_paths(dir, layer);
    for p in &components {
        if p.exists() {
            if !overwrite {
                return Err(VectorError::AlreadyExists(p.clone()));
            }
            remove_file(p)?;
        }
    }

    let mut builder = TableWriterBuilder::new();
    if fs.table.columns().is_empty() {
        builder = builder.add_numeric_field(field_name(SYNTHETIC_FID)?, 18, 0);
    } else {
        for (ci, column) in fs.table.columns().iter().enumerate() {
            builder = match column.kind {
                ColumnKind::Text => {
                    builder.add_character_field(field_name(&column.name)?, text_width(&fs.table, ci))
                }
                ColumnKind::Number => builder.add_numeric_field(field_name(&column.name)?, 18, 6),
            };
        }
    }

    let shp_path = dir.join(format!("{}.shp", layer));
    let mut writer = shapefile::Writer::from_path(&shp_path, builder)?;

    match &fs.shapes {
        GeometrySeq::Points(points) => {
            for (i, p) in points.iter().enumerate() {
                writer.write_shape_and_record(&point_to_shp(p), &record_for(&fs.table, i))?;
            }
        }
        GeometrySeq::Lines(lines) => {
            for (i, l) in lines.iter().enumerate() {
                writer.write_shape_and_record(&multi_line_to_shp(l)?, &record_for(&fs.table, i))?;
            }
        }
        GeometrySeq::Polygons(polygons) => {
            for (i, p) in polygons.iter().enumerate() {
                writer
                    .write_shape_and_record(&multi_polygon_to_shp(p)?, &record_for(&fs.table, i))?;
            }
        }
    }
    drop(writer);

    let prj_path = dir.join(format!("{}.prj", layer));
    std::fs::write(&prj_path, fs.srs.prj_wkt())?;

    Ok(())
}
