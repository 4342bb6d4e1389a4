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
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use log::warn;
use shapefile::dbase::FieldValue;

use crate::convert::shapes_to_geometry_seq;
use crate::error::{Result, VectorError};
use crate::feature_set::{AttrValue, AttributeTable, Column, ColumnKind, FeatureSet};
use crate::io::prj::srs_from_wkt;
use crate::vector::transform::Srs;

fn attr_from_field(value: FieldValue) -> AttrValue {
    match value {
        FieldValue::Character(Some(s)) => AttrValue::Text(s.trim().to_string()),
        FieldValue::Character(None) => AttrValue::Null,
        FieldValue::Numeric(Some(n)) => AttrValue::Number(n),
        FieldValue::Numeric(None) => AttrValue::Null,
        FieldValue::Float(Some(f)) => AttrValue::Number(f as f64),
        FieldValue::Float(None) => AttrValue::Null,
        FieldValue::Logical(Some(b)) => AttrValue::Text(b.to_string()),
        FieldValue::Logical(None) => AttrValue::Null,
        FieldValue::Date(Some(d)) => {
            AttrValue::Text(format!("{:04}-{:02}-{:02}", d.year(), d.month(), d.day()))
        }
        FieldValue::Date(None) => AttrValue::Null,
        other => {
            warn!("unsupported dbase value {:?}, reading as null", other);
            AttrValue::Null
        }
    }
}

fn kind_of(value: &AttrValue) -> ColumnKind {
    match value {
        AttrValue::Number(_) => ColumnKind::Number,
        _ => ColumnKind::Text,
    }
}

fn read_srs(dir: &Path, layer: &str) -> Srs {
    let prj_path = dir.join(format!("{}.prj", layer));
    if !prj_path.exists() {
        warn!("{:?} has no .prj, assuming EPSG:4326", prj_path);
        return Srs::LonLat;
    }

    match std::fs::read_to_string(&prj_path) {
        Ok(wkt) => srs_from_wkt(&wkt).unwrap_or_else(|| {
            warn!("unrecognized .prj in {:?}, assuming EPSG:4326", prj_path);
            Srs::LonLat
        }),
        Err(e) => {
            warn!("could not read {:?} ({}), assuming EPSG:4326", prj_path, e);
            Srs::LonLat
        }
    }
}

/// Reads `dir/layer.shp` + sidecars into a `FeatureSet`.
///
/// Missing component files are a NotFound error; mixed or unsupported
/// shape types and malformed dBASE content are Format errors.  Column
/// order follows sorted field names (the dbase record iterator has no
/// stable order of its own).
pub fn read_layer(dir: &Path, layer: &str) -> Result<FeatureSet> {
    for ext in ["shp", "shx", "dbf"] {
        let p = dir.join(format!("{}.{}", layer, ext));
        if !p.exists() {
            return Err(VectorError::NotFound(p));
        }
    }

    let shp_path = dir.join(format!("{}.shp", layer));
    let mut reader = shapefile::Reader::from_path(&shp_path)?;

    let mut shapes = Vec::new();
    let mut raw_rows: Vec<BTreeMap<String, AttrValue>> = Vec::new();

    for pair in reader.iter_shapes_and_records() {
        let (shape, record) = pair?;
        shapes.push(shape);

        let mut row = BTreeMap::new();
        for (name, value) in record {
            row.insert(name, attr_from_field(value));
        }
        raw_rows.push(row);
    }

    let seq = shapes_to_geometry_seq(shapes)?;

    let mut names: BTreeSet<String> = BTreeSet::new();
    for row in &raw_rows {
        names.extend(row.keys().cloned());
    }

    let columns: Vec<Column> = names
        .into_iter()
        .map(|name| {
            let kind = raw_rows
                .iter()
                .find_map(|r| r.get(&name).filter(|v| !v.is_null()))
                .map(kind_of)
                .unwrap_or(ColumnKind::Text);
            Column::new(name, kind)
        })
        .collect();

    let rows: Vec<Vec<AttrValue>> = raw_rows
        .into_iter()
        .map(|mut r| {
            columns
                .iter()
                .map(|c| r.remove(&c.name).unwrap_or(AttrValue::Null))
                .collect()
        })
        .collect();

    let table = AttributeTable::new(columns, rows)?;
    let srs = read_srs(dir, layer);

    FeatureSet::new(seq, table, srs)
}
