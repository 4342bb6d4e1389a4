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
use geo::{BoundingRect, Intersects};
use geo_types::Point;
use rayon::prelude::*;
use rstar::{RTree, RTreeObject, AABB};

use crate::error::{Result, VectorError};
use crate::feature_set::{AttrValue, FeatureSet, GeometrySeq};

/// How matched features reduce to one value per polygon.
#[derive(Clone, Debug)]
pub enum Reduction {
    /// Number of features inside the polygon
    Count,
    /// Sum of a numeric column over the features inside the polygon
    Sum(String),
}

/// Polygon bounding box in the tree, payload is the polygon index
struct PolyEnvelope {
    envelope: AABB<[f64; 2]>,
    index: usize,
}

impl RTreeObject for PolyEnvelope {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// One representative coordinate per feature: the point itself, or a
/// line's first vertex.  Deterministic, so no feature is ever counted
/// twice.
fn representative_coords(fs: &FeatureSet) -> Result<Vec<[f64; 2]>> {
    match &fs.shapes {
        GeometrySeq::Points(v) => Ok(v.iter().map(|p| [p.x(), p.y()]).collect()),
        GeometrySeq::Lines(v) => v
            .iter()
            .enumerate()
            .map(|(i, ml)| {
                ml.0
                    .iter()
                    .flat_map(|ls| ls.0.first())
                    .next()
                    .map(|c| [c.x, c.y])
                    .ok_or_else(|| {
                        VectorError::Format(format!("line shape {} has no vertices", i))
                    })
            })
            .collect(),
        GeometrySeq::Polygons(_) => Err(VectorError::Format(
            "aggregation input must be a point or line layer".to_string(),
        )),
    }
}

/// Counts (or sums a column over) the features of `features` falling in
/// each polygon of `polygons`, returning one value per polygon in input
/// order.  Polygons with no matches come back as `Null`; run
/// `fill_null_with_zero` on the result column before rendering.
///
/// Assignment is boundary inclusive and single: a feature on a shared
/// edge goes to the polygon with the lowest index.
pub fn aggregate_into_polygons(
    features: &FeatureSet,
    polygons: &FeatureSet,
    reduction: &Reduction,
) -> Result<Vec<AttrValue>> {
    if features.srs != polygons.srs {
        return Err(VectorError::Format(format!(
            "aggregation layers are in different reference systems ({} vs {})",
            features.srs, polygons.srs
        )));
    }

    let polys = polygons.polygons()?;
    let reps = representative_coords(features)?;

    let feature_values: Option<Vec<Option<f64>>> = match reduction {
        Reduction::Count => None,
        Reduction::Sum(column) => Some(features.table.numeric_column(column)?),
    };

    let entries: Vec<PolyEnvelope> = polys
        .iter()
        .enumerate()
        .filter_map(|(index, mp)| {
            mp.bounding_rect().map(|r| PolyEnvelope {
                envelope: AABB::from_corners([r.min().x, r.min().y], [r.max().x, r.max().y]),
                index,
            })
        })
        .collect();
    let rtree = RTree::bulk_load(entries);

    //each feature picks its polygon independently, nothing shared is written
    let assignment: Vec<Option<usize>> = reps
        .par_iter()
        .map(|rep| {
            let pt = Point::new(rep[0], rep[1]);
            rtree
                .locate_in_envelope_intersecting(&AABB::from_point(*rep))
                .filter(|e| polys[e.index].intersects(&pt))
                .map(|e| e.index)
                .min()
        })
        .collect();

    let mut counts = vec![0u64; polys.len()];
    let mut sums = vec![0f64; polys.len()];

    for (fi, assigned) in assignment.iter().enumerate() {
        if let Some(pi) = *assigned {
            counts[pi] += 1;
            if let Some(values) = &feature_values {
                sums[pi] += values[fi].unwrap_or(0.0);
            }
        }
    }

    let out = (0..polys.len())
        .map(|pi| {
            if counts[pi] == 0 {
                AttrValue::Null
            } else {
                match reduction {
                    Reduction::Count => AttrValue::Number(counts[pi] as f64),
                    Reduction::Sum(_) => AttrValue::Number(sums[pi]),
                }
            }
        })
        .collect();

    Ok(out)
}
