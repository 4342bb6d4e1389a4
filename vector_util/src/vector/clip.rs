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
use geo_types::{MultiPolygon, Rect};

use crate::error::{Result, VectorError};
use crate::feature_set::{FeatureSet, GeometrySeq};

/// The two readings of "clip".  Shapes are kept whole either way; this
/// is a subset operation, not a geometry cut.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClipMode {
    /// Keep shapes whose bounding box intersects the clip layer's extent
    /// rectangle.
    Extent,
    /// Keep shapes that intersect the clip layer's polygons.  The clip
    /// layer must be a polygon layer.
    Boundary,
}

fn shape_bbox(fs: &FeatureSet, i: usize) -> Option<Rect<f64>> {
    match &fs.shapes {
        GeometrySeq::Points(v) => Some(v[i].bounding_rect()),
        GeometrySeq::Lines(v) => v[i].bounding_rect(),
        GeometrySeq::Polygons(v) => v[i].bounding_rect(),
    }
}

fn shape_intersects(fs: &FeatureSet, i: usize, polys: &[MultiPolygon<f64>]) -> bool {
    match &fs.shapes {
        GeometrySeq::Points(v) => polys.iter().any(|p| p.intersects(&v[i])),
        GeometrySeq::Lines(v) => polys.iter().any(|p| p.intersects(&v[i])),
        GeometrySeq::Polygons(v) => polys.iter().any(|p| p.intersects(&v[i])),
    }
}

/// Subsets `a` to the shapes that fall on `b`, attribute rows following
/// their shapes.  Both layers must be in the same reference system.
pub fn clip(a: &FeatureSet, b: &FeatureSet, mode: ClipMode) -> Result<FeatureSet> {
    if a.srs != b.srs {
        return Err(VectorError::Format(format!(
            "clip layers are in different reference systems ({} vs {})",
            a.srs, b.srs
        )));
    }

    let keep: Vec<usize> = match mode {
        ClipMode::Extent => {
            let extent = b.extent().ok_or_else(|| {
                VectorError::Format("clip layer is empty, it has no extent".to_string())
            })?;
            (0..a.len())
                .filter(|&i| match shape_bbox(a, i) {
                    Some(bbox) => bbox.intersects(&extent),
                    None => false,
                })
                .collect()
        }
        ClipMode::Boundary => {
            let polys = b.polygons()?;
            //cheap bbox pretest, then the exact predicate
            let b_extent = b.extent();
            (0..a.len())
                .filter(|&i| {
                    let pre = match (shape_bbox(a, i), b_extent) {
                        (Some(bbox), Some(ext)) => bbox.intersects(&ext),
                        _ => false,
                    };
                    pre && shape_intersects(a, i, polys)
                })
                .collect()
        }
    };

    Ok(a.select(&keep))
}
