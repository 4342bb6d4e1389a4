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
use geo::Contains;
use geo_types::{Coord, LineString, MultiLineString, MultiPolygon, Point, Polygon};
use log::warn;
use shapefile::{PolygonRing, Shape};

use crate::error::{Result, VectorError};
use crate::feature_set::GeometrySeq;

/// The shapefile point flavors only differ by the M/Z payload, which the
/// pipeline flattens away.
trait Xy {
    fn xy(&self) -> Coord<f64>;
}

impl Xy for shapefile::Point {
    fn xy(&self) -> Coord<f64> {
        Coord { x: self.x, y: self.y }
    }
}

impl Xy for shapefile::PointM {
    fn xy(&self) -> Coord<f64> {
        Coord { x: self.x, y: self.y }
    }
}

impl Xy for shapefile::PointZ {
    fn xy(&self) -> Coord<f64> {
        Coord { x: self.x, y: self.y }
    }
}

fn polyline_to_geo<P: Xy>(parts: &[Vec<P>]) -> MultiLineString<f64> {
    MultiLineString::new(
        parts
            .iter()
            .map(|part| LineString::new(part.iter().map(Xy::xy).collect()))
            .collect(),
    )
}

fn polygon_to_geo<P: Xy>(rings: &[PolygonRing<P>]) -> MultiPolygon<f64> {
    let mut outers: Vec<LineString<f64>> = Vec::new();
    let mut inners: Vec<LineString<f64>> = Vec::new();

    for ring in rings {
        match ring {
            PolygonRing::Outer(pts) => {
                outers.push(LineString::new(pts.iter().map(Xy::xy).collect()))
            }
            PolygonRing::Inner(pts) => {
                inners.push(LineString::new(pts.iter().map(Xy::xy).collect()))
            }
        }
    }

    //some writers get the winding wrong and emit hole-only shapes
    if outers.is_empty() && !inners.is_empty() {
        warn!("polygon shape has only inner rings, treating them as outer rings");
        outers = std::mem::take(&mut inners);
    }

    let mut polys: Vec<(LineString<f64>, Vec<LineString<f64>>)> =
        outers.into_iter().map(|o| (o, Vec::new())).collect();

    for inner in inners {
        let probe = match inner.0.first() {
            Some(c) => Point::from(*c),
            None => continue,
        };

        let owner = if polys.len() == 1 {
            Some(0)
        } else {
            polys
                .iter()
                .position(|(o, _)| Polygon::new(o.clone(), Vec::new()).contains(&probe))
        };

        match owner {
            Some(i) => polys[i].1.push(inner),
            None => warn!("dropping hole ring with no enclosing outer ring"),
        }
    }

    MultiPolygon::new(
        polys
            .into_iter()
            .map(|(outer, holes)| Polygon::new(outer, holes))
            .collect(),
    )
}

/// Converts the shapes of one layer into a homogeneous geometry sequence.
/// Mixed or unsupported shape types are a Format error; M and Z
/// coordinates are flattened to 2-D.
pub fn shapes_to_geometry_seq(shapes: Vec<Shape>) -> Result<GeometrySeq> {
    let mut points: Vec<Point<f64>> = Vec::new();
    let mut lines: Vec<MultiLineString<f64>> = Vec::new();
    let mut polygons: Vec<MultiPolygon<f64>> = Vec::new();

    for (i, shape) in shapes.into_iter().enumerate() {
        match shape {
            Shape::Point(p) => points.push(Point::from(p.xy())),
            Shape::PointM(p) => points.push(Point::from(p.xy())),
            Shape::PointZ(p) => points.push(Point::from(p.xy())),

            Shape::Polyline(pl) => lines.push(polyline_to_geo(pl.parts())),
            Shape::PolylineM(pl) => lines.push(polyline_to_geo(pl.parts())),
            Shape::PolylineZ(pl) => lines.push(polyline_to_geo(pl.parts())),

            Shape::Polygon(pg) => polygons.push(polygon_to_geo(pg.rings())),
            Shape::PolygonM(pg) => polygons.push(polygon_to_geo(pg.rings())),
            Shape::PolygonZ(pg) => polygons.push(polygon_to_geo(pg.rings())),

            Shape::NullShape => {
                return Err(VectorError::Format(format!("null shape at index {}", i)))
            }
            _ => {
                return Err(VectorError::Format(format!(
                    "unsupported shape type at index {}",
                    i
                )))
            }
        }
    }

    let filled = [!points.is_empty(), !lines.is_empty(), !polygons.is_empty()];
    match filled.iter().filter(|&&f| f).count() {
        0 => Ok(GeometrySeq::Points(Vec::new())),
        1 => {
            if !points.is_empty() {
                Ok(GeometrySeq::Points(points))
            } else if !lines.is_empty() {
                Ok(GeometrySeq::Lines(lines))
            } else {
                Ok(GeometrySeq::Polygons(polygons))
            }
        }
        _ => Err(VectorError::Format(
            "mixed shape types in one layer".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(cx: f64, cy: f64, half: f64, clockwise: bool) -> Vec<shapefile::Point> {
        let mut pts = vec![
            shapefile::Point::new(cx - half, cy - half),
            shapefile::Point::new(cx - half, cy + half),
            shapefile::Point::new(cx + half, cy + half),
            shapefile::Point::new(cx + half, cy - half),
            shapefile::Point::new(cx - half, cy - half),
        ];
        if clockwise {
            //the ccw order above becomes cw when reversed
            pts.reverse();
        }
        pts
    }

    #[test]
    fn test_polygon_with_hole() {
        use geo::Area;

        let rings = vec![
            PolygonRing::Outer(square(0.0, 0.0, 10.0, true)),
            PolygonRing::Inner(square(0.0, 0.0, 2.0, false)),
        ];
        let mp = polygon_to_geo(&rings);

        assert_eq!(1, mp.0.len());
        assert_eq!(1, mp.0[0].interiors().len());
        //20x20 outer minus 4x4 hole
        assert!((mp.unsigned_area() - 384.0).abs() < 1e-9);
    }

    #[test]
    fn test_hole_assigned_to_enclosing_outer() {
        let rings = vec![
            PolygonRing::Outer(square(0.0, 0.0, 10.0, true)),
            PolygonRing::Outer(square(100.0, 0.0, 10.0, true)),
            PolygonRing::Inner(square(100.0, 0.0, 2.0, false)),
        ];
        let mp = polygon_to_geo(&rings);

        assert_eq!(2, mp.0.len());
        let with_hole: Vec<_> = mp.0.iter().filter(|p| !p.interiors().is_empty()).collect();
        assert_eq!(1, with_hole.len());
        //the hole belongs to the polygon around x=100
        assert!(with_hole[0].exterior().0.iter().any(|c| c.x > 50.0));
    }

    #[test]
    fn test_mixed_types_rejected() {
        let shapes = vec![
            Shape::Point(shapefile::Point::new(0.0, 0.0)),
            Shape::Polyline(shapefile::Polyline::new(vec![
                shapefile::Point::new(0.0, 0.0),
                shapefile::Point::new(1.0, 1.0),
            ])),
        ];
        assert!(matches!(
            shapes_to_geometry_seq(shapes),
            Err(VectorError::Format(_))
        ));
    }

    #[test]
    fn test_points_flattened() {
        let shapes = vec![
            Shape::PointZ(shapefile::PointZ::new(1.0, 2.0, 3.0, 4.0)),
            Shape::PointZ(shapefile::PointZ::new(5.0, 6.0, 7.0, 8.0)),
        ];
        match shapes_to_geometry_seq(shapes).unwrap() {
            GeometrySeq::Points(pts) => {
                assert_eq!(2, pts.len());
                assert_eq!(Point::new(1.0, 2.0), pts[0]);
            }
            _ => panic!("expected points"),
        }
    }
}
