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
use geo_types::{Coord, LineString, MultiLineString, MultiPolygon, Point};
use shapefile::PolygonRing;

use crate::error::{Result, VectorError};

pub fn point_to_shp(p: &Point<f64>) -> shapefile::Point {
    shapefile::Point::new(p.x(), p.y())
}

pub fn multi_line_to_shp(ml: &MultiLineString<f64>) -> Result<shapefile::Polyline> {
    let parts: Vec<Vec<shapefile::Point>> = ml
        .0
        .iter()
        .filter(|ls| !ls.0.is_empty())
        .map(|ls| {
            ls.0
                .iter()
                .map(|c| shapefile::Point::new(c.x, c.y))
                .collect()
        })
        .collect();

    if parts.is_empty() {
        return Err(VectorError::Format("cannot write an empty line shape".to_string()));
    }

    Ok(shapefile::Polyline::with_parts(parts))
}

/// Shoelace area, positive for counter clockwise rings.
fn ring_signed_area(coords: &[Coord<f64>]) -> f64 {
    let mut sum = 0.0;
    for w in coords.windows(2) {
        sum += w[0].x * w[1].y - w[1].x * w[0].y;
    }
    sum / 2.0
}

/// Closes the ring and forces the winding the shapefile format wants
/// (outer rings clockwise, holes counter clockwise).
fn ring_points(ring: &LineString<f64>, clockwise: bool) -> Vec<shapefile::Point> {
    let mut coords: Vec<Coord<f64>> = ring.0.clone();
    if let (Some(first), Some(last)) = (coords.first().copied(), coords.last().copied()) {
        if first != last {
            coords.push(first);
        }
    }

    let area = ring_signed_area(&coords);
    if (clockwise && area > 0.0) || (!clockwise && area < 0.0) {
        coords.reverse();
    }

    coords
        .into_iter()
        .map(|c| shapefile::Point::new(c.x, c.y))
        .collect()
}

pub fn multi_polygon_to_shp(mp: &MultiPolygon<f64>) -> Result<shapefile::Polygon> {
    let mut rings = Vec::new();

    for poly in &mp.0 {
        let exterior = ring_points(poly.exterior(), true);
        if exterior.len() < 4 {
            continue;
        }
        rings.push(PolygonRing::Outer(exterior));

        for hole in poly.interiors() {
            let pts = ring_points(hole, false);
            if pts.len() >= 4 {
                rings.push(PolygonRing::Inner(pts));
            }
        }
    }

    if rings.is_empty() {
        return Err(VectorError::Format("cannot write an empty polygon shape".to_string()));
    }

    Ok(shapefile::Polygon::with_rings(rings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::polygon;

    #[test]
    fn test_ring_signed_area() {
        //counter clockwise unit square
        let ccw = vec![
            Coord { x: 0.0, y: 0.0 },
            Coord { x: 1.0, y: 0.0 },
            Coord { x: 1.0, y: 1.0 },
            Coord { x: 0.0, y: 1.0 },
            Coord { x: 0.0, y: 0.0 },
        ];
        assert!(ring_signed_area(&ccw) > 0.0);

        let cw: Vec<Coord<f64>> = ccw.iter().rev().copied().collect();
        assert!(ring_signed_area(&cw) < 0.0);
    }

    #[test]
    fn test_outer_ring_forced_clockwise() {
        //geo convention is a ccw exterior; the written ring must be cw
        let poly = polygon![
            (x: 0.0, y: 0.0),
            (x: 2.0, y: 0.0),
            (x: 2.0, y: 2.0),
            (x: 0.0, y: 2.0),
        ];
        let shp = multi_polygon_to_shp(&MultiPolygon::new(vec![poly])).unwrap();

        match &shp.rings()[0] {
            PolygonRing::Outer(pts) => {
                let coords: Vec<Coord<f64>> =
                    pts.iter().map(|p| Coord { x: p.x, y: p.y }).collect();
                assert!(ring_signed_area(&coords) < 0.0);
                //closed ring
                assert_eq!(coords.first(), coords.last());
            }
            PolygonRing::Inner(_) => panic!("expected an outer ring"),
        }
    }

    #[test]
    fn test_empty_polygon_rejected() {
        let mp: MultiPolygon<f64> = MultiPolygon::new(Vec::new());
        assert!(multi_polygon_to_shp(&mp).is_err());
    }
}
