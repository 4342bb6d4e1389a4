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
use std::fmt;

use geo_types::{Coord, LineString, MultiLineString, MultiPolygon, Point, Polygon};
use itertools::Itertools;

use crate::error::{Result, VectorError};
use crate::feature_set::{FeatureSet, GeometrySeq};

//WGS 84 ellipsoid
const A: f64 = 6_378_137.0;
const F: f64 = 1.0 / 298.257_223_563;
const E2: f64 = F * (2.0 - F);
const EP2: f64 = E2 / (1.0 - E2);
const K0: f64 = 0.9996;

const FALSE_EASTING: f64 = 500_000.0;
const FALSE_NORTHING_SOUTH: f64 = 10_000_000.0;

/// Supported reference systems, identified by EPSG code.
/// Everything else is an `UnsupportedProjection` error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Srs {
    /// EPSG:4326, WGS 84 geographic lon/lat degrees
    LonLat,
    /// EPSG:3857, spherical web mercator meters
    WebMercator,
    /// EPSG:326zz / 327zz, WGS 84 / UTM zone zz north or south
    Utm { zone: u8, north: bool },
}

impl Srs {
    pub fn from_epsg(code: u32) -> Result<Srs> {
        match code {
            4326 => Ok(Srs::LonLat),
            3857 => Ok(Srs::WebMercator),
            32601..=32660 => Ok(Srs::Utm {
                zone: (code - 32600) as u8,
                north: true,
            }),
            32701..=32760 => Ok(Srs::Utm {
                zone: (code - 32700) as u8,
                north: false,
            }),
            other => Err(VectorError::UnsupportedProjection(other)),
        }
    }

    pub fn epsg(&self) -> u32 {
        match self {
            Srs::LonLat => 4326,
            Srs::WebMercator => 3857,
            Srs::Utm { zone, north: true } => 32600 + *zone as u32,
            Srs::Utm { zone, north: false } => 32700 + *zone as u32,
        }
    }

    /// The UTM zone a lon/lat position falls in.
    pub fn utm_for(lon: f64, lat: f64) -> Srs {
        let zone = (((lon + 180.0) / 6.0).floor() as i32).clamp(0, 59) as u8 + 1;
        Srs::Utm {
            zone,
            north: lat >= 0.0,
        }
    }

    fn central_meridian(zone: u8) -> f64 {
        zone as f64 * 6.0 - 183.0
    }

    /// WKT for the .prj sidecar.
    pub fn prj_wkt(&self) -> String {
        const GEOGCS: &str = "GEOGCS[\"WGS 84\",DATUM[\"WGS_1984\",SPHEROID[\"WGS 84\",6378137,298.257223563,AUTHORITY[\"EPSG\",\"7030\"]],AUTHORITY[\"EPSG\",\"6326\"]],PRIMEM[\"Greenwich\",0,AUTHORITY[\"EPSG\",\"8901\"]],UNIT[\"degree\",0.0174532925199433,AUTHORITY[\"EPSG\",\"9122\"]],AUTHORITY[\"EPSG\",\"4326\"]]";

        match self {
            Srs::LonLat => GEOGCS.to_string(),
            Srs::WebMercator => format!(
                "PROJCS[\"WGS 84 / Pseudo-Mercator\",{},PROJECTION[\"Mercator_1SP\"],PARAMETER[\"central_meridian\",0],PARAMETER[\"scale_factor\",1],PARAMETER[\"false_easting\",0],PARAMETER[\"false_northing\",0],UNIT[\"metre\",1,AUTHORITY[\"EPSG\",\"9001\"]],AUTHORITY[\"EPSG\",\"3857\"]]",
                GEOGCS
            ),
            Srs::Utm { zone, north } => {
                let hemi = if *north { "N" } else { "S" };
                let false_northing = if *north { 0.0 } else { FALSE_NORTHING_SOUTH };
                format!(
                    "PROJCS[\"WGS 84 / UTM zone {z}{h}\",{g},PROJECTION[\"Transverse_Mercator\"],PARAMETER[\"latitude_of_origin\",0],PARAMETER[\"central_meridian\",{cm}],PARAMETER[\"scale_factor\",0.9996],PARAMETER[\"false_easting\",500000],PARAMETER[\"false_northing\",{fnorth}],UNIT[\"metre\",1,AUTHORITY[\"EPSG\",\"9001\"]],AUTHORITY[\"EPSG\",\"{code}\"]]",
                    z = zone,
                    h = hemi,
                    g = GEOGCS,
                    cm = Srs::central_meridian(*zone),
                    fnorth = false_northing,
                    code = self.epsg()
                )
            }
        }
    }
}

impl fmt::Display for Srs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Srs::LonLat => write!(f, "EPSG:4326 (WGS 84)"),
            Srs::WebMercator => write!(f, "EPSG:3857 (Web Mercator)"),
            Srs::Utm { zone, north } => write!(
                f,
                "EPSG:{} (UTM zone {}{})",
                self.epsg(),
                zone,
                if *north { "N" } else { "S" }
            ),
        }
    }
}

fn lonlat_to_mercator(c: Coord<f64>) -> Coord<f64> {
    let x = A * c.x.to_radians();
    let y = A * (std::f64::consts::FRAC_PI_4 + c.y.to_radians() / 2.0).tan().ln();
    Coord { x, y }
}

fn mercator_to_lonlat(c: Coord<f64>) -> Coord<f64> {
    let lon = (c.x / A).to_degrees();
    let lat = (2.0 * (c.y / A).exp().atan() - std::f64::consts::FRAC_PI_2).to_degrees();
    Coord { x: lon, y: lat }
}

/// Meridian arc length from the equator (Snyder 3-21).
fn meridian_arc(phi: f64) -> f64 {
    A * ((1.0 - E2 / 4.0 - 3.0 * E2 * E2 / 64.0 - 5.0 * E2 * E2 * E2 / 256.0) * phi
        - (3.0 * E2 / 8.0 + 3.0 * E2 * E2 / 32.0 + 45.0 * E2 * E2 * E2 / 1024.0)
            * (2.0 * phi).sin()
        + (15.0 * E2 * E2 / 256.0 + 45.0 * E2 * E2 * E2 / 1024.0) * (4.0 * phi).sin()
        - (35.0 * E2 * E2 * E2 / 3072.0) * (6.0 * phi).sin())
}

fn lonlat_to_utm(zone: u8, north: bool, c: Coord<f64>) -> Coord<f64> {
    let phi = c.y.to_radians();
    let lam = c.x.to_radians();
    let lam0 = Srs::central_meridian(zone).to_radians();

    let sin_phi = phi.sin();
    let cos_phi = phi.cos();
    let tan_phi = phi.tan();

    let n = A / (1.0 - E2 * sin_phi * sin_phi).sqrt();
    let t = tan_phi * tan_phi;
    let cc = EP2 * cos_phi * cos_phi;
    let aa = cos_phi * (lam - lam0);

    let a2 = aa * aa;
    let a3 = a2 * aa;
    let a4 = a3 * aa;
    let a5 = a4 * aa;
    let a6 = a5 * aa;

    let m = meridian_arc(phi);

    let x = K0
        * n
        * (aa
            + (1.0 - t + cc) * a3 / 6.0
            + (5.0 - 18.0 * t + t * t + 72.0 * cc - 58.0 * EP2) * a5 / 120.0)
        + FALSE_EASTING;

    let mut y = K0
        * (m + n
            * tan_phi
            * (a2 / 2.0
                + (5.0 - t + 9.0 * cc + 4.0 * cc * cc) * a4 / 24.0
                + (61.0 - 58.0 * t + t * t + 600.0 * cc - 330.0 * EP2) * a6 / 720.0));

    if !north {
        y += FALSE_NORTHING_SOUTH;
    }

    Coord { x, y }
}

fn utm_to_lonlat(zone: u8, north: bool, c: Coord<f64>) -> Coord<f64> {
    let x = c.x - FALSE_EASTING;
    let y = if north { c.y } else { c.y - FALSE_NORTHING_SOUTH };
    let lam0 = Srs::central_meridian(zone).to_radians();

    let m = y / K0;
    let mu = m / (A * (1.0 - E2 / 4.0 - 3.0 * E2 * E2 / 64.0 - 5.0 * E2 * E2 * E2 / 256.0));

    let e1 = (1.0 - (1.0 - E2).sqrt()) / (1.0 + (1.0 - E2).sqrt());

    //footpoint latitude (Snyder 3-26)
    let phi1 = mu
        + (3.0 * e1 / 2.0 - 27.0 * e1.powi(3) / 32.0) * (2.0 * mu).sin()
        + (21.0 * e1 * e1 / 16.0 - 55.0 * e1.powi(4) / 32.0) * (4.0 * mu).sin()
        + (151.0 * e1.powi(3) / 96.0) * (6.0 * mu).sin()
        + (1097.0 * e1.powi(4) / 512.0) * (8.0 * mu).sin();

    let sin1 = phi1.sin();
    let cos1 = phi1.cos();
    let tan1 = phi1.tan();

    let c1 = EP2 * cos1 * cos1;
    let t1 = tan1 * tan1;
    let n1 = A / (1.0 - E2 * sin1 * sin1).sqrt();
    let r1 = A * (1.0 - E2) / (1.0 - E2 * sin1 * sin1).powf(1.5);
    let d = x / (n1 * K0);

    let d2 = d * d;
    let d3 = d2 * d;
    let d4 = d3 * d;
    let d5 = d4 * d;
    let d6 = d5 * d;

    let phi = phi1
        - (n1 * tan1 / r1)
            * (d2 / 2.0
                - (5.0 + 3.0 * t1 + 10.0 * c1 - 4.0 * c1 * c1 - 9.0 * EP2) * d4 / 24.0
                + (61.0 + 90.0 * t1 + 298.0 * c1 + 45.0 * t1 * t1
                    - 252.0 * EP2
                    - 3.0 * c1 * c1)
                    * d6
                    / 720.0);

    let lam = lam0
        + (d - (1.0 + 2.0 * t1 + c1) * d3 / 6.0
            + (5.0 - 2.0 * c1 + 28.0 * t1 - 3.0 * c1 * c1 + 8.0 * EP2 + 24.0 * t1 * t1)
                * d5
                / 120.0)
            / cos1;

    Coord {
        x: lam.to_degrees(),
        y: phi.to_degrees(),
    }
}

fn to_lonlat(from: Srs, c: Coord<f64>) -> Coord<f64> {
    match from {
        Srs::LonLat => c,
        Srs::WebMercator => mercator_to_lonlat(c),
        Srs::Utm { zone, north } => utm_to_lonlat(zone, north, c),
    }
}

fn from_lonlat(to: Srs, c: Coord<f64>) -> Coord<f64> {
    match to {
        Srs::LonLat => c,
        Srs::WebMercator => lonlat_to_mercator(c),
        Srs::Utm { zone, north } => lonlat_to_utm(zone, north, c),
    }
}

/// Transforms one coordinate.  All pairs route through WGS 84.
pub fn transform_coord(from: Srs, to: Srs, c: Coord<f64>) -> Coord<f64> {
    if from == to {
        return c;
    }
    from_lonlat(to, to_lonlat(from, c))
}

fn transform_ring(from: Srs, to: Srs, ring: &LineString<f64>) -> LineString<f64> {
    LineString::new(
        ring.0
            .iter()
            .map(|c| transform_coord(from, to, *c))
            .collect(),
    )
}

fn transform_polygon(from: Srs, to: Srs, polygon: &Polygon<f64>) -> Polygon<f64> {
    let exterior = transform_ring(from, to, polygon.exterior());
    let interiors = polygon
        .interiors()
        .iter()
        .map(|ring| transform_ring(from, to, ring))
        .collect_vec();
    Polygon::new(exterior, interiors)
}

fn transform_multi_polygon(from: Srs, to: Srs, mp: &MultiPolygon<f64>) -> MultiPolygon<f64> {
    MultiPolygon::new(mp.0.iter().map(|p| transform_polygon(from, to, p)).collect())
}

fn transform_multi_line(from: Srs, to: Srs, ml: &MultiLineString<f64>) -> MultiLineString<f64> {
    MultiLineString::new(ml.0.iter().map(|l| transform_ring(from, to, l)).collect())
}

/// Reprojects every shape of a layer, vertex by vertex.
pub fn transform_feature_set(fs: &FeatureSet, target: Srs) -> FeatureSet {
    if fs.srs == target {
        return fs.clone();
    }

    let from = fs.srs;
    let shapes = match &fs.shapes {
        GeometrySeq::Points(v) => GeometrySeq::Points(
            v.iter()
                .map(|p| Point::from(transform_coord(from, target, p.0)))
                .collect(),
        ),
        GeometrySeq::Lines(v) => GeometrySeq::Lines(
            v.iter()
                .map(|l| transform_multi_line(from, target, l))
                .collect(),
        ),
        GeometrySeq::Polygons(v) => GeometrySeq::Polygons(
            v.iter()
                .map(|p| transform_multi_polygon(from, target, p))
                .collect(),
        ),
    };

    FeatureSet {
        shapes,
        table: fs.table.clone(),
        srs: target,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn test_from_epsg() {
        assert_eq!(Srs::LonLat, Srs::from_epsg(4326).unwrap());
        assert_eq!(Srs::WebMercator, Srs::from_epsg(3857).unwrap());
        assert_eq!(
            Srs::Utm { zone: 32, north: true },
            Srs::from_epsg(32632).unwrap()
        );
        assert_eq!(
            Srs::Utm { zone: 34, north: false },
            Srs::from_epsg(32734).unwrap()
        );

        assert!(matches!(
            Srs::from_epsg(2154),
            Err(VectorError::UnsupportedProjection(2154))
        ));
    }

    #[test]
    fn test_utm_for() {
        assert_eq!(Srs::Utm { zone: 31, north: true }, Srs::utm_for(3.7, 40.4));
        assert_eq!(Srs::Utm { zone: 34, north: false }, Srs::utm_for(18.4, -33.9));
    }

    #[test]
    fn test_mercator_known_value() {
        //one degree of longitude at the equator
        let m = transform_coord(Srs::LonLat, Srs::WebMercator, Coord { x: 1.0, y: 0.0 });
        assert!(approx_eq!(f64, 111_319.490_793_273_58, m.x, epsilon = 1e-3));
        assert!(approx_eq!(f64, 0.0, m.y, epsilon = 1e-6));
    }

    #[test]
    fn test_mercator_round_trip() {
        let orig = Coord { x: -3.703, y: 40.417 };
        let proj = transform_coord(Srs::LonLat, Srs::WebMercator, orig);
        let back = transform_coord(Srs::WebMercator, Srs::LonLat, proj);
        assert!(approx_eq!(f64, orig.x, back.x, epsilon = 1e-9));
        assert!(approx_eq!(f64, orig.y, back.y, epsilon = 1e-9));
    }

    #[test]
    fn test_utm_central_meridian_easting() {
        //on the central meridian of zone 31 the easting is exactly the false easting
        let utm = transform_coord(
            Srs::LonLat,
            Srs::Utm { zone: 31, north: true },
            Coord { x: 3.0, y: 45.0 },
        );
        assert!(approx_eq!(f64, 500_000.0, utm.x, epsilon = 1e-6));
        assert!(utm.y > 4_900_000.0 && utm.y < 5_100_000.0);
    }

    #[test]
    fn test_utm_round_trip_north() {
        let srs = Srs::Utm { zone: 32, north: true };
        let orig = Coord { x: 10.75, y: 59.91 };
        let back = transform_coord(srs, Srs::LonLat, transform_coord(Srs::LonLat, srs, orig));
        assert!(approx_eq!(f64, orig.x, back.x, epsilon = 1e-6));
        assert!(approx_eq!(f64, orig.y, back.y, epsilon = 1e-6));
    }

    #[test]
    fn test_utm_round_trip_south() {
        let srs = Srs::Utm { zone: 34, north: false };
        let orig = Coord { x: 18.42, y: -33.92 };
        let proj = transform_coord(Srs::LonLat, srs, orig);
        //southern hemisphere carries the 10,000 km false northing
        assert!(proj.y > 6_000_000.0 && proj.y < FALSE_NORTHING_SOUTH);
        let back = transform_coord(srs, Srs::LonLat, proj);
        assert!(approx_eq!(f64, orig.x, back.x, epsilon = 1e-6));
        assert!(approx_eq!(f64, orig.y, back.y, epsilon = 1e-6));
    }

    #[test]
    fn test_transform_feature_set_polygons() {
        use crate::feature_set::AttributeTable;
        use geo_types::polygon;

        let poly = polygon![
            (x: -3.8, y: 40.3),
            (x: -3.6, y: 40.3),
            (x: -3.6, y: 40.5),
            (x: -3.8, y: 40.5),
        ];
        let fs = FeatureSet::new(
            GeometrySeq::Polygons(vec![MultiPolygon::new(vec![poly])]),
            AttributeTable::empty(1),
            Srs::LonLat,
        )
        .unwrap();

        let merc = transform_feature_set(&fs, Srs::WebMercator);
        assert_eq!(Srs::WebMercator, merc.srs);
        assert_eq!(1, merc.len());

        let back = transform_feature_set(&merc, Srs::LonLat);
        let orig_extent = fs.extent().unwrap();
        let back_extent = back.extent().unwrap();
        assert!(approx_eq!(f64, orig_extent.min().x, back_extent.min().x, epsilon = 1e-9));
        assert!(approx_eq!(f64, orig_extent.max().y, back_extent.max().y, epsilon = 1e-9));
    }
}
