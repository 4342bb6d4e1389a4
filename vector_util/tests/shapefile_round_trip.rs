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
use float_cmp::approx_eq;
use geo::Area;
use geo_types::{polygon, MultiPolygon, Point};

use vector_util::io::{read_layer, write_layer};
use vector_util::vector::transform::Srs;
use vector_util::{AttrValue, AttributeTable, Column, ColumnKind, FeatureSet, GeometrySeq, VectorError};

fn district_layer() -> FeatureSet {
    let a = MultiPolygon::new(vec![polygon![
        (x: -3.80, y: 40.30),
        (x: -3.70, y: 40.30),
        (x: -3.70, y: 40.40),
        (x: -3.80, y: 40.40),
    ]]);
    let b = MultiPolygon::new(vec![polygon![
        (x: -3.70, y: 40.30),
        (x: -3.60, y: 40.30),
        (x: -3.60, y: 40.40),
        (x: -3.70, y: 40.40),
    ]]);

    let table = AttributeTable::new(
        vec![
            Column::new("name", ColumnKind::Text),
            Column::new("weight", ColumnKind::Number),
        ],
        vec![
            vec![
                AttrValue::Text("centro".to_string()),
                AttrValue::Number(1.25),
            ],
            vec![
                AttrValue::Text("norte".to_string()),
                AttrValue::Number(2.5),
            ],
        ],
    )
    .unwrap();

    FeatureSet::new(GeometrySeq::Polygons(vec![a, b]), table, Srs::LonLat).unwrap()
}

#[test]
fn test_polygon_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let fs = district_layer();

    write_layer(&fs, dir.path(), "districts", false).unwrap();
    let back = read_layer(dir.path(), "districts").unwrap();

    assert_eq!(fs.len(), back.len());
    assert_eq!("polygon", back.shapes.kind_name());
    assert_eq!(Srs::LonLat, back.srs);

    //extent and per shape area survive the trip
    let orig_extent = fs.extent().unwrap();
    let back_extent = back.extent().unwrap();
    assert!(approx_eq!(f64, orig_extent.min().x, back_extent.min().x, epsilon = 1e-9));
    assert!(approx_eq!(f64, orig_extent.max().y, back_extent.max().y, epsilon = 1e-9));

    let orig_polys = fs.polygons().unwrap();
    let back_polys = back.polygons().unwrap();
    for (o, b) in orig_polys.iter().zip(back_polys.iter()) {
        assert!(approx_eq!(
            f64,
            o.unsigned_area(),
            b.unsigned_area(),
            epsilon = 1e-12
        ));
    }

    //columns come back (sorted by name) with their values
    let names: Vec<&str> = back.table.columns().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(vec!["name", "weight"], names);
    assert_eq!(
        AttrValue::Text("centro".to_string()),
        *back.table.value(0, "name").unwrap()
    );
    let w = back.table.value(1, "weight").unwrap().as_f64().unwrap();
    assert!(approx_eq!(f64, 2.5, w, epsilon = 1e-6));
}

#[test]
fn test_point_round_trip_exact_coords() {
    let dir = tempfile::tempdir().unwrap();

    let pts = vec![
        Point::new(-3.75, 40.32),
        Point::new(-3.65, 40.38),
        Point::new(-3.62, 40.31),
    ];
    let fs = FeatureSet::new(
        GeometrySeq::Points(pts.clone()),
        AttributeTable::empty(3),
        Srs::LonLat,
    )
    .unwrap();

    write_layer(&fs, dir.path(), "incidents", false).unwrap();
    let back = read_layer(dir.path(), "incidents").unwrap();

    match &back.shapes {
        GeometrySeq::Points(read_pts) => {
            assert_eq!(3, read_pts.len());
            for (o, b) in pts.iter().zip(read_pts.iter()) {
                assert_eq!(o.x(), b.x());
                assert_eq!(o.y(), b.y());
            }
        }
        _ => panic!("expected a point layer"),
    }
}

#[test]
fn test_existing_destination_needs_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    let fs = district_layer();

    write_layer(&fs, dir.path(), "districts", false).unwrap();

    let again = write_layer(&fs, dir.path(), "districts", false);
    assert!(matches!(again, Err(VectorError::AlreadyExists(_))));

    //with overwrite it goes through and stays readable
    write_layer(&fs, dir.path(), "districts", true).unwrap();
    let back = read_layer(dir.path(), "districts").unwrap();
    assert_eq!(2, back.len());
}

#[test]
fn test_missing_layer_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let r = read_layer(dir.path(), "nothing_here");
    assert!(matches!(r, Err(VectorError::NotFound(_))));
}

#[test]
fn test_prj_survives_round_trip() {
    let dir = tempfile::tempdir().unwrap();

    let mut fs = district_layer();
    fs.srs = Srs::Utm { zone: 30, north: true };

    write_layer(&fs, dir.path(), "utm_layer", false).unwrap();
    let back = read_layer(dir.path(), "utm_layer").unwrap();
    assert_eq!(Srs::Utm { zone: 30, north: true }, back.srs);
}
