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
use std::path::Path;

use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};
use geo_types::MultiPolygon;
use log::info;

use crate::error::{Result, VectorError};
use crate::feature_set::{AttrValue, FeatureSet};
use crate::render::palette::{BinnedScale, Palette};
use crate::vector::transform::Srs;

/// Everything the map page needs besides the data itself.  No implicit
/// state: palette, bins and viewport all arrive through parameters.
#[derive(Clone, Debug)]
pub struct MapOptions {
    /// Initial viewport center as (lat, lng)
    pub center: (f64, f64),
    pub zoom: u8,
    pub title: String,
}

/// Center of the layer's extent as (lat, lng), for callers that do not
/// pick a viewport themselves.
pub fn map_center(fs: &FeatureSet) -> Option<(f64, f64)> {
    fs.extent().map(|r| {
        (
            (r.min().y + r.max().y) / 2.0,
            (r.min().x + r.max().x) / 2.0,
        )
    })
}

fn attr_to_json(v: &AttrValue) -> serde_json::Value {
    match v {
        AttrValue::Text(s) => serde_json::Value::from(s.as_str()),
        AttrValue::Number(n) => serde_json::Value::from(*n),
        AttrValue::Null => serde_json::Value::Null,
    }
}

fn multi_polygon_coords(mp: &MultiPolygon<f64>) -> Vec<Vec<Vec<Vec<f64>>>> {
    mp.0
        .iter()
        .map(|poly| {
            std::iter::once(poly.exterior())
                .chain(poly.interiors().iter())
                .map(|ring| ring.0.iter().map(|c| vec![c.x, c.y]).collect())
                .collect()
        })
        .collect()
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

/// Renders a binned choropleth of `column` as a self contained Leaflet
/// page and returns the HTML.
///
/// The layer must be polygons in EPSG:4326 (Leaflet speaks lat/lng);
/// reproject first.  Null values in the column are normalized to zero
/// before binning.
pub fn render_choropleth(
    fs: &FeatureSet,
    column: &str,
    bins: usize,
    palette: Palette,
    opts: &MapOptions,
) -> Result<String> {
    if fs.srs != Srs::LonLat {
        return Err(VectorError::Format(format!(
            "choropleth wants EPSG:4326 coordinates, layer is in {}",
            fs.srs
        )));
    }

    let polys = fs.polygons()?;
    if polys.is_empty() {
        return Err(VectorError::Format("nothing to render, layer is empty".to_string()));
    }

    let mut table = fs.table.clone();
    let filled = table.fill_null_with_zero(column)?;
    if filled > 0 {
        info!("normalized {} null values of {} to zero", filled, column);
    }

    let values: Vec<f64> = table
        .numeric_column(column)?
        .into_iter()
        .map(|v| v.unwrap_or(0.0))
        .collect();

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let scale = BinnedScale::equal_interval(min, max, bins, palette)?;

    let features: Vec<Feature> = polys
        .iter()
        .enumerate()
        .map(|(i, mp)| {
            let mut props = JsonObject::new();
            for (ci, col) in table.columns().iter().enumerate() {
                props.insert(col.name.clone(), attr_to_json(&table.rows()[i][ci]));
            }
            props.insert(
                "__color".to_string(),
                serde_json::Value::from(scale.color_of(values[i]).hex()),
            );

            Feature {
                bbox: None,
                geometry: Some(Geometry::new(Value::MultiPolygon(multi_polygon_coords(mp)))),
                id: None,
                properties: Some(props),
                foreign_members: None,
            }
        })
        .collect();

    let collection = FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    };

    let geojson = serde_json::to_string(&collection)
        .map_err(|e| VectorError::Format(format!("geojson serialization failed: {}", e)))?;
    let legend = serde_json::to_string(&scale.legend())
        .map_err(|e| VectorError::Format(format!("legend serialization failed: {}", e)))?;
    let column_json = serde_json::to_string(column)
        .map_err(|e| VectorError::Format(format!("column name serialization failed: {}", e)))?;

    let html = TEMPLATE
        .replace("__TITLE__", &escape_html(&opts.title))
        .replace("__CENTER_LAT__", &opts.center.0.to_string())
        .replace("__CENTER_LNG__", &opts.center.1.to_string())
        .replace("__ZOOM__", &opts.zoom.to_string())
        .replace("__VALUE_COLUMN__", &column_json)
        .replace("__BINS__", &legend)
        .replace("__GEOJSON__", &geojson);

    Ok(html)
}

/// Writes the rendered page, honoring the usual overwrite rule.
pub fn write_html(path: &Path, html: &str, overwrite: bool) -> Result<()> {
    if path.exists() && !overwrite {
        return Err(VectorError::AlreadyExists(path.to_path_buf()));
    }
    std::fs::write(path, html)?;
    Ok(())
}

const TEMPLATE: &str = r##"<!doctype html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>__TITLE__</title>

  <!-- Leaflet 1.9.4 -->
  <link rel="stylesheet" href="https://cdnjs.cloudflare.com/ajax/libs/leaflet/1.9.4/leaflet.css" crossorigin="anonymous"
    referrerpolicy="no-referrer" />
  <script src="https://cdnjs.cloudflare.com/ajax/libs/leaflet/1.9.4/leaflet.js" crossorigin="anonymous"
    referrerpolicy="no-referrer"></script>

  <style>
    html, body { height: 100%; margin: 0; }
    #map { height: 100%; }
    .map-title {
      padding: 6px 10px;
      background: rgba(255, 255, 255, 0.85);
      border-radius: 4px;
      font: 16px/1.3 sans-serif;
      font-weight: bold;
    }
    .legend {
      padding: 6px 10px;
      background: rgba(255, 255, 255, 0.85);
      border-radius: 4px;
      font: 12px/1.5 sans-serif;
    }
    .legend i {
      width: 14px;
      height: 14px;
      float: left;
      margin-right: 6px;
      margin-top: 2px;
      opacity: 0.8;
    }
  </style>
</head>
<body>
  <div id="map"></div>
  <script>
    var map = L.map('map').setView([__CENTER_LAT__, __CENTER_LNG__], __ZOOM__);

    L.tileLayer('https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png', {
      maxZoom: 19,
      attribution: '&copy; OpenStreetMap contributors'
    }).addTo(map);

    var valueColumn = __VALUE_COLUMN__;
    var bins = __BINS__;
    var data = __GEOJSON__;

    var fmt = function (v) { return Math.round(v * 100) / 100; };

    L.geoJSON(data, {
      style: function (feature) {
        return {
          color: '#444444',
          weight: 1,
          fillColor: feature.properties.__color,
          fillOpacity: 0.7
        };
      },
      onEachFeature: function (feature, layer) {
        layer.bindTooltip(valueColumn + ': ' + fmt(feature.properties[valueColumn]));
      }
    }).addTo(map);

    var title = L.control({ position: 'topright' });
    title.onAdd = function () {
      var div = L.DomUtil.create('div', 'map-title');
      div.textContent = '__TITLE__';
      return div;
    };
    title.addTo(map);

    var legend = L.control({ position: 'bottomright' });
    legend.onAdd = function () {
      var div = L.DomUtil.create('div', 'legend');
      for (var i = 0; i < bins.length; i++) {
        div.innerHTML += '<i style="background:' + bins[i].color + '"></i>'
          + fmt(bins[i].from) + ' &ndash; ' + fmt(bins[i].to) + '<br/>';
      }
      return div;
    };
    legend.addTo(map);
  </script>
</body>
</html>
"##;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature_set::{AttributeTable, Column, ColumnKind, GeometrySeq};
    use geo_types::polygon;

    fn two_district_layer() -> FeatureSet {
        let a = MultiPolygon::new(vec![polygon![
            (x: -3.8, y: 40.3),
            (x: -3.7, y: 40.3),
            (x: -3.7, y: 40.4),
            (x: -3.8, y: 40.4),
        ]]);
        let b = MultiPolygon::new(vec![polygon![
            (x: -3.7, y: 40.3),
            (x: -3.6, y: 40.3),
            (x: -3.6, y: 40.4),
            (x: -3.7, y: 40.4),
        ]]);
        let table = AttributeTable::new(
            vec![
                Column::new("count", ColumnKind::Number),
                Column::new("name", ColumnKind::Text),
            ],
            vec![
                vec![AttrValue::Number(12.0), AttrValue::Text("centro".to_string())],
                vec![AttrValue::Null, AttrValue::Text("norte".to_string())],
            ],
        )
        .unwrap();
        FeatureSet::new(GeometrySeq::Polygons(vec![a, b]), table, Srs::LonLat).unwrap()
    }

    #[test]
    fn test_render_produces_page() {
        let fs = two_district_layer();
        let opts = MapOptions {
            center: map_center(&fs).unwrap(),
            zoom: 12,
            title: "Incidents per district".to_string(),
        };

        let html = render_choropleth(&fs, "count", 5, Palette::YlOrRd, &opts).unwrap();

        assert!(html.contains("leaflet.js"));
        assert!(html.contains("Incidents per district"));
        assert!(html.contains("FeatureCollection"));
        //darkest ramp color shows up for the max bin
        assert!(html.contains("#bd0026"));
        //no placeholder left behind
        assert!(!html.contains("__GEOJSON__"));
        assert!(!html.contains("__BINS__"));
    }

    #[test]
    fn test_null_normalized_before_binning() {
        let fs = two_district_layer();
        let opts = MapOptions {
            center: (40.35, -3.7),
            zoom: 12,
            title: "t".to_string(),
        };

        let html = render_choropleth(&fs, "count", 3, Palette::Blues, &opts).unwrap();
        //the null row renders as the value 0, not as null
        assert!(html.contains("\"count\":0.0") || html.contains("\"count\":0"));
    }

    #[test]
    fn test_wrong_srs_rejected() {
        let mut fs = two_district_layer();
        fs.srs = Srs::WebMercator;
        let opts = MapOptions {
            center: (0.0, 0.0),
            zoom: 1,
            title: "t".to_string(),
        };
        assert!(render_choropleth(&fs, "count", 5, Palette::YlOrRd, &opts).is_err());
    }
}
