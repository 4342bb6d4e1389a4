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

//! .prj sidecar parsing.  The WKT is scanned, not parsed: the outermost
//! EPSG authority wins, with name heuristics as a fallback for ESRI
//! files that carry no authority at all.

use crate::vector::transform::Srs;

fn last_epsg_authority(wkt: &str) -> Option<u32> {
    const NEEDLE: &str = "AUTHORITY[\"EPSG\",\"";

    let (pos, _) = wkt.match_indices(NEEDLE).last()?;
    let tail = &wkt[pos + NEEDLE.len()..];
    let digits: String = tail.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

fn utm_from_name(upper: &str) -> Option<Srs> {
    let pos = upper.find("UTM")?;
    let tail = &upper[pos..];
    let digits_at = tail.find(|c: char| c.is_ascii_digit())?;
    let tail = &tail[digits_at..];

    let digits: String = tail.chars().take_while(|c| c.is_ascii_digit()).collect();
    let zone: u8 = digits.parse().ok()?;
    if zone == 0 || zone > 60 {
        return None;
    }

    let north = !matches!(tail[digits.len()..].chars().next(), Some('S'));
    Some(Srs::Utm { zone, north })
}

/// Best-effort reference system detection from .prj WKT.
pub fn srs_from_wkt(wkt: &str) -> Option<Srs> {
    if let Some(code) = last_epsg_authority(wkt) {
        if let Ok(srs) = Srs::from_epsg(code) {
            return Some(srs);
        }
    }

    let upper = wkt.to_uppercase();
    if upper.contains("PSEUDO-MERCATOR")
        || upper.contains("WEB_MERCATOR")
        || upper.contains("MERCATOR_AUXILIARY_SPHERE")
    {
        return Some(Srs::WebMercator);
    }
    if upper.contains("UTM") {
        if let Some(srs) = utm_from_name(&upper) {
            return Some(srs);
        }
    }
    if upper.starts_with("GEOGCS") {
        return Some(Srs::LonLat);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_own_wkt_round_trips() {
        for srs in [
            Srs::LonLat,
            Srs::WebMercator,
            Srs::Utm { zone: 30, north: true },
            Srs::Utm { zone: 34, north: false },
        ] {
            assert_eq!(Some(srs), srs_from_wkt(&srs.prj_wkt()));
        }
    }

    #[test]
    fn test_esri_utm_name_without_authority() {
        let wkt = "PROJCS[\"WGS_1984_UTM_Zone_33N\",GEOGCS[\"GCS_WGS_1984\",DATUM[\"D_WGS_1984\",SPHEROID[\"WGS_1984\",6378137.0,298.257223563]],PRIMEM[\"Greenwich\",0.0],UNIT[\"Degree\",0.0174532925199433]],PROJECTION[\"Transverse_Mercator\"]]";
        assert_eq!(Some(Srs::Utm { zone: 33, north: true }), srs_from_wkt(wkt));
    }

    #[test]
    fn test_bare_geogcs_is_lonlat() {
        let wkt = "GEOGCS[\"GCS_WGS_1984\",DATUM[\"D_WGS_1984\",SPHEROID[\"WGS_1984\",6378137.0,298.257223563]],PRIMEM[\"Greenwich\",0.0],UNIT[\"Degree\",0.0174532925199433]]";
        assert_eq!(Some(Srs::LonLat), srs_from_wkt(wkt));
    }

    #[test]
    fn test_unknown_wkt() {
        assert_eq!(None, srs_from_wkt("LOCAL_CS[\"site grid\"]"));
    }
}
