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
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Result};
use itertools::Itertools;
use log::info;
use structopt::StructOpt;

use vector_util::io::read_layer;
use vector_util::render::{map_center, render_choropleth, write_html, MapOptions, Palette};
use vector_util::util::format_duration;
use vector_util::vector::transform::{transform_feature_set, Srs};

#[derive(StructOpt)]
pub struct RenderArgs {
    #[structopt(long, parse(from_os_str), help="Directory of the polygon layer")]
    pub(crate) in_dir: PathBuf,

    #[structopt(long, help="Polygon layer to map")]
    pub(crate) in_layer: String,

    #[structopt(long, default_value="count", help="Numeric column driving the colors")]
    pub(crate) field: String,

    #[structopt(long, default_value="5", help="Number of color bins")]
    pub(crate) bins: usize,

    #[structopt(long, default_value="YlOrRd", help="Palette name")]
    pub(crate) palette: String,

    #[structopt(long, help="Initial center latitude (default: layer center)")]
    pub(crate) center_lat: Option<f64>,

    #[structopt(long, help="Initial center longitude (default: layer center)")]
    pub(crate) center_lng: Option<f64>,

    #[structopt(long, default_value="11", help="Initial zoom level")]
    pub(crate) zoom: u8,

    #[structopt(long, help="Map title (default: the layer name)")]
    pub(crate) title: Option<String>,

    #[structopt(long, parse(from_os_str), help="Path of the HTML page to write")]
    pub(crate) out_html: PathBuf,

    #[structopt(long, help="Replace the page if it exists")]
    pub(crate) overwrite: bool,
}

pub fn render(args: &RenderArgs) -> Result<()> {
    let now = Instant::now();

    let palette = match Palette::from_name(&args.palette) {
        Some(p) => p,
        None => bail!(
            "unknown palette {}; available: {}",
            args.palette,
            Palette::ALL.iter().map(|p| p.name()).join(", ")
        ),
    };

    let mut fs = read_layer(&args.in_dir, &args.in_layer)?;

    //leaflet wants lat/lng
    if fs.srs != Srs::LonLat {
        info!("reprojecting {} -> EPSG:4326 for display", fs.srs);
        fs = transform_feature_set(&fs, Srs::LonLat);
    }

    let center = match (args.center_lat, args.center_lng) {
        (Some(lat), Some(lng)) => (lat, lng),
        _ => match map_center(&fs) {
            Some(c) => c,
            None => bail!("{} is empty, nothing to render", args.in_layer),
        },
    };

    let opts = MapOptions {
        center,
        zoom: args.zoom,
        title: args
            .title
            .clone()
            .unwrap_or_else(|| args.in_layer.clone()),
    };

    let html = render_choropleth(&fs, &args.field, args.bins, palette, &opts)?;
    write_html(&args.out_html, &html, args.overwrite)?;

    info!("wrote {:?} in {}", args.out_html, format_duration(now.elapsed()));

    Ok(())
}
