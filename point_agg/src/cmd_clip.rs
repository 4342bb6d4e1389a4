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

use anyhow::Result;
use log::info;
use structopt::StructOpt;

use vector_util::io::{read_layer, write_layer};
use vector_util::util::format_duration;
use vector_util::vector::clip::{clip, ClipMode};

#[derive(StructOpt)]
pub struct ClipArgs {
    #[structopt(long, parse(from_os_str), help="Directory of the layer to subset")]
    pub(crate) in_dir: PathBuf,

    #[structopt(long, help="Layer to subset")]
    pub(crate) in_layer: String,

    #[structopt(long, parse(from_os_str), help="Directory of the clip layer")]
    pub(crate) clip_dir: PathBuf,

    #[structopt(long, help="Clip layer (polygons unless --extent)")]
    pub(crate) clip_layer: String,

    #[structopt(long, help="Clip by bounding box instead of the polygon boundary")]
    pub(crate) extent: bool,

    #[structopt(long, parse(from_os_str), help="Output directory")]
    pub(crate) out_dir: PathBuf,

    #[structopt(long, help="Output layer name")]
    pub(crate) out_layer: String,

    #[structopt(long, help="Replace the output layer if it exists")]
    pub(crate) overwrite: bool,
}

pub fn clip_layer(args: &ClipArgs) -> Result<()> {
    let now = Instant::now();

    let a = read_layer(&args.in_dir, &args.in_layer)?;
    let b = read_layer(&args.clip_dir, &args.clip_layer)?;

    let mode = if args.extent {
        ClipMode::Extent
    } else {
        ClipMode::Boundary
    };

    let clipped = clip(&a, &b, mode)?;

    info!(
        "clip kept {} of {} shapes",
        clipped.len(),
        a.len()
    );

    write_layer(&clipped, &args.out_dir, &args.out_layer, args.overwrite)?;

    info!("wrote {} in {}", args.out_layer, format_duration(now.elapsed()));

    Ok(())
}
