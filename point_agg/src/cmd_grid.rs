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
use log::info;
use structopt::StructOpt;

use vector_util::io::{read_layer, write_layer};
use vector_util::util::format_duration;
use vector_util::vector::grid::build_grid;

#[derive(StructOpt)]
pub struct GridArgs {
    #[structopt(long, parse(from_os_str), help="Directory of the layer giving the extent")]
    pub(crate) in_dir: PathBuf,

    #[structopt(long, help="Layer whose extent the grid tiles")]
    pub(crate) in_layer: String,

    #[structopt(long, default_value="10", help="Cells per axis")]
    pub(crate) cells: usize,

    #[structopt(long, parse(from_os_str), help="Output directory")]
    pub(crate) out_dir: PathBuf,

    #[structopt(long, help="Output layer name")]
    pub(crate) out_layer: String,

    #[structopt(long, help="Replace the output layer if it exists")]
    pub(crate) overwrite: bool,
}

pub fn grid(args: &GridArgs) -> Result<()> {
    let now = Instant::now();

    let fs = read_layer(&args.in_dir, &args.in_layer)?;

    let extent = match fs.extent() {
        Some(e) => e,
        None => bail!("{} is empty, it has no extent to tile", args.in_layer),
    };

    let grid = build_grid(extent, args.cells, args.cells, fs.srs)?;

    info!("built a {}x{} grid ({} cells)", args.cells, args.cells, grid.len());

    write_layer(&grid, &args.out_dir, &args.out_layer, args.overwrite)?;

    info!("wrote {} in {}", args.out_layer, format_duration(now.elapsed()));

    Ok(())
}
