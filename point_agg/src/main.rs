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

mod cmd_aggregate;
mod cmd_clip;
mod cmd_grid;
mod cmd_info;
mod cmd_intersect;
mod cmd_render;
mod cmd_reproject;

use anyhow::Result;
use log::LevelFilter;
use simple_logger::SimpleLogger;
use structopt::StructOpt;

use crate::cmd_aggregate::{aggregate, AggregateArgs};
use crate::cmd_clip::{clip_layer, ClipArgs};
use crate::cmd_grid::{grid, GridArgs};
use crate::cmd_info::{info, InfoArgs};
use crate::cmd_intersect::{intersect, IntersectArgs};
use crate::cmd_render::{render, RenderArgs};
use crate::cmd_reproject::{reproject, ReprojectArgs};

#[derive(StructOpt)]
struct Cli {

    #[structopt(long, default_value = "Warn")]
    log_level: LevelFilter,

    #[structopt(subcommand)]
    cmd: Command
}

#[derive(StructOpt)]
enum Command {

    #[structopt(help="Prints geometry type, extent, projection and attribute columns")]
    Info(InfoArgs),

    #[structopt(help="Subsets one layer to another layer's extent or boundary")]
    Clip(ClipArgs),

    Reproject(ReprojectArgs),

    #[structopt(help="Counts points/lines per polygon")]
    Aggregate(AggregateArgs),

    #[structopt(help="Builds a regular grid over a layer's extent")]
    Grid(GridArgs),

    #[structopt(help="Trims grid cells to a boundary polygon")]
    Intersect(IntersectArgs),

    #[structopt(help="Renders a binned choropleth as a Leaflet page")]
    Render(RenderArgs),
}

fn run() -> Result<()> {

    let args = Cli::from_args();

    SimpleLogger::new().with_level(args.log_level).init()?;

    match &args.cmd {

        Command::Info(r) => {
            info(r)?;
        }
        Command::Clip(r) => {
            clip_layer(r)?;
        }
        Command::Reproject(r) => {
            reproject(r)?;
        }
        Command::Aggregate(r) => {
            aggregate(r)?;
        }
        Command::Grid(r) => {
            grid(r)?;
        }
        Command::Intersect(r) => {
            intersect(r)?;
        }
        Command::Render(r) => {
            render(r)?;
        }
    }

    Ok(())
}

fn main() {
    run().unwrap();
}
