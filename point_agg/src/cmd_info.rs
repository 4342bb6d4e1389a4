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

use anyhow::Result;
use itertools::Itertools;
use structopt::StructOpt;

use vector_util::io::read_layer;
use vector_util::{AttrValue, ColumnKind};

#[derive(StructOpt)]
pub struct InfoArgs {
    #[structopt(long, parse(from_os_str), help="Directory holding the layer")]
    pub(crate) in_dir: PathBuf,

    #[structopt(long, help="Layer name, without extension")]
    pub(crate) in_layer: String,

    #[structopt(long, default_value="5", help="How many attribute rows to print")]
    pub(crate) head: usize,
}

fn cell_to_string(v: &AttrValue) -> String {
    match v {
        AttrValue::Text(s) => s.clone(),
        AttrValue::Number(n) => format!("{}", n),
        AttrValue::Null => "<null>".to_string(),
    }
}

pub fn info(args: &InfoArgs) -> Result<()> {
    let fs = read_layer(&args.in_dir, &args.in_layer)?;

    println!("Layer: {}", args.in_layer);
    println!("Geometry: {} x {}", fs.len(), fs.shapes.kind_name());
    println!("Projection: {}", fs.srs);

    match fs.extent() {
        Some(e) => println!(
            "Extent: {} {} to {} {}",
            e.min().x,
            e.min().y,
            e.max().x,
            e.max().y
        ),
        None => println!("Extent: <empty layer>"),
    }

    println!(
        "Columns: {}",
        fs.table
            .columns()
            .iter()
            .map(|c| {
                let kind = match c.kind {
                    ColumnKind::Text => "text",
                    ColumnKind::Number => "number",
                };
                format!("{} ({})", c.name, kind)
            })
            .join(", ")
    );

    for (i, row) in fs.table.rows().iter().take(args.head).enumerate() {
        println!("  row {}: {}", i, row.iter().map(cell_to_string).join(" | "));
    }

    Ok(())
}
