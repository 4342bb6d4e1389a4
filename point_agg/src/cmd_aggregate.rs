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
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use log::info;
use structopt::StructOpt;

use vector_util::io::{read_layer, write_layer};
use vector_util::util::{format_duration, quote_csv_string};
use vector_util::vector::aggregate::{aggregate_into_polygons, Reduction};
use vector_util::{AttrValue, Column, ColumnKind, FeatureSet};

#[derive(StructOpt)]
pub struct AggregateArgs {
    #[structopt(long, parse(from_os_str), help="Directory of the point/line layer")]
    pub(crate) in_dir: PathBuf,

    #[structopt(long, help="Point/line layer to count")]
    pub(crate) in_layer: String,

    #[structopt(long, parse(from_os_str), help="Directory of the polygon layer")]
    pub(crate) zone_dir: PathBuf,

    #[structopt(long, help="Polygon layer receiving the counts")]
    pub(crate) zone_layer: String,

    #[structopt(long, default_value="count", help="Name of the result column")]
    pub(crate) out_field: String,

    #[structopt(long, help="Sum this numeric column instead of counting")]
    pub(crate) sum_field: Option<String>,

    #[structopt(long, parse(from_os_str), help="Optional CSV with one row per polygon")]
    pub(crate) summary_csv: Option<PathBuf>,

    #[structopt(long, help="Polygon column used as the CSV id")]
    pub(crate) id_field: Option<String>,

    #[structopt(long, parse(from_os_str), help="Output directory")]
    pub(crate) out_dir: PathBuf,

    #[structopt(long, help="Output layer name")]
    pub(crate) out_layer: String,

    #[structopt(long, help="Replace the output layer if it exists")]
    pub(crate) overwrite: bool,
}

fn write_summary_csv(args: &AggregateArgs, path: &PathBuf, result: &FeatureSet) -> Result<()> {
    let f = File::create(path)?;
    let mut f = BufWriter::new(f);

    writeln!(f, "id,{}", args.out_field)?;

    for (i, row) in result.table.rows().iter().enumerate() {
        let id = match &args.id_field {
            Some(field) => match result.table.value(i, field)? {
                AttrValue::Text(s) => quote_csv_string(s),
                AttrValue::Number(n) => format!("{}", n),
                AttrValue::Null => String::new(),
            },
            None => format!("{}", i),
        };

        let value = row
            .last()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0);

        writeln!(f, "{},{}", id, value)?;
    }

    Ok(())
}

pub fn aggregate(args: &AggregateArgs) -> Result<()> {
    let now = Instant::now();

    let features = read_layer(&args.in_dir, &args.in_layer)?;
    let zones = read_layer(&args.zone_dir, &args.zone_layer)?;

    let reduction = match &args.sum_field {
        Some(field) => Reduction::Sum(field.clone()),
        None => Reduction::Count,
    };

    let values = aggregate_into_polygons(&features, &zones, &reduction)?;

    let mut result = zones.clone();
    result
        .table
        .push_column(Column::new(args.out_field.clone(), ColumnKind::Number), values)?;

    //zero filled polygons render and export cleanly
    let filled = result.table.fill_null_with_zero(&args.out_field)?;
    info!(
        "aggregated {} features into {} polygons ({} empty)",
        features.len(),
        zones.len(),
        filled
    );

    write_layer(&result, &args.out_dir, &args.out_layer, args.overwrite)?;

    if let Some(csv_path) = &args.summary_csv {
        write_summary_csv(args, csv_path, &result)?;
        info!("summary written to {:?}", csv_path);
    }

    info!("wrote {} in {}", args.out_layer, format_duration(now.elapsed()));

    Ok(())
}
