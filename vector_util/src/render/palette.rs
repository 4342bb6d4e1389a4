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

//! Color ramps and the binned value-to-color scale of the choropleth.

use serde::Serialize;

use crate::error::{Result, VectorError};

/// RGB color, 0..=255 per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// A color stop: position in [0, 1] mapped to an RGB color.
#[derive(Debug, Clone, Copy)]
pub struct ColorStop {
    pub t: f64,
    pub color: Rgb,
}

impl ColorStop {
    pub const fn new(t: f64, r: u8, g: u8, b: u8) -> Self {
        Self {
            t,
            color: Rgb::new(r, g, b),
        }
    }
}

//ColorBrewer sequential ramps
const YL_OR_RD_STOPS: &[ColorStop] = &[
    ColorStop::new(0.00, 255, 255, 178),
    ColorStop::new(0.25, 254, 204, 92),
    ColorStop::new(0.50, 253, 141, 60),
    ColorStop::new(0.75, 240, 59, 32),
    ColorStop::new(1.00, 189, 0, 38),
];

const YL_GN_BU_STOPS: &[ColorStop] = &[
    ColorStop::new(0.00, 255, 255, 204),
    ColorStop::new(0.25, 161, 218, 180),
    ColorStop::new(0.50, 65, 182, 196),
    ColorStop::new(0.75, 44, 127, 184),
    ColorStop::new(1.00, 37, 52, 148),
];

const BLUES_STOPS: &[ColorStop] = &[
    ColorStop::new(0.00, 239, 243, 255),
    ColorStop::new(0.25, 189, 215, 231),
    ColorStop::new(0.50, 107, 174, 214),
    ColorStop::new(0.75, 49, 130, 189),
    ColorStop::new(1.00, 8, 81, 156),
];

const GREENS_STOPS: &[ColorStop] = &[
    ColorStop::new(0.00, 237, 248, 233),
    ColorStop::new(0.25, 186, 228, 179),
    ColorStop::new(0.50, 116, 196, 118),
    ColorStop::new(0.75, 49, 163, 84),
    ColorStop::new(1.00, 0, 109, 44),
];

/// Available choropleth palettes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Palette {
    YlOrRd,
    YlGnBu,
    Blues,
    Greens,
}

impl Palette {
    pub const ALL: &'static [Palette] = &[
        Self::YlOrRd,
        Self::YlGnBu,
        Self::Blues,
        Self::Greens,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::YlOrRd => "YlOrRd",
            Self::YlGnBu => "YlGnBu",
            Self::Blues => "Blues",
            Self::Greens => "Greens",
        }
    }

    pub fn from_name(name: &str) -> Option<Palette> {
        Palette::ALL
            .iter()
            .copied()
            .find(|p| p.name().eq_ignore_ascii_case(name))
    }

    fn stops(&self) -> &'static [ColorStop] {
        match self {
            Self::YlOrRd => YL_OR_RD_STOPS,
            Self::YlGnBu => YL_GN_BU_STOPS,
            Self::Blues => BLUES_STOPS,
            Self::Greens => GREENS_STOPS,
        }
    }

    /// Color at position t in [0, 1], linearly interpolated between the
    /// bracketing stops.
    pub fn sample(&self, t: f64) -> Rgb {
        let stops = self.stops();
        let t = t.clamp(0.0, 1.0);

        let mut lo = stops[0];
        for hi in stops.iter().skip(1) {
            if t <= hi.t {
                let span = hi.t - lo.t;
                let f = if span <= 0.0 { 0.0 } else { (t - lo.t) / span };
                let lerp = |a: u8, b: u8| -> u8 {
                    (a as f64 + (b as f64 - a as f64) * f).round() as u8
                };
                return Rgb::new(
                    lerp(lo.color.r, hi.color.r),
                    lerp(lo.color.g, hi.color.g),
                    lerp(lo.color.b, hi.color.b),
                );
            }
            lo = *hi;
        }
        stops[stops.len() - 1].color
    }

    /// `n` evenly spaced samples, dark end last.
    pub fn colors(&self, n: usize) -> Vec<Rgb> {
        if n == 1 {
            return vec![self.sample(1.0)];
        }
        (0..n)
            .map(|i| self.sample(i as f64 / (n - 1) as f64))
            .collect()
    }
}

/// One legend entry, serialized straight into the map page.
#[derive(Debug, Clone, Serialize)]
pub struct LegendBin {
    pub from: f64,
    pub to: f64,
    pub color: String,
}

/// Equal interval value breaks with one color per bin.
#[derive(Debug, Clone)]
pub struct BinnedScale {
    pub breaks: Vec<f64>,
    pub colors: Vec<Rgb>,
}

impl BinnedScale {
    pub fn equal_interval(min: f64, max: f64, bins: usize, palette: Palette) -> Result<Self> {
        if bins == 0 {
            return Err(VectorError::Format("need at least one bin".to_string()));
        }
        if !min.is_finite() || !max.is_finite() || min > max {
            return Err(VectorError::Format(format!(
                "bad value range {}..{}",
                min, max
            )));
        }

        //degenerate range still gets a well formed scale
        let max = if max > min { max } else { min + 1.0 };

        let breaks = (0..=bins)
            .map(|i| min + (max - min) * i as f64 / bins as f64)
            .collect();

        Ok(BinnedScale {
            breaks,
            colors: palette.colors(bins),
        })
    }

    pub fn bins(&self) -> usize {
        self.colors.len()
    }

    /// Index of the bin holding `v`; values outside the range clamp to
    /// the first/last bin, the last bin is closed on both ends.
    pub fn bin_of(&self, v: f64) -> usize {
        let n = self.bins();
        for i in 0..n {
            if v < self.breaks[i + 1] {
                return i;
            }
        }
        n - 1
    }

    pub fn color_of(&self, v: f64) -> Rgb {
        self.colors[self.bin_of(v)]
    }

    pub fn legend(&self) -> Vec<LegendBin> {
        (0..self.bins())
            .map(|i| LegendBin {
                from: self.breaks[i],
                to: self.breaks[i + 1],
                color: self.colors[i].hex(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex() {
        assert_eq!("#bd0026", Rgb::new(189, 0, 38).hex());
    }

    #[test]
    fn test_from_name_case_insensitive() {
        assert_eq!(Some(Palette::YlOrRd), Palette::from_name("ylorrd"));
        assert_eq!(None, Palette::from_name("magma"));
    }

    #[test]
    fn test_sample_endpoints() {
        let p = Palette::YlOrRd;
        assert_eq!(Rgb::new(255, 255, 178), p.sample(0.0));
        assert_eq!(Rgb::new(189, 0, 38), p.sample(1.0));
    }

    #[test]
    fn test_equal_interval_breaks() {
        let scale = BinnedScale::equal_interval(0.0, 10.0, 5, Palette::Blues).unwrap();
        assert_eq!(vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0], scale.breaks);
        assert_eq!(5, scale.colors.len());
    }

    #[test]
    fn test_bin_of_clamps() {
        let scale = BinnedScale::equal_interval(0.0, 10.0, 5, Palette::Blues).unwrap();
        assert_eq!(0, scale.bin_of(-3.0));
        assert_eq!(0, scale.bin_of(0.0));
        assert_eq!(2, scale.bin_of(4.0));
        //max value lands in the last bin, not one past it
        assert_eq!(4, scale.bin_of(10.0));
        assert_eq!(4, scale.bin_of(99.0));
    }

    #[test]
    fn test_degenerate_range() {
        let scale = BinnedScale::equal_interval(3.0, 3.0, 4, Palette::Greens).unwrap();
        assert_eq!(5, scale.breaks.len());
        assert_eq!(0, scale.bin_of(3.0));
    }
}
