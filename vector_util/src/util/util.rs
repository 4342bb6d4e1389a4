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
use std::time::{Duration, Instant};

pub fn format_duration(d: Duration) -> String {
    let mut secs = d.as_secs();
    let hours = secs / 3600;
    secs = secs % 3600;
    let minutes = secs / 60;
    secs = secs % 60;

    let ms = d.as_millis() % 1000;

    format!("{}h {}m {}s {}ms", hours, minutes, secs, ms)
}

pub fn quote_csv_string(s: &str) -> String {
    let mut r = String::new();

    r.push('"');

    for c in s.chars() {
        if c == '"' {
            r.push('\\');
            r.push('"');
            continue;
        }

        if c == '\\' {
            r.push('\\');
            r.push('\\');
            continue;
        }

        r.push(c);
    }

    r.push('"');

    r
}

pub fn print_remaining_time(now: &Instant, num_processed: u32, num_total: u32) {
    let d = Instant::now().duration_since(*now);
    let time_per_result = if num_processed == 0 {
        d / 1
    } else {
        d / num_processed
    };
    let est_remaining_time = time_per_result * (num_total - num_processed);
    println!(
        "Through {} of {}\nElapsed: {}\nEst. Remaining: {}\n",
        num_processed,
        num_total,
        format_duration(d),
        format_duration(est_remaining_time)
    );
}

/// Digits needed to print the largest index of `num_entries` items,
/// used for zero padded labels.
pub fn get_index_width_len(num_entries: usize) -> usize {
    return 1 + (num_entries as f64 - 1.0).log10().floor() as usize;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_csv_string() {
        assert_eq!("\"hello\"", quote_csv_string("hello"));

        assert_eq!(quote_csv_string("hel\\l\"o"), "\"hel\\\\l\\\"o\"");
    }

    #[test]
    fn test_get_index_width_len() {
        assert_eq!(1, get_index_width_len(1));
        assert_eq!(1, get_index_width_len(10)); //0 to 9
        assert_eq!(2, get_index_width_len(11)); //10
        assert_eq!(2, get_index_width_len(100)); //0 to 99
        assert_eq!(3, get_index_width_len(101));
        assert_eq!(3, get_index_width_len(1000));
    }
}
