//! SVG path assembly for line and area layers.
//!
//! Input points carry screen coordinates already, with `None` marking a gap.
//! The pen lifts over gaps and over non-finite values: the next valid point
//! starts a new `M` subpath instead of drawing a line across missing data.

use std::fmt::Write;

/// Build the `d` attribute for a polyline over `(x, Some(y))` points.
/// `None` and non-finite values both lift the pen, so NaN and infinity never
/// reach the path data. Coordinates render with two decimals. All-gap input
/// yields an empty string, which callers treat as "nothing to draw".
pub fn line_path(points: &[(f64, Option<f64>)]) -> String {
    let mut path = String::new();
    let mut pen_down = false;
    for (x, value) in points {
        match value {
            Some(y) if y.is_finite() => {
                if !path.is_empty() {
                    path.push(' ');
                }
                let command = if pen_down { 'L' } else { 'M' };
                let _ = write!(path, "{command} {x:.2} {y:.2}");
                pen_down = true;
            }
            _ => pen_down = false,
        }
    }
    path
}

/// Close a line path into a fill region: down to the baseline under the last
/// point, across to under the first, then `Z`. An empty line stays empty.
pub fn area_path(line: &str, first_x: f64, last_x: f64, baseline_y: f64) -> String {
    if line.is_empty() {
        return String::new();
    }
    format!("{line} L {last_x:.2} {baseline_y:.2} L {first_x:.2} {baseline_y:.2} Z")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn continuous_points_draw_one_subpath() {
        let path = line_path(&[(0.0, Some(10.0)), (50.0, Some(20.0)), (100.0, Some(15.0))]);
        assert_eq!(path, "M 0.00 10.00 L 50.00 20.00 L 100.00 15.00");
    }

    #[test]
    fn gap_restarts_with_move() {
        let path = line_path(&[
            (0.0, Some(10.0)),
            (50.0, Some(20.0)),
            (100.0, None),
            (150.0, Some(30.0)),
            (200.0, Some(25.0)),
        ]);
        assert_eq!(path, "M 0.00 10.00 L 50.00 20.00 M 150.00 30.00 L 200.00 25.00");
    }

    #[test]
    fn leading_gap_skips_to_first_value() {
        let path = line_path(&[(0.0, None), (50.0, Some(5.0))]);
        assert_eq!(path, "M 50.00 5.00");
    }

    #[test]
    fn all_gaps_yield_empty_path() {
        assert_eq!(line_path(&[(0.0, None), (50.0, None)]), "");
        assert_eq!(line_path(&[]), "");
    }

    #[test]
    fn non_finite_values_lift_the_pen() {
        let path = line_path(&[
            (0.0, Some(10.0)),
            (50.0, Some(f64::INFINITY)),
            (100.0, Some(f64::NEG_INFINITY)),
            (150.0, Some(f64::NAN)),
            (200.0, Some(30.0)),
            (250.0, Some(25.0)),
        ]);
        assert_eq!(path, "M 0.00 10.00 M 200.00 30.00 L 250.00 25.00");
    }

    #[test]
    fn area_closes_down_to_baseline() {
        let line = line_path(&[(10.0, Some(40.0)), (90.0, Some(60.0))]);
        let area = area_path(&line, 10.0, 90.0, 396.0);
        assert_eq!(area, "M 10.00 40.00 L 90.00 60.00 L 90.00 396.00 L 10.00 396.00 Z");
    }

    #[test]
    fn area_of_empty_line_is_empty() {
        assert_eq!(area_path("", 0.0, 100.0, 396.0), "");
    }
}
