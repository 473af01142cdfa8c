/// Number of entries in the colormap lookup table.
pub const LUT_SIZE: usize = 256;

// (x, value) control points of each channel, linear in between
const JET_RED: &[(f64, f64)] = &[(0.0, 0.0), (0.35, 0.0), (0.66, 1.0), (0.89, 1.0), (1.0, 0.5)];
const JET_GREEN: &[(f64, f64)] = &[
    (0.0, 0.0),
    (0.125, 0.0),
    (0.375, 1.0),
    (0.64, 1.0),
    (0.91, 0.0),
    (1.0, 0.0),
];
const JET_BLUE: &[(f64, f64)] = &[(0.0, 0.5), (0.11, 1.0), (0.34, 1.0), (0.65, 0.0), (1.0, 0.0)];

/// Colormaps supported for scalar visualization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Colormap {
    /// Dark blue → cyan → yellow → dark red.
    #[default]
    Jet,
}

impl Colormap {
    /// Map a value in `[0, 1]` to an rgb color in `[0, 1]`.
    ///
    /// The value is quantized into a 256 entry lookup table. Values outside the
    /// range are clamped to the end colors and NaN maps to black.
    ///
    /// Example:
    ///
    /// ```
    /// use cylfit_3d::colormap::Colormap;
    ///
    /// assert_eq!(Colormap::Jet.map(0.0), [0.0, 0.0, 0.5]);
    /// assert_eq!(Colormap::Jet.map(1.0), [0.5, 0.0, 0.0]);
    /// ```
    pub fn map(&self, value: f64) -> [f64; 3] {
        if value.is_nan() {
            return [0.0; 3];
        }
        let index = ((value * LUT_SIZE as f64).max(0.0) as usize).min(LUT_SIZE - 1);
        let x = index as f64 / (LUT_SIZE - 1) as f64;
        match self {
            Colormap::Jet => [
                interpolate(JET_RED, x),
                interpolate(JET_GREEN, x),
                interpolate(JET_BLUE, x),
            ],
        }
    }
}

fn interpolate(segments: &[(f64, f64)], x: f64) -> f64 {
    for pair in segments.windows(2) {
        let (x0, y0) = pair[0];
        let (x1, y1) = pair[1];
        if x <= x1 {
            let t = if x1 > x0 { (x - x0) / (x1 - x0) } else { 0.0 };
            return y0 + t * (y1 - y0);
        }
    }
    segments.last().map_or(0.0, |&(_, y)| y)
}
