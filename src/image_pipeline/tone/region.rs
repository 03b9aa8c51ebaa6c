//! Rectangular sub-region of an image used to gather the palette.

/// Half-open pixel rectangle `[min_x, max_x) x [min_y, max_y)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleRegion {
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
}

impl SampleRegion {
    /// Computes the center crop used for sampling.
    ///
    /// With `center_weighted` unset the crop keeps the frame's aspect ratio and removes a
    /// border of `(1 - fraction) / 2` on every side. With it set, a square whose side is
    /// `fraction` of the shorter dimension is centered in the frame, which keeps film
    /// holders and unexposed borders out of the statistics.
    ///
    /// Fractions outside `(0, 1]` are not rejected: `fraction <= 0` gives an empty region
    /// and `fraction > 1` is clamped to the whole frame.
    pub fn compute(width: u32, height: u32, fraction: f64, center_weighted: bool) -> Self {
        let (w, h) = (i64::from(width), i64::from(height));

        if !(fraction > 0.0) {
            let (cx, cy) = (width / 2, height / 2);
            return Self {
                min_x: cx,
                min_y: cy,
                max_x: cx,
                max_y: cy,
            };
        }

        let (min_x, min_y, max_x, max_y) = if center_weighted {
            let min_dim = w.min(h);
            let side = ((min_dim as f64 * fraction) as i64).max(min_dim.min(1));
            let border_w = (w - side) / 2;
            let border_h = (h - side) / 2;
            (border_w, border_h, border_w + side, border_h + side)
        } else {
            let border = (1.0 - fraction.min(1.0)) / 2.0;
            let border_w = (w as f64 * border) as i64;
            let border_h = (h as f64 * border) as i64;
            (border_w, border_h, w - border_w, h - border_h)
        };

        let clamp_x = |v: i64| v.clamp(0, w) as u32;
        let clamp_y = |v: i64| v.clamp(0, h) as u32;
        let (min_x, max_x) = (clamp_x(min_x), clamp_x(max_x));
        let (min_y, max_y) = (clamp_y(min_y), clamp_y(max_y));

        Self {
            min_x,
            min_y,
            max_x: max_x.max(min_x),
            max_y: max_y.max(min_y),
        }
    }

    /// Region covering the whole frame.
    pub fn full(width: u32, height: u32) -> Self {
        Self {
            min_x: 0,
            min_y: 0,
            max_x: width,
            max_y: height,
        }
    }

    pub fn width(&self) -> u32 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> u32 {
        self.max_y - self.min_y
    }

    pub fn area(&self) -> u64 {
        u64::from(self.width()) * u64::from(self.height())
    }

    pub fn is_empty(&self) -> bool {
        self.area() == 0
    }

    /// True when the region lies inside a `width` x `height` frame.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.max_x <= width && self.max_y <= height
    }
}
