/// Combined absolute/relative closeness test.
///
/// `a` is close to the reference `b` when `|a - b| <= atol + rtol * |b|`.
/// The absolute term dominates near zero, the relative term for large values.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tolerance {
    pub rtol: f64,
    pub atol: f64,
}

impl Tolerance {
    pub const DEFAULT: Tolerance = Tolerance {
        rtol: 1e-5,
        atol: 1e-8,
    };

    pub fn is_close(&self, a: f64, b: f64) -> bool {
        (a - b).abs() <= self.atol + self.rtol * b.abs()
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// [`Tolerance::DEFAULT`] closeness of `a` against reference `b`.
pub fn is_close(a: f64, b: f64) -> bool {
    Tolerance::DEFAULT.is_close(a, b)
}
