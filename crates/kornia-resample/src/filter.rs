use std::f64::consts::PI;

/// Name of the filter used when the configuration does not pick one.
pub const DEFAULT_FILTER: &str = "lanczos4";

/// A separable resampling kernel.
///
/// The weight function is evaluated over a distance `t` expressed in source samples and is
/// zero outside of `[-support, support]`.
#[derive(Debug, Clone, Copy)]
pub struct FilterKernel {
    name: &'static str,
    weight: fn(f32) -> f32,
    support: f32,
}

impl FilterKernel {
    /// Create a new filter kernel.
    ///
    /// # Arguments
    ///
    /// * `name` - The name of the kernel.
    /// * `weight` - The weight function. It must be even and finite.
    /// * `support` - The half width beyond which the weight is zero.
    pub const fn new(name: &'static str, weight: fn(f32) -> f32, support: f32) -> Self {
        Self {
            name,
            weight,
            support,
        }
    }

    /// The name of the kernel.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The support radius of the kernel, in source samples.
    #[inline]
    pub fn support(&self) -> f32 {
        self.support
    }

    /// Evaluate the kernel at distance `t`.
    #[inline]
    pub fn weight(&self, t: f32) -> f32 {
        (self.weight)(t)
    }
}

/// The catalog of built-in kernels.
pub static FILTERS: [FilterKernel; 16] = [
    FilterKernel::new("box", box_filter, 0.5),
    FilterKernel::new("tent", tent_filter, 1.0),
    FilterKernel::new("bell", bell_filter, 1.5),
    FilterKernel::new("b-spline", b_spline_filter, 2.0),
    FilterKernel::new("mitchell", mitchell_filter, 2.0),
    FilterKernel::new("lanczos3", lanczos3_filter, 3.0),
    FilterKernel::new("blackman", blackman_filter, 3.0),
    FilterKernel::new("lanczos4", lanczos4_filter, 4.0),
    FilterKernel::new("lanczos6", lanczos6_filter, 6.0),
    FilterKernel::new("lanczos12", lanczos12_filter, 12.0),
    FilterKernel::new("kaiser", kaiser_filter, KAISER_SUPPORT),
    FilterKernel::new("gaussian", gaussian_filter, GAUSSIAN_SUPPORT),
    FilterKernel::new("catmullrom", catmull_rom_filter, 2.0),
    FilterKernel::new("quadratic_interp", quadratic_interp_filter, QUADRATIC_SUPPORT),
    FilterKernel::new("quadratic_approx", quadratic_approx_filter, QUADRATIC_SUPPORT),
    FilterKernel::new("quadratic_mix", quadratic_mix_filter, QUADRATIC_SUPPORT),
];

/// Find a kernel of the catalog by name.
///
/// # Arguments
///
/// * `name` - The name of the kernel, e.g. `"lanczos3"`.
///
/// # Returns
///
/// The kernel, or `None` if no kernel has that name.
pub fn find_filter(name: &str) -> Option<&'static FilterKernel> {
    FILTERS.iter().find(|f| f.name == name)
}

/// The number of kernels in the catalog.
pub fn filter_count() -> usize {
    FILTERS.len()
}

/// The name of the kernel at `index` in the catalog.
pub fn filter_name(index: usize) -> Option<&'static str> {
    FILTERS.get(index).map(|f| f.name)
}

const QUADRATIC_SUPPORT: f32 = 1.5;
const GAUSSIAN_SUPPORT: f32 = 1.25;
const KAISER_SUPPORT: f32 = 3.0;

// windowed kernels flush tiny lobes to zero so they get dropped from contributor lists
fn clean(t: f64) -> f32 {
    const EPSILON: f64 = 0.0000125;
    if t.abs() < EPSILON {
        0.0
    } else {
        t as f32
    }
}

fn sinc(x: f64) -> f64 {
    let x = x * PI;
    if x.abs() < 0.01 {
        return 1.0 + x * x * (-1.0 / 6.0 + x * x / 120.0);
    }
    x.sin() / x
}

fn blackman_exact_window(x: f64) -> f64 {
    0.42659071 + 0.49656062 * (PI * x).cos() + 0.07684867 * (2.0 * PI * x).cos()
}

// zeroth order modified bessel function of the first kind
fn bessel0(x: f64) -> f64 {
    const EPSILON_RATIO: f64 = 1e-16;
    const MAX_TERMS: usize = 500;

    let xh = 0.5 * x;
    let mut sum = 1.0;
    let mut pow = 1.0;
    let mut ds = 1.0;
    let mut k = 0;
    while ds > sum * EPSILON_RATIO && k < MAX_TERMS {
        k += 1;
        pow *= xh / k as f64;
        ds = pow * pow;
        sum += ds;
    }
    sum
}

fn kaiser(alpha: f64, half_width: f64, x: f64) -> f64 {
    let ratio = x / half_width;
    bessel0(alpha * (1.0 - ratio * ratio).sqrt()) / bessel0(alpha)
}

// half-open so that adjacent box footprints never share a sample
fn box_filter(t: f32) -> f32 {
    if (-0.5..0.5).contains(&t) {
        1.0
    } else {
        0.0
    }
}

fn tent_filter(t: f32) -> f32 {
    let t = t.abs();
    if t < 1.0 {
        1.0 - t
    } else {
        0.0
    }
}

fn bell_filter(t: f32) -> f32 {
    let t = t.abs();
    if t < 0.5 {
        0.75 - t * t
    } else if t < 1.5 {
        let t = t - 1.5;
        0.5 * t * t
    } else {
        0.0
    }
}

fn b_spline_filter(t: f32) -> f32 {
    let t = t.abs();
    if t < 1.0 {
        let tt = t * t;
        0.5 * tt * t - tt + 2.0 / 3.0
    } else if t < 2.0 {
        let t = 2.0 - t;
        (1.0 / 6.0) * t * t * t
    } else {
        0.0
    }
}

/// Dodgson quadratic family, `r` trades interpolation for smoothness.
fn quadratic(t: f32, r: f32) -> f32 {
    let t = t.abs();
    if t >= QUADRATIC_SUPPORT {
        return 0.0;
    }
    let tt = t * t;
    if t <= 0.5 {
        (-2.0 * r) * tt + 0.5 * (r + 1.0)
    } else {
        r * tt + (-2.0 * r - 0.5) * t + 0.75 * (r + 1.0)
    }
}

fn quadratic_interp_filter(t: f32) -> f32 {
    quadratic(t, 1.0)
}

fn quadratic_approx_filter(t: f32) -> f32 {
    quadratic(t, 0.5)
}

fn quadratic_mix_filter(t: f32) -> f32 {
    quadratic(t, 0.8)
}

/// Mitchell-Netravali cubic with parameters `(b, c)`.
///
/// `(1/3, 1/3)` is the recommended default, `(0, 0.5)` is Catmull-Rom and `(1, 0)` the cubic
/// B-spline.
fn mitchell(t: f32, b: f32, c: f32) -> f32 {
    let t = t.abs();
    let tt = t * t;
    if t < 1.0 {
        let v = (12.0 - 9.0 * b - 6.0 * c) * (t * tt)
            + (-18.0 + 12.0 * b + 6.0 * c) * tt
            + (6.0 - 2.0 * b);
        v / 6.0
    } else if t < 2.0 {
        let v = (-b - 6.0 * c) * (t * tt)
            + (6.0 * b + 30.0 * c) * tt
            + (-12.0 * b - 48.0 * c) * t
            + (8.0 * b + 24.0 * c);
        v / 6.0
    } else {
        0.0
    }
}

fn mitchell_filter(t: f32) -> f32 {
    mitchell(t, 1.0 / 3.0, 1.0 / 3.0)
}

fn catmull_rom_filter(t: f32) -> f32 {
    mitchell(t, 0.0, 0.5)
}

fn blackman_filter(t: f32) -> f32 {
    let t = t.abs() as f64;
    if t < 3.0 {
        clean(sinc(t) * blackman_exact_window(t / 3.0))
    } else {
        0.0
    }
}

fn gaussian_filter(t: f32) -> f32 {
    let t = t.abs() as f64;
    let support = GAUSSIAN_SUPPORT as f64;
    if t < support {
        clean(
            (-2.0 * t * t).exp() * (2.0 / PI).sqrt() * blackman_exact_window(t / support),
        )
    } else {
        0.0
    }
}

fn lanczos(t: f32, taps: f64) -> f32 {
    let t = t.abs() as f64;
    if t < taps {
        clean(sinc(t) * sinc(t / taps))
    } else {
        0.0
    }
}

fn lanczos3_filter(t: f32) -> f32 {
    lanczos(t, 3.0)
}

fn lanczos4_filter(t: f32) -> f32 {
    lanczos(t, 4.0)
}

fn lanczos6_filter(t: f32) -> f32 {
    lanczos(t, 6.0)
}

fn lanczos12_filter(t: f32) -> f32 {
    lanczos(t, 12.0)
}

fn kaiser_filter(t: f32) -> f32 {
    // stopband attenuation in dB
    const ATTENUATION: f64 = 40.0;

    let t = t.abs() as f64;
    let support = KAISER_SUPPORT as f64;
    if t < support {
        let alpha = (0.58417 * (ATTENUATION - 20.96)).ln() * 0.4;
        let alpha = alpha.exp() + 0.07886 * (ATTENUATION - 20.96);
        clean(sinc(t) * kaiser(alpha, support, t))
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_catalog_lookup() {
        assert_eq!(filter_count(), 16);
        assert_eq!(filter_name(0), Some("box"));
        assert_eq!(filter_name(7), Some("lanczos4"));
        assert_eq!(filter_name(15), Some("quadratic_mix"));
        assert_eq!(filter_name(16), None);

        let lanczos3 = find_filter("lanczos3").expect("lanczos3 is in the catalog");
        assert_eq!(lanczos3.name(), "lanczos3");
        assert_eq!(lanczos3.support(), 3.0);

        assert!(find_filter("Lanczos3").is_none());
        assert!(find_filter("").is_none());
        assert!(find_filter(DEFAULT_FILTER).is_some());

        for i in 0..filter_count() {
            let name = filter_name(i).unwrap();
            assert_eq!(find_filter(name).unwrap().name(), name);
        }
    }

    #[test]
    fn test_kernels_even_and_finite() {
        for filter in FILTERS.iter() {
            for k in 0..200 {
                let t = k as f32 * 0.13;
                let w = filter.weight(t);
                assert!(w.is_finite(), "{} at {}", filter.name(), t);
                assert_eq!(w, filter.weight(-t), "{} at {}", filter.name(), t);
            }
        }
    }

    #[test]
    fn test_kernels_zero_outside_support() {
        for filter in FILTERS.iter() {
            for offset in [0.0, 0.01, 0.5, 3.0, 100.0] {
                let t = filter.support() + offset;
                assert_eq!(filter.weight(t), 0.0, "{} at {}", filter.name(), t);
                assert_eq!(filter.weight(-t - 0.01), 0.0, "{} at {}", filter.name(), -t);
            }
        }
    }

    #[test]
    fn test_box_half_open() {
        let f = find_filter("box").unwrap();
        assert_eq!(f.weight(0.0), 1.0);
        assert_eq!(f.weight(-0.5), 1.0);
        assert_eq!(f.weight(0.49), 1.0);
        assert_eq!(f.weight(0.5), 0.0);
    }

    #[test]
    fn test_interpolating_kernels() {
        for name in ["tent", "catmullrom", "lanczos3", "lanczos4", "lanczos6"] {
            let f = find_filter(name).unwrap();
            assert_abs_diff_eq!(f.weight(0.0), 1.0, epsilon = 1e-6);
            assert_abs_diff_eq!(f.weight(1.0), 0.0, epsilon = 1e-6);
            assert_abs_diff_eq!(f.weight(2.0), 0.0, epsilon = 1e-6);
        }

        let tent = find_filter("tent").unwrap();
        assert_eq!(tent.weight(0.25), 0.75);
    }

    #[test]
    fn test_mitchell_values() {
        let f = find_filter("mitchell").unwrap();
        assert_abs_diff_eq!(f.weight(0.0), 8.0 / 9.0, epsilon = 1e-6);
        assert_abs_diff_eq!(f.weight(1.0), 1.0 / 18.0, epsilon = 1e-6);
    }

    #[test]
    fn test_quadratic_continuity() {
        for name in ["quadratic_interp", "quadratic_approx", "quadratic_mix"] {
            let f = find_filter(name).unwrap();
            assert_abs_diff_eq!(f.weight(0.5), f.weight(0.500_001), epsilon = 1e-4);
            assert_abs_diff_eq!(f.weight(1.499_99), 0.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_bessel0() {
        assert_abs_diff_eq!(bessel0(0.0), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(bessel0(1.0), 1.266_065_877_752_008_4, epsilon = 1e-12);
    }

    #[test]
    fn test_custom_kernel() {
        fn half(_: f32) -> f32 {
            0.5
        }
        let f = FilterKernel::new("half", half, 2.0);
        assert_eq!(f.name(), "half");
        assert_eq!(f.weight(1.0), 0.5);
    }
}
