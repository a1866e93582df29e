use num_complex::Complex64;
use std::f64::consts::PI;

/// The largest degree whose Wigner 3j symbols fit the f64 factorials.
pub const MAX_DEGREE: usize = 56;

/// The fully normalized associated Legendre functions of degree `l`, for
/// m = 0..=l, including the Condon-Shortley phase.
///
/// Normalized such that Y_lm(θ, φ) = P̄_lm(cos θ) e^{imφ}.
pub fn normalized_legendre(l: usize, x: f64) -> Vec<f64> {
    let s = (1. - x * x).max(0.).sqrt();
    let mut out = vec![0f64; l + 1];
    // P̄_00 = 1 / sqrt(4π)
    let mut pmm = 0.5 / PI.sqrt();
    for (m, out) in out.iter_mut().enumerate() {
        if m > 0 {
            pmm *= -((2 * m + 1) as f64 / (2 * m) as f64).sqrt() * s;
        }
        if m == l {
            *out = pmm;
            break;
        }
        let mf = m as f64;
        let mut p_prev = pmm;
        let mut p = ((2 * m + 3) as f64).sqrt() * x * pmm;
        for degree in (m + 2)..=l {
            let lf = degree as f64;
            let a = ((4. * lf * lf - 1.) / (lf * lf - mf * mf)).sqrt();
            let b = (((lf - 1.) * (lf - 1.) - mf * mf)
                     / (4. * (lf - 1.) * (lf - 1.) - 1.)).sqrt();
            let next = a * (x * p - b * p_prev);
            p_prev = p;
            p = next;
        }
        *out = p;
    }
    out
}

/// The spherical harmonics Y_lm(θ, φ) for m = -l..=l, stored at index m + l.
pub fn spherical_harmonics(l: usize, theta: f64, phi: f64) -> Vec<Complex64> {
    let legendre = normalized_legendre(l, theta.cos());
    let mut ylm = vec![Complex64::new(0., 0.); 2 * l + 1];
    for (m, p) in legendre.iter().enumerate() {
        let y = Complex64::from_polar(*p, m as f64 * phi);
        ylm[l + m] = y;
        if m > 0 {
            // Y_l,-m = (-1)^m conj(Y_lm)
            let sign = if m % 2 == 0 { 1. } else { -1. };
            ylm[l - m] = y.conj() * sign;
        }
    }
    ylm
}

/// The spherical harmonics of degree `l` in the direction of a bond vector.
pub fn bond_harmonics(l: usize, v: [f64; 3]) -> Vec<Complex64> {
    let r = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    let theta = if r > 0. {
        (v[2] / r).max(-1.).min(1.).acos()
    } else {
        0.
    };
    let phi = v[1].atan2(v[0]);
    spherical_harmonics(l, theta, phi)
}

/// n! for n = 0..=3 * MAX_DEGREE + 1.
fn factorials() -> Vec<f64> {
    let mut out = Vec::with_capacity(3 * MAX_DEGREE + 2);
    out.push(1f64);
    for n in 1..(3 * MAX_DEGREE + 2) {
        let prev = out[n - 1];
        out.push(prev * n as f64);
    }
    out
}

/// The Wigner 3j symbol (j1 j2 j3; m1 m2 m3) from the Racah formula.
pub fn wigner3j(j: [i64; 3], m: [i64; 3]) -> f64 {
    let [j1, j2, j3] = j;
    let [m1, m2, m3] = m;
    if m1 + m2 + m3 != 0
       || m1.abs() > j1
       || m2.abs() > j2
       || m3.abs() > j3
       || j3 < (j1 - j2).abs()
       || j3 > j1 + j2
    {
        return 0.;
    }
    let f = factorials();
    let fact = |n: i64| f[n as usize];
    let triangle = fact(j1 + j2 - j3) * fact(j1 - j2 + j3) * fact(-j1 + j2 + j3)
                   / fact(j1 + j2 + j3 + 1);
    let prefactor = (triangle
                     * fact(j1 + m1)
                     * fact(j1 - m1)
                     * fact(j2 + m2)
                     * fact(j2 - m2)
                     * fact(j3 + m3)
                     * fact(j3 - m3)).sqrt();
    let k_min = 0.max(j2 - j3 - m1).max(j1 - j3 + m2);
    let k_max = (j1 + j2 - j3).min(j1 - m1).min(j2 + m2);
    let mut sum = 0f64;
    for k in k_min..=k_max {
        let sign = if k % 2 == 0 { 1. } else { -1. };
        sum += sign
               / (fact(k)
                  * fact(j3 - j2 + k + m1)
                  * fact(j3 - j1 + k - m2)
                  * fact(j1 + j2 - j3 - k)
                  * fact(j1 - k - m1)
                  * fact(j2 - k + m2));
    }
    let sign = if (j1 - j2 - m3).rem_euclid(2) == 0 { 1. } else { -1. };
    sign * prefactor * sum
}

/// The non-zero 3j symbols (l l l; m1 m2 m3) of one degree.
pub struct WignerTable {
    /// (m1 + l, m2 + l, m3 + l, symbol)
    coefficients: Vec<(usize, usize, usize, f64)>,
}

impl WignerTable {
    pub fn new(l: usize) -> Self {
        let li = l as i64;
        let mut coefficients = Vec::new();
        for m1 in -li..=li {
            for m2 in -li..=li {
                let m3 = -m1 - m2;
                if m3.abs() > li {
                    continue;
                }
                let w = wigner3j([li, li, li], [m1, m2, m3]);
                if w != 0. {
                    coefficients.push(((m1 + li) as usize,
                                       (m2 + li) as usize,
                                       (m3 + li) as usize,
                                       w));
                }
            }
        }
        Self { coefficients }
    }

    /// The third order invariant Re Σ (l l l; m1 m2 m3) q_lm1 q_lm2 q_lm3 of
    /// the 2l + 1 components `qlm`.
    pub fn wl(&self, qlm: &[Complex64]) -> f64 {
        self.coefficients
            .iter()
            .map(|(a, b, c, w)| w * (qlm[*a] * qlm[*b] * qlm[*c]).re)
            .sum()
    }
}
