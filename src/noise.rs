//! Uniform channel noise applied to constellation points.

use crate::{QamError, QamResult};
use num_complex::Complex;
use rand::Rng;
use rand_distr::{Distribution, StandardUniform};
use serde::{Deserialize, Serialize};

/// Peak-to-peak width of the uniform perturbation added to each coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct NoiseLevel(f64);

impl NoiseLevel {
    pub const NONE: NoiseLevel = NoiseLevel(0f64);

    pub fn new(level: f64) -> QamResult<Self> {
        if level.is_finite() && level >= 0f64 {
            Ok(Self(level))
        } else {
            Err(QamError::NoiseOutOfRange(level))
        }
    }

    /// Noise from a slider percentage in [0, 100].
    pub fn from_percent(percent: f64) -> QamResult<Self> {
        if (0f64..=100f64).contains(&percent) {
            Ok(Self(percent / 100f64))
        } else {
            Err(QamError::NoiseOutOfRange(percent))
        }
    }

    pub fn level(self) -> f64 {
        self.0
    }

    pub fn percent(self) -> f64 {
        self.0 * 100f64
    }

    pub fn is_none(self) -> bool {
        self.0 == 0f64
    }
}

impl TryFrom<f64> for NoiseLevel {
    type Error = QamError;

    fn try_from(level: f64) -> QamResult<Self> {
        Self::new(level)
    }
}

impl From<NoiseLevel> for f64 {
    fn from(noise: NoiseLevel) -> f64 {
        noise.0
    }
}

/// Adds `(U - 0.5) * level` to each coordinate, `U ~ U[0, 1)`.
///
/// The in-phase draw is taken before the quadrature draw, so a seeded `rng`
/// reproduces the same noisy point.
#[inline]
pub fn perturb<R: Rng + ?Sized>(
    point: Complex<f64>,
    noise: NoiseLevel,
    rng: &mut R,
) -> Complex<f64> {
    let n_1: f64 = StandardUniform.sample(rng);
    let n_2: f64 = StandardUniform.sample(rng);
    point + Complex::new((n_1 - 0.5) * noise.0, (n_2 - 0.5) * noise.0)
}

/// One fresh noisy point per ideal point, in order.
pub fn perturb_all<R: Rng + ?Sized>(
    points: &[Complex<f64>],
    noise: NoiseLevel,
    rng: &mut R,
) -> Vec<Complex<f64>> {
    points.iter().map(|&p| perturb(p, noise, rng)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rstest::rstest;

    #[test]
    fn zero_noise_is_identity() {
        let mut rng = rand::rng();
        for point in [
            Complex::new(0f64, 0f64),
            Complex::new(-1f64, 1f64),
            Complex::new(1f64 / 3f64, -0.5),
        ] {
            assert_eq!(perturb(point, NoiseLevel::NONE, &mut rng), point);
        }
    }

    #[rstest]
    #[case(0.01)]
    #[case(0.25)]
    #[case(1f64)]
    fn noise_stays_in_band(#[case] level: f64) {
        let mut rng = StdRng::seed_from_u64(7);
        let noise = NoiseLevel::new(level).unwrap();
        let point = Complex::new(1f64 / 3f64, -1f64);

        let noisy: Vec<Complex<f64>> = (0..2000).map(|_| perturb(point, noise, &mut rng)).collect();

        assert!(noisy.iter().all(|n| (n.re - point.re).abs() <= level / 2f64 + 1e-12));
        assert!(noisy.iter().all(|n| (n.im - point.im).abs() <= level / 2f64 + 1e-12));
        assert!(noisy.iter().any(|&n| n != noisy[0]));
    }

    #[test]
    fn seeded_noise_is_reproducible() {
        let noise = NoiseLevel::from_percent(40f64).unwrap();
        let points = [Complex::new(-1f64, 1f64), Complex::new(1f64, -1f64)];

        let a = perturb_all(&points, noise, &mut StdRng::seed_from_u64(1234));
        let b = perturb_all(&points, noise, &mut StdRng::seed_from_u64(1234));
        assert_eq!(a, b);
        assert_ne!(a[0], points[0]);
    }

    #[test]
    fn noise_matches_uniform_draws() {
        let noise = NoiseLevel::new(0.5).unwrap();
        let point = Complex::new(0.25, -0.25);

        let mut draws = StdRng::seed_from_u64(99);
        let u_1: f64 = StandardUniform.sample(&mut draws);
        let u_2: f64 = StandardUniform.sample(&mut draws);

        let noisy = perturb(point, noise, &mut StdRng::seed_from_u64(99));
        assert_eq!(noisy.re, 0.25 + (u_1 - 0.5) * 0.5);
        assert_eq!(noisy.im, -0.25 + (u_2 - 0.5) * 0.5);
    }

    #[rstest]
    #[case(-1f64)]
    #[case(100.5)]
    #[case(f64::NAN)]
    fn rejects_bad_percent(#[case] percent: f64) {
        assert!(NoiseLevel::from_percent(percent).is_err());
    }

    #[test]
    fn percent_scaling() {
        let noise = NoiseLevel::from_percent(35f64).unwrap();
        assert_eq!(noise.level(), 0.35);
        assert!(NoiseLevel::new(f64::INFINITY).is_err());
        assert!(NoiseLevel::new(2f64).is_ok());
        assert!(NoiseLevel::from_percent(0f64).unwrap().is_none());
    }
}
