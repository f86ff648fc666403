//! Skip lists use a probabilistic distribution of nodes over their levels,
//! whereby the lowest level (level 0) contains all the nodes, and each level
//! above it contains a random subset of the nodes on the level below.
//!
//! Heights are drawn from a geometric distribution: a node of height `$h$` is
//! promoted to height `$h + 1$` with a fixed probability `$p$`, truncated at
//! a hard cap. The expected height is `$1 / (1 - p)$`.

use rand::Rng;
use thiserror::Error;

/// Errors produced when validating height-sampling parameters.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum SampleError {
    /// The promotion probability must lie in `$[0, 1)$`.
    #[error("promotion probability must be in [0, 1).")]
    InvalidProbability,
    /// The maximum height must be at least one.
    #[error("max height must be at least 1.")]
    ZeroMaxHeight,
}

// ////////////////////////////////////////////////////////////////////////////
// Geometric
// ////////////////////////////////////////////////////////////////////////////

/// A height sampler using a truncated geometric distribution.
///
/// The sampler holds only the validated parameters; the uniform draws come
/// from the lazily-seeded thread-local generator, which is seeded once and
/// shared by every sample. Reseeding on each call would produce correlated,
/// biased structures.
#[derive(Debug, Clone, Copy)]
pub struct Geometric {
    /// The probability that a node present at one level is promoted to the
    /// next.
    p: f64,
    /// The hard cap on sampled heights.
    max_height: usize,
}

impl Geometric {
    /// Create a new geometric height sampler with promotion probability `p`
    /// and a hard cap of `max_height`.
    ///
    /// # Errors
    ///
    /// `p` must lie in `$[0, 1)$` and `max_height` must be at least 1.
    #[inline]
    pub fn new(p: f64, max_height: usize) -> Result<Self, SampleError> {
        if max_height == 0 {
            return Err(SampleError::ZeroMaxHeight);
        }
        if !(0.0..1.0).contains(&p) {
            return Err(SampleError::InvalidProbability);
        }
        Ok(Geometric { p, max_height })
    }

    /// The promotion probability.
    #[must_use]
    #[inline]
    pub fn p(&self) -> f64 {
        self.p
    }

    /// The hard cap on sampled heights.
    #[must_use]
    #[inline]
    pub fn max_height(&self) -> usize {
        self.max_height
    }

    /// Draw a height in `[1, max_height]`.
    ///
    /// Starting from 1, the height is incremented while a fresh uniform draw
    /// in `$[0, 1)$` falls at or below `p` and the cap has not been reached,
    /// realizing `$P(h = k) \approx p^{k-1}(1 - p)$` truncated at
    /// `max_height`.
    #[must_use]
    #[inline]
    pub fn sample(&self) -> usize {
        let mut rng = rand::rng();
        let mut height = 1;
        while height < self.max_height && rng.random::<f64>() <= self.p {
            height += 1;
        }
        height
    }
}

/// Draw a single height in `[1, max_height]` from a truncated geometric
/// distribution with promotion probability `p`.
///
/// Equivalent to [`Geometric::new`] followed by [`Geometric::sample`]; the
/// parameters are re-validated on every call.
///
/// # Errors
///
/// `p` must lie in `$[0, 1)$` and `max_height` must be at least 1.
///
/// # Examples
///
/// ```
/// # fn main() -> Result<(), skiparena::SampleError> {
/// let height = skiparena::sample_height(0.5, 16)?;
/// assert!((1..=16).contains(&height));
/// # Ok(())
/// # }
/// ```
#[inline]
pub fn sample_height(p: f64, max_height: usize) -> Result<usize, SampleError> {
    Ok(Geometric::new(p, max_height)?.sample())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::{Geometric, SampleError, sample_height};

    #[test]
    fn invalid_max() {
        assert_eq!(Geometric::new(0.5, 0).err(), Some(SampleError::ZeroMaxHeight));
    }

    #[test]
    fn invalid_p() {
        assert_eq!(
            Geometric::new(-0.1, 16).err(),
            Some(SampleError::InvalidProbability)
        );
        assert_eq!(
            Geometric::new(1.0, 16).err(),
            Some(SampleError::InvalidProbability)
        );
        assert_eq!(
            Geometric::new(f64::NAN, 16).err(),
            Some(SampleError::InvalidProbability)
        );
    }

    #[test]
    fn zero_p_is_valid() -> Result<(), SampleError> {
        let sampler = Geometric::new(0.0, 16)?;
        assert_eq!(sampler.p(), 0.0);
        Ok(())
    }

    #[rstest]
    fn in_range(
        #[values(1, 2, 16, 64)] max_height: usize,
        #[values(0.0, 0.25, 0.5, 0.9)] p: f64,
    ) -> Result<(), SampleError> {
        let sampler = Geometric::new(p, max_height)?;
        assert_eq!(sampler.max_height(), max_height);
        for _ in 0..10_000 {
            let height = sampler.sample();
            assert!((1..=max_height).contains(&height));
        }
        Ok(())
    }

    #[test]
    fn reaches_cap() -> anyhow::Result<()> {
        // With p = 0.5 and a cap of 4, a capped draw has probability 1/8.
        let sampler = Geometric::new(0.5, 4)?;
        let mut found = [false; 4];
        for _ in 0..1_000_000 {
            found[sampler.sample() - 1] = true;
            if found.iter().all(|&f| f) {
                return Ok(());
            }
        }
        anyhow::bail!("not every height in 1..=4 was sampled");
    }

    #[test]
    fn mean_height() -> Result<(), SampleError> {
        // Expected height is 1 / (1 - p) = 2; the cap of 32 is effectively
        // never hit. Tolerance is far above the standard error of the mean.
        let sampler = Geometric::new(0.5, 32)?;
        let draws = 100_000;
        let total: usize = (0..draws).map(|_| sampler.sample()).sum();
        #[allow(clippy::cast_precision_loss)]
        let mean = total as f64 / draws as f64;
        assert!(
            (mean - 2.0).abs() < 0.05,
            "mean height {mean} not within 0.05 of 2.0"
        );
        Ok(())
    }

    #[test]
    fn tail_distribution() -> Result<(), SampleError> {
        // The fraction of draws with height >= k should approximate p^(k-1).
        let p = 0.5;
        let sampler = Geometric::new(p, 32)?;
        let draws = 100_000;
        let heights: Vec<usize> = (0..draws).map(|_| sampler.sample()).collect();
        for k in 2..=5 {
            let at_least = heights.iter().filter(|&&h| h >= k).count();
            #[allow(clippy::cast_precision_loss)]
            let fraction = at_least as f64 / draws as f64;
            let expected = p.powi(i32::try_from(k).unwrap_or(i32::MAX) - 1);
            assert!(
                (fraction - expected).abs() < 0.01,
                "P(height >= {k}) was {fraction}, expected about {expected}"
            );
        }
        Ok(())
    }

    #[test]
    fn free_function() {
        assert_eq!(
            sample_height(0.5, 0).err(),
            Some(SampleError::ZeroMaxHeight)
        );
        assert_eq!(
            sample_height(2.0, 8).err(),
            Some(SampleError::InvalidProbability)
        );
        for _ in 0..100 {
            let height = sample_height(0.5, 8).unwrap_or(0);
            assert!((1..=8).contains(&height));
        }
    }
}
