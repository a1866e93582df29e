use crate::lattice::ReducedBox;
use crate::utils;

/// A static particle configuration: the periodic box and the particle
/// positions in cartesian coordinates.
///
/// The order of `positions` is the particle index and is the row order of
/// every result computed from the configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct Configuration {
    pub reduced_box: ReducedBox,
    pub positions: Vec<[f64; 3]>,
}

impl Configuration {
    pub fn new(reduced_box: ReducedBox, positions: Vec<[f64; 3]>) -> Self {
        Self { reduced_box,
               positions }
    }

    /// The number of particles.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Returns a copy with half of each box edge length subtracted from every
    /// position, moving a [0, L) frame to one centred on the origin.
    pub fn centered(&self) -> Self {
        let half = utils::scale(self.reduced_box.lengths(), 0.5);
        let positions = self.positions
                            .iter()
                            .map(|p| utils::subtract(*p, half))
                            .collect();
        Self { reduced_box: self.reduced_box,
               positions }
    }

    /// The positions in fractional coordinates wrapped into [0, 1).
    pub fn fractional_positions(&self) -> Vec<[f64; 3]> {
        let to_fractional = self.reduced_box.to_fractional();
        self.positions
            .iter()
            .map(|p| {
                let mut frac = utils::dot(*p, to_fractional);
                for f in &mut frac {
                    *f = f.rem_euclid(1.);
                    // rem_euclid can round up to exactly 1 for tiny negatives
                    if *f >= 1. {
                        *f = 0.;
                    }
                }
                frac
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_centered() {
        let reduced_box = ReducedBox::from_lengths(2., 4., 6.).unwrap();
        let config = Configuration::new(reduced_box, vec![[1., 2., 3.], [0., 0., 0.]]);
        let centered = config.centered();
        assert_eq!(centered.positions, vec![[0., 0., 0.], [-1., -2., -3.]]);
        assert_eq!(centered.reduced_box, reduced_box);
        // centering returns a copy
        assert_eq!(config.positions[0], [1., 2., 3.]);
    }

    #[test]
    fn configuration_fractional_positions() {
        let reduced_box = ReducedBox::from_lengths(2., 4., 5.).unwrap();
        let config = Configuration::new(reduced_box, vec![[-0.5, 5., 2.5]]);
        let frac = config.fractional_positions();
        assert_eq!(frac, vec![[0.75, 0.25, 0.5]]);
    }

    #[test]
    fn configuration_len() {
        let reduced_box = ReducedBox::from_lengths(1., 1., 1.).unwrap();
        let config = Configuration::new(reduced_box, vec![]);
        assert_eq!(config.len(), 0);
        assert!(config.is_empty());
    }
}
