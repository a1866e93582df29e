use crate::configuration::Configuration;
use crate::lattice::ReducedBox;
use crate::utils;
use tracing::debug;

/// The most cells along any one axis.
const MAX_CELLS: usize = 64;

/// A periodic cell list binned in fractional coordinates.
///
/// The box is split into `dims` cells along each lattice direction such that
/// every cell is at least `cell_width` thick between its planes. A query
/// visits as many layers of cells as its radius needs, so queries larger than
/// the cell width, or even the box, return every periodic image in range.
pub struct CellList {
    reduced_box: ReducedBox,
    plane_distances: [f64; 3],
    dims: [usize; 3],
    fractional: Vec<[f64; 3]>,
    cell_of: Vec<[usize; 3]>,
    cells: Vec<Vec<usize>>,
}

impl CellList {
    /// Bins the particles of `config` into cells of width at least
    /// `cell_width`.
    pub fn new(config: &Configuration, cell_width: f64) -> Self {
        let reduced_box = config.reduced_box;
        let plane_distances = reduced_box.plane_distances();
        let mut dims = [1usize; 3];
        for (d, pd) in dims.iter_mut().zip(plane_distances.iter()) {
            if cell_width > 0. {
                *d = ((pd / cell_width).floor() as usize).max(1).min(MAX_CELLS);
            }
        }
        let fractional = config.fractional_positions();
        let mut cells = vec![Vec::new(); dims[0] * dims[1] * dims[2]];
        let cell_of = fractional.iter()
                                .enumerate()
                                .map(|(i, f)| {
                                    let mut c = [0usize; 3];
                                    for k in 0..3 {
                                        c[k] = ((f[k] * dims[k] as f64) as usize)
                                               .min(dims[k] - 1);
                                    }
                                    cells[Self::flatten(c, dims)].push(i);
                                    c
                                })
                                .collect::<Vec<[usize; 3]>>();
        debug!(dims = ?dims, cell_width, "Built cell list.");
        Self { reduced_box,
               plane_distances,
               dims,
               fractional,
               cell_of,
               cells }
    }

    fn flatten(c: [usize; 3], dims: [usize; 3]) -> usize {
        (c[0] * dims[1] + c[1]) * dims[2] + c[2]
    }

    /// Finds every periodic image of every particle within `r` of particle
    /// `i`, excluding `i` itself but including its other images.
    ///
    /// Returns (particle, displacement from `i` to the image).
    pub fn query(&self, i: usize, r: f64) -> Vec<(usize, [f64; 3])> {
        let mut out = Vec::new();
        let mut span = [0isize; 3];
        for k in 0..3 {
            span[k] = (r * self.dims[k] as f64 / self.plane_distances[k]).ceil()
                      as isize;
        }
        let centre = self.cell_of[i];
        let fi = self.fractional[i];
        let r_squared = r * r;
        for ox in -span[0]..=span[0] {
            for oy in -span[1]..=span[1] {
                for oz in -span[2]..=span[2] {
                    let mut cell = [0usize; 3];
                    let mut image = [0f64; 3];
                    for (k, o) in [ox, oy, oz].iter().enumerate() {
                        let c = centre[k] as isize + o;
                        let d = self.dims[k] as isize;
                        cell[k] = c.rem_euclid(d) as usize;
                        image[k] = c.div_euclid(d) as f64;
                    }
                    let is_home = image == [0.; 3];
                    for &j in self.cells[Self::flatten(cell, self.dims)].iter() {
                        if j == i && is_home {
                            continue;
                        }
                        let fj = self.fractional[j];
                        let frac = [fj[0] + image[0] - fi[0],
                                    fj[1] + image[1] - fi[1],
                                    fj[2] + image[2] - fi[2]];
                        let vector = self.reduced_box.make_cartesian(frac);
                        if utils::vdot(vector, vector) <= r_squared {
                            out.push((j, vector));
                        }
                    }
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simple_cubic(n: usize) -> Configuration {
        let l = n as f64;
        let reduced_box = ReducedBox::from_lengths(l, l, l).unwrap();
        let mut positions = Vec::new();
        for x in 0..n {
            for y in 0..n {
                for z in 0..n {
                    positions.push([x as f64, y as f64, z as f64]);
                }
            }
        }
        Configuration::new(reduced_box, positions)
    }

    #[test]
    fn cell_list_dims() {
        let config = simple_cubic(4);
        assert_eq!(CellList::new(&config, 1.5).dims, [2, 2, 2]);
        assert_eq!(CellList::new(&config, 10.).dims, [1, 1, 1]);
        assert_eq!(CellList::new(&config, 0.001).dims, [64, 64, 64]);
    }

    #[test]
    fn cell_list_query_nearest() {
        let config = simple_cubic(4);
        let cell_list = CellList::new(&config, 1.2);
        for i in 0..config.len() {
            let found = cell_list.query(i, 1.2);
            assert_eq!(found.len(), 6);
            for (j, v) in found {
                assert_ne!(j, i);
                assert!((utils::norm(v) - 1.).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn cell_list_query_self_images() {
        // a single particle only sees itself through the boundaries
        let config = simple_cubic(1);
        let cell_list = CellList::new(&config, 1.2);
        let found = cell_list.query(0, 1.2);
        assert_eq!(found.len(), 6);
        assert!(found.iter().all(|(j, _)| *j == 0));
        // 6 faces, 12 edges and 8 corners of the surrounding cube
        assert_eq!(cell_list.query(0, 1.8).len(), 26);
    }

    #[test]
    fn cell_list_query_independent_of_width() {
        let reduced_box = ReducedBox { lx: 5.,
                                       ly: 4.,
                                       lz: 6.,
                                       xy: 0.3,
                                       xz: -0.2,
                                       yz: 0.1 };
        let positions = vec![[0.1, 0.2, 0.3],
                             [2.5, 1.1, 4.0],
                             [4.9, 3.8, 5.9],
                             [1.0, 3.0, -1.0],
                             [3.3, 0.4, 2.2]];
        let config = Configuration::new(reduced_box, positions);
        let coarse = CellList::new(&config, 10.);
        let fine = CellList::new(&config, 0.5);
        for i in 0..config.len() {
            let mut a = coarse.query(i, 1.9);
            let mut b = fine.query(i, 1.9);
            let key = |x: &(usize, [f64; 3])| (x.0, (utils::norm(x.1) * 1e9) as i64);
            a.sort_by_key(key);
            b.sort_by_key(key);
            assert_eq!(a.len(), b.len());
            for (x, y) in a.iter().zip(b.iter()) {
                assert_eq!(x.0, y.0);
                for k in 0..3 {
                    assert!((x.1[k] - y.1[k]).abs() < 1e-12);
                }
            }
        }
    }
}
