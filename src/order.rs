use crate::configuration::Configuration;
use crate::errors::OrderError;
use crate::harmonics::{self, WignerTable, MAX_DEGREE};
use crate::neighbors::{self, NeighborList, NeighborMode};
use crate::progress::Bar;
use crate::utils;
use anyhow::{Context, Result};
use num_complex::Complex64;
use rustc_hash::FxHashMap;
use std::f64::consts::PI;
use tracing::{debug, info};

/// One order parameter to compute for every particle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParameterSpec {
    /// Degree of the spherical harmonics.
    pub l: usize,
    /// Average the harmonics over the neighbours of neighbours first.
    pub average: bool,
    /// Weight each bond by its neighbour list weight.
    pub weighted: bool,
    /// Compute the third order invariant w_l instead of q_l.
    pub wl: bool,
    /// Divide w_l by (Σ|q_lm|²)^(3/2).
    pub wl_normalize: bool,
}

impl ParameterSpec {
    /// The Steinhardt q_l.
    pub fn ql(l: usize, average: bool, weighted: bool) -> Self {
        Self { l,
               average,
               weighted,
               wl: false,
               wl_normalize: false }
    }

    /// The third order invariant w_l, normalized to ŵ_l if `normalize`.
    pub fn wl(l: usize, average: bool, weighted: bool, normalize: bool) -> Self {
        Self { l,
               average,
               weighted,
               wl: true,
               wl_normalize: normalize }
    }
}

/// Per particle results: one row per particle, one column per
/// [`ParameterSpec`] in the order requested.
#[derive(Clone, Debug, PartialEq)]
pub struct OrderTable {
    rows: usize,
    columns: usize,
    values: Vec<f64>,
}

impl OrderTable {
    /// Builds a table from row-major `values`.
    pub fn new(values: Vec<f64>, columns: usize) -> Self {
        let rows = if columns == 0 { 0 } else { values.len() / columns };
        Self { rows,
               columns,
               values }
    }

    /// Builds a table from its columns, each holding one value per particle.
    fn from_columns(rows: usize, columns: Vec<Vec<f64>>) -> Self {
        let mut values = Vec::with_capacity(rows * columns.len());
        for i in 0..rows {
            values.extend(columns.iter().map(|c| c[i]));
        }
        Self { rows,
               columns: columns.len(),
               values }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn get(&self, row: usize, column: usize) -> f64 {
        self.values[row * self.columns + column]
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.values[i * self.columns..(i + 1) * self.columns]
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> {
        (0..self.rows).map(move |i| self.row(i))
    }
}

/// The harmonics of a particle: q_lm for m = -l..=l at index m + l.
type Qlm = Vec<Complex64>;

/// q_lm(i) = Σ w Y_lm / Σ w over the bonds of each particle.
fn local_qlm(neighbors: &NeighborList,
             l: usize,
             weighted: bool,
             threads: usize)
             -> Result<Vec<Qlm>, OrderError> {
    utils::chunk_map(neighbors.num_points(), threads, |range| {
        let mut chunk = Vec::with_capacity(range.len());
        for i in range {
            let mut qlm = vec![Complex64::new(0., 0.); 2 * l + 1];
            let mut total_weight = 0f64;
            for bond in neighbors.neighbors(i) {
                let weight = if weighted { bond.weight } else { 1. };
                let ylm = harmonics::bond_harmonics(l, bond.vector);
                for (q, y) in qlm.iter_mut().zip(ylm.iter()) {
                    *q += y * weight;
                }
                total_weight += weight;
            }
            // no bonds leaves 0 / 0 = NaN
            for q in qlm.iter_mut() {
                *q /= total_weight;
            }
            chunk.push(qlm);
        }
        Ok(chunk)
    })
}

/// Averages the harmonics over the particle and the neighbours of each of
/// its neighbours.
fn average_qlm(neighbors: &NeighborList,
               qlm: &[Qlm],
               threads: usize)
               -> Result<Vec<Qlm>, OrderError> {
    utils::chunk_map(neighbors.num_points(), threads, |range| {
        let mut chunk = Vec::with_capacity(range.len());
        for i in range {
            let mut average = qlm[i].clone();
            let mut count = 1usize;
            for bond in neighbors.neighbors(i) {
                for second in neighbors.neighbors(bond.point) {
                    for (a, q) in average.iter_mut().zip(qlm[second.point].iter()) {
                        *a += q;
                    }
                    count += 1;
                }
            }
            for a in average.iter_mut() {
                *a /= count as f64;
            }
            chunk.push(average);
        }
        Ok(chunk)
    })
}

/// sqrt(4π / (2l + 1) Σ|q_lm|²)
fn ql(qlm: &[Complex64]) -> f64 {
    let l = (qlm.len() - 1) / 2;
    let norm = qlm.iter().map(|q| q.norm_sqr()).sum::<f64>();
    (4. * PI / (2 * l + 1) as f64 * norm).sqrt()
}

/// w_l, or ŵ_l when `normalize` is set.
fn wl(qlm: &[Complex64], table: &WignerTable, normalize: bool) -> f64 {
    let w = table.wl(qlm);
    if normalize {
        let norm = qlm.iter().map(|q| q.norm_sqr()).sum::<f64>();
        w / norm.powf(1.5)
    } else {
        w
    }
}

/// Computes every [`ParameterSpec`] for every particle of `config`.
///
/// The harmonics of each (l, weighted, average) combination are computed once
/// and shared between the specs that need them. Particles without bonds get
/// NaN.
pub fn compute(config: &Configuration,
               neighbors: &NeighborList,
               specs: &[ParameterSpec],
               threads: usize,
               progress_bar: &Bar)
               -> Result<OrderTable, OrderError> {
    if neighbors.num_points() != config.len() {
        return Err(OrderError::Mismatch(config.len(), neighbors.num_points()));
    }
    if let Some(spec) = specs.iter().find(|s| s.l > MAX_DEGREE) {
        return Err(OrderError::DegreeTooLarge(spec.l, MAX_DEGREE));
    }
    let mut cache = FxHashMap::<(usize, bool, bool), Vec<Qlm>>::default();
    let mut columns = Vec::with_capacity(specs.len());
    for spec in specs {
        let key = (spec.l, spec.weighted, spec.average);
        if !cache.contains_key(&key) {
            debug!(l = spec.l, weighted = spec.weighted, average = spec.average,
                   "Computing harmonics.");
            let local_key = (spec.l, spec.weighted, false);
            if !cache.contains_key(&local_key) {
                let local = local_qlm(neighbors, spec.l, spec.weighted, threads)?;
                cache.insert(local_key, local);
            }
            if spec.average {
                let averaged = average_qlm(neighbors, &cache[&local_key], threads)?;
                cache.insert(key, averaged);
            }
        }
        let qlm = &cache[&key];
        let table = if spec.wl {
            Some(WignerTable::new(spec.l))
        } else {
            None
        };
        let column = utils::chunk_map(qlm.len(), threads, |range| {
            let mut chunk = Vec::with_capacity(range.len());
            for i in range {
                let value = match &table {
                    Some(table) => wl(&qlm[i], table, spec.wl_normalize),
                    None => ql(&qlm[i]),
                };
                chunk.push(value);
                progress_bar.tick();
            }
            Ok::<_, OrderError>(chunk)
        })?;
        columns.push(column);
    }
    Ok(OrderTable::from_columns(config.len(), columns))
}

/// q4, q6, ŵ4 and ŵ6 of every particle.
pub fn compute_qls(config: &Configuration,
                   neighbors: &NeighborList,
                   average: bool,
                   weighted: bool,
                   threads: usize,
                   progress_bar: &Bar)
                   -> Result<OrderTable, OrderError> {
    let specs = [ParameterSpec::ql(4, average, weighted),
                 ParameterSpec::ql(6, average, weighted),
                 ParameterSpec::wl(4, average, weighted, true),
                 ParameterSpec::wl(6, average, weighted, true)];
    compute(config, neighbors, &specs, threads, progress_bar)
}

/// Minkowski Structure Metrics: the Voronoi facet area weighted q_l, or ŵ_l
/// if `wl` is set, for l = 0..=lmax.
pub fn compute_msms(config: &Configuration,
                    lmax: usize,
                    average: bool,
                    wl: bool,
                    threads: usize,
                    silent: bool)
                    -> Result<OrderTable> {
    let bar = Bar::stage(config.len() as u64, "Voronoi Tessellation:", silent);
    let nlist = neighbors::resolve(config, NeighborMode::Voronoi, threads, &bar)?;
    drop(bar);
    let specs = (0..=lmax).map(|l| ParameterSpec { l,
                                                   average,
                                                   weighted: true,
                                                   wl,
                                                   wl_normalize: wl })
                          .collect::<Vec<ParameterSpec>>();
    let bar = Bar::stage((config.len() * specs.len()) as u64,
                         "Structure Metrics:",
                         silent);
    let table = compute(config, &nlist, &specs, threads, &bar)
        .context("Failed to compute the Minkowski structure metrics.")?;
    info!(lmax, average, wl, "Computed Minkowski structure metrics.");
    Ok(table)
}

/// Resolves the neighbours, Voronoi if `weighted` and within `r_max`
/// otherwise, then computes q4, q6, ŵ4 and ŵ6.
pub fn compute_qls_and_neighbors(config: &Configuration,
                                 average: bool,
                                 weighted: bool,
                                 r_max: f64,
                                 threads: usize,
                                 silent: bool)
                                 -> Result<OrderTable> {
    let (mode, prefix) = if weighted {
        (NeighborMode::Voronoi, "Voronoi Tessellation:")
    } else {
        (NeighborMode::Cutoff(r_max), "Neighbour Search:")
    };
    let bar = Bar::stage(config.len() as u64, prefix, silent);
    let nlist = neighbors::resolve(config, mode, threads, &bar)?;
    drop(bar);
    let prefix = if average {
        "Averaged Order Parameters:"
    } else {
        "Order Parameters:"
    };
    let bar = Bar::stage((config.len() * 4) as u64, prefix, silent);
    let table = compute_qls(config, &nlist, average, weighted, threads, &bar)
        .context("Failed to compute the order parameters.")?;
    info!(average, weighted, "Computed order parameters.");
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lattice::ReducedBox;
    use crate::neighbors::NeighborBond;

    fn bar() -> Bar {
        Bar::new(0, String::new())
    }

    /// A single particle surrounded by bonds along `vectors`.
    fn star(vectors: &[[f64; 3]]) -> (Configuration, NeighborList) {
        let reduced_box = ReducedBox::from_lengths(10., 10., 10.).unwrap();
        let config = Configuration::new(reduced_box, vec![[0.; 3]]);
        let bonds = vectors.iter()
                           .map(|v| NeighborBond { query_point: 0,
                                                   point: 0,
                                                   distance: utils::norm(*v),
                                                   weight: 1.,
                                                   vector: *v })
                           .collect();
        (config, NeighborList::from_bonds(vec![bonds]))
    }

    fn octahedron() -> Vec<[f64; 3]> {
        vec![[1., 0., 0.], [-1., 0., 0.], [0., 1., 0.],
             [0., -1., 0.], [0., 0., 1.], [0., 0., -1.]]
    }

    #[test]
    fn order_table_shape() {
        let table = OrderTable::new(vec![1., 2., 3., 4., 5., 6.], 3);
        assert_eq!(table.rows(), 2);
        assert_eq!(table.columns(), 3);
        assert_eq!(table.get(1, 0), 4.);
        assert_eq!(table.row(0), &[1., 2., 3.]);
        assert_eq!(table.get(1, 2), 6.);
        assert_eq!(table.iter_rows().count(), 2);
    }

    #[test]
    fn order_table_from_columns() {
        let table = OrderTable::from_columns(2, vec![vec![1., 2.], vec![3., 4.]]);
        assert_eq!(table, OrderTable::new(vec![1., 3., 2., 4.], 2));
        let empty = OrderTable::from_columns(3, vec![]);
        assert_eq!(empty.rows(), 3);
        assert_eq!(empty.iter_rows().count(), 3);
    }

    #[test]
    fn order_simple_cubic_star() {
        let (config, nlist) = star(&octahedron());
        let table = compute_qls(&config, &nlist, false, false, 1, &bar()).unwrap();
        let expected = [0.763763, 0.353553, 0.159317, 0.013161];
        for (k, e) in expected.iter().enumerate() {
            assert!((table.get(0, k) - e).abs() < 1e-6);
        }
    }

    #[test]
    fn order_rotation_invariant() {
        let (config, nlist) = star(&octahedron());
        let (c, s) = (0.3f64.cos(), 0.3f64.sin());
        let rotated = octahedron().iter()
                                  .map(|v| [c * v[0] - s * v[1], s * v[0] + c * v[1], v[2]])
                                  .collect::<Vec<[f64; 3]>>();
        let (_, rotated) = star(&rotated);
        let a = compute_qls(&config, &nlist, false, false, 1, &bar()).unwrap();
        let b = compute_qls(&config, &rotated, false, false, 1, &bar()).unwrap();
        for k in 0..4 {
            assert!((a.get(0, k) - b.get(0, k)).abs() < 1e-12);
        }
    }

    #[test]
    fn order_l0_is_one() {
        let (config, nlist) = star(&[[1., 2., 3.], [-0.5, 0.1, 0.]]);
        let specs = [ParameterSpec::ql(0, false, false),
                     ParameterSpec::wl(0, false, false, true)];
        let table = compute(&config, &nlist, &specs, 1, &bar()).unwrap();
        assert!((table.get(0, 0) - 1.).abs() < 1e-12);
        assert!((table.get(0, 1) - 1.).abs() < 1e-12);
    }

    #[test]
    fn order_weights() {
        // a heavy bond along z dominates when weighted
        let reduced_box = ReducedBox::from_lengths(10., 10., 10.).unwrap();
        let config = Configuration::new(reduced_box, vec![[0.; 3]]);
        let bonds = vec![NeighborBond { query_point: 0,
                                        point: 0,
                                        distance: 1.,
                                        weight: 1e9,
                                        vector: [0., 0., 1.] },
                         NeighborBond { query_point: 0,
                                        point: 0,
                                        distance: 1.,
                                        weight: 1.,
                                        vector: [1., 0., 0.] }];
        let nlist = NeighborList::from_bonds(vec![bonds]);
        let specs = [ParameterSpec::ql(2, false, true),
                     ParameterSpec::ql(2, false, false)];
        let table = compute(&config, &nlist, &specs, 1, &bar()).unwrap();
        // a single bond has q_l = 1 for every l
        assert!((table.get(0, 0) - 1.).abs() < 1e-6);
        assert!(table.get(0, 1) < 0.9);
    }

    #[test]
    fn order_no_neighbours_is_nan() {
        let (config, nlist) = star(&[]);
        let table = compute_qls(&config, &nlist, false, false, 1, &bar()).unwrap();
        assert_eq!(table.rows(), 1);
        assert!(table.row(0).iter().all(|x| x.is_nan()));
    }

    #[test]
    fn order_average() {
        // 0 and 1 are bonded along x, 2 is bonded to 1 along y
        let reduced_box = ReducedBox::from_lengths(10., 10., 10.).unwrap();
        let config = Configuration::new(reduced_box, vec![[0.; 3]; 3]);
        let bond = |i, j, v| NeighborBond { query_point: i,
                                            point: j,
                                            distance: 1.,
                                            weight: 1.,
                                            vector: v };
        let nlist = NeighborList::from_bonds(vec![vec![bond(0, 1, [1., 0., 0.])],
                                                  vec![bond(1, 0, [-1., 0., 0.]),
                                                       bond(1, 2, [0., 1., 0.])],
                                                  vec![bond(2, 1, [0., -1., 0.])]]);
        let local = local_qlm(&nlist, 2, false, 1).unwrap();
        let averaged = average_qlm(&nlist, &local, 1).unwrap();
        // particle 0: itself plus the neighbours of 1, which are 0 and 2
        for m in 0..5 {
            let expected = (local[0][m] * 2. + local[2][m]) / 3.;
            assert!((averaged[0][m] - expected).norm() < 1e-14);
        }
    }

    #[test]
    fn order_mismatch() {
        let (_, nlist) = star(&octahedron());
        let reduced_box = ReducedBox::from_lengths(10., 10., 10.).unwrap();
        let config = Configuration::new(reduced_box, vec![[0.; 3]; 2]);
        assert!(matches!(compute_qls(&config, &nlist, false, false, 1, &bar()),
                         Err(OrderError::Mismatch(2, 1))));
    }

    #[test]
    fn order_degree_too_large() {
        let (config, nlist) = star(&octahedron());
        let specs = [ParameterSpec::ql(MAX_DEGREE + 1, false, false)];
        assert!(matches!(compute(&config, &nlist, &specs, 1, &bar()),
                         Err(OrderError::DegreeTooLarge(_, _))));
    }
}
