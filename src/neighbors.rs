use crate::cell_list::CellList;
use crate::configuration::Configuration;
use crate::errors::QueryError;
use crate::progress::Bar;
use crate::utils;
use crate::voronoi;
use anyhow::{Context, Result};
use tracing::{debug, info, warn};

/// A directed bond from `query_point` to a periodic image of `point`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NeighborBond {
    pub query_point: usize,
    pub point: usize,
    /// The length of `vector`.
    pub distance: f64,
    /// 1 for cutoff bonds, the area of the shared facet for Voronoi bonds.
    pub weight: f64,
    /// Displacement from the query point to the image of the point.
    pub vector: [f64; 3],
}

/// Bonds grouped by query point.
///
/// The bonds are stored contiguously, sorted by query point, with the offset
/// of each query point's segment kept alongside.
#[derive(Clone, Debug, PartialEq)]
pub struct NeighborList {
    bonds: Vec<NeighborBond>,
    segments: Vec<usize>,
}

impl NeighborList {
    /// Builds the list from the bonds of each query point in turn.
    pub fn from_bonds(bonds: Vec<Vec<NeighborBond>>) -> Self {
        let mut segments = Vec::with_capacity(bonds.len() + 1);
        segments.push(0);
        let mut total = 0;
        for b in bonds.iter() {
            total += b.len();
            segments.push(total);
        }
        let bonds = bonds.into_iter().flatten().collect();
        Self { bonds, segments }
    }

    /// The bonds of query point `i`.
    pub fn neighbors(&self, i: usize) -> &[NeighborBond] {
        &self.bonds[self.segments[i]..self.segments[i + 1]]
    }

    /// The number of query points the list was built for.
    pub fn num_points(&self) -> usize {
        self.segments.len() - 1
    }

    /// The total number of bonds.
    pub fn len(&self) -> usize {
        self.bonds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bonds.is_empty()
    }

    pub fn bonds(&self) -> &[NeighborBond] {
        &self.bonds
    }
}

/// How to decide which particles are neighbours.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NeighborMode {
    /// Every particle within the radius.
    Cutoff(f64),
    /// Particles sharing a Voronoi facet, weighted by the facet area.
    Voronoi,
}

/// The largest usable cutoff: half the smallest distance between opposite
/// faces of the box.
pub fn max_cutoff(config: &Configuration) -> f64 {
    config.reduced_box
          .plane_distances()
          .iter()
          .fold(f64::INFINITY, |acc, d| acc.min(*d))
          * 0.5
}

/// Finds every ordered pair of distinct particles closer than `r_max` under
/// the minimum image convention. Bonds of each particle are sorted by
/// neighbour index.
pub fn cutoff_neighbors(config: &Configuration,
                        r_max: f64,
                        threads: usize,
                        progress_bar: &Bar)
                        -> Result<NeighborList, QueryError> {
    if !(r_max > 0.) {
        return Err(QueryError::NonPositiveCutoff(r_max));
    }
    let max = max_cutoff(config);
    if r_max >= max {
        return Err(QueryError::CutoffTooLarge(r_max, max));
    }
    let cell_list = CellList::new(config, r_max);
    let bonds = utils::chunk_map(config.len(), threads, |range| {
        let mut chunk = Vec::with_capacity(range.len());
        for i in range {
            let mut bonds = cell_list.query(i, r_max)
                                     .into_iter()
                                     .map(|(j, vector)| NeighborBond {
                                         query_point: i,
                                         point: j,
                                         distance: utils::norm(vector),
                                         weight: 1.,
                                         vector,
                                     })
                                     .collect::<Vec<NeighborBond>>();
            bonds.sort_by(|a, b| a.point.cmp(&b.point));
            chunk.push(bonds);
            progress_bar.tick();
        }
        Ok::<_, QueryError>(chunk)
    })?;
    Ok(NeighborList::from_bonds(bonds))
}

/// Resolves the neighbour list of `config` for the given mode.
pub fn resolve(config: &Configuration,
               mode: NeighborMode,
               threads: usize,
               progress_bar: &Bar)
               -> Result<NeighborList> {
    let nlist = match mode {
        NeighborMode::Cutoff(r_max) => {
            debug!(r_max, "Resolving cutoff neighbours.");
            cutoff_neighbors(config, r_max, threads, progress_bar)
                .context("Failed to resolve cutoff neighbours.")?
        }
        NeighborMode::Voronoi => {
            let tessellation = voronoi::tessellate(config, threads, progress_bar)
                .context("Failed to build the Voronoi tessellation.")?;
            tessellation.nlist
        }
    };
    let lonely = (0..nlist.num_points()).filter(|i| nlist.neighbors(*i).is_empty())
                                        .count();
    if lonely > 0 {
        warn!(particles = lonely, "Some particles have no neighbours, their order parameters are undefined.");
    }
    info!(mode = ?mode, particles = nlist.num_points(), bonds = nlist.len(), "Resolved neighbours.");
    Ok(nlist)
}
