use crate::cell_list::CellList;
use crate::configuration::Configuration;
use crate::errors::TessellationError;
use crate::neighbors::{NeighborBond, NeighborList};
use crate::progress::Bar;
use crate::utils::{self, add, cross, norm, scale, subtract, vdot};
use std::cmp::Ordering;
use tracing::debug;

#[cfg(feature = "voro")]
mod voro;
#[cfg(feature = "voro")]
use voro::build_cell;

/// Relative volume error tolerated between the cells and the box.
const VOLUME_TOLERANCE: f64 = 1E-6;

/// A face of a Voronoi cell. `neighbor` is the particle and image vector
/// whose bisector plane made the face, or None for a face of the starting
/// cube.
#[derive(Clone, Debug)]
struct Face {
    vertices: Vec<[f64; 3]>,
    neighbor: Option<(usize, [f64; 3])>,
}

impl Face {
    /// Vector area of the face: its normal scaled by twice its area.
    fn vector_area(&self) -> [f64; 3] {
        let n = self.vertices.len();
        self.vertices
            .iter()
            .enumerate()
            .fold([0f64; 3], |acc, (i, v)| {
                add(acc, cross(*v, self.vertices[(i + 1) % n]))
            })
    }

    fn area(&self) -> f64 {
        0.5 * norm(self.vector_area())
    }
}

/// The Voronoi cell of a single particle, centred on the particle.
///
/// Without the `voro` feature the cell is built from a cube that contains it
/// by clipping with the bisector planes of the surrounding particles. With
/// it, voro++ builds the cell and the faces are recovered from its vertices.
struct VoronoiCell {
    faces: Vec<Face>,
    tolerance: f64,
}

impl VoronoiCell {
    /// A cube of half width `half_width` centred on the origin.
    #[cfg(not(feature = "voro"))]
    fn new(half_width: f64, tolerance: f64) -> Self {
        let h = half_width;
        let faces = [[[h, -h, -h], [h, h, -h], [h, h, h], [h, -h, h]],
                     [[-h, -h, -h], [-h, -h, h], [-h, h, h], [-h, h, -h]],
                     [[-h, h, -h], [-h, h, h], [h, h, h], [h, h, -h]],
                     [[-h, -h, -h], [h, -h, -h], [h, -h, h], [-h, -h, h]],
                     [[-h, -h, h], [h, -h, h], [h, h, h], [-h, h, h]],
                     [[-h, -h, -h], [-h, h, -h], [h, h, -h], [h, -h, -h]]];
        let faces = faces.iter()
                         .map(|f| Face { vertices: f.to_vec(),
                                         neighbor: None })
                         .collect();
        Self { faces, tolerance }
    }

    /// The largest distance from the particle to a vertex of the cell.
    #[cfg(not(feature = "voro"))]
    fn max_radius(&self) -> f64 {
        self.faces
            .iter()
            .flat_map(|f| f.vertices.iter())
            .fold(0., |acc, v| acc.max(norm(*v)))
    }

    /// Whether every face comes from a neighbour plane.
    #[cfg(not(feature = "voro"))]
    fn is_bounded(&self) -> bool {
        self.faces.iter().all(|f| f.neighbor.is_some())
    }

    /// Cuts the cell with the bisector plane of the image at `vector`,
    /// keeping the half nearer the particle. Returns whether the cell changed.
    #[cfg(not(feature = "voro"))]
    fn clip(&mut self, point: usize, vector: [f64; 3]) -> bool {
        let distance = norm(vector);
        let normal = scale(vector, 1. / distance);
        let offset = 0.5 * distance;
        let tol = self.tolerance;
        let side = |v: [f64; 3]| vdot(v, normal) - offset;
        if !self.faces
                .iter()
                .flat_map(|f| f.vertices.iter())
                .any(|v| side(*v) > tol)
        {
            return false;
        }
        let mut cap = Vec::<[f64; 3]>::new();
        for face in self.faces.iter_mut() {
            let n = face.vertices.len();
            let mut clipped = Vec::with_capacity(n + 1);
            for k in 0..n {
                let p = face.vertices[k];
                let q = face.vertices[(k + 1) % n];
                let (sp, sq) = (side(p), side(q));
                if sp <= tol {
                    clipped.push(p);
                    if sp >= -tol {
                        cap.push(p);
                    }
                }
                if (sp < -tol && sq > tol) || (sp > tol && sq < -tol) {
                    let t = sp / (sp - sq);
                    let x = add(p, scale(subtract(q, p), t));
                    clipped.push(x);
                    cap.push(x);
                }
            }
            face.vertices = clipped;
        }
        self.faces.retain(|f| f.vertices.len() >= 3);
        // vertices shared by several faces are collected once per face
        let mut unique = Vec::<[f64; 3]>::with_capacity(cap.len());
        for v in cap {
            if !unique.iter().any(|u| norm(subtract(*u, v)) < tol) {
                unique.push(v);
            }
        }
        if unique.len() >= 3 {
            sort_around(&mut unique, normal);
            self.faces.push(Face { vertices: unique,
                                   neighbor: Some((point, vector)) });
        }
        true
    }

    /// The volume of the cell, as a sum of pyramids from the particle to
    /// each face.
    fn volume(&self) -> f64 {
        self.faces
            .iter()
            .map(|f| vdot(f.vector_area(), f.vertices[0]).abs() / 6.)
            .sum()
    }

    /// The faces as (neighbour, image vector, area), dropping those of
    /// vanishing area.
    fn facets(&self) -> Vec<(usize, [f64; 3], f64)> {
        self.faces
            .iter()
            .filter_map(|f| {
                let area = f.area();
                match f.neighbor {
                    Some((j, v)) if area > self.tolerance * self.tolerance => {
                        Some((j, v, area))
                    }
                    _ => None,
                }
            })
            .collect()
    }
}

/// Orders coplanar points by their angle about their centroid.
fn sort_around(vertices: &mut [[f64; 3]], normal: [f64; 3]) {
    let centroid = scale(vertices.iter().fold([0f64; 3], |acc, v| add(acc, *v)),
                         1. / vertices.len() as f64);
    let mut rx = subtract(vertices[0], centroid);
    let r_coeff = vdot(rx, normal);
    rx = subtract(rx, scale(normal, r_coeff));
    rx = scale(rx, vdot(rx, rx).powf(-0.5));
    let ry = cross(normal, rx);
    vertices.sort_unstable_by(|a, b| {
                let a = subtract(*a, centroid);
                let b = subtract(*b, centroid);
                let c = vdot(a, ry).atan2(vdot(a, rx));
                let d = vdot(b, ry).atan2(vdot(b, rx));
                c.partial_cmp(&d).unwrap_or(Ordering::Equal)
            });
}

/// The periodic Voronoi tessellation of a configuration.
pub struct Voronoi {
    /// Bonds between particles sharing a facet, weighted by its area.
    pub nlist: NeighborList,
    /// The volume of each particle's cell.
    pub volumes: Vec<f64>,
}

/// Builds the Voronoi cell of particle `i`, widening the search radius until
/// no unseen image can cut the cell.
#[cfg(not(feature = "voro"))]
fn build_cell(i: usize,
              cell_list: &CellList,
              initial_radius: f64,
              half_width: f64,
              tolerance: f64)
              -> Result<VoronoiCell, TessellationError> {
    let mut cell = VoronoiCell::new(half_width, tolerance);
    let mut seen = 0f64;
    let mut radius = initial_radius;
    loop {
        let mut candidates = cell_list.query(i, radius)
                                      .into_iter()
                                      .map(|(j, v)| (j, v, norm(v)))
                                      .filter(|(_, _, d)| *d > seen || seen == 0.)
                                      .collect::<Vec<(usize, [f64; 3], f64)>>();
        candidates.sort_by(|a, b| {
                      a.2.partial_cmp(&b.2)
                         .unwrap_or(Ordering::Equal)
                         .then(a.0.cmp(&b.0))
                  });
        for (j, v, d) in candidates {
            if d < tolerance {
                return Err(TessellationError::Coincident(i.min(j), i.max(j)));
            }
            if 0.5 * d > cell.max_radius() + tolerance {
                break;
            }
            cell.clip(j, v);
        }
        let reach = 2. * cell.max_radius();
        if reach <= radius {
            break;
        }
        seen = radius;
        radius = reach.min(2. * radius);
    }
    if !cell.is_bounded() {
        return Err(TessellationError::Unbounded(i));
    }
    Ok(cell)
}

/// Tessellates the periodic box into the Voronoi cells of the particles.
///
/// Each facet shared with another particle gives one bond, weighted by the
/// facet area, and the bonds of each particle are sorted by neighbour index
/// then distance. Facets shared with images of the particle itself give no
/// bond.
pub fn tessellate(config: &Configuration,
                  threads: usize,
                  progress_bar: &Bar)
                  -> Result<Voronoi, TessellationError> {
    if config.is_empty() {
        return Err(TessellationError::Empty);
    }
    let box_volume = config.reduced_box.volume();
    let tolerance = 1E-10 * box_volume.cbrt();
    let initial_radius = 2. * (box_volume / config.len() as f64).cbrt();
    let half_width = config.reduced_box
                           .to_cartesian()
                           .iter()
                           .map(|a| norm(*a))
                           .sum::<f64>();
    debug!(initial_radius, half_width, "Building Voronoi cells.");
    let cell_list = CellList::new(config, initial_radius);
    let cells = utils::chunk_map(config.len(), threads, |range| {
        let mut chunk = Vec::with_capacity(range.len());
        for i in range {
            let cell =
                build_cell(i, &cell_list, initial_radius, half_width, tolerance)?;
            let mut bonds = cell.facets()
                                .into_iter()
                                .filter(|(j, _, _)| *j != i)
                                .map(|(j, vector, area)| NeighborBond {
                                    query_point: i,
                                    point: j,
                                    distance: norm(vector),
                                    weight: area,
                                    vector,
                                })
                                .collect::<Vec<NeighborBond>>();
            bonds.sort_by(|a, b| {
                     a.point
                      .cmp(&b.point)
                      .then(a.distance
                             .partial_cmp(&b.distance)
                             .unwrap_or(Ordering::Equal))
                 });
            chunk.push((bonds, cell.volume()));
            progress_bar.tick();
        }
        Ok::<_, TessellationError>(chunk)
    })?;
    let (bonds, volumes): (Vec<Vec<NeighborBond>>, Vec<f64>) =
        cells.into_iter().unzip();
    let total = volumes.iter().sum::<f64>();
    if ((total - box_volume) / box_volume).abs() > VOLUME_TOLERANCE {
        return Err(TessellationError::VolumeMismatch(total, box_volume));
    }
    Ok(Voronoi { nlist: NeighborList::from_bonds(bonds),
                 volumes })
}
