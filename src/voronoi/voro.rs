use super::{sort_around, Face, VoronoiCell};
use crate::cell_list::CellList;
use crate::errors::TessellationError;
use crate::utils::{norm, scale, subtract, vdot};
use voro_rs::{
    cell::{VoroCell, VoroCellSgl},
    container::{Container1, ContainerStd},
    pre_container::{PreContainer, PreContainerStd},
};

/// Distance from a bisector plane, relative to the image distance, within
/// which a vertex of the voro++ cell lies on that plane.
const PLANE_TOLERANCE: f64 = 1E-8;

/// The vertices of the voro++ cell of a ghost particle at the origin of a
/// container holding the image `vectors`.
///
/// The container walls sit just beyond `radius`, so any vertex nearer than
/// `radius` belongs to a face from one of the images.
fn ghost_vertices(vectors: &[[f64; 3]], radius: f64) -> Option<Vec<[f64; 3]>> {
    let wall = 1.01 * radius;
    let box_min = [-wall, -wall, -wall];
    let box_max = [wall, wall, wall];
    let periodic = [false, false, false];
    let mut pre_container = PreContainerStd::new(box_min, box_max, periodic);
    for (index, v) in vectors.iter().enumerate() {
        pre_container.put(index as i32, *v, 0.0);
    }
    let optimal_grids = pre_container.optimal_grids();
    let mut container: ContainerStd<'_> =
        ContainerStd::new(box_min, box_max, optimal_grids, periodic);
    pre_container.setup(&mut container);
    let mut voronoi_cell: VoroCellSgl =
        container.compute_ghost_cell([0.0, 0.0, 0.0], 0.0)?;
    let vertices = voronoi_cell.vertices_global([0.0, 0.0, 0.0])
                               .chunks(3)
                               .map(|c| [c[0], c[1], c[2]])
                               .collect();
    Some(vertices)
}

impl VoronoiCell {
    /// Rebuilds the faces of a cell from its vertices: every image whose
    /// bisector plane holds at least three distinct vertices gives a face.
    fn from_vertices(images: &[(usize, [f64; 3])],
                     vertices: &[[f64; 3]],
                     tolerance: f64)
                     -> Self {
        let max_radius = vertices.iter().fold(0f64, |acc, v| acc.max(norm(*v)));
        let mut faces = Vec::new();
        for (j, vector) in images {
            let distance = norm(*vector);
            let tol = tolerance.max(PLANE_TOLERANCE * distance);
            if 0.5 * distance > max_radius + tol {
                continue;
            }
            let normal = scale(*vector, 1. / distance);
            let mut on_plane = Vec::<[f64; 3]>::new();
            for v in vertices {
                if (vdot(*v, normal) - 0.5 * distance).abs() < tol
                   && !on_plane.iter().any(|u| norm(subtract(*u, *v)) < tol)
                {
                    on_plane.push(*v);
                }
            }
            if on_plane.len() >= 3 {
                sort_around(&mut on_plane, normal);
                faces.push(Face { vertices: on_plane,
                                  neighbor: Some((*j, *vector)) });
            }
        }
        Self { faces, tolerance }
    }
}

/// Builds the Voronoi cell of particle `i` with voro++, doubling the search
/// radius until the cell lies within half of it.
///
/// The periodic images of the neighbours, including the particle's own
/// images, are put into a non-periodic container centred on the particle, so
/// tilted boxes need no support from the container.
pub(super) fn build_cell(i: usize,
                         cell_list: &CellList,
                         initial_radius: f64,
                         half_width: f64,
                         tolerance: f64)
                         -> Result<VoronoiCell, TessellationError> {
    let mut radius = initial_radius;
    loop {
        let images = cell_list.query(i, radius);
        if let Some((j, _)) = images.iter().find(|(_, v)| norm(*v) < tolerance) {
            return Err(TessellationError::Coincident(i.min(*j), i.max(*j)));
        }
        let vectors = images.iter()
                            .map(|(_, v)| *v)
                            .collect::<Vec<[f64; 3]>>();
        let vertices = match ghost_vertices(&vectors, radius) {
            Some(vertices) => vertices,
            None => return Err(TessellationError::Unbounded(i)),
        };
        let reach = 2. * vertices.iter().fold(0f64, |acc, v| acc.max(norm(*v)));
        if reach < radius {
            return Ok(VoronoiCell::from_vertices(&images, &vertices, tolerance));
        }
        if radius > 4. * half_width {
            return Err(TessellationError::Unbounded(i));
        }
        radius = 2. * reach;
    }
}
