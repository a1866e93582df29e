use crate::errors::BoxError;
use crate::utils;

/// A 3x3 box matrix as written in a configuration file. The columns are the
/// three edge vectors of the periodic box.
pub type LatticeMatrix = [[f64; 3]; 3];

/// The canonical triclinic box: three edge lengths and three tilt factors.
///
/// The edge vectors of the box are
/// > a1 = (Lx, 0, 0)
/// > a2 = (xy * Ly, Ly, 0)
/// > a3 = (xz * Lz, yz * Lz, Lz)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReducedBox {
    pub lx: f64,
    pub ly: f64,
    pub lz: f64,
    pub xy: f64,
    pub xz: f64,
    pub yz: f64,
}

impl ReducedBox {
    /// Reduces an arbitrarily oriented, right-handed box matrix to the
    /// canonical triclinic representation.
    ///
    /// The operations are applied in a fixed order so results can be compared
    /// against other codes to within float tolerance.
    pub fn reduce(matrix: LatticeMatrix) -> Result<Self, BoxError> {
        let v0 = [matrix[0][0], matrix[1][0], matrix[2][0]];
        let v1 = [matrix[0][1], matrix[1][1], matrix[2][1]];
        let v2 = [matrix[0][2], matrix[1][2], matrix[2][2]];
        let lx = utils::vdot(v0, v0).sqrt();
        if !(lx > 0.) {
            return Err(BoxError::NonPositiveLength('x', lx));
        }
        let a2x = utils::vdot(v0, v1) / lx;
        let ly_squared = utils::vdot(v1, v1) - a2x * a2x;
        if !(ly_squared > 0.) {
            return Err(BoxError::ParallelEdges);
        }
        let ly = ly_squared.sqrt();
        let xy = a2x / ly;
        let v0xv1 = utils::cross(v0, v1);
        let v0xv1mag = utils::vdot(v0xv1, v0xv1).sqrt();
        if !(v0xv1mag > 0.) {
            return Err(BoxError::ParallelEdges);
        }
        let lz = utils::vdot(v2, v0xv1) / v0xv1mag;
        if lz == 0. {
            return Err(BoxError::Singular);
        }
        if !(lz > 0.) {
            return Err(BoxError::NonPositiveLength('z', lz));
        }
        let a3x = utils::vdot(v0, v2) / lx;
        let xz = a3x / lz;
        let yz = (utils::vdot(v1, v2) - a2x * a3x) / (ly * lz);
        let reduced = Self { lx,
                             ly,
                             lz,
                             xy,
                             xz,
                             yz };
        if reduced.as_array().iter().all(|x| x.is_finite()) {
            Ok(reduced)
        } else {
            Err(BoxError::Singular)
        }
    }

    /// An orthorhombic box from its three edge lengths.
    pub fn from_lengths(lx: f64, ly: f64, lz: f64) -> Result<Self, BoxError> {
        for (axis, length) in ['x', 'y', 'z'].iter().zip([lx, ly, lz].iter()) {
            if !(*length > 0.) || !length.is_finite() {
                return Err(BoxError::NonPositiveLength(*axis, *length));
            }
        }
        Ok(Self { lx,
                  ly,
                  lz,
                  xy: 0.,
                  xz: 0.,
                  yz: 0. })
    }

    /// The box as [Lx, Ly, Lz, xy, xz, yz].
    pub fn as_array(&self) -> [f64; 6] {
        [self.lx, self.ly, self.lz, self.xy, self.xz, self.yz]
    }

    /// The edge lengths [Lx, Ly, Lz].
    pub fn lengths(&self) -> [f64; 3] {
        [self.lx, self.ly, self.lz]
    }

    /// The edge vectors as the rows of a matrix, for use with [`utils::dot`].
    pub fn to_cartesian(&self) -> [[f64; 3]; 3] {
        [[self.lx, 0., 0.],
         [self.xy * self.ly, self.ly, 0.],
         [self.xz * self.lz, self.yz * self.lz, self.lz]]
    }

    /// The inverse of [`ReducedBox::to_cartesian`].
    pub fn to_fractional(&self) -> [[f64; 3]; 3] {
        // triangular so the inverse is explicit and can't fail for positive
        // lengths
        let (xy, xz, yz) = (self.xy, self.xz, self.yz);
        [[1. / self.lx, 0., 0.],
         [-xy / self.lx, 1. / self.ly, 0.],
         [(xy * yz - xz) / self.lx, -yz / self.ly, 1. / self.lz]]
    }

    pub fn volume(&self) -> f64 {
        self.lx * self.ly * self.lz
    }

    /// The distances between opposite faces of the box, along the reciprocal
    /// lattice directions.
    pub fn plane_distances(&self) -> [f64; 3] {
        let to_fractional = self.to_fractional();
        let mut out = [0f64; 3];
        for (i, out) in out.iter_mut().enumerate() {
            let b = [to_fractional[0][i], to_fractional[1][i], to_fractional[2][i]];
            *out = 1. / utils::norm(b);
        }
        out
    }

    /// Fractional coordinates of the box to a cartesian vector.
    pub fn make_cartesian(&self, f: [f64; 3]) -> [f64; 3] {
        utils::dot(f, self.to_cartesian())
    }
}
