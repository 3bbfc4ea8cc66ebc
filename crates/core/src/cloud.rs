use crate::Aabb;

/// A scanner point cloud in struct-of-arrays layout.
///
/// Per-point attributes (`normals`, `colors`) are optional, but when present
/// they must have exactly one entry per position. Every filtering operation
/// goes through [`select`](PointCloud::select) or
/// [`select_inverse`](PointCloud::select_inverse) so that attribute arrays
/// shrink in lock-step and index correspondence is never broken.
#[derive(Debug, Clone, PartialEq)]
pub struct PointCloud {
    pub x: Vec<f32>,
    pub y: Vec<f32>,
    pub z: Vec<f32>,
    pub normals: Option<Normals>,
    pub colors: Option<Colors>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Normals {
    pub nx: Vec<f32>,
    pub ny: Vec<f32>,
    pub nz: Vec<f32>,
}

/// Per-point RGB in `[0, 1]`, the working representation throughout the
/// pipeline. File formats that store bytes convert at the IO boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct Colors {
    pub r: Vec<f32>,
    pub g: Vec<f32>,
    pub b: Vec<f32>,
}

impl Colors {
    /// A uniform color repeated `n` times.
    pub fn uniform(rgb: [f32; 3], n: usize) -> Self {
        Self {
            r: vec![rgb[0]; n],
            g: vec![rgb[1]; n],
            b: vec![rgb[2]; n],
        }
    }
}

impl PointCloud {
    pub fn new() -> Self {
        Self {
            x: Vec::new(),
            y: Vec::new(),
            z: Vec::new(),
            normals: None,
            colors: None,
        }
    }

    pub fn from_xyz(x: Vec<f32>, y: Vec<f32>, z: Vec<f32>) -> Self {
        assert_eq!(x.len(), y.len(), "x and y must have same length");
        assert_eq!(x.len(), z.len(), "x and z must have same length");

        Self {
            x,
            y,
            z,
            normals: None,
            colors: None,
        }
    }

    pub fn len(&self) -> usize {
        debug_assert_eq!(self.x.len(), self.y.len());
        debug_assert_eq!(self.x.len(), self.z.len());
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn has_normals(&self) -> bool {
        self.normals.is_some()
    }

    pub fn has_colors(&self) -> bool {
        self.colors.is_some()
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::from_xyz(&self.x, &self.y, &self.z)
    }

    pub fn point(&self, i: usize) -> [f32; 3] {
        [self.x[i], self.y[i], self.z[i]]
    }

    pub fn iter_points(&self) -> impl Iterator<Item = [f32; 3]> + '_ {
        self.x
            .iter()
            .zip(&self.y)
            .zip(&self.z)
            .map(|((x, y), z)| [*x, *y, *z])
    }

    /// Mean position, accumulated in f64 for stability.
    ///
    /// Returns `None` for the empty cloud.
    pub fn centroid(&self) -> Option<[f32; 3]> {
        if self.is_empty() {
            return None;
        }
        let n = self.len() as f64;
        let cx = self.x.iter().map(|&v| v as f64).sum::<f64>() / n;
        let cy = self.y.iter().map(|&v| v as f64).sum::<f64>() / n;
        let cz = self.z.iter().map(|&v| v as f64).sum::<f64>() / n;
        Some([cx as f32, cy as f32, cz as f32])
    }

    /// Keep only the points at the given indices, in the given order.
    ///
    /// Normals and colors follow along, preserving index correspondence.
    ///
    /// # Panics
    ///
    /// Panics if any index is out of bounds.
    pub fn select(&self, indices: &[usize]) -> Self {
        let mut x = Vec::with_capacity(indices.len());
        let mut y = Vec::with_capacity(indices.len());
        let mut z = Vec::with_capacity(indices.len());

        for &idx in indices {
            assert!(idx < self.len(), "index out of bounds in select");
            x.push(self.x[idx]);
            y.push(self.y[idx]);
            z.push(self.z[idx]);
        }

        let normals = self.normals.as_ref().map(|n| Normals {
            nx: indices.iter().map(|&idx| n.nx[idx]).collect(),
            ny: indices.iter().map(|&idx| n.ny[idx]).collect(),
            nz: indices.iter().map(|&idx| n.nz[idx]).collect(),
        });

        let colors = self.colors.as_ref().map(|c| Colors {
            r: indices.iter().map(|&idx| c.r[idx]).collect(),
            g: indices.iter().map(|&idx| c.g[idx]).collect(),
            b: indices.iter().map(|&idx| c.b[idx]).collect(),
        });

        Self {
            x,
            y,
            z,
            normals,
            colors,
        }
    }

    /// Keep all points NOT in the given index set, preserving relative order.
    ///
    /// This is how the support-plane inliers are stripped out of the cloud:
    /// the complement survives with all attributes intact.
    ///
    /// # Panics
    ///
    /// Panics if any index in `indices` is out of bounds.
    pub fn select_inverse(&self, indices: &[usize]) -> Self {
        let n = self.len();
        let mut exclude = vec![false; n];
        for &idx in indices {
            assert!(idx < n, "index out of bounds in select_inverse");
            exclude[idx] = true;
        }

        let kept: Vec<usize> = (0..n).filter(|&i| !exclude[i]).collect();
        self.select(&kept)
    }
}

impl Default for PointCloud {
    fn default() -> Self {
        Self::new()
    }
}
