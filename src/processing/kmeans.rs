//! K-means color quantization
//!
//! Points are RGB triples in `f64`. Seeding picks `K` distinct random points,
//! clusters that run empty are re-seeded from a fresh random point, and the
//! loop stops once no centroid moved or the iteration cap is exceeded.

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::io::error::Result;
use crate::pipeline::context::{RunContext, Stage};
use crate::spatial::grid::{PixelGrid, Rgba};

/// RGB point in floating point
pub type ColorPoint = [f64; 3];

/// One cluster of point indices and the centroid they were assigned against
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    /// Centroid used for the final assignment
    pub centroid: ColorPoint,
    /// Indices into the dataset of the assigned points
    pub point_indexes: Vec<usize>,
}

/// Outcome of one k-means run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClusteringResult {
    /// Final clusters, empty when clustering was skipped
    pub clusters: Vec<Cluster>,
    /// Number of assignment passes performed
    pub iterations: usize,
}

impl ClusteringResult {
    /// Test whether clustering was skipped
    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    /// Final centroid colors, rounded and fully opaque
    pub fn palette(&self) -> Vec<Rgba> {
        self.clusters
            .iter()
            .map(|cluster| centroid_color(&cluster.centroid))
            .collect()
    }
}

/// Round a centroid to an opaque 8-bit color
pub fn centroid_color(centroid: &ColorPoint) -> Rgba {
    let channel = |v: f64| v.round().clamp(0.0, 255.0) as u8;
    [
        channel(centroid[0]),
        channel(centroid[1]),
        channel(centroid[2]),
        255,
    ]
}

/// Stable 64-bit FNV-1a hash of a seed string
pub fn seed_from_str(seed: &str) -> u64 {
    const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;

    seed.bytes().fold(OFFSET_BASIS, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(PRIME)
    })
}

/// Squared Euclidean distance between two color points
pub fn distance_squared(a: &ColorPoint, b: &ColorPoint) -> f64 {
    a.iter().zip(b).map(|(p, q)| (p - q) * (p - q)).sum()
}

/// K-means clusterer with its own random source
pub struct KMeans {
    k: usize,
    max_iterations: usize,
    rng: StdRng,
}

impl KMeans {
    /// Create a clusterer
    ///
    /// A non-empty `seed` makes every run reproducible; an empty seed draws
    /// entropy from the operating system.
    pub fn new(k: usize, max_iterations: usize, seed: &str) -> Self {
        let rng = if seed.is_empty() {
            StdRng::from_os_rng()
        } else {
            StdRng::seed_from_u64(seed_from_str(seed))
        };
        Self {
            k,
            max_iterations,
            rng,
        }
    }

    /// Pick `count` distinct dataset indices uniformly at random
    fn random_indices(&mut self, len: usize, count: usize) -> Vec<usize> {
        let mut picked = Vec::with_capacity(count);
        while picked.len() < count.min(len) {
            let idx = self.rng.random_range(0..len);
            if !picked.contains(&idx) {
                picked.push(idx);
            }
        }
        picked
    }

    /// Assign every point to its nearest centroid, ties to the earliest
    fn assign(dataset: &[ColorPoint], centroids: &[ColorPoint]) -> Vec<Cluster> {
        let mut clusters: Vec<Cluster> = centroids
            .iter()
            .map(|&centroid| Cluster {
                centroid,
                point_indexes: Vec::new(),
            })
            .collect();

        for (i, point) in dataset.iter().enumerate() {
            let mut best = 0;
            let mut best_dist = f64::INFINITY;
            for (j, centroid) in centroids.iter().enumerate() {
                let dist = distance_squared(point, centroid);
                if j == 0 || dist < best_dist {
                    best = j;
                    best_dist = dist;
                }
            }
            if let Some(cluster) = clusters.get_mut(best) {
                cluster.point_indexes.push(i);
            }
        }

        clusters
    }

    /// Mean of the points assigned to a cluster
    fn mean(dataset: &[ColorPoint], indexes: &[usize]) -> ColorPoint {
        let mut sum = [0.0; 3];
        for point in indexes.iter().filter_map(|&i| dataset.get(i)) {
            for (s, v) in sum.iter_mut().zip(point) {
                *s += v;
            }
        }
        let n = indexes.len() as f64;
        sum.map(|s| s / n)
    }

    fn recompute(&mut self, dataset: &[ColorPoint], clusters: &[Cluster]) -> Vec<ColorPoint> {
        let mut centroids = Vec::with_capacity(clusters.len());
        for cluster in clusters {
            if cluster.point_indexes.is_empty() {
                let reseed = self
                    .random_indices(dataset.len(), 1)
                    .first()
                    .and_then(|&i| dataset.get(i))
                    .copied()
                    .unwrap_or(cluster.centroid);
                centroids.push(reseed);
            } else {
                centroids.push(Self::mean(dataset, &cluster.point_indexes));
            }
        }
        centroids
    }

    /// Partition `dataset` into `k` clusters
    ///
    /// Returns an empty result when the dataset is empty or holds no more
    /// than `k` points.
    ///
    /// # Errors
    ///
    /// Returns `CancellationRequested` when the context is cancelled between
    /// iterations
    pub fn cluster(
        &mut self,
        dataset: &[ColorPoint],
        ctx: &mut RunContext<'_>,
    ) -> Result<ClusteringResult> {
        if dataset.is_empty() || dataset.len() <= self.k {
            ctx.warn(
                Stage::Quantize,
                format!(
                    "Skipped clustering: {} points for {} colors",
                    dataset.len(),
                    self.k
                ),
            );
            return Ok(ClusteringResult::default());
        }

        let mut centroids: Vec<ColorPoint> = self
            .random_indices(dataset.len(), self.k)
            .iter()
            .filter_map(|&i| dataset.get(i).copied())
            .collect();
        let mut previous: Option<Vec<ColorPoint>> = None;
        let mut clusters = Vec::new();
        let mut iterations = 0;

        while !self.should_stop(&centroids, previous.as_deref(), iterations) {
            ctx.checkpoint(Stage::Quantize)?;

            clusters = Self::assign(dataset, &centroids);
            let next = self.recompute(dataset, &clusters);
            previous = Some(std::mem::replace(&mut centroids, next));
            iterations += 1;

            ctx.detail(Stage::Quantize, format!("Clustered {iterations} times"));
        }

        Ok(ClusteringResult {
            clusters,
            iterations,
        })
    }

    // Converged when every centroid matches the previous pass exactly
    fn should_stop(
        &self,
        centroids: &[ColorPoint],
        previous: Option<&[ColorPoint]>,
        iteration: usize,
    ) -> bool {
        if iteration > self.max_iterations {
            return true;
        }
        previous.is_some_and(|prev| prev == centroids)
    }
}

/// Group RGBA pixels into RGB points, alpha dropped
pub fn color_points(grid: &PixelGrid) -> Vec<ColorPoint> {
    grid.as_array()
        .iter()
        .map(|c| [f64::from(c[0]), f64::from(c[1]), f64::from(c[2])])
        .collect()
}

/// Paint each pixel with its cluster's rounded centroid
///
/// An empty clustering result leaves the grid unchanged.
pub fn segment(grid: &PixelGrid, result: &ClusteringResult) -> PixelGrid {
    if result.is_empty() {
        return grid.clone();
    }

    let mut flat: Vec<Rgba> = grid.as_array().iter().copied().collect();
    for cluster in &result.clusters {
        let color = centroid_color(&cluster.centroid);
        for &i in &cluster.point_indexes {
            if let Some(pixel) = flat.get_mut(i) {
                *pixel = color;
            }
        }
    }

    let shape = (grid.height(), grid.width());
    ndarray::Array2::from_shape_vec(shape, flat)
        .map_or_else(|_| grid.clone(), PixelGrid::from_array)
}

/// Quantize a grid to at most `k` colors
///
/// # Errors
///
/// Returns `CancellationRequested` when the context is cancelled
pub fn quantize(
    grid: &PixelGrid,
    kmeans: &mut KMeans,
    ctx: &mut RunContext<'_>,
) -> Result<(PixelGrid, ClusteringResult)> {
    ctx.info(Stage::Quantize, "Starting K-means clustering");
    let dataset = color_points(grid);
    let result = kmeans.cluster(&dataset, ctx)?;
    let segmented = segment(grid, &result);
    ctx.info(
        Stage::Quantize,
        format!(
            "K-means clustering completed after {} iterations",
            result.iterations
        ),
    );
    Ok((segmented, result))
}
