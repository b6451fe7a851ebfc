/// K-means color quantization
pub mod kmeans;
/// Windowed vector-median noise filter
pub mod denoise;
/// Island and spur removal
pub mod particles;
/// Outline rendering and label markers
pub mod edges;
