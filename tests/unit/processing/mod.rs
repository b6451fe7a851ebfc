pub mod denoise;
