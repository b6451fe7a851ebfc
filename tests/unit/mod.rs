//! Unit tests mirroring the `src` module tree

mod processing;
