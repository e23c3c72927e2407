//! Filesystem primitives shared across features.

pub mod digest;

pub use digest::hash_file;
