// mod.rs - Data structures module

pub mod genotype;
pub mod loaders;
pub mod map;

// Re-export main types for convenience
pub use genotype::{Allele, GenotypeMatrix};
pub use map::{LocusMap, LocusRecord};
