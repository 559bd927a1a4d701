// mod.rs - File loaders for haplotype and map data

pub mod hap;
pub mod map;
