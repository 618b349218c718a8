pub mod biome;
pub mod climate;
pub mod config;
pub mod error;
pub mod grid;
pub mod heightmap;
pub mod noise;
pub mod rivers;
pub mod seed;
pub mod terrain;

pub use biome::{Biome, BiomeRule, BiomeTable};
pub use config::{ShapeMode, TerrainParams, Wind};
pub use error::TerrainError;
pub use grid::{Grid, Tile};
pub use heightmap::generate_elevation;
pub use rivers::River;
pub use terrain::{Terrain, TerrainArtifact, TerrainGenerator, generate_terrain};
