pub mod hexes;
pub mod models;
pub mod structures;
pub mod victory;
