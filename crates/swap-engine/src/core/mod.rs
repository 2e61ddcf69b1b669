pub mod collision;
pub mod geometry;
pub mod time;
pub mod world;
