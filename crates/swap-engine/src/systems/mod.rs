pub mod animation;
pub mod render;
pub mod swap;
