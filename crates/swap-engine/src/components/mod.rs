pub mod animation;
pub mod enemy;
pub mod player;
pub mod projectile;
pub mod switch;
