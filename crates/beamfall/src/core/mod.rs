pub mod gate;
pub mod geometry;
pub mod time;
