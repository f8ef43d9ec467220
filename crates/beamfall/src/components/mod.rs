pub mod beam;
pub mod explosion;
