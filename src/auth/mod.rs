mod extractors;
pub mod jwt;

pub use extractors::*;
