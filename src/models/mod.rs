pub mod query;
pub mod sample;

pub use query::*;
pub use sample::*;
