pub mod model;

pub use model::{Direction, DocumentAttributes, Locale};
