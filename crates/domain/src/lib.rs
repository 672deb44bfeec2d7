pub mod errors;
pub mod timestamp;
pub mod todo;

pub use errors::*;
pub use todo::*;
