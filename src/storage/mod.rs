mod file_store;
mod store;

pub use file_store::*;
pub use store::*;
