mod ballot;
mod vote;

pub use ballot::*;
pub use vote::*;
