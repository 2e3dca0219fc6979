//! Content API model types.

mod item;
mod package;

pub use item::*;
pub use package::*;
