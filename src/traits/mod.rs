//! Trait definitions for Content API resources.
//!
//! Items and packages implement the traits they support, encapsulating
//! endpoint differences in the implementations.

mod get;
mod list;
mod resource;

pub use get::Get;
pub use list::{List, DEFAULT_PAGE_SIZE};
pub use resource::Resource;
