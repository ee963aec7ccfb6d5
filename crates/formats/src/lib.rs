pub mod float;
pub mod group;
pub mod page;

pub use group::*;
pub use page::*;
