pub mod app;
pub mod content;
pub mod driver;
pub mod group;
pub mod loader;
pub mod selection;
pub mod source;
pub mod toggle;

#[cfg(test)]
pub(crate) mod testing;

pub use app::*;
pub use content::*;
pub use driver::*;
pub use group::*;
pub use loader::*;
pub use selection::*;
pub use source::*;
