pub mod popup;
pub mod style;
pub mod surface;
pub mod viewport;

pub use popup::*;
pub use style::*;
pub use surface::*;
pub use viewport::*;
