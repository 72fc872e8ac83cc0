pub mod custody;
pub mod vault;

pub use custody::*;
pub use vault::*;
