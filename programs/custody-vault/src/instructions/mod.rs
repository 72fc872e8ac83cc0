pub mod add_funds;
pub mod initialize;
pub mod withdraw_funds;

pub use add_funds::*;
pub use initialize::*;
pub use withdraw_funds::*;
