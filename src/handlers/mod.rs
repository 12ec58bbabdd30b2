//! API handlers

pub mod credits;
pub mod messaging;
pub mod orders;
pub mod organizations;
pub mod payments;
pub mod verification;

pub use credits::*;
pub use messaging::*;
pub use orders::*;
pub use organizations::*;
pub use payments::*;
pub use verification::*;
