//! Route definitions

mod credits;
mod messaging;
mod orders;
mod organizations;
mod payments;
mod verification;

pub use credits::credit_routes;
pub use messaging::messaging_routes;
pub use orders::order_routes;
pub use organizations::organization_routes;
pub use payments::payment_routes;
pub use verification::verification_routes;
