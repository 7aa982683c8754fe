pub mod allocation;
pub mod pending;
pub mod resolver;
pub mod status;
pub mod suspension;

pub use allocation::split_evenly;
pub use resolver::{resolve, ResolvedPeriod};
pub use status::derive_status;
