//! Kernel module - server infrastructure and dependencies.

pub mod deps;
pub mod leadsquared;
pub mod test_dependencies;
pub mod traits;

pub use deps::{GrowtelAdapter, PostgresOtpStore, ServerDeps};
pub use leadsquared::{LeadSquaredClient, LeadSquaredOptions, NoopCrmSync};
pub use test_dependencies::TestDependencies;
pub use traits::*;
