// Jaro Connect OTP service - API Core
//
// Issues six digit SMS passcodes for phone login and verifies them.
// Business rules live in domains/otp; collaborators (database, SMS gateway,
// CRM) are injected through the traits in kernel/.

pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
