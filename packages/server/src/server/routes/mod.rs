// HTTP routes
pub mod otp;

pub use otp::*;
