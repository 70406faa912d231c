// Business domains
pub mod otp;
