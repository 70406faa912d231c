pub mod otp_record;
pub mod phone;

pub use otp_record::*;
pub use phone::*;
