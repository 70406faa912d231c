//! SMS body for OTP delivery.
//!
//! The text is registered as a DLT template with the carrier; any change to
//! the wording must be re-registered or Growtel will reject the message.

const OTP_MESSAGE_PREFIX: &str = "Your OTP for accessing the Jaro Connect app is ";
const OTP_MESSAGE_SUFFIX: &str = ". Explore career growth, alumni networking, and lifelong learning\u{2014}all in one place.\u{2013} Jaro Education";

/// Render the OTP message for a code.
pub fn render_otp_message(code: &str) -> String {
    format!("{}{}{}", OTP_MESSAGE_PREFIX, code, OTP_MESSAGE_SUFFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_embeds_code() {
        let message = render_otp_message("483920");
        assert!(message.starts_with("Your OTP for accessing the Jaro Connect app is 483920."));
        assert!(message.ends_with("Jaro Education"));
    }

    #[test]
    fn test_message_contains_code_once() {
        let message = render_otp_message("123456");
        assert_eq!(message.matches("123456").count(), 1);
    }
}
