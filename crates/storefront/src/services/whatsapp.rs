//! WhatsApp chat link.

use crate::config::WhatsappConfig;

/// `https://wa.me/{digits}?text={message}` for the configured number.
///
/// Returns `None` if the number has no digits.
#[must_use]
pub fn chat_link(config: &WhatsappConfig) -> Option<String> {
    let digits: String = config.number.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    Some(format!(
        "https://wa.me/{digits}?text={}",
        urlencoding::encode(config.message.trim())
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(number: &str, message: &str) -> WhatsappConfig {
        WhatsappConfig {
            number: number.to_string(),
            message: message.to_string(),
        }
    }

    #[test]
    fn test_chat_link() {
        let link = chat_link(&config("+971 50 123 4567", "Hi there!"));
        assert_eq!(
            link.as_deref(),
            Some("https://wa.me/971501234567?text=Hi%20there%21")
        );
    }

    #[test]
    fn test_number_without_digits() {
        assert!(chat_link(&config("n/a", "Hi")).is_none());
    }
}
