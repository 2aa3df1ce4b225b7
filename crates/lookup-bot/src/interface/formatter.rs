//! Response formatting utilities
//!
//! All user-facing text is built here. Platforms only supply the three markup
//! primitives ([`Formatter::bold`], [`Formatter::code`], [`Formatter::escape`]);
//! the message templates are shared provided methods.

use crate::engine::{IpInfo, LookupRequest, LookupResult, PhoneRecord};
use crate::interface::BotPlatform;

/// Rendered in place of any missing field
pub const MISSING: &str = "N/A";

pub const NO_RECORDS: &str = "No records found.";
pub const PHONE_UNAVAILABLE: &str = "API temporarily unavailable.";
pub const IP_UNAVAILABLE: &str = "Could not fetch IP information";

const RULE: &str = "➖➖➖➖➖➖➖➖➖➖";

pub trait Formatter: Send + Sync {
    fn platform(&self) -> BotPlatform;

    /// Bold, escaping `text`
    fn bold(&self, text: &str) -> String;

    /// Inline code, escaping `text`
    fn code(&self, text: &str) -> String;

    /// Escape text for the platform's markup
    fn escape(&self, text: &str) -> String;

    /// Render a lookup outcome for `request`
    fn format_lookup(&self, request: &LookupRequest, result: &LookupResult) -> String {
        match (request, result) {
            (LookupRequest::Phone(number), LookupResult::Phone(records)) => {
                self.format_phone_records(number, records)
            }
            (LookupRequest::Ip(address), LookupResult::Ip(info)) => {
                self.format_ip_info(address, info)
            }
            (LookupRequest::Phone(_), LookupResult::Error) => format!(
                "❌ {}\n\nPlease try again in 30 seconds.",
                self.bold(PHONE_UNAVAILABLE)
            ),
            (LookupRequest::Phone(_), _) => format!("❌ {}", self.bold(NO_RECORDS)),
            (LookupRequest::Ip(_), _) => format!("❌ {}", self.bold(IP_UNAVAILABLE)),
        }
    }

    fn format_phone_records(&self, number: &str, records: &[PhoneRecord]) -> String {
        let mut text = format!(
            "📱 {}\n{RULE}\n📞 {} {}\n📊 {} {}\n{RULE}\n",
            self.bold("PHONE LOOKUP"),
            self.bold("Number:"),
            self.code(number),
            self.bold("Records:"),
            records.len(),
        );

        for (i, record) in records.iter().enumerate() {
            let address = record.address.as_ref().map(|a| a.replace('!', ", "));

            text.push_str(&format!("\n📋 {}\n", self.bold(&format!("Record #{}", i + 1))));
            text.push_str(&self.field("👤", "Name:", record.name.as_deref(), false));
            text.push_str(&self.field("👨‍👩‍👦", "Father:", record.father_name.as_deref(), false));
            text.push_str(&self.field("📱", "Mobile:", record.mobile.as_deref(), true));
            text.push_str(&self.field("🏠", "Address:", address.as_deref(), false));
            text.push_str(&self.field("📞", "Alternate:", record.alternate_mobile.as_deref(), true));
            text.push_str(&self.field("🌐", "Telecom:", record.telecom_circle.as_deref(), false));
            text.push_str(&self.field("🆔", "ID:", record.id_number.as_deref(), true));
            text.push_str(RULE);
            text.push('\n');
        }

        text
    }

    fn format_ip_info(&self, address: &str, info: &IpInfo) -> String {
        format!(
            "🌐 {}\n{RULE}\n📍 {} {}\n{}{}{}{}{}{RULE}",
            self.bold("IP LOOKUP RESULTS"),
            self.bold("IP:"),
            self.code(address),
            self.field("🏙️", "City:", info.city.as_deref(), false),
            self.field("🏛️", "Region:", info.region.as_deref(), false),
            self.field("🌍", "Country:", info.country.as_deref(), false),
            self.field("📡", "ISP:", info.isp.as_deref(), false),
            self.field("🕐", "Timezone:", info.timezone.as_deref(), false),
        )
    }

    /// One `icon label value` line; missing values render as [`MISSING`]
    fn field(&self, icon: &str, label: &str, value: Option<&str>, as_code: bool) -> String {
        let value = match value {
            Some(v) if as_code => self.code(v),
            Some(v) => self.escape(v),
            None => MISSING.to_string(),
        };
        format!("{icon} {} {value}\n", self.bold(label))
    }

    fn welcome(&self, first_name: Option<&str>) -> String {
        let greeting = match first_name {
            Some(name) => format!("Hello {name}!"),
            None => "Hello!".to_string(),
        };
        format!(
            "🤖 {}\n\n{} I look up phone numbers and IP addresses.\n\n\
             ✨ {}\n• 📱 Phone number lookup\n• 🌐 IP address information\n\n\
             📌 {} tap 📱 Phone Lookup, then send {}",
            self.bold("LOOKUP BOT"),
            self.bold(&greeting),
            self.bold("Features:"),
            self.bold("Example:"),
            self.code("9876543210"),
        )
    }

    fn help(&self) -> String {
        format!(
            "📋 {}\n\n🤖 {}\n1. Tap 'Phone Lookup' button\n2. Send 10-digit phone number\n\
             3. Get the lookup result\n\n🌐 {} tap 'IP Lookup' and send an address like {}\n\n\
             Send /start to bring the menu back.",
            self.bold("BOT HELP GUIDE"),
            self.bold("How to Use:"),
            self.bold("IP Lookup:"),
            self.code("8.8.8.8"),
        )
    }

    fn status(&self, active_sessions: usize) -> String {
        format!(
            "✅ {}\n\n🟢 {}\n👥 {} {active_sessions}",
            self.bold("BOT STATUS"),
            self.bold("ONLINE"),
            self.bold("Active sessions:"),
        )
    }

    fn menu_hint(&self) -> String {
        format!("🤖 {}", self.bold("Please select from menu!"))
    }

    fn phone_prompt(&self) -> String {
        format!(
            "📱 {}\n\nSend me a 10-digit phone number:\n\nExample: {}",
            self.bold("Phone Lookup"),
            self.code("9876543210"),
        )
    }

    fn ip_prompt(&self) -> String {
        format!(
            "🌐 {}\n\nSend me an IP address:\n\nExample: {}",
            self.bold("IP Lookup"),
            self.code("8.8.8.8"),
        )
    }

    fn invalid_phone(&self) -> String {
        format!("❌ {}\n\nSend exactly 10 digits.", self.bold("Invalid format!"))
    }

    fn invalid_ip(&self) -> String {
        format!("❌ {}\n\nExample: {}", self.bold("Invalid IP!"), self.code("8.8.8.8"))
    }
}

/// Plain text, for the REPL
pub struct PlainFormatter;

impl Formatter for PlainFormatter {
    fn platform(&self) -> BotPlatform {
        BotPlatform::Cli
    }

    fn bold(&self, text: &str) -> String {
        text.to_string()
    }

    fn code(&self, text: &str) -> String {
        text.to_string()
    }

    fn escape(&self, text: &str) -> String {
        text.to_string()
    }
}

/// Telegram HTML parse mode
pub struct TelegramFormatter;

impl Formatter for TelegramFormatter {
    fn platform(&self) -> BotPlatform {
        BotPlatform::Telegram
    }

    fn bold(&self, text: &str) -> String {
        format!("<b>{}</b>", self.escape(text))
    }

    fn code(&self, text: &str) -> String {
        format!("<code>{}</code>", self.escape(text))
    }

    fn escape(&self, text: &str) -> String {
        teloxide::utils::html::escape(text)
    }
}

pub struct FormatterFactory;

impl FormatterFactory {
    pub fn create(platform: BotPlatform) -> Box<dyn Formatter> {
        match platform {
            BotPlatform::Cli => Box::new(PlainFormatter),
            BotPlatform::Telegram => Box::new(TelegramFormatter),
        }
    }
}
