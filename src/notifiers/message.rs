//! The notifications and their HTML templates.

use crate::address::Address;
use crate::locators::Location;
use crate::report::Report;

use chrono::{DateTime, FixedOffset};

/// Text shown for values which aren't known.
const UNKNOWN: &str = "未知";

/// Something that happened and is worth telling.
#[derive(Debug)]
pub enum Notification {
    /// The summary of the day.
    DailyReport {
        domain: String,
        report: Report,
        /// The address that the record points to.
        address: Option<Address>,
        location: Option<Location>,
        time: DateTime<FixedOffset>,
    },
    /// The public IP couldn't be found.
    DiscoveryFailed {
        domain: String,
        reason: String,
        time: DateTime<FixedOffset>,
    },
    /// The record couldn't be updated or the invocation failed unexpectedly.
    Failed {
        domain: String,
        reason: String,
        time: DateTime<FixedOffset>,
    },
}

impl Notification {
    /// Renders the notification as a message with the HTML subset that chat
    /// services understand (`<b>`, `<i>`, `<code>`).
    pub fn to_html(&self) -> String {
        match self {
            Notification::DailyReport {
                domain,
                report,
                address,
                location,
                time,
            } => {
                let address = address.as_ref().map(|a| a.as_str()).unwrap_or(UNKNOWN);
                let (isp, region) = match location {
                    Some(l) => (non_empty_or_unknown(&l.isp), non_empty_or_unknown(&l.region)),
                    None => (UNKNOWN, UNKNOWN),
                };

                format!(
                    "<b>📅 Cloudflare DDNS 每日提醒</b>\n\n\
                     <b>🌐 域名：</b><b>{}</b>\n\n\
                     <b>📜 IP 变化历史：</b>\n{}\n\n\
                     <b>📍 当前 IP：</b><code>{}</code>\n\
                     <b>📡 运营商：</b><i>{}</i>\n\
                     <b>🗺 地区：</b><i>{}</i>\n\
                     <b>🕒 时间：</b><i>{}</i>\n\n\
                     ✅ 今日 DDNS 状态正常",
                    escape(domain),
                    escape(&report.to_string()),
                    escape(address),
                    escape(isp),
                    escape(region),
                    format_time(time),
                )
            }
            Notification::DiscoveryFailed {
                domain,
                reason,
                time,
            } => format!(
                "<b>🚨 DDNS IP 获取失败</b>\n\n\
                 <b>{}</b>\n\
                 错误信息：<i>{}</i>\n\
                 <b>时间：</b><i>{}</i>",
                escape(domain),
                escape(reason),
                format_time(time),
            ),
            Notification::Failed {
                domain,
                reason,
                time,
            } => format!(
                "<b>❌ Cloudflare DDNS 错误</b>\n\n\
                 <b>{}</b>\n\
                 错误信息：<i>{}</i>\n\
                 <b>时间：</b><i>{}</i>",
                escape(domain),
                escape(reason),
                format_time(time),
            ),
        }
    }
}

fn non_empty_or_unknown(s: &str) -> &str {
    if s.is_empty() {
        UNKNOWN
    } else {
        s
    }
}

fn format_time(time: &DateTime<FixedOffset>) -> String {
    crate::clock::local(*time).format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Escapes the characters that have a meaning in HTML.
fn escape(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }

    escaped
}

#[cfg(test)]
mod test {
    use super::*;

    use crate::address::validate;
    use crate::history::{aggregate, observation};
    use crate::report::render;

    fn time() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2024-01-02T00:00:05+08:00").unwrap()
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape(r#"<a href="x">&</a>"#), "&lt;a href=&quot;x&quot;&gt;&amp;&lt;/a&gt;");
        assert_eq!(escape("1.1.1.1"), "1.1.1.1");
    }

    #[test]
    fn test_daily_report() {
        let history = vec![
            observation("1.1.1.1", "2024-01-01T00:05:00+08:00"),
            observation("2.2.2.2", "2024-01-01T00:10:00+08:00"),
            observation("1.1.1.1", "2024-01-01T00:15:00+08:00"),
        ];

        let n = Notification::DailyReport {
            domain: String::from("home.example.com"),
            report: render(&aggregate(&history)),
            address: Some(validate("1.1.1.1").unwrap()),
            location: Some(Location {
                isp: String::from("电信"),
                region: String::new(),
            }),
            time: time(),
        };

        assert_eq!(
            n.to_html(),
            "<b>📅 Cloudflare DDNS 每日提醒</b>\n\n\
             <b>🌐 域名：</b><b>home.example.com</b>\n\n\
             <b>📜 IP 变化历史：</b>\n\
             （今日共更换 2 个 IP）\n\
             最频繁：1.1.1.1（2 次）\n\n\
             ① 1.1.1.1  🕒 00:05 / 00:15  ⚠️ 2 次\n\
             ② 2.2.2.2  🕒 00:10\n\n\
             <b>📍 当前 IP：</b><code>1.1.1.1</code>\n\
             <b>📡 运营商：</b><i>电信</i>\n\
             <b>🗺 地区：</b><i>未知</i>\n\
             <b>🕒 时间：</b><i>2024-01-02 00:00:05</i>\n\n\
             ✅ 今日 DDNS 状态正常"
        );
    }

    #[test]
    fn test_daily_report_without_changes() {
        let n = Notification::DailyReport {
            domain: String::from("home.example.com"),
            report: render(&[]),
            address: None,
            location: None,
            time: time(),
        };

        let html = n.to_html();
        assert!(html.contains("<b>📜 IP 变化历史：</b>\n无 IP 变化\n"), "{}", html);
        assert!(html.contains("<code>未知</code>"), "{}", html);
    }

    #[test]
    fn test_failures() {
        let n = Notification::DiscoveryFailed {
            domain: String::from("home.example.com"),
            reason: String::from("no <address>"),
            time: time(),
        };
        assert_eq!(
            n.to_html(),
            "<b>🚨 DDNS IP 获取失败</b>\n\n\
             <b>home.example.com</b>\n\
             错误信息：<i>no &lt;address&gt;</i>\n\
             <b>时间：</b><i>2024-01-02 00:00:05</i>"
        );

        let n = Notification::Failed {
            domain: String::from("home.example.com"),
            reason: String::from("A record of home.example.com not found"),
            time: time(),
        };
        assert!(n.to_html().starts_with("<b>❌ Cloudflare DDNS 错误</b>"));
    }
}
