//! Status command: what the stored state says about the last invocations.

use super::Context;
use crate::clock;
use crate::error::Error as ErrorCommon;

/// Text shown for values which aren't known.
const UNKNOWN: &str = "未知";

/// Renders the status. It never fails; a state that can't be read is shown as
/// such.
pub fn execute(ctx: &Context) -> String {
    match render(ctx) {
        Ok(s) => s,
        Err(e) => format!("异常：{}", e),
    }
}

fn render(ctx: &Context) -> Result<String, ErrorCommon> {
    let last = ctx.store.load_last_address()?;
    let history = ctx.store.load_history()?;
    let state = ctx.store.load_rollover()?;
    let today = clock::day_of(ctx.clock.now());

    let changes = if history.is_empty() {
        String::from("无")
    } else {
        format!("{} 次（{} 个 IP）", history.len(), history.aggregate().len())
    };
    let report_sent = if state.report_sent_for_day == Some(today) {
        "已发送"
    } else {
        "未发送"
    };

    Ok(format!(
        "Cloudflare DDNS 运行中\n\
         域名：{}\n\
         当前 IP：{}\n\
         今日变化：{}\n\
         今日报告：{}",
        ctx.provider.domain(),
        last.as_ref().map(|a| a.as_str()).unwrap_or(UNKNOWN),
        changes,
        report_sent,
    ))
}

#[cfg(test)]
mod test {
    use super::*;

    use crate::address::{validate, Address};
    use crate::clock::ManualClock;
    use crate::history::{observation, DailyHistory};
    use crate::providers::{self, ARecord, Response};
    use crate::rollover::RolloverState;
    use crate::store::MemoryStore;

    use async_trait::async_trait;

    struct Domain;

    #[async_trait]
    impl ARecord for Domain {
        fn domain(&self) -> &str {
            "home.example.com"
        }

        async fn update_record_a(&self, _: &Address) -> Result<Response, providers::Error> {
            unreachable!("status never updates")
        }
    }

    fn context(store: MemoryStore) -> Context {
        Context {
            clock: Box::new(ManualClock::at("2024-01-02T09:00:00+08:00")),
            store: Box::new(store),
            finders: Vec::new(),
            provider: Box::new(Domain),
            notifier: None,
            locators: Vec::new(),
        }
    }

    #[test]
    fn test_status_without_state() {
        assert_eq!(
            execute(&context(MemoryStore::default())),
            "Cloudflare DDNS 运行中\n\
             域名：home.example.com\n\
             当前 IP：未知\n\
             今日变化：无\n\
             今日报告：未发送"
        );
    }

    #[test]
    fn test_status_with_state() {
        let store = MemoryStore::default();
        *store.last_address.borrow_mut() = Some(validate("1.1.1.1").unwrap());
        *store.history.borrow_mut() = DailyHistory::from(vec![
            observation("1.1.1.1", "2024-01-02T00:05:00+08:00"),
            observation("2.2.2.2", "2024-01-02T03:00:00+08:00"),
            observation("1.1.1.1", "2024-01-02T08:00:00+08:00"),
        ]);
        *store.rollover.borrow_mut() = RolloverState {
            current_day: "2024-01-02".parse().ok(),
            report_sent_for_day: "2024-01-02".parse().ok(),
            ended_day: None,
        };

        let status = execute(&context(store));
        assert!(status.contains("当前 IP：1.1.1.1"), "{}", status);
        assert!(status.contains("今日变化：3 次（2 个 IP）"), "{}", status);
        assert!(status.ends_with("今日报告：已发送"), "{}", status);
    }
}
