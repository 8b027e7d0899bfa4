//! 纯文本执行报告
use std::fmt::Write as _;
use once_cell::sync::Lazy;
use regex::Regex;

use super::plan::{ExecutionResults, ProcessedTab};

const RULE_WIDTH: usize = 80;

// 文件名中不允许出现的时间戳字符
static FILE_NAME_UNSAFE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[:.]").expect("固定正则表达式"));

/// 生成执行报告
pub fn render_report(results: &ExecutionResults, timestamp: &str) -> String {
    let heavy = "=".repeat(RULE_WIDTH);
    let light = "-".repeat(RULE_WIDTH);
    let mut out = String::new();

    // String 写入不会失败
    let _ = write!(out, "TAB GENIUS - DETAILED REPORT\nGenerated: {}\n{}\n\n", timestamp, heavy);

    let _ = write!(out, "SUMMARY\n{}\n", light);
    let _ = writeln!(out, "Total Tabs Processed: {}", results.processed());
    let _ = writeln!(out, "Tabs Closed: {}", results.closed.len());
    let _ = writeln!(out, "Tabs Bookmarked: {}", results.bookmarked.len());
    let _ = writeln!(out, "Tabs Kept Open: {}", results.kept.len());
    let _ = write!(out, "Errors Encountered: {}\n\n", results.errors.len());

    write_processed_section(&mut out, "CLOSED TABS", &results.closed, &light);

    if !results.bookmarked.is_empty() {
        let _ = write!(out, "BOOKMARKED TABS ({})\n{}\n", results.bookmarked.len(), light);
        for (i, tab) in results.bookmarked.iter().enumerate() {
            let status = if tab.closed { "Closed after bookmarking" } else { "Kept open" };
            let _ = write!(
                out,
                "{}. {}\n   URL: {}\n   Reason: {}\n   Status: {}\n\n",
                i + 1,
                tab.title,
                tab.url,
                tab.reason,
                status
            );
        }
    }

    write_processed_section(&mut out, "KEPT OPEN", &results.kept, &light);

    if !results.errors.is_empty() {
        let _ = write!(out, "ERRORS ({})\n{}\n", results.errors.len(), light);
        for (i, error) in results.errors.iter().enumerate() {
            let title = error.title.as_deref().filter(|t| !t.is_empty()).unwrap_or("Unknown");
            let _ = write!(out, "{}. {}\n   Error: {}\n\n", i + 1, title, error.error);
        }
    }

    let _ = write!(out, "\n{}\nReport generated by Tab Genius\n", heavy);
    out
}

fn write_processed_section(out: &mut String, heading: &str, tabs: &[ProcessedTab], light: &str) {
    if tabs.is_empty() {
        return;
    }
    let _ = write!(out, "{} ({})\n{}\n", heading, tabs.len(), light);
    for (i, tab) in tabs.iter().enumerate() {
        let _ = write!(out, "{}. {}\n   URL: {}\n   Reason: {}\n\n", i + 1, tab.title, tab.url, tab.reason);
    }
}

/// 报告文件名：`tab-genius-report-<时间戳>.txt`
pub fn report_file_name(timestamp: &str) -> String {
    format!("tab-genius-report-{}.txt", FILE_NAME_UNSAFE.replace_all(timestamp, "-"))
}
