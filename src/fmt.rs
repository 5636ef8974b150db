//! 展示格式化模块 - 纯逻辑层
//!
//! 金额按印度分组（en-IN）格式化，日期按门户统一的 medium 风格。
//! `datetime-local` 输入框的值转换也集中在这里。

use chrono::{DateTime, NaiveDateTime, Utc};

#[cfg(test)]
mod tests;

/// 整数部分按印度位值分组：最后三位一组，其余每两位一组
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups = Vec::new();
    let mut index = head.len();
    while index > 2 {
        groups.push(&head[index - 2..index]);
        index -= 2;
    }
    groups.push(&head[..index]);
    groups.reverse();

    format!("{},{}", groups.join(","), tail)
}

/// 金额格式化为卢比，如 `₹12,34,567.50`
pub fn inr(amount: f64) -> String {
    let negative = amount < 0.0;
    let rounded = format!("{:.2}", amount.abs());
    let (int_part, frac_part) = rounded.split_once('.').unwrap_or((rounded.as_str(), "00"));

    let sign = if negative { "-" } else { "" };
    format!("{sign}₹{}.{frac_part}", group_indian(int_part))
}

/// 计数格式化，如 `1,23,456`
pub fn count(value: u32) -> String {
    group_indian(&value.to_string())
}

/// 日期，如 `3 Aug 2026`
pub fn date_medium(value: &DateTime<Utc>) -> String {
    value.format("%-d %b %Y").to_string()
}

/// 日期时间，如 `3 Aug 2026, 14:05`
pub fn date_time_medium(value: &DateTime<Utc>) -> String {
    value.format("%-d %b %Y, %H:%M").to_string()
}

/// 转换为 `datetime-local` 输入框的值（分钟精度）
pub fn to_datetime_local(value: &DateTime<Utc>) -> String {
    value.format("%Y-%m-%dT%H:%M").to_string()
}

/// 解析 `datetime-local` 输入框的值
pub fn parse_datetime_local(value: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M")
        .ok()
        .map(|naive| naive.and_utc())
}
