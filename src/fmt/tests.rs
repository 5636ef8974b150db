use super::*;
use chrono::TimeZone;

// =========================================================
// 金额与计数格式化测试
// =========================================================

#[test]
fn test_inr_small_amounts() {
    assert_eq!(inr(0.0), "₹0.00");
    assert_eq!(inr(999.0), "₹999.00");
    assert_eq!(inr(499.5), "₹499.50");
}

#[test]
fn test_inr_indian_grouping() {
    assert_eq!(inr(1000.0), "₹1,000.00");
    assert_eq!(inr(123456.0), "₹1,23,456.00");
    assert_eq!(inr(1234567.5), "₹12,34,567.50");
    assert_eq!(inr(1_00_00_000.0), "₹1,00,00,000.00");
}

#[test]
fn test_inr_negative() {
    assert_eq!(inr(-1234.5), "-₹1,234.50");
}

#[test]
fn test_count_grouping() {
    assert_eq!(count(0), "0");
    assert_eq!(count(1000), "1,000");
    assert_eq!(count(1234567), "12,34,567");
}

// =========================================================
// 日期格式化测试
// =========================================================

#[test]
fn test_date_formats() {
    let value = Utc.with_ymd_and_hms(2026, 8, 3, 14, 5, 0).unwrap();

    assert_eq!(date_medium(&value), "3 Aug 2026");
    assert_eq!(date_time_medium(&value), "3 Aug 2026, 14:05");
}

// =========================================================
// datetime-local 转换测试
// =========================================================

#[test]
fn test_datetime_local_round_trip() {
    let value = Utc.with_ymd_and_hms(2026, 8, 3, 14, 5, 0).unwrap();
    let rendered = to_datetime_local(&value);

    assert_eq!(rendered, "2026-08-03T14:05");
    assert_eq!(parse_datetime_local(&rendered), Some(value));
}

#[test]
fn test_datetime_local_rejects_garbage() {
    assert_eq!(parse_datetime_local("yesterday"), None);
    assert_eq!(parse_datetime_local(""), None);
}
