use chrono::{DateTime, Utc};

/// 获取当前 UTC 时间戳（毫秒）
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Format a "last update" column as `dd/mm/yyyy`
///
/// Records that were never updated show today's date, as the dashboard did.
pub fn format_update_day(updated_at: Option<DateTime<Utc>>) -> String {
    updated_at
        .unwrap_or_else(Utc::now)
        .format("%d/%m/%Y")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_update_day() {
        let ts = Utc.with_ymd_and_hms(2025, 3, 7, 23, 59, 0).unwrap();
        assert_eq!(format_update_day(Some(ts)), "07/03/2025");
    }

    #[test]
    fn test_format_update_day_defaults_to_today() {
        let before = Utc::now().format("%d/%m/%Y").to_string();
        let formatted = format_update_day(None);
        let after = Utc::now().format("%d/%m/%Y").to_string();
        assert!(formatted == before || formatted == after);
    }
}
