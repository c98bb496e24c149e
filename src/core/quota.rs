use crate::core::Entitlement;
use crate::utils::error::{ConvertError, Result};
use chrono::{DateTime, Local, TimeZone, Utc};

/// Start of the quota window: local midnight of the day `now` falls on.
pub fn start_of_local_day(now: DateTime<Utc>) -> DateTime<Utc> {
    start_of_day_in(now, &Local)
}

pub fn start_of_day_in<Tz: TimeZone>(now: DateTime<Utc>, tz: &Tz) -> DateTime<Utc> {
    let local_date = now.with_timezone(tz).date_naive();
    local_date
        .and_hms_opt(0, 0, 0)
        .and_then(|midnight| tz.from_local_datetime(&midnight).earliest())
        .map(|midnight| midnight.with_timezone(&Utc))
        // 當地午夜不存在時 (夏令時間跳躍) 以整天視窗為準
        .unwrap_or_else(|| now - chrono::Duration::hours(24))
}

/// Rejects the request once `used` reaches the daily limit. Unlimited tiers always pass.
pub fn check_daily_quota(entitlement: &Entitlement, used: u64) -> Result<()> {
    match entitlement.daily_limit {
        Some(limit) if used >= limit => Err(ConvertError::QuotaExceeded { used, limit }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PlanType;
    use chrono::FixedOffset;

    #[test]
    fn test_start_of_day_in_utc() {
        let now = Utc.with_ymd_and_hms(2025, 3, 14, 15, 30, 0).unwrap();
        let start = start_of_day_in(now, &Utc);
        assert_eq!(start, Utc.with_ymd_and_hms(2025, 3, 14, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_start_of_day_follows_local_calendar() {
        // 01:00 UTC 在 UTC+9 已經是 10:00，當地午夜為前一天 15:00 UTC
        let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
        let now = Utc.with_ymd_and_hms(2025, 3, 14, 1, 0, 0).unwrap();
        let start = start_of_day_in(now, &tokyo);
        assert_eq!(start, Utc.with_ymd_and_hms(2025, 3, 13, 15, 0, 0).unwrap());

        // 在 UTC-5 同一時刻仍是前一天晚上
        let new_york = FixedOffset::west_opt(5 * 3600).unwrap();
        let start = start_of_day_in(now, &new_york);
        assert_eq!(start, Utc.with_ymd_and_hms(2025, 3, 13, 5, 0, 0).unwrap());
    }

    #[test]
    fn test_local_window_never_after_now() {
        let now = Utc::now();
        assert!(start_of_local_day(now) <= now);
        assert!(now - start_of_local_day(now) <= chrono::Duration::hours(25));
    }

    #[test]
    fn test_free_quota_boundary() {
        let free = Entitlement::for_plan(PlanType::Free);
        assert!(check_daily_quota(&free, 4).is_ok());
        assert!(matches!(
            check_daily_quota(&free, 5),
            Err(ConvertError::QuotaExceeded { used: 5, limit: 5 })
        ));
    }

    #[test]
    fn test_premium_quota_unlimited() {
        let premium = Entitlement::for_plan(PlanType::Premium);
        assert!(check_daily_quota(&premium, 10_000).is_ok());
    }
}
