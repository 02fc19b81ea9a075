use chrono::{Days, NaiveDate};
use common::model::schedule::ScheduleStatus;

/// Where a due date stands relative to today.
///
/// Overdue once the due date has passed; due-soon inside the notice
/// window; current otherwise.
pub fn schedule_status(
    today: NaiveDate,
    due_date: NaiveDate,
    advance_notice_days: u32,
) -> ScheduleStatus {
    if due_date < today {
        return ScheduleStatus::Overdue;
    }
    let notice_start = due_date
        .checked_sub_days(Days::new(advance_notice_days as u64))
        .unwrap_or(NaiveDate::MIN);
    if notice_start < today {
        ScheduleStatus::DueSoon
    } else {
        ScheduleStatus::Current
    }
}

/// Notice windows are bounded to a year.
pub fn validate_notice_days(days: u32) -> Result<(), String> {
    if (1..=365).contains(&days) {
        Ok(())
    } else {
        Err("Advance notice must be between 1 and 365 days".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Days;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 4).unwrap()
    }

    #[test]
    fn yesterday_is_overdue() {
        let due = today().checked_sub_days(Days::new(1)).unwrap();
        assert_eq!(schedule_status(today(), due, 30), ScheduleStatus::Overdue);
    }

    #[test]
    fn inside_the_notice_window_is_due_soon() {
        let due = today().checked_add_days(Days::new(5)).unwrap();
        assert_eq!(schedule_status(today(), due, 30), ScheduleStatus::DueSoon);
        // Due today counts as due-soon, not overdue.
        assert_eq!(schedule_status(today(), today(), 30), ScheduleStatus::DueSoon);
    }

    #[test]
    fn outside_the_notice_window_is_current() {
        let due = today().checked_add_days(Days::new(60)).unwrap();
        assert_eq!(schedule_status(today(), due, 30), ScheduleStatus::Current);
    }

    #[test]
    fn notice_days_bounds() {
        assert!(validate_notice_days(0).is_err());
        assert!(validate_notice_days(1).is_ok());
        assert!(validate_notice_days(365).is_ok());
        assert!(validate_notice_days(366).is_err());
    }
}
