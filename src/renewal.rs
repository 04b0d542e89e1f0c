use std::fmt;

use chrono::{Datelike, Local, NaiveDate};
use regex::Regex;

use crate::model::Client;

/// A calendar month, parsed from the `YYYY-MM` filter format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Month {
    year: i32,
    month: u32,
}

impl Month {
    /// Strict `YYYY-MM` parse. Malformed input yields `None`; callers treat
    /// that as an empty result and return early rather than erroring.
    pub fn parse(s: &str) -> Option<Month> {
        let re = Regex::new(r"^(\d{4})-(\d{2})$").unwrap();
        let caps = re.captures(s.trim())?;
        let year: i32 = caps[1].parse().ok()?;
        let month: u32 = caps[2].parse().ok()?;
        if !(1..=12).contains(&month) {
            return None;
        }
        Some(Month { year, month })
    }

    pub fn of(date: NaiveDate) -> Month {
        Month {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn current() -> Month {
        Month::of(Local::now().date_naive())
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenewalStatus {
    /// Falls within the target month and has not passed yet.
    Pending,
    /// Month-year before the target month, or within it but already past.
    Missed,
    /// No renewal date stored; excluded from both counts but surfaced in lists.
    Unscheduled,
    /// Renewal month is after the target month.
    NotDue,
}

impl fmt::Display for RenewalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenewalStatus::Pending => write!(f, "pending"),
            RenewalStatus::Missed => write!(f, "missed"),
            RenewalStatus::Unscheduled => write!(f, "no renewal date set"),
            RenewalStatus::NotDue => write!(f, "not due"),
        }
    }
}

/// Classify one renewal date against a target month.
///
/// When the renewal falls inside the target month, the day-level comparison
/// against `today` applies whether or not the target is the current calendar
/// month; for the current month this is the original rule, and it extends the
/// same way to past and future months.
pub fn classify(renewal: Option<NaiveDate>, target: Month, today: NaiveDate) -> RenewalStatus {
    let Some(date) = renewal else {
        return RenewalStatus::Unscheduled;
    };
    let month = Month::of(date);
    if month < target {
        RenewalStatus::Missed
    } else if month > target {
        RenewalStatus::NotDue
    } else if date < today {
        RenewalStatus::Missed
    } else {
        RenewalStatus::Pending
    }
}

/// Aggregate counts for the calendar summary view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenewalCounts {
    pub pending: usize,
    pub missed: usize,
    pub unscheduled: usize,
}

pub fn summarize(clients: &[Client], target: Month, today: NaiveDate) -> RenewalCounts {
    let mut counts = RenewalCounts::default();
    for client in clients {
        match classify(client.renewal_date(), target, today) {
            RenewalStatus::Pending => counts.pending += 1,
            RenewalStatus::Missed => counts.missed += 1,
            RenewalStatus::Unscheduled => counts.unscheduled += 1,
            RenewalStatus::NotDue => {}
        }
    }
    counts
}

/// Clients matching one requested status, ordered by renewal date for the
/// list view. Unscheduled clients keep their original relative order.
pub fn filter_by_status(
    clients: &[Client],
    target: Month,
    today: NaiveDate,
    status: RenewalStatus,
) -> Vec<Client> {
    let mut matched: Vec<Client> = clients
        .iter()
        .filter(|c| classify(c.renewal_date(), target, today) == status)
        .cloned()
        .collect();
    matched.sort_by_key(|c| c.renewal_date());
    matched
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{InsuranceCover, InsuranceType, VehicleDetail};
    use pretty_assertions::assert_eq;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn vehicle_client(id: u64, renewal: Option<NaiveDate>) -> Client {
        Client {
            id,
            name: format!("client-{id}"),
            mobile: "0000000000".into(),
            place: String::new(),
            insurance_type: InsuranceType::Vehicle,
            created_at: None,
            is_converted: false,
            vehicle_details: Some(VehicleDetail {
                id,
                client: id,
                vehicle_type: "Car".into(),
                insurance_cover: InsuranceCover::Full,
                renewal_date: renewal,
            }),
            health_details: None,
        }
    }

    #[test]
    fn month_parse_accepts_yyyy_mm_only() {
        assert_eq!(Month::parse("2024-07"), Some(Month { year: 2024, month: 7 }));
        assert_eq!(Month::parse("2024-7"), None);
        assert_eq!(Month::parse("2024-13"), None);
        assert_eq!(Month::parse("2024-00"), None);
        assert_eq!(Month::parse("garbage"), None);
        assert_eq!(Month::parse(""), None);
    }

    #[test]
    fn month_ordering_is_chronological() {
        let jan = Month::parse("2024-01").unwrap();
        let dec_prev = Month::parse("2023-12").unwrap();
        assert!(dec_prev < jan);
        assert!(Month::parse("2024-07").unwrap() > jan);
    }

    #[test]
    fn in_month_renewal_before_today_is_missed() {
        let target = Month::parse("2024-07").unwrap();
        assert_eq!(
            classify(Some(d(2024, 7, 15)), target, d(2024, 7, 1)),
            RenewalStatus::Pending
        );
        assert_eq!(
            classify(Some(d(2024, 7, 15)), target, d(2024, 7, 20)),
            RenewalStatus::Missed
        );
    }

    #[test]
    fn earlier_month_is_always_missed() {
        let target = Month::parse("2024-07").unwrap();
        assert_eq!(
            classify(Some(d(2024, 6, 30)), target, d(2024, 7, 1)),
            RenewalStatus::Missed
        );
    }

    #[test]
    fn same_day_counts_as_pending() {
        let target = Month::parse("2024-07").unwrap();
        assert_eq!(
            classify(Some(d(2024, 7, 15)), target, d(2024, 7, 15)),
            RenewalStatus::Pending
        );
    }

    #[test]
    fn later_month_is_not_due() {
        let target = Month::parse("2024-07").unwrap();
        assert_eq!(
            classify(Some(d(2024, 8, 1)), target, d(2024, 7, 1)),
            RenewalStatus::NotDue
        );
    }

    #[test]
    fn missing_date_is_unscheduled() {
        let target = Month::parse("2024-07").unwrap();
        assert_eq!(classify(None, target, d(2024, 7, 1)), RenewalStatus::Unscheduled);
    }

    #[test]
    fn summary_counts_exclude_unscheduled_and_not_due() {
        let clients = vec![
            vehicle_client(1, Some(d(2024, 7, 5))),  // missed (before today)
            vehicle_client(2, Some(d(2024, 7, 20))), // pending
            vehicle_client(3, Some(d(2024, 6, 1))),  // missed (earlier month)
            vehicle_client(4, None),                 // unscheduled
            vehicle_client(5, Some(d(2024, 9, 1))),  // not due
        ];
        let counts = summarize(&clients, Month::parse("2024-07").unwrap(), d(2024, 7, 10));
        assert_eq!(
            counts,
            RenewalCounts {
                pending: 1,
                missed: 2,
                unscheduled: 1,
            }
        );
    }

    #[test]
    fn filter_orders_by_renewal_date() {
        let clients = vec![
            vehicle_client(1, Some(d(2024, 7, 25))),
            vehicle_client(2, Some(d(2024, 7, 12))),
            vehicle_client(3, Some(d(2024, 7, 18))),
        ];
        let pending = filter_by_status(
            &clients,
            Month::parse("2024-07").unwrap(),
            d(2024, 7, 1),
            RenewalStatus::Pending,
        );
        let ids: Vec<u64> = pending.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }
}
