//! Aggregation engine: hours and earnings rollups over snapshots of entries and projects.
//!
//! Pure functions only. Nothing here touches the store or the clock; callers pass
//! `today` explicitly. Empty input yields zero-valued results, never an error.
//!
//! Earnings are always derived from the current hourly rate of each project. When a
//! set of entries spans several projects, hours are grouped per project, multiplied by
//! that project's rate, then summed.

use crate::domain::{Client, ClientId, Project, ProjectId, TimeEntry};
use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Hours and earnings accumulated together.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Tally {
    pub hours: f64,
    pub earnings: f64,
}

impl Tally {
    pub fn add(&mut self, hours: f64, earnings: f64) {
        self.hours += hours;
        self.earnings += earnings;
    }
}

/// project_id -> current hourly rate.
pub type RateCard = HashMap<ProjectId, f64>;

pub fn rate_card(projects: &[Project]) -> RateCard {
    projects.iter().map(|p| (p.id, p.hourly_rate)).collect()
}

/// Σ hours_worked.
pub fn hours<'a>(entries: impl IntoIterator<Item = &'a TimeEntry>) -> f64 {
    entries.into_iter().map(|e| e.hours_worked).sum()
}

/// hours(entries) × rate. Only meaningful when every entry bills at `rate`.
pub fn earnings<'a>(entries: impl IntoIterator<Item = &'a TimeEntry>, rate: f64) -> f64 {
    hours(entries) * rate
}

/// Earnings over a mixed-project entry set: per-project hours × that project's rate,
/// summed. Entries whose project is missing from `rates` earn nothing.
pub fn earnings_with_rates<'a>(
    entries: impl IntoIterator<Item = &'a TimeEntry>,
    rates: &RateCard,
) -> f64 {
    let mut per_project: BTreeMap<ProjectId, f64> = BTreeMap::new();
    for entry in entries {
        *per_project.entry(entry.project_id).or_default() += entry.hours_worked;
    }
    per_project
        .into_iter()
        .map(|(project_id, hours)| hours * rates.get(&project_id).copied().unwrap_or(0.0))
        .sum()
}

/// First date included in a window of `days` ending today.
pub fn cutoff(today: NaiveDate, days: u32) -> NaiveDate {
    today
        .checked_sub_days(Days::new(u64::from(days)))
        .unwrap_or(NaiveDate::MIN)
}

pub fn month_start(today: NaiveDate) -> NaiveDate {
    today.with_day(1).unwrap_or(today)
}

/// Entries dated on or after `today - days`, newest first. Entries sharing a date keep
/// their input order.
pub fn recent(entries: &[TimeEntry], today: NaiveDate, days: u32) -> Vec<&TimeEntry> {
    let since = cutoff(today, days);
    let mut selected: Vec<&TimeEntry> = entries.iter().filter(|e| e.date >= since).collect();
    selected.sort_by(|a, b| b.date.cmp(&a.date));
    selected
}

/// Hours and earnings of one project over its own entries.
pub fn project_totals(project: &Project, entries: &[TimeEntry]) -> Tally {
    let total_hours = hours(entries.iter().filter(|e| e.project_id == project.id));
    Tally {
        hours: total_hours,
        earnings: total_hours * project.hourly_rate,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClientTotals {
    pub client_id: ClientId,
    /// One row per owned project, in project order.
    pub projects: Vec<(ProjectId, Tally)>,
    pub total: Tally,
}

/// Per-project totals of a client and their sum.
pub fn client_totals(client_id: ClientId, projects: &[Project], entries: &[TimeEntry]) -> ClientTotals {
    let mut totals = ClientTotals {
        client_id,
        ..ClientTotals::default()
    };
    for project in projects.iter().filter(|p| p.client_id == client_id) {
        let tally = project_totals(project, entries);
        totals.total.add(tally.hours, tally.earnings);
        totals.projects.push((project.id, tally));
    }
    totals
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct BusinessSummary {
    pub total_clients: u64,
    pub total_projects: u64,
    pub total_hours: f64,
    pub total_earnings: f64,
    pub month_hours: f64,
    pub month_earnings: f64,
    /// total_earnings / total_hours; 0 when no hours are logged.
    pub avg_rate: f64,
}

pub fn business_summary(
    total_clients: u64,
    projects: &[Project],
    entries: &[TimeEntry],
    today: NaiveDate,
) -> BusinessSummary {
    let rates = rate_card(projects);
    let total_hours = hours(entries);
    let total_earnings = earnings_with_rates(entries, &rates);

    let since = month_start(today);
    let month_entries = || entries.iter().filter(move |e| e.date >= since);
    let month_hours = hours(month_entries());
    let month_earnings = earnings_with_rates(month_entries(), &rates);

    let avg_rate = if total_hours > 0.0 {
        total_earnings / total_hours
    } else {
        0.0
    };

    BusinessSummary {
        total_clients,
        total_projects: projects.len() as u64,
        total_hours,
        total_earnings,
        month_hours,
        month_earnings,
        avg_rate,
    }
}

/// Window report grouped by project and by calendar day.
///
/// Both groupings are built from the same filtered entry set, and each entry's
/// earnings are computed once, so the totals reconcile.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PeriodReport {
    pub since: NaiveDate,
    pub until: NaiveDate,
    pub days: u32,
    pub entry_count: usize,
    pub per_project: BTreeMap<ProjectId, Tally>,
    pub per_day: BTreeMap<NaiveDate, Tally>,
    pub total: Tally,
}

impl PeriodReport {
    pub fn is_empty(&self) -> bool {
        self.entry_count == 0
    }

    /// Daily rows, newest date first.
    pub fn days_newest_first(&self) -> impl Iterator<Item = (&NaiveDate, &Tally)> {
        self.per_day.iter().rev()
    }
}

/// Longest window a period report covers. Larger requests are clamped.
pub const MAX_REPORT_DAYS: u32 = 3660;

/// Entries dated `since..=today`. Entries after `today` fall outside the report.
pub fn period_report(
    projects: &[Project],
    entries: &[TimeEntry],
    today: NaiveDate,
    days: u32,
) -> PeriodReport {
    let rates = rate_card(projects);
    let days = days.min(MAX_REPORT_DAYS);
    let since = cutoff(today, days);
    let mut report = PeriodReport {
        since,
        until: today,
        days,
        ..PeriodReport::default()
    };

    for entry in entries.iter().filter(|e| e.date >= since && e.date <= today) {
        let rate = rates.get(&entry.project_id).copied().unwrap_or(0.0);
        let earned = entry.earnings_at(rate);
        report
            .per_project
            .entry(entry.project_id)
            .or_default()
            .add(entry.hours_worked, earned);
        report
            .per_day
            .entry(entry.date)
            .or_default()
            .add(entry.hours_worked, earned);
        report.total.add(entry.hours_worked, earned);
        report.entry_count += 1;
    }
    report
}

/// Clients with positive earnings, highest first. Ties keep client order.
pub fn top_clients(
    clients: &[Client],
    projects: &[Project],
    entries: &[TimeEntry],
    limit: usize,
) -> Vec<(ClientId, f64)> {
    let mut ranked: Vec<(ClientId, f64)> = clients
        .iter()
        .map(|c| (c.id, client_totals(c.id, projects, entries).total.earnings))
        .filter(|(_, earned)| *earned > 0.0)
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked.truncate(limit);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ProjectStatus;
    use chrono::Utc;

    const EPS: f64 = 1e-9;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn project(id: ProjectId, client_id: ClientId, rate: f64) -> Project {
        Project {
            id,
            name: format!("project-{}", id),
            description: None,
            hourly_rate: rate,
            status: ProjectStatus::Active,
            deadline: None,
            created_at: Utc::now(),
            client_id,
            category_id: None,
        }
    }

    fn entry(id: i64, project_id: ProjectId, on: NaiveDate, hours: f64) -> TimeEntry {
        TimeEntry {
            id,
            project_id,
            date: on,
            hours_worked: hours,
            description: format!("entry-{}", id),
            task_type: None,
            created_at: Utc::now(),
        }
    }

    fn client(id: ClientId) -> Client {
        Client {
            id,
            name: format!("client-{}", id),
            email: format!("c{}@example.com", id),
            company: None,
            phone: None,
            notes: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_empty_input_is_zero() {
        let today = date(2024, 3, 15);
        assert_eq!(hours(&[]), 0.0);
        assert_eq!(earnings_with_rates(&[], &RateCard::new()), 0.0);
        assert!(recent(&[], today, 7).is_empty());

        let summary = business_summary(0, &[], &[], today);
        assert_eq!(summary, BusinessSummary::default());

        let report = period_report(&[], &[], today, 30);
        assert!(report.is_empty());
        assert_eq!(report.total, Tally::default());
        assert_eq!(report.since, date(2024, 2, 14));
    }

    #[test]
    fn test_project_earnings_follow_current_rate() {
        let p = project(1, 1, 50.0);
        let entries = vec![entry(1, 1, date(2024, 3, 1), 2.5)];
        let totals = project_totals(&p, &entries);
        assert!((totals.hours - 2.5).abs() < EPS);
        assert!((totals.earnings - 125.0).abs() < EPS);

        let raised = Project {
            hourly_rate: 80.0,
            ..p
        };
        assert!((project_totals(&raised, &entries).earnings - 200.0).abs() < EPS);
    }

    #[test]
    fn test_mixed_rates_computed_per_project() {
        let projects = vec![project(1, 1, 10.0), project(2, 1, 100.0)];
        let entries = vec![
            entry(1, 1, date(2024, 3, 1), 3.0),
            entry(2, 2, date(2024, 3, 1), 1.0),
        ];
        let earned = earnings_with_rates(&entries, &rate_card(&projects));
        assert!((earned - 130.0).abs() < EPS);
        // a single blended rate would be wrong here
        assert!((earnings(&entries, 10.0) - earned).abs() > 1.0);
    }

    #[test]
    fn test_unknown_project_earns_nothing() {
        let entries = vec![entry(1, 99, date(2024, 3, 1), 3.0)];
        assert_eq!(earnings_with_rates(&entries, &RateCard::new()), 0.0);
    }

    #[test]
    fn test_client_total_is_sum_of_projects() {
        let projects = vec![project(1, 1, 40.0), project(2, 1, 60.0), project(3, 2, 90.0)];
        let entries = vec![
            entry(1, 1, date(2024, 3, 1), 1.5),
            entry(2, 2, date(2024, 3, 2), 2.0),
            entry(3, 3, date(2024, 3, 2), 4.0),
            entry(4, 1, date(2024, 3, 3), 0.5),
        ];
        let totals = client_totals(1, &projects, &entries);
        assert_eq!(totals.projects.len(), 2);
        let sum: f64 = totals.projects.iter().map(|(_, t)| t.earnings).sum();
        assert!((totals.total.earnings - sum).abs() < EPS);
        assert!((totals.total.earnings - (2.0 * 40.0 + 2.0 * 60.0)).abs() < EPS);
        assert!((totals.total.hours - 4.0).abs() < EPS);
    }

    #[test]
    fn test_recent_filters_and_orders() {
        let today = date(2024, 3, 15);
        let entries = vec![
            entry(1, 1, date(2024, 3, 7), 1.0), // older than cutoff (03-08)
            entry(2, 1, date(2024, 3, 8), 1.0), // exactly on cutoff
            entry(3, 1, date(2024, 3, 14), 1.0),
            entry(4, 1, date(2024, 3, 10), 1.0),
            entry(5, 1, date(2024, 3, 14), 1.0),
        ];
        let ids: Vec<i64> = recent(&entries, today, 7).iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![3, 5, 4, 2]);
    }

    #[test]
    fn test_recent_zero_days_is_today_only() {
        let today = date(2024, 3, 15);
        let entries = vec![
            entry(1, 1, date(2024, 3, 14), 1.0),
            entry(2, 1, today, 1.0),
        ];
        let ids: Vec<i64> = recent(&entries, today, 0).iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![2]);
    }

    #[test]
    fn test_business_summary_month_window() {
        let today = date(2024, 3, 15);
        let projects = vec![project(1, 1, 20.0), project(2, 2, 50.0)];
        let entries = vec![
            entry(1, 1, date(2024, 2, 29), 5.0),
            entry(2, 1, date(2024, 3, 1), 2.0),
            entry(3, 2, date(2024, 3, 10), 1.0),
        ];
        let s = business_summary(2, &projects, &entries, today);
        assert_eq!(s.total_clients, 2);
        assert_eq!(s.total_projects, 2);
        assert!((s.total_hours - 8.0).abs() < EPS);
        assert!((s.total_earnings - (7.0 * 20.0 + 50.0)).abs() < EPS);
        assert!((s.month_hours - 3.0).abs() < EPS);
        assert!((s.month_earnings - 90.0).abs() < EPS);
        assert!((s.avg_rate - s.total_earnings / s.total_hours).abs() < EPS);
    }

    #[test]
    fn test_avg_rate_zero_without_hours() {
        let s = business_summary(3, &[project(1, 1, 75.0)], &[], date(2024, 1, 1));
        assert_eq!(s.total_hours, 0.0);
        assert_eq!(s.avg_rate, 0.0);
        assert_eq!(s.total_projects, 1);
    }

    #[test]
    fn test_period_report_reconciles() {
        let today = date(2024, 3, 31);
        let projects = vec![project(1, 1, 33.3), project(2, 1, 47.25), project(3, 2, 12.5)];
        let mut entries = Vec::new();
        for i in 0..40 {
            let on = date(2024, 3, 1 + (i % 31) as u32);
            entries.push(entry(i, 1 + (i % 3), on, 0.25 + (i % 7) as f64 * 0.75));
        }
        entries.push(entry(100, 1, date(2024, 1, 1), 8.0)); // outside the window

        let report = period_report(&projects, &entries, today, 30);
        assert_eq!(report.entry_count, 40);
        let by_project: f64 = report.per_project.values().map(|t| t.earnings).sum();
        let by_day: f64 = report.per_day.values().map(|t| t.earnings).sum();
        assert!((by_project - report.total.earnings).abs() < 1e-6);
        assert!((by_day - report.total.earnings).abs() < 1e-6);

        let hours_by_day: f64 = report.per_day.values().map(|t| t.hours).sum();
        assert!((hours_by_day - report.total.hours).abs() < 1e-9);

        for (project_id, tally) in &report.per_project {
            let rate = projects.iter().find(|p| p.id == *project_id).unwrap().hourly_rate;
            assert!((tally.earnings - tally.hours * rate).abs() < 1e-6);
        }
    }

    #[test]
    fn test_period_report_days_newest_first() {
        let today = date(2024, 3, 31);
        let projects = vec![project(1, 1, 10.0)];
        let entries = vec![
            entry(1, 1, date(2024, 3, 2), 1.0),
            entry(2, 1, date(2024, 3, 20), 1.0),
            entry(3, 1, date(2024, 3, 9), 1.0),
        ];
        let report = period_report(&projects, &entries, today, 30);
        let dates: Vec<NaiveDate> = report.days_newest_first().map(|(d, _)| *d).collect();
        assert_eq!(dates, vec![date(2024, 3, 20), date(2024, 3, 9), date(2024, 3, 2)]);
    }

    #[test]
    fn test_period_report_excludes_dates_after_until() {
        let today = date(2024, 3, 20);
        let projects = vec![project(1, 1, 10.0)];
        let entries = vec![
            entry(1, 1, date(2024, 3, 20), 2.0),
            entry(2, 1, date(2024, 3, 25), 5.0),
        ];
        let report = period_report(&projects, &entries, today, 30);
        assert_eq!(report.until, today);
        assert_eq!(report.entry_count, 1);
        assert!((report.total.hours - 2.0).abs() < 1e-9);
        assert!(!report.per_day.contains_key(&date(2024, 3, 25)));
    }

    #[test]
    fn test_period_report_clamps_huge_window() {
        let today = date(2024, 3, 20);
        let report = period_report(&[], &[], today, u32::MAX);
        assert_eq!(report.days, MAX_REPORT_DAYS);
        assert_eq!(report.since, cutoff(today, MAX_REPORT_DAYS));
        assert!(report.since.year() > 2000);
    }

    #[test]
    fn test_top_clients() {
        let clients = vec![client(1), client(2), client(3)];
        let projects = vec![project(1, 1, 10.0), project(2, 2, 100.0), project(3, 3, 50.0)];
        let entries = vec![
            entry(1, 1, date(2024, 3, 1), 1.0),
            entry(2, 2, date(2024, 3, 1), 1.0),
        ];
        let top = top_clients(&clients, &projects, &entries, 5);
        assert_eq!(top.iter().map(|(id, _)| *id).collect::<Vec<_>>(), vec![2, 1]);
        assert_eq!(top_clients(&clients, &projects, &entries, 1).len(), 1);
    }
}
