use std::collections::BTreeSet;

use crate::{
    models::report::{ActivitySummary, DailyReport, ReportType},
    services::filters::{day_end, day_start, within},
};

/// How many days the "days with activity" list shows unless told otherwise.
pub const DEFAULT_DAYS_LIMIT: usize = 14;

/// Reports stamped on `day` (UTC), newest first.
pub fn reports_for_day<'a, R: AsRef<DailyReport>>(reports: &'a [R], day: &str) -> Vec<&'a R> {
    let (from, to) = (day_start(day), day_end(day));
    let mut out: Vec<&R> = reports
        .iter()
        .filter(|r| {
            let ts = stamp(*r);
            !ts.is_empty() && within(ts, Some(&from), Some(&to))
        })
        .collect();
    out.sort_by(|a, b| stamp(*b).cmp(stamp(*a)));
    out
}

fn report_of<R: AsRef<DailyReport>>(report: &R) -> &DailyReport {
    report.as_ref()
}

fn stamp<R: AsRef<DailyReport>>(report: &R) -> &str {
    report_of(report).timestamp.as_str()
}

/// Distinct calendar days that have at least one report, most recent first.
pub fn days_with_activity<R: AsRef<DailyReport>>(reports: &[R], limit: usize) -> Vec<String> {
    let days: BTreeSet<&str> = reports.iter().filter_map(|r| report_of(r).day()).collect();
    days.into_iter()
        .rev()
        .take(limit)
        .map(str::to_string)
        .collect()
}

/// Count and most recent timestamp per report type, in display order.
/// Types with no reports are listed with a zero count.
pub fn activity_summary<R: AsRef<DailyReport>>(reports: &[R]) -> Vec<ActivitySummary> {
    ReportType::ALL
        .iter()
        .map(|&kind| {
            let of_kind = reports
                .iter()
                .map(report_of)
                .filter(|r| r.report_type == kind);
            let (count, latest) = of_kind.fold((0usize, None::<&str>), |(count, latest), r| {
                let ts = r.timestamp.as_str();
                let latest = match latest {
                    _ if ts.is_empty() => latest,
                    Some(prev) if prev >= ts => Some(prev),
                    _ => Some(ts),
                };
                (count + 1, latest)
            });
            ActivitySummary {
                report_type: kind,
                count,
                latest: latest.map(str::to_string),
            }
        })
        .collect()
}
