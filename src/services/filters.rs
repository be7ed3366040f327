//! Compound filtering and ordering of report rows.
//!
//! Dates are compared as strings. That is sound because the store boundary
//! rewrites every timestamp into one fixed-width UTC form, and ISO-8601 in a
//! single zone sorts lexicographically in time order.

use crate::models::{
    filters::{ReportFilters, SortOrder},
    report::ReportRow,
};

/// First instant of a UTC calendar day, in canonical timestamp form.
pub fn day_start(day: &str) -> String {
    format!("{day}T00:00:00.000Z")
}

/// Last instant of a UTC calendar day, in canonical timestamp form.
pub fn day_end(day: &str) -> String {
    format!("{day}T23:59:59.999Z")
}

/// Inclusive range check. An empty timestamp never matches a bounded range.
pub fn within(timestamp: &str, from: Option<&str>, to: Option<&str>) -> bool {
    if timestamp.is_empty() && (from.is_some() || to.is_some()) {
        return false;
    }
    from.map_or(true, |f| timestamp >= f) && to.map_or(true, |t| timestamp <= t)
}

/// Rows matching every set filter, sorted and capped by `limit`.
///
/// Never mutates `rows`; ties keep their input order.
pub fn apply_filters<'a>(rows: &'a [ReportRow], filters: &ReportFilters) -> Vec<&'a ReportRow> {
    let (from, to) = match filters.day() {
        Some(day) => (Some(day_start(day)), Some(day_end(day))),
        None => (
            filters.date_from().map(day_start),
            filters.date_to().map(day_end),
        ),
    };
    let needle = filters.child_search().map(str::to_lowercase);

    let mut matched: Vec<&ReportRow> = rows
        .iter()
        .filter(|row| match filters.class_id() {
            Some(class_id) => row.class_id.as_deref() == Some(class_id),
            None => true,
        })
        .filter(|row| within(&row.report.timestamp, from.as_deref(), to.as_deref()))
        .filter(|row| filters.report_type.map_or(true, |t| row.report.report_type == t))
        .filter(|row| match &needle {
            Some(needle) => row.child_name.to_lowercase().contains(needle.as_str()),
            None => true,
        })
        .filter(|row| !filters.has_notes_only || row.report.has_notes())
        .collect();

    match filters.sort_order {
        SortOrder::Newest => matched.sort_by(|a, b| b.report.timestamp.cmp(&a.report.timestamp)),
        SortOrder::Oldest => matched.sort_by(|a, b| a.report.timestamp.cmp(&b.report.timestamp)),
    }

    if let Some(limit) = filters.limit() {
        matched.truncate(limit);
    }
    matched
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::report::{DailyReport, ReportType};

    fn row(id: &str, child: &str, class: Option<&str>, kind: ReportType, ts: &str) -> ReportRow {
        ReportRow {
            report: DailyReport::new(id, format!("{child}-id"), kind, ts),
            child_name: child.to_string(),
            class_id: class.map(str::to_string),
        }
    }

    fn sample() -> Vec<ReportRow> {
        vec![
            row("a", "Emma Smith", Some("toddlers"), ReportType::Meal, "2024-01-05T10:00:00.000Z"),
            row("b", "Liam Brown", Some("babies"), ReportType::NapTime, "2024-01-05T08:00:00.000Z"),
            row("c", "Emma Smith", Some("toddlers"), ReportType::Meal, "2024-01-06T09:00:00.000Z"),
            row("d", "Noah Jones", None, ReportType::Incident, ""),
        ]
    }

    fn ids(rows: &[&ReportRow]) -> Vec<String> {
        rows.iter().map(|r| r.report.id.clone()).collect()
    }

    #[test]
    fn no_constraints_only_reorders() {
        let rows = sample();
        let out = apply_filters(&rows, &ReportFilters::default());
        assert_eq!(out.len(), rows.len());
        assert_eq!(ids(&out), vec!["c", "a", "b", "d"]);
    }

    #[test]
    fn day_filter_is_inclusive_and_wins_over_range() {
        let rows = sample();
        let filters = ReportFilters {
            day: Some("2024-01-05".into()),
            date_from: Some("2024-01-06".into()),
            ..Default::default()
        };
        assert_eq!(ids(&apply_filters(&rows, &filters)), vec!["a", "b"]);
    }

    #[test]
    fn day_bounds_include_first_and_last_millisecond() {
        let rows = vec![
            row("first", "A", None, ReportType::Meal, "2024-01-05T00:00:00.000Z"),
            row("last", "A", None, ReportType::Meal, "2024-01-05T23:59:59.999Z"),
            row("next", "A", None, ReportType::Meal, "2024-01-06T00:00:00.000Z"),
        ];
        let filters = ReportFilters {
            day: Some("2024-01-05".into()),
            sort_order: SortOrder::Oldest,
            ..Default::default()
        };
        assert_eq!(ids(&apply_filters(&rows, &filters)), vec!["first", "last"]);
    }

    #[test]
    fn date_range_accepts_open_ends() {
        let rows = sample();
        let from_only = ReportFilters {
            date_from: Some("2024-01-06".into()),
            ..Default::default()
        };
        assert_eq!(ids(&apply_filters(&rows, &from_only)), vec!["c"]);

        let to_only = ReportFilters {
            date_to: Some("2024-01-05".into()),
            sort_order: SortOrder::Oldest,
            ..Default::default()
        };
        assert_eq!(ids(&apply_filters(&rows, &to_only)), vec!["b", "a"]);
    }

    #[test]
    fn filters_compose_with_and() {
        let mut rows = sample();
        rows[2].report.notes = Some("needed help".into());
        let filters = ReportFilters {
            class_id: Some("toddlers".into()),
            report_type: Some(ReportType::Meal),
            child_search: Some("  eMMa ".into()),
            has_notes_only: true,
            ..Default::default()
        };
        assert_eq!(ids(&apply_filters(&rows, &filters)), vec!["c"]);
    }

    #[test]
    fn blank_strings_are_unset() {
        let rows = sample();
        let filters = ReportFilters {
            class_id: Some("".into()),
            day: Some("  ".into()),
            child_search: Some("".into()),
            ..Default::default()
        };
        assert_eq!(apply_filters(&rows, &filters).len(), rows.len());
    }

    #[test]
    fn limit_caps_after_sorting_and_zero_is_unlimited() {
        let rows = sample();
        let capped = ReportFilters {
            limit: Some(2),
            sort_order: SortOrder::Oldest,
            ..Default::default()
        };
        // Empty timestamps sort first in ascending order.
        assert_eq!(ids(&apply_filters(&rows, &capped)), vec!["d", "b"]);

        let zero = ReportFilters {
            limit: Some(0),
            ..Default::default()
        };
        assert_eq!(apply_filters(&rows, &zero).len(), rows.len());
    }

    #[test]
    fn sort_is_stable_on_equal_timestamps() {
        let ts = "2024-01-05T10:00:00.000Z";
        let rows = vec![
            row("1", "A", None, ReportType::Meal, ts),
            row("2", "B", None, ReportType::Meal, "2024-01-04T10:00:00.000Z"),
            row("3", "C", None, ReportType::Meal, ts),
            row("4", "D", None, ReportType::Meal, ts),
        ];
        let newest = apply_filters(&rows, &ReportFilters::default());
        assert_eq!(ids(&newest), vec!["1", "3", "4", "2"]);

        let oldest = ReportFilters {
            sort_order: SortOrder::Oldest,
            ..Default::default()
        };
        assert_eq!(ids(&apply_filters(&rows, &oldest)), vec!["2", "1", "3", "4"]);
    }

    #[test]
    fn result_is_a_subset_and_repeatable() {
        let rows = sample();
        let filters = ReportFilters {
            report_type: Some(ReportType::Meal),
            ..Default::default()
        };
        let first = apply_filters(&rows, &filters);
        let second = apply_filters(&rows, &filters);
        assert_eq!(first, second);
        assert!(first.iter().all(|r| rows.iter().any(|orig| std::ptr::eq(orig, *r))));
    }

    #[test]
    fn undated_rows_fail_any_date_constraint() {
        let rows = sample();
        let filters = ReportFilters {
            date_from: Some("1970-01-01".into()),
            ..Default::default()
        };
        assert!(apply_filters(&rows, &filters).iter().all(|r| !r.report.timestamp.is_empty()));
    }
}
