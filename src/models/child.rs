use chrono::{Datelike, NaiveDate};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Child {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub class_id: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub allergies: Option<String>,
    pub notes: Option<String>,
    pub parent_ids: Vec<String>,
}

impl Child {
    pub fn full_name(&self) -> String {
        full_name(&self.first_name, &self.last_name)
    }

    /// Completed months of age on `on`, if the birth date is known and not in the future.
    pub fn age_in_months(&self, on: NaiveDate) -> Option<u32> {
        let born = self.date_of_birth?;
        if born > on {
            return None;
        }
        let mut months = (on.year() - born.year()) * 12 + on.month() as i32 - born.month() as i32;
        if on.day() < born.day() {
            months -= 1;
        }
        u32::try_from(months).ok()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParentContact {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub relationship: Option<String>, // "mother", "guardian", etc.
}

impl ParentContact {
    pub fn full_name(&self) -> String {
        full_name(&self.first_name, &self.last_name)
    }
}

pub(crate) fn full_name(first: &str, last: &str) -> String {
    format!("{first} {last}").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn child_born(date: NaiveDate) -> Child {
        Child {
            id: "c1".into(),
            first_name: "Emma".into(),
            last_name: "Smith".into(),
            class_id: None,
            date_of_birth: Some(date),
            allergies: None,
            notes: None,
            parent_ids: vec![],
        }
    }

    #[test]
    fn age_counts_completed_months() {
        let child = child_born(NaiveDate::from_ymd_opt(2023, 3, 15).unwrap());
        assert_eq!(child.age_in_months(NaiveDate::from_ymd_opt(2024, 3, 14).unwrap()), Some(11));
        assert_eq!(child.age_in_months(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()), Some(12));
        assert_eq!(child.age_in_months(NaiveDate::from_ymd_opt(2023, 1, 1).unwrap()), None);
    }

    #[test]
    fn full_name_trims_missing_parts() {
        let mut child = child_born(NaiveDate::from_ymd_opt(2023, 3, 15).unwrap());
        child.last_name.clear();
        assert_eq!(child.full_name(), "Emma");
    }
}
