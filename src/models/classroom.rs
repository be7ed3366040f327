use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassRoom {
    pub id: String,
    pub name: String,
    pub min_age_months: Option<u32>,
    pub max_age_months: Option<u32>,
    pub teacher_id: Option<String>,
}

impl ClassRoom {
    /// "Toddlers (12-24 months)", "Preschool (36+ months)", or the bare name
    /// when no age bounds are recorded.
    pub fn display_name(&self) -> String {
        match (self.min_age_months, self.max_age_months) {
            (Some(min), Some(max)) => format!("{} ({min}-{max} months)", self.name),
            (Some(min), None) => format!("{} ({min}+ months)", self.name),
            (None, Some(max)) => format!("{} (up to {max} months)", self.name),
            (None, None) => self.name.clone(),
        }
    }
}

/// Response item for GET /classes.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassSummary {
    #[serde(flatten)]
    pub class: ClassRoom,
    pub display_name: String,
    pub child_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class(min: Option<u32>, max: Option<u32>) -> ClassRoom {
        ClassRoom {
            id: "toddlers".into(),
            name: "Toddlers".into(),
            min_age_months: min,
            max_age_months: max,
            teacher_id: None,
        }
    }

    #[test]
    fn display_name_reflects_age_bounds() {
        assert_eq!(class(Some(12), Some(24)).display_name(), "Toddlers (12-24 months)");
        assert_eq!(class(Some(36), None).display_name(), "Toddlers (36+ months)");
        assert_eq!(class(None, Some(18)).display_name(), "Toddlers (up to 18 months)");
        assert_eq!(class(None, None).display_name(), "Toddlers");
    }
}
