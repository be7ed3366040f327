use serde::{Deserialize, Serialize};

use super::child::full_name;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StaffRole {
    Principal,
    Teacher,
}

impl StaffRole {
    pub fn label(self) -> &'static str {
        match self {
            StaffRole::Principal => "Principal",
            StaffRole::Teacher => "Teacher",
        }
    }
}

impl std::fmt::Display for StaffRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            StaffRole::Principal => "principal",
            StaffRole::Teacher => "teacher",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for StaffRole {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "principal" => Ok(StaffRole::Principal),
            "teacher" => Ok(StaffRole::Teacher),
            _ => Err(anyhow::anyhow!("Unknown staff role: {s}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffMember {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub role: StaffRole,
    pub class_ids: Vec<String>,
}

impl StaffMember {
    pub fn full_name(&self) -> String {
        full_name(&self.first_name, &self.last_name)
    }
}
