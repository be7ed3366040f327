use serde::Serialize;

use super::{
    child::{Child, ParentContact},
    classroom::ClassRoom,
    report::{DailyReport, ReportRow},
    staff::StaffMember,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct School {
    pub id: String,
    pub name: String,
}

/// Label used wherever a report or child has no known class.
pub const UNASSIGNED_CLASS: &str = "Unassigned";

/// Every collection of one school, validated and resident in memory.
/// Built once per request and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct SchoolSnapshot {
    pub school: School,
    pub classes: Vec<ClassRoom>,
    pub children: Vec<Child>,
    pub parents: Vec<ParentContact>,
    pub staff: Vec<StaffMember>,
    pub reports: Vec<DailyReport>,
}

impl SchoolSnapshot {
    pub fn class(&self, id: &str) -> Option<&ClassRoom> {
        self.classes.iter().find(|c| c.id == id)
    }

    pub fn child(&self, id: &str) -> Option<&Child> {
        self.children.iter().find(|c| c.id == id)
    }

    /// Display name for a class id; unknown and missing ids share one label.
    pub fn class_display(&self, id: Option<&str>) -> String {
        id.and_then(|id| self.class(id))
            .map(ClassRoom::display_name)
            .unwrap_or_else(|| UNASSIGNED_CLASS.to_string())
    }

    pub fn parents_of(&self, child: &Child) -> Vec<&ParentContact> {
        child
            .parent_ids
            .iter()
            .filter_map(|pid| self.parents.iter().find(|p| &p.id == pid))
            .collect()
    }

    pub fn children_of_parent(&self, parent_id: &str) -> Vec<&Child> {
        self.children
            .iter()
            .filter(|c| c.parent_ids.iter().any(|p| p == parent_id))
            .collect()
    }

    pub fn reports_of(&self, child_id: &str) -> Vec<&DailyReport> {
        self.reports.iter().filter(|r| r.child_id == child_id).collect()
    }

    pub fn children_in_class(&self, class_id: &str) -> usize {
        self.children
            .iter()
            .filter(|c| c.class_id.as_deref() == Some(class_id))
            .count()
    }

    /// Join every report with its child, keeping the stored report order.
    /// With `class_scope` set only rows resolved to that class are returned.
    pub fn report_rows(&self, class_scope: Option<&str>) -> Vec<ReportRow> {
        self.reports
            .iter()
            .map(|report| {
                let child = self.child(&report.child_id);
                ReportRow {
                    report: report.clone(),
                    child_name: child
                        .map(Child::full_name)
                        .unwrap_or_else(|| "Unknown child".to_string()),
                    class_id: child
                        .and_then(|c| c.class_id.clone())
                        .or_else(|| report.class_id.clone()),
                }
            })
            .filter(|row| match class_scope {
                Some(class_id) => row.class_id.as_deref() == Some(class_id),
                None => true,
            })
            .collect()
    }
}
