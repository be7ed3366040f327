use crate::{
    models::{
        child::{Child, ParentContact},
        filters::ReportFilters,
        report::{DailyReport, ReportRow},
        school::SchoolSnapshot,
        staff::StaffMember,
    },
    services::days::activity_summary,
};

use super::{sections, ExportContext, ExportDocument, Orientation, Section, SectionInclude};

const REPORT_COLUMNS: &[&str] = &["Date", "Time", "Child", "Class", "Type", "Details", "Notes"];
const NONE: &str = "-";

fn or_dash(value: Option<&str>) -> String {
    value.filter(|v| !v.trim().is_empty()).unwrap_or(NONE).to_string()
}

fn date_range_label(filters: &ReportFilters) -> String {
    match (filters.day(), filters.date_from(), filters.date_to()) {
        (Some(day), _, _) => day.to_string(),
        (None, Some(from), Some(to)) => format!("{from} to {to}"),
        (None, Some(from), None) => format!("from {from}"),
        (None, None, Some(to)) => format!("until {to}"),
        (None, None, None) => "All dates".to_string(),
    }
}

/// Reports list export for a school or one class of it.
///
/// `rows` are expected to be filtered already; `filters` only feeds the
/// metadata lines so the reader knows what the file contains.
pub fn reports_document(
    ctx: &ExportContext,
    school_name: &str,
    rows: &[&ReportRow],
    filters: &ReportFilters,
    class_display: impl Fn(Option<&str>) -> String,
) -> ExportDocument {
    let scope = match filters.class_id() {
        Some(class_id) => class_display(Some(class_id)),
        None => "All classes".to_string(),
    };
    let subject = match filters.class_id() {
        Some(_) => scope.clone(),
        None => school_name.to_string(),
    };

    let mut metadata = vec![
        ("School".to_string(), school_name.to_string()),
        ("Class".to_string(), scope),
        ("Dates".to_string(), date_range_label(filters)),
        (
            "Type".to_string(),
            filters
                .report_type
                .map(|t| t.label().to_string())
                .unwrap_or_else(|| "All types".to_string()),
        ),
    ];
    if let Some(search) = filters.child_search() {
        metadata.push(("Child search".to_string(), search.to_string()));
    }
    if filters.has_notes_only {
        metadata.push(("Only with notes".to_string(), "yes".to_string()));
    }
    metadata.push(("Exported".to_string(), ctx.exported_on.format("%Y-%m-%d").to_string()));
    metadata.push(("Records".to_string(), rows.len().to_string()));

    let mut section = Section::new(sections::REPORTS, "Reports", REPORT_COLUMNS);
    for row in rows {
        let report = &row.report;
        section.push_row(vec![
            report.day().unwrap_or_default().to_string(),
            report.time_of_day().unwrap_or_default().to_string(),
            row.child_name.clone(),
            class_display(row.class_id.as_deref()),
            report.report_type.label().to_string(),
            report.details(),
            report.notes.clone().unwrap_or_default(),
        ]);
    }

    ExportDocument {
        entity: "reports",
        subject,
        brand: ctx.brand.clone(),
        title: "Daily reports".to_string(),
        subtitle: Some(school_name.to_string()),
        metadata,
        sections: vec![section],
        titled_sections: false,
        orientation: Orientation::Portrait,
        exported_on: ctx.exported_on,
    }
}

/// Everything the child profile export needs about one child.
pub struct ChildProfile<'a> {
    pub child: &'a Child,
    pub parents: Vec<&'a ParentContact>,
    pub reports: Vec<&'a DailyReport>,
}

impl<'a> ChildProfile<'a> {
    pub fn from_snapshot(snapshot: &'a SchoolSnapshot, child: &'a Child) -> Self {
        Self {
            child,
            parents: snapshot.parents_of(child),
            reports: snapshot.reports_of(&child.id),
        }
    }
}

/// Child profile export with the Profile, Parents and Activity summary
/// sections. Sections switched off in `include` are never built.
pub fn child_document(
    ctx: &ExportContext,
    profile: &ChildProfile<'_>,
    include: &SectionInclude,
    class_display: impl Fn(Option<&str>) -> String,
) -> ExportDocument {
    let child = profile.child;
    let name = child.full_name();
    let class_name = class_display(child.class_id.as_deref());
    let mut doc_sections = Vec::new();

    if include.enabled(sections::PROFILE) {
        let mut section = Section::new(sections::PROFILE, "Profile", &["Field", "Value"]);
        let dob = child.date_of_birth.map(|d| d.format("%Y-%m-%d").to_string());
        let age = child
            .age_in_months(ctx.exported_on)
            .map(|m| format!("{m} months"));
        for (field, value) in [
            ("First name", child.first_name.clone()),
            ("Last name", child.last_name.clone()),
            ("Date of birth", or_dash(dob.as_deref())),
            ("Age", or_dash(age.as_deref())),
            ("Class", class_name.clone()),
            ("Allergies", or_dash(child.allergies.as_deref())),
            ("Notes", or_dash(child.notes.as_deref())),
        ] {
            section.push_row(vec![field.to_string(), value]);
        }
        doc_sections.push(section);
    }

    if include.enabled(sections::PARENTS) {
        let mut section = Section::new(
            sections::PARENTS,
            "Parents",
            &["Name", "Relationship", "Email", "Phone"],
        );
        for parent in &profile.parents {
            section.push_row(vec![
                parent.full_name(),
                or_dash(parent.relationship.as_deref()),
                or_dash(parent.email.as_deref()),
                or_dash(parent.phone.as_deref()),
            ]);
        }
        doc_sections.push(section);
    }

    if include.enabled(sections::ACTIVITY_SUMMARY) {
        let mut section = Section::new(
            sections::ACTIVITY_SUMMARY,
            "Activity summary",
            &["Type", "Count", "Most recent"],
        );
        for entry in activity_summary(&profile.reports) {
            section.push_row(vec![
                entry.report_type.label().to_string(),
                entry.count.to_string(),
                or_dash(entry.latest.as_deref()),
            ]);
        }
        doc_sections.push(section);
    }

    ExportDocument {
        entity: "child",
        subject: name.clone(),
        brand: ctx.brand.clone(),
        title: name.clone(),
        subtitle: Some(class_name.clone()),
        metadata: vec![
            ("Child".to_string(), name),
            ("Class".to_string(), class_name),
            ("Exported".to_string(), ctx.exported_on.format("%Y-%m-%d").to_string()),
        ],
        sections: doc_sections,
        titled_sections: true,
        orientation: Orientation::Portrait,
        exported_on: ctx.exported_on,
    }
}

/// Staff roster, landscape.
pub fn staff_document(
    ctx: &ExportContext,
    school_name: &str,
    staff: &[StaffMember],
    class_display: impl Fn(Option<&str>) -> String,
) -> ExportDocument {
    let mut section = Section::new("staff", "Staff", &["Name", "Role", "Email", "Classes"]);
    for member in staff {
        let classes = member
            .class_ids
            .iter()
            .map(|id| class_display(Some(id)))
            .collect::<Vec<_>>()
            .join("; ");
        section.push_row(vec![
            member.full_name(),
            member.role.label().to_string(),
            or_dash(member.email.as_deref()),
            or_dash(Some(classes.as_str())),
        ]);
    }
    roster("staff", "Staff roster", ctx, school_name, section)
}

/// Parent roster, landscape. Each parent lists the children linked to them.
pub fn parents_document(ctx: &ExportContext, snapshot: &SchoolSnapshot) -> ExportDocument {
    let mut section = Section::new(
        sections::PARENTS,
        "Parents",
        &["Name", "Relationship", "Email", "Phone", "Children"],
    );
    for parent in &snapshot.parents {
        let children = snapshot
            .children_of_parent(&parent.id)
            .into_iter()
            .map(Child::full_name)
            .collect::<Vec<_>>()
            .join("; ");
        section.push_row(vec![
            parent.full_name(),
            or_dash(parent.relationship.as_deref()),
            or_dash(parent.email.as_deref()),
            or_dash(parent.phone.as_deref()),
            or_dash(Some(children.as_str())),
        ]);
    }
    roster("parents", "Parent roster", ctx, &snapshot.school.name, section)
}

fn roster(
    entity: &'static str,
    title: &str,
    ctx: &ExportContext,
    school_name: &str,
    section: Section,
) -> ExportDocument {
    ExportDocument {
        entity,
        subject: school_name.to_string(),
        brand: ctx.brand.clone(),
        title: title.to_string(),
        subtitle: Some(school_name.to_string()),
        metadata: vec![
            ("School".to_string(), school_name.to_string()),
            ("Exported".to_string(), ctx.exported_on.format("%Y-%m-%d").to_string()),
            ("Records".to_string(), section.rows.len().to_string()),
        ],
        sections: vec![section],
        titled_sections: false,
        orientation: Orientation::Landscape,
        exported_on: ctx.exported_on,
    }
}
