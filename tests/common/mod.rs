#![allow(dead_code)]

use std::path::Path;

use serde_json::{json, Value};
use tempfile::TempDir;

use nursery_reports::{config::Config, AppState};

pub const SCHOOL: &str = "sunny";

fn write(dir: &Path, name: &str, value: Value) {
    std::fs::write(dir.join(name), serde_json::to_vec_pretty(&value).unwrap()).unwrap();
}

/// One school with two classes, three children and a week of mixed reports.
/// Some documents are deliberately broken and must be skipped on load.
pub fn snapshot_dir() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let school = tmp.path().join(SCHOOL);
    std::fs::create_dir(&school).unwrap();

    write(&school, "school.json", json!({ "id": SCHOOL, "name": "Sunny Days" }));
    write(
        &school,
        "classes.json",
        json!([
            { "id": "toddlers", "name": "Toddlers", "minAgeMonths": 12, "maxAgeMonths": 24, "teacherId": "s2" },
            { "id": "preschool", "name": "Preschool", "minAgeMonths": 36 },
            { "name": "No id" }
        ]),
    );
    write(
        &school,
        "children.json",
        json!([
            { "id": "c1", "firstName": "Emma", "lastName": "Smith", "classId": "toddlers",
              "dateOfBirth": "2022-06-01", "allergies": "Peanuts", "parentIds": ["p1", "p2"] },
            { "id": "c2", "firstName": "Liam", "lastName": "Brown", "classId": "preschool",
              "parentIds": ["p3"] },
            { "id": "c3", "firstName": "Noah", "lastName": "Green" }
        ]),
    );
    write(
        &school,
        "parents.json",
        json!([
            { "id": "p1", "firstName": "Ana", "lastName": "Smith", "email": "ana@example.com",
              "phone": "555-0101", "relationship": "mother" },
            { "id": "p2", "firstName": "Ben", "lastName": "Smith", "email": "ben@example.com",
              "relationship": "father" },
            { "id": "p3", "firstName": "Cara", "lastName": "Brown", "phone": "555-0199" }
        ]),
    );
    write(
        &school,
        "staff.json",
        json!([
            { "id": "s1", "firstName": "Jo", "lastName": "Park", "email": "jo@sunny.test", "role": "principal" },
            { "id": "s2", "firstName": "Sam", "lastName": "Lee", "role": "teacher", "classIds": ["toddlers"] }
        ]),
    );
    write(
        &school,
        "reports.json",
        json!([
            { "id": "r1", "childId": "c1", "type": "meal", "timestamp": "2024-01-05T10:00:00Z",
              "notes": "Ate well, asked for more", "mealType": "Lunch", "mealOptionName": "Pasta" },
            { "id": "r2", "childId": "c1", "type": "nap_time", "timestamp": "2024-01-05T13:00:00.000Z" },
            { "id": "r3", "childId": "c2", "type": "incident", "timestamp": "2024-01-05T23:59:59.5Z",
              "incidentDetails": "Bumped knee", "notes": "Ice pack, parents \"informed\"" },
            { "id": "r4", "childId": "c2", "type": "meal",
              "timestamp": { "seconds": 1704531600, "nanoseconds": 0 }, "notes": "   " },
            { "id": "r5", "childId": "c3", "classId": "toddlers", "type": "nappy_change",
              "timestamp": "2024-01-04T08:15:00+02:00" },
            { "id": "r6", "childId": "c1", "type": "medication", "timestamp": "not a date",
              "medicationName": "Paracetamol" },
            { "id": "r7", "childId": "c1", "type": "sing_along", "timestamp": "2024-01-05T09:00:00Z" },
            { "id": "r8", "type": "meal", "timestamp": "2024-01-05T09:00:00Z" }
        ]),
    );
    tmp
}

pub fn state(dir: &TempDir) -> AppState {
    let mut config = Config::with_data_dir(dir.path());
    config.brand_name = "Little Steps".into();
    AppState::new(config)
}
