use serde_json::Value;

use crate::{
    db::{
        documents::{school_from_document, DocumentError},
        Collection, SnapshotStore, StoreError,
    },
    models::{report::ReportRow, school::SchoolSnapshot},
};

pub struct ReportService;

impl ReportService {
    /// Load and validate every collection of one school.
    ///
    /// Documents that fail validation are logged and skipped; only store-level
    /// failures (unknown school, unreadable or malformed files) are errors.
    /// Nothing is retried here.
    pub async fn load_snapshot(
        store: &SnapshotStore,
        school_id: &str,
    ) -> Result<SchoolSnapshot, StoreError> {
        let school_doc = store.read_school(school_id).await?;
        let (classes, children, parents, staff, reports) = tokio::try_join!(
            store.read_collection(school_id, Collection::Classes),
            store.read_collection(school_id, Collection::Children),
            store.read_collection(school_id, Collection::Parents),
            store.read_collection(school_id, Collection::Staff),
            store.read_collection(school_id, Collection::Reports),
        )?;

        let snapshot = SchoolSnapshot {
            school: school_from_document(school_id, school_doc.as_ref()),
            classes: validated(school_id, Collection::Classes, &classes),
            children: validated(school_id, Collection::Children, &children),
            parents: validated(school_id, Collection::Parents, &parents),
            staff: validated(school_id, Collection::Staff, &staff),
            reports: validated(school_id, Collection::Reports, &reports),
        };

        let undated = snapshot
            .reports
            .iter()
            .filter(|r| r.timestamp.is_empty())
            .count();
        if undated > 0 {
            tracing::debug!("{undated} reports in {school_id} have no usable timestamp");
        }

        Ok(snapshot)
    }

    /// Report rows for a school, optionally narrowed to one class.
    pub async fn load_rows(
        store: &SnapshotStore,
        school_id: &str,
        class_id: Option<&str>,
    ) -> Result<Vec<ReportRow>, StoreError> {
        let snapshot = Self::load_snapshot(store, school_id).await?;
        Ok(snapshot.report_rows(class_id))
    }
}

fn validated<T>(school_id: &str, collection: Collection, docs: &[Value]) -> Vec<T>
where
    T: for<'a> TryFrom<&'a Value, Error = DocumentError>,
{
    let mut out = Vec::with_capacity(docs.len());
    for (index, doc) in docs.iter().enumerate() {
        match T::try_from(doc) {
            Ok(item) => out.push(item),
            Err(e) => tracing::warn!(
                "Skipping document #{index} of {} for school {school_id}: {e}",
                collection.file_name()
            ),
        }
    }
    out
}
