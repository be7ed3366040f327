use rust_xlsxwriter::{ColNum, Format, RowNum, Workbook};

use super::{ExportDocument, ExportError};

const MAX_SHEET_NAME: usize = 31;
const MIN_COLUMN_WIDTH: usize = 8;
const MAX_COLUMN_WIDTH: usize = 60;

/// Workbook with one sheet per section. Each sheet starts with the document
/// title and metadata rows, then a blank row, the bold header row and the data.
pub fn render(doc: &ExportDocument) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();

    for section in &doc.sections {
        let sheet = workbook.add_worksheet();
        sheet.set_name(sheet_name(&section.title))?;

        let mut row: RowNum = 0;
        sheet.write_string_with_format(row, 0, doc.title.as_str(), &bold)?;
        row += 1;
        for (key, value) in &doc.metadata {
            sheet.write_string(row, 0, key.as_str())?;
            sheet.write_string(row, 1, value.as_str())?;
            row += 1;
        }
        row += 1;

        for (col, header) in section.headers.iter().enumerate() {
            sheet.write_string_with_format(row, col as ColNum, header.as_str(), &bold)?;
        }
        for record in &section.rows {
            row += 1;
            for (col, cell) in record.iter().enumerate() {
                sheet.write_string(row, col as ColNum, cell.as_str())?;
            }
        }

        for (col, width) in column_widths(&section.headers, &section.rows).into_iter().enumerate() {
            sheet.set_column_width(col as ColNum, width as f64)?;
        }
    }

    Ok(workbook.save_to_buffer()?)
}

/// Sheet names are limited to 31 characters and may not contain `[]:*?/\`.
fn sheet_name(title: &str) -> String {
    let cleaned: String = title
        .chars()
        .filter(|c| !matches!(c, '[' | ']' | ':' | '*' | '?' | '/' | '\\'))
        .take(MAX_SHEET_NAME)
        .collect();
    if cleaned.trim().is_empty() {
        "Sheet".to_string()
    } else {
        cleaned
    }
}

fn column_widths(headers: &[String], rows: &[Vec<String>]) -> Vec<usize> {
    headers
        .iter()
        .enumerate()
        .map(|(col, header)| {
            let widest = rows
                .iter()
                .filter_map(|r| r.get(col))
                .map(|cell| cell.chars().count())
                .chain(std::iter::once(header.chars().count()))
                .max()
                .unwrap_or(0);
            (widest + 2).clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::export::{sections, tests::sample_document, Section};
    use calamine::{open_workbook_from_rs, Reader, Xlsx};
    use std::io::Cursor;

    fn cells(bytes: Vec<u8>, sheet: &str) -> Vec<Vec<String>> {
        let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes)).unwrap();
        let range = workbook.worksheet_range(sheet).unwrap();
        range
            .rows()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn one_sheet_per_section_with_metadata_first() {
        let mut doc = sample_document(2);
        let mut parents = Section::new(sections::PARENTS, "Parents", &["Name", "Email"]);
        parents.push_row(vec!["Ana Smith".into(), "ana@example.com".into()]);
        doc.sections.push(parents);

        let bytes = render(&doc).unwrap();
        let workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes.clone())).unwrap();
        assert_eq!(workbook.sheet_names(), vec!["Reports".to_string(), "Parents".to_string()]);

        let rows = cells(bytes, "Parents");
        assert_eq!(rows[0][0], "Daily reports");
        assert_eq!(rows[1][0], "School");
        assert_eq!(rows[1][1], "Sunny Days");
        assert_eq!(rows[3][0], "Name");
        assert_eq!(rows[4][1], "ana@example.com");
        assert_eq!(rows.len(), 5);
    }

    #[test]
    fn cell_text_is_stored_verbatim() {
        let rows = cells(render(&sample_document(1)).unwrap(), "Reports");
        assert_eq!(rows[4][2], "a,b\"c");
    }

    #[test]
    fn sheet_names_are_sanitized() {
        assert_eq!(sheet_name("Activity summary"), "Activity summary");
        assert_eq!(sheet_name("Q1/Q2 [draft]"), "Q1Q2 draft");
        assert_eq!(sheet_name(&"x".repeat(40)).len(), 31);
        assert_eq!(sheet_name("[]"), "Sheet");
    }

    #[test]
    fn widths_fit_content_within_bounds() {
        let headers = vec!["Id".to_string(), "Notes".to_string()];
        let rows = vec![vec!["1".to_string(), "n".repeat(100)]];
        assert_eq!(column_widths(&headers, &rows), vec![MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH]);
    }
}
