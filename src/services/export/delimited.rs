use std::io::Write;

use csv::{QuoteStyle, Terminator, WriterBuilder};

use super::{ExportDocument, ExportError};

const CRLF: &[u8] = b"\r\n";

/// CSV rendering: `# key: value` metadata lines, a blank line, then each
/// section's header row and data rows. Quoting follows RFC 4180: a field with
/// a comma, quote, CR or LF is wrapped in quotes with inner quotes doubled.
pub fn render(doc: &ExportDocument) -> Result<Vec<u8>, ExportError> {
    let mut out = Vec::new();
    comment(&mut out, &doc.title)?;
    for (key, value) in &doc.metadata {
        comment(&mut out, &format!("{key}: {value}"))?;
    }
    out.extend_from_slice(CRLF);

    for (index, section) in doc.sections.iter().enumerate() {
        if index > 0 {
            out.extend_from_slice(CRLF);
        }
        if doc.titled_sections {
            comment(&mut out, &section.title)?;
        }
        let mut writer = WriterBuilder::new()
            .terminator(Terminator::CRLF)
            .quote_style(QuoteStyle::Necessary)
            .flexible(true)
            .from_writer(&mut out);
        writer.write_record(&section.headers)?;
        for row in &section.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
    }
    Ok(out)
}

/// Comment lines must stay on one line whatever the metadata holds.
fn comment(out: &mut Vec<u8>, text: &str) -> std::io::Result<()> {
    let single_line: String = text
        .chars()
        .map(|c| if c == '\r' || c == '\n' { ' ' } else { c })
        .collect();
    write!(out, "# {single_line}")?;
    out.write_all(CRLF)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::export::tests::sample_document;

    fn parse(bytes: &[u8]) -> Vec<csv::StringRecord> {
        csv::ReaderBuilder::new()
            .comment(Some(b'#'))
            .has_headers(false)
            .flexible(true)
            .from_reader(bytes)
            .records()
            .collect::<Result<_, _>>()
            .unwrap()
    }

    #[test]
    fn special_characters_are_quoted_and_round_trip() {
        let bytes = render(&sample_document(1)).unwrap();
        let text = String::from_utf8(bytes.clone()).unwrap();
        assert!(text.contains(r#","a,b""c""#), "{text}");

        let records = parse(&bytes);
        assert_eq!(records.len(), 2);
        assert_eq!(&records[1][2], "a,b\"c");
    }

    #[test]
    fn newlines_inside_fields_survive() {
        let mut doc = sample_document(0);
        doc.sections[0].push_row(vec!["2024-01-05".into(), "Emma".into(), "line one\nline two".into()]);
        let records = parse(&render(&doc).unwrap());
        assert_eq!(&records[1][2], "line one\nline two");
    }

    #[test]
    fn layout_is_metadata_blank_header_rows_with_crlf() {
        let bytes = render(&sample_document(2)).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.split("\r\n").collect();
        assert_eq!(lines[0], "# Daily reports");
        assert_eq!(lines[1], "# School: Sunny Days");
        assert_eq!(lines[2], "");
        assert_eq!(lines[3], "Date,Child,Notes");
        assert!(lines[4].starts_with("2024-01-05,Child 0,"));
        assert!(!text.replace("\r\n", "").contains('\n'));
        assert!(text.ends_with("\r\n"));
    }

    #[test]
    fn multiline_metadata_stays_a_comment() {
        let mut doc = sample_document(0);
        doc.metadata.push(("Note".into(), "first\nsecond".into()));
        let text = String::from_utf8(render(&doc).unwrap()).unwrap();
        assert!(text.contains("# Note: first second\r\n"));
    }

    #[test]
    fn zero_rows_still_has_header() {
        let records = parse(&render(&sample_document(0)).unwrap());
        assert_eq!(records.len(), 1);
        assert_eq!(&records[0][0], "Date");
    }
}
