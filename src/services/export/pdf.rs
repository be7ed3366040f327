//! Paginated A4 rendering.
//!
//! Layout happens first, into plain [`Page`]s of positioned marks, so the page
//! count is known before any footer is written ("Page X of Y"). Drawing then
//! just replays the marks through printpdf.

use printpdf::{BuiltinFont, IndirectFontRef, Line, Mm, PdfDocument, Point};

use super::{ExportDocument, ExportError, Orientation, Section};

const A4_SHORT_MM: f32 = 210.0;
const A4_LONG_MM: f32 = 297.0;
const MARGIN_MM: f32 = 15.0;
const HEADER_BAND_MM: f32 = 26.0;
const FOOTER_BAND_MM: f32 = 12.0;
const ROW_MM: f32 = 6.0;
const SECTION_GAP_MM: f32 = 4.0;

const BRAND_PT: f32 = 10.0;
const TITLE_PT: f32 = 16.0;
const SUBTITLE_PT: f32 = 10.0;
const SECTION_PT: f32 = 12.0;
const BODY_PT: f32 = 9.0;
const FOOTER_PT: f32 = 8.0;

/// Average Helvetica glyph width as a fraction of the font size.
const GLYPH_WIDTH_EM: f32 = 0.5;
const PT_TO_MM: f32 = 0.3528;

#[derive(Debug, Clone, PartialEq)]
pub enum Mark {
    Text {
        x: f32,
        y: f32,
        size: f32,
        bold: bool,
        text: String,
    },
    Rule {
        x1: f32,
        x2: f32,
        y: f32,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub marks: Vec<Mark>,
}

impl Page {
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.marks.iter().filter_map(|m| match m {
            Mark::Text { text, .. } => Some(text.as_str()),
            Mark::Rule { .. } => None,
        })
    }
}

fn page_size(orientation: Orientation) -> (f32, f32) {
    match orientation {
        Orientation::Portrait => (A4_SHORT_MM, A4_LONG_MM),
        Orientation::Landscape => (A4_LONG_MM, A4_SHORT_MM),
    }
}

/// Cuts text to what fits in `width_mm` at `size` points.
fn fit(text: &str, width_mm: f32, size: f32) -> String {
    let glyph_mm = size * PT_TO_MM * GLYPH_WIDTH_EM;
    let max_chars = ((width_mm / glyph_mm).floor() as usize).max(1);
    let flat: String = text
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();
    if flat.chars().count() <= max_chars {
        return flat;
    }
    let keep = max_chars.saturating_sub(3);
    let mut cut: String = flat.chars().take(keep).collect();
    cut.push_str("...");
    cut
}

/// Column widths proportional to the widest cell, bounded so one long
/// column can't starve the rest.
fn column_widths(section: &Section, usable_mm: f32) -> Vec<f32> {
    let weights: Vec<f32> = section
        .headers
        .iter()
        .enumerate()
        .map(|(col, header)| {
            let widest = section
                .rows
                .iter()
                .filter_map(|r| r.get(col))
                .map(|c| c.chars().count())
                .chain(std::iter::once(header.chars().count()))
                .max()
                .unwrap_or(1);
            widest.clamp(4, 40) as f32
        })
        .collect();
    let total: f32 = weights.iter().sum();
    weights.iter().map(|w| usable_mm * w / total).collect()
}

struct Cursor {
    pages: Vec<Page>,
    y: f32,
    top: f32,
    bottom: f32,
}

impl Cursor {
    fn new(top: f32, bottom: f32) -> Self {
        Self {
            pages: vec![Page::default()],
            y: top,
            top,
            bottom,
        }
    }

    fn room_for(&self, height: f32) -> bool {
        self.y - height >= self.bottom
    }

    fn new_page(&mut self) {
        self.pages.push(Page::default());
        self.y = self.top;
    }

    fn push(&mut self, mark: Mark) {
        if let Some(page) = self.pages.last_mut() {
            page.marks.push(mark);
        }
    }

    fn text(&mut self, x: f32, size: f32, bold: bool, text: String) {
        let y = self.y;
        self.push(Mark::Text { x, y, size, bold, text });
    }
}

fn table_header(cursor: &mut Cursor, section: &Section, widths: &[f32], left: f32, right: f32) {
    cursor.y -= ROW_MM;
    let mut x = left;
    for (header, width) in section.headers.iter().zip(widths) {
        let label = fit(header, width - 1.0, BODY_PT);
        cursor.text(x, BODY_PT, true, label);
        x += width;
    }
    let y = cursor.y - 1.5;
    cursor.push(Mark::Rule { x1: left, x2: right, y });
}

/// Lay the document out into pages, including the brand header and footer
/// on every page.
pub fn layout(doc: &ExportDocument) -> Vec<Page> {
    let (width, height) = page_size(doc.orientation);
    let left = MARGIN_MM;
    let right = width - MARGIN_MM;
    let usable = right - left;
    let top = height - MARGIN_MM - HEADER_BAND_MM;
    let bottom = MARGIN_MM + FOOTER_BAND_MM;

    let mut cursor = Cursor::new(top, bottom);

    for (key, value) in &doc.metadata {
        cursor.y -= ROW_MM;
        cursor.text(left, BODY_PT, false, fit(&format!("{key}: {value}"), usable, BODY_PT));
    }

    for section in &doc.sections {
        let widths = column_widths(section, usable);
        let title_height = if doc.titled_sections { ROW_MM + 2.0 } else { 0.0 };
        // Keep a title with its header row and at least one line below it.
        if !cursor.room_for(SECTION_GAP_MM + title_height + 2.0 * ROW_MM) {
            cursor.new_page();
        } else {
            cursor.y -= SECTION_GAP_MM;
        }
        if doc.titled_sections {
            cursor.y -= title_height;
            cursor.text(left, SECTION_PT, true, fit(&section.title, usable, SECTION_PT));
        }
        table_header(&mut cursor, section, &widths, left, right);

        if section.rows.is_empty() {
            cursor.y -= ROW_MM;
            cursor.text(left, BODY_PT, false, "No records".to_string());
            continue;
        }

        for row in &section.rows {
            if !cursor.room_for(ROW_MM) {
                cursor.new_page();
                table_header(&mut cursor, section, &widths, left, right);
            }
            cursor.y -= ROW_MM;
            let mut x = left;
            for (cell, width) in row.iter().zip(&widths) {
                let text = fit(cell, width - 1.0, BODY_PT);
                cursor.text(x, BODY_PT, false, text);
                x += width;
            }
        }
    }

    let mut pages = cursor.pages;
    let total = pages.len();
    for (index, page) in pages.iter_mut().enumerate() {
        decorate(page, doc, index + 1, total, width, height);
    }
    pages
}

/// Brand header and footer shared by every page.
fn decorate(page: &mut Page, doc: &ExportDocument, number: usize, total: usize, width: f32, height: f32) {
    let left = MARGIN_MM;
    let right = width - MARGIN_MM;
    let usable = right - left;
    let mut y = height - MARGIN_MM - 4.0;

    let mut chrome = vec![Mark::Text {
        x: left,
        y,
        size: BRAND_PT,
        bold: true,
        text: fit(&doc.brand, usable, BRAND_PT),
    }];
    y -= 8.0;
    chrome.push(Mark::Text {
        x: left,
        y,
        size: TITLE_PT,
        bold: true,
        text: fit(&doc.title, usable, TITLE_PT),
    });
    if let Some(subtitle) = &doc.subtitle {
        y -= 6.0;
        chrome.push(Mark::Text {
            x: left,
            y,
            size: SUBTITLE_PT,
            bold: false,
            text: fit(subtitle, usable, SUBTITLE_PT),
        });
    }
    chrome.push(Mark::Rule {
        x1: left,
        x2: right,
        y: height - MARGIN_MM - HEADER_BAND_MM + 2.0,
    });

    let footer_y = MARGIN_MM;
    chrome.push(Mark::Rule {
        x1: left,
        x2: right,
        y: footer_y + 5.0,
    });
    chrome.push(Mark::Text {
        x: left,
        y: footer_y,
        size: FOOTER_PT,
        bold: false,
        text: format!("{} - Exported {}", doc.brand, doc.exported_on_label()),
    });
    if total > 1 {
        let label = format!("Page {number} of {total}");
        let label_mm = label.chars().count() as f32 * FOOTER_PT * PT_TO_MM * GLYPH_WIDTH_EM;
        chrome.push(Mark::Text {
            x: right - label_mm,
            y: footer_y,
            size: FOOTER_PT,
            bold: false,
            text: label,
        });
    }

    chrome.append(&mut page.marks);
    page.marks = chrome;
}

pub fn render(doc: &ExportDocument) -> Result<Vec<u8>, ExportError> {
    let pages = layout(doc);
    let (width, height) = page_size(doc.orientation);

    let (pdf, first_page, first_layer) =
        PdfDocument::new(doc.title.as_str(), Mm(width), Mm(height), "Page 1");
    let regular = pdf.add_builtin_font(BuiltinFont::Helvetica)?;
    let bold = pdf.add_builtin_font(BuiltinFont::HelveticaBold)?;

    for (index, page) in pages.iter().enumerate() {
        let (page_index, layer_index) = if index == 0 {
            (first_page, first_layer)
        } else {
            pdf.add_page(Mm(width), Mm(height), format!("Page {}", index + 1))
        };
        let layer = pdf.get_page(page_index).get_layer(layer_index);
        for mark in &page.marks {
            match mark {
                Mark::Text { x, y, size, bold: is_bold, text } => {
                    let font: &IndirectFontRef = if *is_bold { &bold } else { &regular };
                    layer.use_text(text.as_str(), *size, Mm(*x), Mm(*y), font);
                }
                Mark::Rule { x1, x2, y } => {
                    layer.add_line(Line {
                        points: vec![
                            (Point::new(Mm(*x1), Mm(*y)), false),
                            (Point::new(Mm(*x2), Mm(*y)), false),
                        ],
                        is_closed: false,
                    });
                }
            }
        }
    }

    Ok(pdf.save_to_bytes()?)
}
