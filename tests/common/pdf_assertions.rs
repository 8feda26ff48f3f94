use lopdf::Document as LopdfDocument;

/// Extract all text content from a PDF document
pub fn extract_text(doc: &LopdfDocument) -> String {
    let mut text = String::new();
    let pages = doc.get_pages();
    for page_num in 1..=pages.len() {
        if let Ok(page_text) = doc.extract_text(&[page_num as u32]) {
            text.push_str(&page_text);
            text.push('\n');
        }
    }
    text
}

/// Titles of the top-level outline entries, in order.
pub fn outline_titles(doc: &LopdfDocument) -> Vec<String> {
    let mut titles = Vec::new();
    let first = doc
        .catalog()
        .and_then(|catalog| catalog.get(b"Outlines"))
        .and_then(|outlines| outlines.as_reference())
        .and_then(|id| doc.get_dictionary(id))
        .and_then(|outlines| outlines.get(b"First"))
        .and_then(|first| first.as_reference());

    let mut next = first.ok();
    while let Some(id) = next {
        let Ok(item) = doc.get_dictionary(id) else { break };
        if let Ok(title) = item.get(b"Title").and_then(|t| t.as_str()) {
            titles.push(String::from_utf8_lossy(title).to_string());
        }
        next = item.get(b"Next").and_then(|n| n.as_reference()).ok();
    }
    titles
}

#[macro_export]
macro_rules! assert_pdf_contains_text {
    ($pdf:expr, $text:expr) => {
        let extracted = $crate::common::pdf_assertions::extract_text(&$pdf.doc);
        assert!(
            extracted.contains($text),
            "PDF should contain '{}', but extracted text was:\n{}",
            $text,
            extracted
        );
    };
}

#[macro_export]
macro_rules! assert_pdf_not_contains_text {
    ($pdf:expr, $text:expr) => {
        let extracted = $crate::common::pdf_assertions::extract_text(&$pdf.doc);
        assert!(
            !extracted.contains($text),
            "PDF should NOT contain '{}', but it was found in:\n{}",
            $text,
            extracted
        );
    };
}

/// Assert minimum number of pages
#[macro_export]
macro_rules! assert_pdf_min_pages {
    ($pdf:expr, $min:expr) => {
        assert!(
            $pdf.page_count() >= $min,
            "Expected at least {} pages, got {}",
            $min,
            $pdf.page_count()
        );
    };
}
