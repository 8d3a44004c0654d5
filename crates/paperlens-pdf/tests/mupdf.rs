#![cfg(feature = "pdf")]

use std::io::Write;

use paperlens_pdf::{EXTRACTION_ERROR_SENTINEL, Extraction, MupdfBackend, extract, extract_file};

/// Build a one-page PDF that shows `text` in Helvetica, with a correct xref table.
fn one_page_pdf(text: &str) -> Vec<u8> {
    let content = format!("BT /F1 12 Tf 72 720 Td ({text}) Tj ET");
    let objects = [
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
        "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
         /Resources << /Font << /F1 5 0 R >> >> /Contents 4 0 R >>"
            .to_string(),
        format!(
            "<< /Length {} >>\nstream\n{content}\nendstream",
            content.len()
        ),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string(),
    ];

    let mut pdf = b"%PDF-1.4\n".to_vec();
    let mut offsets = Vec::new();
    for (i, body) in objects.iter().enumerate() {
        offsets.push(pdf.len());
        write!(pdf, "{} 0 obj\n{body}\nendobj\n", i + 1).unwrap();
    }
    let xref_at = pdf.len();
    write!(pdf, "xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1).unwrap();
    for off in offsets {
        write!(pdf, "{off:010} 00000 n \n").unwrap();
    }
    write!(
        pdf,
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_at}\n%%EOF\n",
        objects.len() + 1
    )
    .unwrap();
    pdf
}

#[test]
fn extracts_text_from_single_page() {
    let pdf = one_page_pdf("Attention Is All You Need");
    match extract(&MupdfBackend, &pdf) {
        Extraction::Text(text) => assert!(text.contains("Attention Is All You Need"), "{text:?}"),
        other => panic!("expected text, got {other:?}"),
    }
}

#[test]
fn garbage_bytes_fail() {
    let extraction = extract(&MupdfBackend, b"this is not a pdf at all");
    assert!(extraction.is_failed());
    assert_eq!(extraction.text_or_sentinel(), EXTRACTION_ERROR_SENTINEL);
}

#[test]
fn empty_input_fails() {
    assert!(extract(&MupdfBackend, b"").is_failed());
}

#[test]
fn reads_from_disk() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&one_page_pdf("On Disk")).unwrap();
    let extraction = extract_file(&MupdfBackend, file.path());
    assert!(extraction.text_or_sentinel().contains("On Disk"));
}
