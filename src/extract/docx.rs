// DOCX text extraction built on the `docx-rs` reader. Only top-level
// paragraphs contribute text; the join order follows the document order.

use anyhow::Context;
use docx_rs::{read_docx, DocumentChild, Paragraph, ParagraphChild, RunChild};

/// Extracts text from a DOCX document stored fully in memory. Paragraph
/// texts are joined with newlines, in document order.
pub fn extract_text_from_docx_mem(bytes: &[u8]) -> anyhow::Result<String> {
    let docx = read_docx(bytes).context("failed to parse DOCX bytes using docx-rs")?;

    let paragraphs: Vec<String> = docx
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            DocumentChild::Paragraph(p) => Some(paragraph_text(p)),
            _ => None,
        })
        .collect();

    Ok(paragraphs.join("\n"))
}

fn paragraph_text(paragraph: &Paragraph) -> String {
    let mut text = String::new();
    for child in &paragraph.children {
        if let ParagraphChild::Run(run) = child {
            for run_child in &run.children {
                if let RunChild::Text(t) = run_child {
                    text.push_str(&t.text);
                }
            }
        }
    }
    text
}
