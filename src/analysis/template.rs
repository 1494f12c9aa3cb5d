//! The field-extraction prompt, kept as a versioned data asset rather than
//! inline string-building. Variant wordings become new template constants,
//! not code forks.

use tracing::debug;

/// Bumped whenever the instruction wording or column set changes.
pub const TEMPLATE_VERSION: &str = "v1";

/// Instruction preamble for the Purchase Order field extraction. The two
/// placeholders are `{po_name}` (filename-derived display label) and
/// `{document_text}` (extracted text, appended verbatim).
const PO_EXTRACTION_TEMPLATE: &str = r#"You are a GenAI assistant specializing in IT Cost Optimization and Application Portfolio Rationalization.

A Purchase Order (PO) document has been uploaded. Extract and return a structured summary in **Markdown Table Format** with the following headers:

| PO Start Date | PO End Date | Quantity & UOM | PO Price | PO Description | PO Signatory | PO Contract Tenure | PO Clause Summary |
|---------------|-------------|----------------|----------|----------------|--------------|---------------------|-------------------|

---

**Field Extraction Rules:**

1. **PO Start Date / PO End Date**
   - These are the official PO validity dates.
   - If multiple dates are found, prioritize main PO validity dates.

2. **Quantity & UOM**
   - Total number with unit (e.g., 340 NOS)

3. **PO Price (Incl. GST & Currency)**
   - Mention the full amount including taxes.
   - Clearly state the currency: USD or INR (e.g., USD 1,000 or INR 12,50,000)

4. **PO Description**
   - Start with the application/product name (e.g., '{po_name}')
   - Then add a short summary of modules, services, licenses covered.
   - Do not use <br>. Use plain markdown line breaks if needed.

5. **PO Signatory**
   - Extract name or designation of the person signing the PO.
   - Usually found under "For [Company Name]". If not present, write "Not Mentioned" — though it's typically included.

6. **PO Contract Tenure**
   - Extract Contract Start and End Dates (if explicitly mentioned).
   - Calculate duration (e.g., "3-year contract").
   - If contract duration is not found, write: "Contract tenure not mentioned".

7. **PO Clause Summary**
   - Present this section as numbered bullet points (1, 2, 3...).
   - Extract from any "PO Terms", "Special Terms", "General Terms" sections.
   - Include important clauses such as:
     - Payment Terms (e.g., payment must be made within 30/45/90 days or penalties apply)
     - Early Termination Rights (e.g., PO/licensing can be cancelled with 45-day notice)
     - Unlimited Usage or transfer clauses
     - Risk clauses: non-cancellable PO, lock-in conditions, penalty provisions

---

**Guidelines:**
- Thoroughly analyze the entire document and extract data for **all 8 columns**.
- Do not skip or summarize generically.
- Return only a Markdown Table.
- Remove all <br> from output.

---

Here is the PO text:
{document_text}
"#;

/// Derives a human-readable label from the uploaded filename: the `.pdf` /
/// `.docx` extension is stripped case-insensitively and underscores become
/// spaces.
pub fn display_label(filename: &str) -> String {
    strip_doc_extension(filename).replace('_', " ").trim().to_string()
}

fn strip_doc_extension(filename: &str) -> &str {
    let bytes = filename.as_bytes();
    for ext in [".pdf", ".docx"] {
        if bytes.len() >= ext.len()
            && bytes[bytes.len() - ext.len()..].eq_ignore_ascii_case(ext.as_bytes())
        {
            return &filename[..filename.len() - ext.len()];
        }
    }
    filename
}

/// Renders the extraction prompt: instruction preamble followed by the
/// extracted document text, verbatim. No escaping, truncation, or length
/// check is applied.
pub fn render(document_text: &str, po_name: &str) -> String {
    debug!(
        "Rendering prompt template {} for '{}' ({} bytes of document text)",
        TEMPLATE_VERSION,
        po_name,
        document_text.len()
    );

    PO_EXTRACTION_TEMPLATE
        .replace("{po_name}", po_name)
        .replace("{document_text}", document_text)
}
