//! HTML pages for the single-widget upload form. The completion markdown is
//! embedded as-is; only filenames and upload diagnostics get escaped.

const PAGE_STYLE: &str = "\
body { font-family: system-ui, sans-serif; max-width: 56rem; margin: 2rem auto; padding: 0 1rem; }\
h1 { font-size: 1.4rem; }\
pre.result { white-space: pre-wrap; background: #f6f8fa; padding: 1rem; border-radius: 6px; }\
p.error { color: #b00020; font-weight: 600; }\
form { margin-top: 1.5rem; }";

fn page(body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>PO Analyzer</title>\n<style>{}</style>\n</head>\n<body>\n\
         <h1>GenAI-Based PO Analyzer</h1>\n{}\n</body>\n</html>\n",
        PAGE_STYLE, body
    )
}

fn upload_form() -> String {
    "<form action=\"/analyze\" method=\"post\" enctype=\"multipart/form-data\">\n\
     <label for=\"document\">Upload a PO file (PDF or DOCX)</label><br>\n\
     <input type=\"file\" id=\"document\" name=\"document\" accept=\".pdf,.docx\" required>\n\
     <button type=\"submit\">Analyze</button>\n</form>"
        .to_string()
}

pub fn index_page() -> String {
    page(&upload_form())
}

/// Result page: the model's markdown answer is rendered as-is inside a
/// preformatted block, with no schema validation or escaping.
pub fn result_page(filename: &str, markdown: &str) -> String {
    page(&format!(
        "<p>Analysis of <strong>{}</strong>:</p>\n<pre class=\"result\">{}</pre>\n{}",
        escape_html(filename),
        markdown,
        upload_form()
    ))
}

/// Error page: the message is shown verbatim so API failures surface exactly
/// as `Error <status>: <body>`.
pub fn error_page(message: &str) -> String {
    page(&format!(
        "<p class=\"error\">{}</p>\n{}",
        message,
        upload_form()
    ))
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
