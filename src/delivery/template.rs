//! Audit email templates
//!
//! Customer-controlled values are HTML-escaped before they are placed in the
//! HTML body. The plain-text body carries them unchanged.

use htmlescape::encode_minimal;

/// Greeting used when the display name is empty
pub const DEFAULT_GREETING_NAME: &str = "Business Leader";

const STYLE: &str = "\
        body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; line-height: 1.6; color: #333; max-width: 600px; margin: 0 auto; padding: 20px; }
        .header { background: linear-gradient(135deg, #4f46e5 0%, #7c3aed 100%); padding: 40px; text-align: center; border-radius: 12px 12px 0 0; color: white; }
        .content { background: white; padding: 40px; border-radius: 0 0 12px 12px; box-shadow: 0 4px 6px rgba(0,0,0,0.05); }
        .audit-box { background: #f8fafc; border-left: 4px solid #4f46e5; padding: 25px; margin: 30px 0; white-space: pre-wrap; font-family: monospace; }
        .footer { margin-top: 40px; padding-top: 20px; border-top: 1px solid #e5e7eb; color: #6b7280; text-align: center; font-size: 13px; }";

/// Subject line for the audit email
pub fn render_subject(website: &str) -> String {
    format!("Your AI-Powered Business Automation Audit for {website} | Cyrnel Origin")
}

/// Plain-text body for non-HTML clients
pub fn render_text(website: &str, audit: &str, order_id: &str) -> String {
    format!("CYRNEL ORIGIN AUDIT\n\nFor: {website}\n\n{audit}\n\n---\nOrder Reference: {order_id}")
}

/// Escape `text` and turn its line breaks into `<br>`
fn html_lines(text: &str) -> String {
    encode_minimal(text)
        .replace("\r\n", "\n")
        .replace('\n', "<br>")
}

/// HTML body with header, greeting, audit box and footer
pub fn render_html(
    display_name: &str,
    website: &str,
    audit: &str,
    order_id: &str,
    year: i32,
) -> String {
    let name = if display_name.is_empty() {
        DEFAULT_GREETING_NAME
    } else {
        display_name
    };

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>Your AI-Powered Business Automation Audit</title>
    <style>
{STYLE}
    </style>
</head>
<body>
    <div class="header">
        <h1>Your AI-Powered Business Audit</h1>
        <p>Cyrnel Origin Automation Analysis</p>
    </div>
    <div class="content">
        <p>Hi <strong>{name}</strong>,</p>
        <p>Your customized automation audit for <strong>{website}</strong> is ready.</p>
        <div class="audit-box">{audit}</div>
        <p>Best regards,<br><strong>The Cyrnel Origin Team</strong></p>
        <div class="footer">
            <p>Order Reference: {order_id} | © {year} Cyrnel Origin</p>
        </div>
    </div>
</body>
</html>"#,
        name = encode_minimal(name),
        website = encode_minimal(website),
        audit = html_lines(audit),
        order_id = encode_minimal(order_id),
    )
}
