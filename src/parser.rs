//! Raw message parsing: headers plus a segmented plain-text body

use crate::document::Document;
use crate::error::{ParseError, Result};
use crate::types::Message;
use chrono::{DateTime, Utc};
use mailparse::{MailHeaderMap, ParsedMail};
use tracing::debug;

/// Parse raw email bytes into a [`Message`] with a segmented body
pub fn parse_message(uid: u32, raw: &[u8]) -> Result<Message> {
    let parsed = mailparse::parse_mail(raw).map_err(|e| ParseError::Structure(e.to_string()))?;

    let message_id = parsed
        .headers
        .get_first_value("Message-ID")
        .map_or_else(|| format!("<synthetic-{uid}@local>"), |id| id.trim().to_string());
    let from = extract_from(&parsed);
    let subject = parsed
        .headers
        .get_first_value("Subject")
        .unwrap_or_else(|| "(no subject)".to_string());
    let date = extract_date(&parsed);
    let text = extract_text(&parsed)?;
    let body = Document::parse(&text);

    debug!(
        "Parsed message {message_id}: {} segments, {} attributions",
        body.segments().len(),
        body.attributions().count()
    );

    Ok(Message {
        message_id,
        from,
        subject,
        date,
        text,
        body,
    })
}

fn extract_from(parsed: &ParsedMail) -> Option<String> {
    let header = parsed.headers.get_first_header("From")?;
    match mailparse::addrparse_header(header) {
        Ok(list) => list
            .extract_single_info()
            .map(|info| info.display_name.unwrap_or(info.addr)),
        Err(e) => {
            debug!("Unparseable From header, keeping raw value: {e}");
            Some(header.get_value())
        }
    }
}

fn extract_date(parsed: &ParsedMail) -> Option<DateTime<Utc>> {
    parsed
        .headers
        .get_first_value("Date")
        .and_then(|value| DateTime::parse_from_rfc2822(value.trim()).ok())
        .map(|date| date.with_timezone(&Utc))
}

/// Plain-text body, falling back to tag-stripped HTML, with LF line endings
fn extract_text(parsed: &ParsedMail) -> Result<String> {
    let (text, html) = extract_body_parts(parsed)?;

    let best = if !text.is_empty() {
        text
    } else if let Some(html) = html {
        strip_html(&html)
    } else {
        String::new()
    };

    Ok(best.replace("\r\n", "\n"))
}

fn extract_body_parts(parsed: &ParsedMail) -> Result<(String, Option<String>)> {
    let mut text = String::new();
    let mut html: Option<String> = None;

    if parsed.subparts.is_empty() {
        let body = parsed
            .get_body()
            .map_err(|e| ParseError::Decode(e.to_string()))?;
        if parsed.ctype.mimetype.to_lowercase().contains("text/html") {
            html = Some(body);
        } else {
            text = body;
        }
    } else {
        extract_body_recursive(parsed, &mut text, &mut html)?;
    }

    Ok((text, html))
}

fn extract_body_recursive(
    parsed: &ParsedMail,
    text: &mut String,
    html: &mut Option<String>,
) -> Result<()> {
    for part in &parsed.subparts {
        if !part.subparts.is_empty() {
            extract_body_recursive(part, text, html)?;
            continue;
        }

        let content_type = part.ctype.mimetype.to_lowercase();
        let wanted_text = content_type.contains("text/plain") && text.is_empty();
        let wanted_html = content_type.contains("text/html") && html.is_none();
        if !(wanted_text || wanted_html) {
            continue;
        }

        let body = part
            .get_body()
            .map_err(|e| ParseError::Decode(e.to_string()))?;
        if wanted_text {
            *text = body;
        } else {
            *html = Some(body);
        }
    }

    Ok(())
}

/// Whether `text` starts with `prefix`, ignoring ASCII case
fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    text.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

fn strip_html(html: &str) -> String {
    let mut result = String::with_capacity(html.len());
    let mut in_tag = false;
    let mut in_script = false;
    let mut in_style = false;
    let mut tag_start: usize = 0;

    for (i, c) in html.char_indices() {
        if !in_tag && c == '<' {
            tag_start = i;
            let remaining = &html[i..];
            if starts_with_ignore_case(remaining, "<script") {
                in_script = true;
            } else if starts_with_ignore_case(remaining, "<style") {
                in_style = true;
            } else if starts_with_ignore_case(remaining, "</script") {
                in_script = false;
            } else if starts_with_ignore_case(remaining, "</style") {
                in_style = false;
            }
            in_tag = true;
        } else if in_tag && c == '>' {
            in_tag = false;
            // Line breaks after block elements keep quoted lines apart
            let tag = &html[tag_start + 1..i];
            if ["br", "/p", "/div", "/li", "/h"]
                .iter()
                .any(|name| starts_with_ignore_case(tag, name))
            {
                result.push('\n');
            }
        } else if !in_tag && !in_script && !in_style {
            result.push(c);
        }
    }

    html_escape::decode_html_entities(&result)
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
}
