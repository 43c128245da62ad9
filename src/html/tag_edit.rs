use super::placeholder::escape_html;

#[derive(Debug, Clone, PartialEq, Eq)]
struct TagAttribute {
    name: String,
    raw_value: Option<String>,
    quote: Option<char>,
}

/// A start tag located in serialized HTML, editable without re-parsing the
/// surrounding document.
#[derive(Debug, Clone)]
pub(crate) struct StartTag {
    start: usize,
    end: usize,
    name: String,
    attributes: Vec<TagAttribute>,
    self_closing: bool,
}

impl StartTag {
    pub(crate) fn get(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| attr.name.eq_ignore_ascii_case(name))
            .map(|attr| attr.raw_value.as_deref().unwrap_or(""))
    }

    pub(crate) fn set(&mut self, name: &str, value: &str) {
        let escaped = escape_html(value);
        if let Some(attr) = self
            .attributes
            .iter_mut()
            .find(|attr| attr.name.eq_ignore_ascii_case(name))
        {
            attr.raw_value = Some(escaped);
            attr.quote = Some('"');
            return;
        }
        self.attributes.push(TagAttribute {
            name: name.to_string(),
            raw_value: Some(escaped),
            quote: Some('"'),
        });
    }

    fn render(&self) -> String {
        let mut out = format!("<{}", self.name);
        for attr in &self.attributes {
            out.push(' ');
            out.push_str(&attr.name);
            if let Some(value) = &attr.raw_value {
                out.push('=');
                match attr.quote {
                    Some(quote) => {
                        out.push(quote);
                        out.push_str(value);
                        out.push(quote);
                    }
                    None => out.push_str(value),
                }
            }
        }
        if self.self_closing {
            out.push_str(" />");
        } else {
            out.push('>');
        }
        out
    }
}

/// Rewrites every `<tag_name ...>` start tag for which `edit` returns true.
/// Comments and the bodies of `script`/`style` are skipped.
pub(crate) fn rewrite_start_tags<F>(html: &str, tag_name: &str, mut edit: F) -> String
where
    F: FnMut(&mut StartTag) -> bool,
{
    let mut out = String::with_capacity(html.len());
    let mut copied = 0usize;
    for mut tag in scan_start_tags(html, tag_name) {
        if edit(&mut tag) {
            out.push_str(&html[copied..tag.start]);
            out.push_str(&tag.render());
            copied = tag.end;
        }
    }
    out.push_str(&html[copied..]);
    out
}

fn scan_start_tags(html: &str, tag_name: &str) -> Vec<StartTag> {
    let mut found = Vec::new();
    let mut idx = 0usize;
    while let Some(offset) = html[idx..].find('<') {
        let start = idx + offset;
        let rest = &html[start..];
        if rest.starts_with("<!--") {
            idx = rest
                .find("-->")
                .map(|end| start + end + 3)
                .unwrap_or(html.len());
            continue;
        }
        let Some(tag) = parse_start_tag(html, start) else {
            idx = start + 1;
            continue;
        };
        let lower = tag.name.to_ascii_lowercase();
        idx = tag.end;
        if lower == "script" || lower == "style" {
            let closing = format!("</{}", lower);
            idx = find_ignore_ascii_case(&html.as_bytes()[idx..], closing.as_bytes())
                .map(|pos| idx + pos)
                .unwrap_or(html.len());
        }
        if lower.eq_ignore_ascii_case(tag_name) {
            found.push(tag);
        }
    }
    found
}

fn parse_start_tag(html: &str, start: usize) -> Option<StartTag> {
    let bytes = html.as_bytes();
    let mut pos = start + 1;
    if !bytes.get(pos)?.is_ascii_alphabetic() {
        return None;
    }
    let name_start = pos;
    while pos < bytes.len() && (bytes[pos].is_ascii_alphanumeric() || bytes[pos] == b'-') {
        pos += 1;
    }
    let name = html[name_start..pos].to_string();

    let mut attributes = Vec::new();
    let self_closing;
    loop {
        while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        match bytes.get(pos)? {
            b'>' => {
                pos += 1;
                self_closing = false;
                break;
            }
            b'/' if bytes.get(pos + 1) == Some(&b'>') => {
                pos += 2;
                self_closing = true;
                break;
            }
            b'/' => {
                pos += 1;
                continue;
            }
            _ => {}
        }

        let attr_start = pos;
        while pos < bytes.len() && !is_attribute_name_end(bytes[pos]) {
            pos += 1;
        }
        let attr_name = html[attr_start..pos].to_string();
        while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        let mut raw_value = None;
        let mut quote = None;
        if bytes.get(pos) == Some(&b'=') {
            pos += 1;
            while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
                pos += 1;
            }
            match bytes.get(pos)? {
                q @ (b'"' | b'\'') => {
                    let value_start = pos + 1;
                    let close = html[value_start..].find(*q as char)? + value_start;
                    raw_value = Some(html[value_start..close].to_string());
                    quote = Some(*q as char);
                    pos = close + 1;
                }
                _ => {
                    let value_start = pos;
                    while pos < bytes.len()
                        && !bytes[pos].is_ascii_whitespace()
                        && bytes[pos] != b'>'
                    {
                        pos += 1;
                    }
                    raw_value = Some(html[value_start..pos].to_string());
                }
            }
        }
        attributes.push(TagAttribute {
            name: attr_name,
            raw_value,
            quote,
        });
    }

    Some(StartTag {
        start,
        end: pos,
        name,
        attributes,
        self_closing,
    })
}

fn find_ignore_ascii_case(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    haystack
        .windows(needle.len())
        .position(|window| window.eq_ignore_ascii_case(needle))
}

fn is_attribute_name_end(byte: u8) -> bool {
    byte.is_ascii_whitespace() || matches!(byte, b'=' | b'>' | b'/')
}
