//! Shared helpers for building Sonos requests and reading their responses.

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::protocol_constants::SONOS_HTTP_PORT;

/// Builds the full control URL for a speaker endpoint.
///
/// `ip` may be a bare host; the standard Sonos port is appended.
#[must_use]
pub fn build_sonos_url(ip: &str, path: &str) -> String {
    format!("http://{}:{}{}", ip, SONOS_HTTP_PORT, path)
}

/// Escapes the five XML special characters.
#[must_use]
pub fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Extracts and unescapes the text content of the first element named `tag`.
///
/// Matches on the local name, so `<u:CurrentZoneName>` and elements carrying
/// attributes are found too. Nested XML payloads (like `ZoneGroupState`) come
/// back entity-decoded once. Returns `None` for missing or self-closing
/// elements, or when the document is malformed before the element.
#[must_use]
pub fn extract_xml_text(xml: &str, tag: &str) -> Option<String> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    let target = tag.as_bytes();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) if e.local_name().as_ref() == target => {
                if let Ok(text) = reader.read_text(e.name()) {
                    return Some(html_escape::decode_html_entities(&text).into_owned());
                }
            }
            Ok(Event::Eof) | Err(_) => break,
            _ => {}
        }
        buf.clear();
    }
    None
}

/// Reads an attribute value from a start/empty element, entity-decoded.
#[must_use]
pub fn get_xml_attr(element: &BytesStart<'_>, name: &[u8]) -> Option<String> {
    element
        .attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == name)
        .map(|attr| {
            let raw = String::from_utf8_lossy(&attr.value);
            html_escape::decode_html_entities(&raw).into_owned()
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_url_uses_sonos_port() {
        assert_eq!(
            build_sonos_url("192.168.1.10", "/ZoneGroupTopology/Control"),
            "http://192.168.1.10:1400/ZoneGroupTopology/Control"
        );
    }

    #[test]
    fn escape_xml_handles_all_specials() {
        assert_eq!(
            escape_xml(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&apos;s&lt;/a&gt;"
        );
    }

    #[test]
    fn extract_xml_text_decodes_entities() {
        let xml = "<s:Body><ZoneGroupState>&lt;ZoneGroups/&gt;</ZoneGroupState></s:Body>";
        assert_eq!(
            extract_xml_text(xml, "ZoneGroupState").as_deref(),
            Some("<ZoneGroups/>")
        );
    }

    #[test]
    fn extract_xml_text_missing_or_empty_element() {
        assert!(extract_xml_text("<Other>1</Other>", "CurrentZoneName").is_none());
        assert!(extract_xml_text("<CurrentZoneName/>", "CurrentZoneName").is_none());
    }

    #[test]
    fn extract_xml_text_matches_prefixed_element() {
        let xml = "<s:Envelope><s:Body><u:GetZoneAttributesResponse>\
                   <u:CurrentZoneName>Kitchen</u:CurrentZoneName>\
                   </u:GetZoneAttributesResponse></s:Body></s:Envelope>";
        assert_eq!(
            extract_xml_text(xml, "CurrentZoneName").as_deref(),
            Some("Kitchen")
        );
    }

    #[test]
    fn extract_xml_text_matches_element_with_attributes() {
        let xml = r#"<Body><CurrentZoneName xmlns="">Living &amp; Dining</CurrentZoneName></Body>"#;
        assert_eq!(
            extract_xml_text(xml, "CurrentZoneName").as_deref(),
            Some("Living & Dining")
        );
    }
}
