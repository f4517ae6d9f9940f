//! Preset container parsing.
//!
//! A preset container is an opaque vendor blob with one serialized program
//! tree embedded as text. This module locates that block, decodes it
//! permissively, and exposes the first program node as an [`AttributeSet`].

use std::fs;
use std::path::Path;

use crate::error::FormatError;

pub mod archive;
mod attributes;

pub use archive::{read_archive_presets, ArchiveEntry};
pub use attributes::{AttributeSet, AttributeValue};

/// XML declaration followed by the root tag, wide and narrow spacing.
pub const START_MARKERS: [&[u8]; 2] = [
    b"<?xml version=\"1.0\" encoding=\"UTF-8\"?> <tal ",
    b"<?xml version=\"1.0\" encoding=\"UTF-8\"?><tal ",
];

/// Closing root tag terminating the embedded block.
pub const END_MARKER: &[u8] = b"</tal>";

/// Return the embedded program block, markers included.
///
/// Invalid UTF-8 is replaced rather than rejected.
pub fn extract_program_xml(blob: &[u8]) -> Result<String, FormatError> {
    let start = START_MARKERS
        .iter()
        .filter_map(|marker| find_subslice(blob, marker, 0))
        .min()
        .ok_or(FormatError::MissingStartMarker)?;

    let end = find_subslice(blob, END_MARKER, start).ok_or(FormatError::MissingEndMarker)?;

    Ok(String::from_utf8_lossy(&blob[start..end + END_MARKER.len()]).into_owned())
}

/// Parse the program tree and collect the first program node's attributes.
pub fn parse_program_attributes(xml: &str) -> Result<AttributeSet, FormatError> {
    let document = roxmltree::Document::parse(xml).map_err(|err| FormatError::MalformedXml {
        reason: err.to_string(),
    })?;

    let program = document
        .root_element()
        .children()
        .filter(|node| node.has_tag_name("programs"))
        .flat_map(|programs| programs.children())
        .find(|node| node.has_tag_name("program"))
        .ok_or(FormatError::MissingProgram)?;

    Ok(program
        .attributes()
        .map(|attr| (attr.name(), AttributeValue::parse(attr.value())))
        .collect())
}

/// Extract and parse in one step.
pub fn program_attributes(blob: &[u8]) -> Result<AttributeSet, FormatError> {
    let xml = extract_program_xml(blob)?;
    parse_program_attributes(&xml)
}

/// Read a container from disk and parse its program attributes.
pub fn load_attributes(path: &Path) -> Result<AttributeSet, FormatError> {
    let blob = fs::read(path).map_err(|err| FormatError::Unreadable {
        path: path.display().to_string(),
        reason: err.to_string(),
    })?;
    program_attributes(&blob)
}

fn find_subslice(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if from >= haystack.len() || needle.is_empty() {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|idx| idx + from)
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIDE_XML: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?> \
        <tal curprogram=\"0\" version=\"2.0\"><programs><program programname=\"X\" \
        sawvolume=\"0.5\"/></programs></tal>";

    fn container(xml: &str) -> Vec<u8> {
        let mut blob = b"VST3\x00junk".to_vec();
        blob.extend_from_slice(xml.as_bytes());
        blob.extend_from_slice(b"\x00tail");
        blob
    }

    #[test]
    fn extracts_wide_marker_block() {
        let blob = container(WIDE_XML);
        assert_eq!(extract_program_xml(&blob).unwrap(), WIDE_XML);
    }

    #[test]
    fn extracts_narrow_marker_block() {
        let xml = WIDE_XML.replacen("?> <tal", "?><tal", 1);
        let blob = container(&xml);
        assert_eq!(extract_program_xml(&blob).unwrap(), xml);
    }

    #[test]
    fn missing_markers_are_format_errors() {
        assert_eq!(
            extract_program_xml(b"VST3 no program here"),
            Err(FormatError::MissingStartMarker)
        );

        let truncated = container(&WIDE_XML[..WIDE_XML.len() - 6]);
        assert_eq!(
            extract_program_xml(&truncated),
            Err(FormatError::MissingEndMarker)
        );
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let raw = WIDE_XML.as_bytes();
        let cut = WIDE_XML.find("X\"").unwrap() + 1;
        let mut blob = b"VST3".to_vec();
        blob.extend_from_slice(&raw[..cut]);
        blob.push(0xFF);
        blob.extend_from_slice(&raw[cut..]);

        let extracted = extract_program_xml(&blob).unwrap();
        assert!(extracted.contains('\u{FFFD}'));
        let attrs = parse_program_attributes(&extracted).unwrap();
        assert_eq!(attrs.text_or("programname", ""), "X\u{FFFD}");
        assert_eq!(attrs.number("sawvolume"), 0.5);
    }

    #[test]
    fn parses_program_attributes() {
        let attrs = program_attributes(&container(WIDE_XML)).unwrap();
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs.text_or("programname", ""), "X");
        assert_eq!(attrs.get("sawvolume"), Some(&AttributeValue::Number(0.5)));
    }

    #[test]
    fn missing_program_node_is_format_error() {
        let xml = "<?xml version=\"1.0\" encoding=\"UTF-8\"?> <tal version=\"2.0\"><programs/></tal>";
        assert_eq!(
            program_attributes(&container(xml)),
            Err(FormatError::MissingProgram)
        );
    }

    #[test]
    fn malformed_block_is_format_error() {
        let xml = "<?xml version=\"1.0\" encoding=\"UTF-8\"?> <tal version=\"2.0\"><programs></tal>";
        assert!(matches!(
            program_attributes(&container(xml)),
            Err(FormatError::MalformedXml { .. })
        ));
    }
}
