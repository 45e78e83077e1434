//! Pascal VOC XML reader and writer.
//!
//! One XML file per image. Box corners are integer pixels.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use roxmltree::Node;

use super::model::{VocDocument, VocObject};
use super::PixelBox;
use crate::error::PrepError;

pub const VOC_XML_EXTENSION: &str = "xml";

/// Write one VOC document to `path`.
pub fn write_voc_xml(path: &Path, document: &VocDocument) -> Result<(), PrepError> {
    fs::write(path, to_voc_xml_string(document)).map_err(PrepError::Io)
}

/// Read one VOC document from `path`.
pub fn read_voc_xml(path: &Path) -> Result<VocDocument, PrepError> {
    let xml = fs::read_to_string(path).map_err(PrepError::Io)?;
    parse_voc_xml_str(&xml, path)
}

/// Render a VOC document as XML text.
pub fn to_voc_xml_string(document: &VocDocument) -> String {
    let mut xml = String::new();

    writeln!(xml, "<?xml version=\"1.0\" encoding=\"utf-8\"?>").expect("write to string");
    writeln!(xml, "<annotation>").expect("write to string");
    writeln!(xml, "  <folder>{}</folder>", xml_escape(&document.folder)).expect("write to string");
    writeln!(
        xml,
        "  <filename>{}</filename>",
        xml_escape(&document.filename)
    )
    .expect("write to string");
    writeln!(xml, "  <size>").expect("write to string");
    writeln!(xml, "    <width>{}</width>", document.width).expect("write to string");
    writeln!(xml, "    <height>{}</height>", document.height).expect("write to string");
    writeln!(xml, "    <depth>{}</depth>", document.depth).expect("write to string");
    writeln!(xml, "  </size>").expect("write to string");

    for object in &document.objects {
        writeln!(xml, "  <object>").expect("write to string");
        writeln!(xml, "    <name>{}</name>", xml_escape(&object.name)).expect("write to string");
        writeln!(xml, "    <pose>{}</pose>", xml_escape(&object.pose)).expect("write to string");
        writeln!(xml, "    <truncated>{}</truncated>", object.truncated)
            .expect("write to string");
        writeln!(xml, "    <difficult>{}</difficult>", object.difficult)
            .expect("write to string");
        writeln!(xml, "    <bndbox>").expect("write to string");
        writeln!(xml, "      <xmin>{}</xmin>", object.bbox.xmin).expect("write to string");
        writeln!(xml, "      <ymin>{}</ymin>", object.bbox.ymin).expect("write to string");
        writeln!(xml, "      <xmax>{}</xmax>", object.bbox.xmax).expect("write to string");
        writeln!(xml, "      <ymax>{}</ymax>", object.bbox.ymax).expect("write to string");
        writeln!(xml, "    </bndbox>").expect("write to string");
        writeln!(xml, "  </object>").expect("write to string");
    }

    writeln!(xml, "</annotation>").expect("write to string");
    xml
}

/// Parse VOC XML from bytes.
///
/// The input must be valid UTF-8.
pub fn from_voc_xml_slice(bytes: &[u8]) -> Result<VocDocument, PrepError> {
    let xml = std::str::from_utf8(bytes).map_err(|source| PrepError::VocXmlParse {
        path: PathBuf::from("<memory>"),
        message: format!("input is not valid UTF-8: {source}"),
    })?;
    parse_voc_xml_str(xml, Path::new("<memory>"))
}

fn parse_voc_xml_str(xml: &str, path: &Path) -> Result<VocDocument, PrepError> {
    let document = roxmltree::Document::parse(xml).map_err(|source| PrepError::VocXmlParse {
        path: path.to_path_buf(),
        message: source.to_string(),
    })?;

    let annotation = document.root_element();
    if annotation.tag_name().name() != "annotation" {
        return Err(PrepError::VocXmlParse {
            path: path.to_path_buf(),
            message: "missing <annotation> root element".to_string(),
        });
    }

    let folder = optional_child_text(annotation, "folder").unwrap_or_default();
    let filename = required_child_text(annotation, "filename", path, "<annotation>")?;

    let size = required_child_element(annotation, "size", path, "<annotation>")?;
    let width = parse_required::<u32>(size, "width", path, "<size>")?;
    let height = parse_required::<u32>(size, "height", path, "<size>")?;
    let depth = parse_required::<u32>(size, "depth", path, "<size>")?;

    let mut objects = Vec::new();
    for object in annotation
        .children()
        .filter(|node| node.is_element() && node.tag_name().name() == "object")
    {
        // Names are matched against the catalog, so whitespace is kept.
        let name = child_element(object, "name")
            .and_then(|child| child.text())
            .filter(|text| !text.is_empty())
            .map(ToOwned::to_owned)
            .ok_or_else(|| PrepError::VocXmlParse {
                path: path.to_path_buf(),
                message: "missing <name> in <object>".to_string(),
            })?;
        let bndbox = required_child_element(object, "bndbox", path, "<object>")?;

        let bbox = PixelBox::from_xyxy(
            parse_required::<i64>(bndbox, "xmin", path, "<bndbox>")?,
            parse_required::<i64>(bndbox, "ymin", path, "<bndbox>")?,
            parse_required::<i64>(bndbox, "xmax", path, "<bndbox>")?,
            parse_required::<i64>(bndbox, "ymax", path, "<bndbox>")?,
        );
        if !bbox.in_coord_range() {
            return Err(PrepError::VocXmlParse {
                path: path.to_path_buf(),
                message: format!(
                    "<bndbox> corner outside ±{} in <object> '{name}'",
                    PixelBox::COORD_LIMIT
                ),
            });
        }

        let mut parsed = VocObject::new(name, bbox);
        if let Some(pose) = optional_child_text(object, "pose") {
            parsed.pose = pose;
        }
        if let Some(raw) = optional_child_text(object, "truncated") {
            parsed.truncated = parse_flag(&raw, "truncated", path)?;
        }
        if let Some(raw) = optional_child_text(object, "difficult") {
            parsed.difficult = parse_flag(&raw, "difficult", path)?;
        }
        objects.push(parsed);
    }

    Ok(VocDocument {
        folder,
        filename,
        width,
        height,
        depth,
        objects,
    })
}

fn required_child_element<'a, 'input>(
    node: Node<'a, 'input>,
    tag: &str,
    path: &Path,
    context: &str,
) -> Result<Node<'a, 'input>, PrepError> {
    child_element(node, tag).ok_or_else(|| PrepError::VocXmlParse {
        path: path.to_path_buf(),
        message: format!("missing <{tag}> in {context}"),
    })
}

fn required_child_text(
    node: Node<'_, '_>,
    tag: &str,
    path: &Path,
    context: &str,
) -> Result<String, PrepError> {
    optional_child_text(node, tag).ok_or_else(|| PrepError::VocXmlParse {
        path: path.to_path_buf(),
        message: format!("missing <{tag}> in {context}"),
    })
}

fn parse_required<T: std::str::FromStr>(
    node: Node<'_, '_>,
    tag: &str,
    path: &Path,
    context: &str,
) -> Result<T, PrepError> {
    let raw = required_child_text(node, tag, path, context)?;
    raw.parse::<T>().map_err(|_| PrepError::VocXmlParse {
        path: path.to_path_buf(),
        message: format!(
            "invalid <{tag}> value '{raw}' in {context}; expected {}",
            std::any::type_name::<T>()
        ),
    })
}

fn parse_flag(raw: &str, tag: &str, path: &Path) -> Result<u8, PrepError> {
    match raw {
        "0" => Ok(0),
        "1" => Ok(1),
        other => Err(PrepError::VocXmlParse {
            path: path.to_path_buf(),
            message: format!("invalid <{tag}> value '{other}' in <object>; expected 0 or 1"),
        }),
    }
}

fn child_element<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|child| child.is_element() && child.tag_name().name() == tag)
}

fn optional_child_text(node: Node<'_, '_>, tag: &str) -> Option<String> {
    child_element(node, tag)
        .and_then(|child| child.text())
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(ToOwned::to_owned)
}

fn xml_escape(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
