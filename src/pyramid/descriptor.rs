//! Deep Zoom Image (DZI) descriptor document.
//!
//! The descriptor is the contract a viewer such as OpenSeadragon uses to work
//! out which tile to fetch for a viewport, so its geometry must match the
//! tiles on disk exactly.
//!
//! # Example Output
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <Image TileSize="256" Overlap="1" Format="jpg" xmlns="http://schemas.microsoft.com/deepzoom/2008" Url="https://example.com/tiles/photo/">
//!   <Size Width="300" Height="200"/>
//! </Image>
//! ```

use super::spec::{PyramidSpec, TileFormat};

/// XML namespace of the Deep Zoom schema.
pub const DZI_NAMESPACE: &str = "http://schemas.microsoft.com/deepzoom/2008";

/// File extension of descriptor documents.
pub const DESCRIPTOR_EXTENSION: &str = "dzi";

/// In-memory form of a `.dzi` document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptor {
    pub tile_size: u32,
    pub overlap: u32,
    pub format: TileFormat,
    pub width: u32,
    pub height: u32,
    /// Tile directory URL, already normalized and ending with `/`
    pub url: Option<String>,
}

impl Descriptor {
    /// Describe the pyramid built from `spec` for an image named `name`.
    pub fn new(spec: &PyramidSpec, name: &str, width: u32, height: u32) -> Self {
        Self {
            tile_size: spec.tile_size,
            overlap: spec.overlap,
            format: spec.format,
            width,
            height,
            url: spec
                .base_url
                .as_deref()
                .filter(|base| !base.is_empty())
                .map(|base| tile_directory_url(base, name)),
        }
    }

    /// Render the XML document.
    pub fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(256);
        xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        xml.push_str(&format!(
            "<Image TileSize=\"{}\" Overlap=\"{}\" Format=\"{}\" xmlns=\"{}\"",
            self.tile_size,
            self.overlap,
            self.format.extension(),
            DZI_NAMESPACE
        ));
        if let Some(ref url) = self.url {
            xml.push_str(&format!(" Url=\"{}\"", escape_attr(url)));
        }
        xml.push_str(">\n");
        xml.push_str(&format!(
            "  <Size Width=\"{}\" Height=\"{}\"/>\n",
            self.width, self.height
        ));
        xml.push_str("</Image>\n");
        xml
    }

    /// Read a descriptor back from its XML form.
    ///
    /// Only the attributes this crate writes are understood; anything else in
    /// the document is ignored.
    pub fn parse(xml: &str) -> Result<Self, String> {
        let image = element(xml, "Image").ok_or("missing <Image> element")?;
        let size = element(xml, "Size").ok_or("missing <Size> element")?;

        let format = required_attr(image, "Format")?.parse::<TileFormat>()?;

        Ok(Self {
            tile_size: parse_number(image, "TileSize")?,
            overlap: parse_number(image, "Overlap")?,
            format,
            width: parse_number(size, "Width")?,
            height: parse_number(size, "Height")?,
            url: attr(image, "Url").map(|url| unescape_attr(&url)),
        })
    }
}

/// Normalize a base URL so it ends with exactly one `/`.
pub fn normalize_base_url(base_url: &str) -> String {
    format!("{}/", base_url.trim_end_matches('/'))
}

/// URL of the tile directory of image `name` under `base_url`.
///
/// `name` is percent-encoded as a single path segment.
pub fn tile_directory_url(base_url: &str, name: &str) -> String {
    format!("{}{}/", normalize_base_url(base_url), urlencoding::encode(name))
}

fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

fn unescape_attr(value: &str) -> String {
    value
        .replace("&quot;", "\"")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// Text of the opening tag `<name ...>`, without the angle brackets.
fn element<'a>(xml: &'a str, name: &str) -> Option<&'a str> {
    let open = format!("<{}", name);
    let mut search = 0;
    while let Some(found) = xml[search..].find(&open) {
        let start = search + found + 1;
        let rest = &xml[start + name.len()..];
        // Reject prefixes of longer names, e.g. <ImageData
        if rest.starts_with(|c: char| c.is_whitespace() || c == '>' || c == '/') {
            let end = xml[start..].find('>')? + start;
            return Some(&xml[start..end]);
        }
        search = start;
    }
    None
}

fn attr(tag: &str, name: &str) -> Option<String> {
    let key = format!("{}=\"", name);
    let mut search = 0;
    while let Some(found) = tag[search..].find(&key) {
        let pos = search + found;
        let preceded_by_space = tag[..pos].ends_with(char::is_whitespace);
        let value_start = pos + key.len();
        if preceded_by_space {
            let value_end = tag[value_start..].find('"')? + value_start;
            return Some(tag[value_start..value_end].to_string());
        }
        search = value_start;
    }
    None
}

fn required_attr(tag: &str, name: &str) -> Result<String, String> {
    attr(tag, name).ok_or_else(|| format!("missing {} attribute", name))
}

fn parse_number(tag: &str, name: &str) -> Result<u32, String> {
    let value = required_attr(tag, name)?;
    value
        .parse()
        .map_err(|_| format!("invalid {} attribute: {}", name, value))
}
