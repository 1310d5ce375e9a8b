//! Namespace-aware reader for sitemap-shaped XML
//!
//! Both `urlset` and `sitemapindex` documents are a root element holding a
//! flat list of entries (`url` / `sitemap`) whose children carry the data.
//! This reader walks either shape and hands back one [`Entry`] per element.

use crate::feeds::FeedError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::NsReader;

/// sitemaps.org schema namespace
pub const SITEMAP_NS: &[u8] = b"http://www.sitemaps.org/schemas/sitemap/0.9";

/// Google image sitemap extension namespace
pub const IMAGE_NS: &[u8] = b"http://www.google.com/schemas/sitemap-image/1.1";

/// Data found under one entry element
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Entry {
    pub loc: Option<String>,
    pub lastmod: Option<String>,
    /// Number of `image:image` children
    pub images: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    Root,
    Entry,
    Loc,
    Lastmod,
    Image,
    Other,
}

/// Which document shape to expect
#[derive(Debug, Clone, Copy)]
pub struct Shape {
    pub root: &'static str,
    pub entry: &'static str,
}

pub const URLSET: Shape = Shape {
    root: "urlset",
    entry: "url",
};

pub const SITEMAP_INDEX: Shape = Shape {
    root: "sitemapindex",
    entry: "sitemap",
};

fn in_namespace(ns: &ResolveResult, expected: &[u8]) -> bool {
    matches!(ns, ResolveResult::Bound(Namespace(n)) if *n == expected)
}

fn classify(shape: Shape, ns: &ResolveResult, local: &[u8], parent: Option<Tag>) -> Tag {
    let sitemap = in_namespace(ns, SITEMAP_NS);
    match parent {
        None if sitemap && local == shape.root.as_bytes() => Tag::Root,
        Some(Tag::Root) if sitemap && local == shape.entry.as_bytes() => Tag::Entry,
        Some(Tag::Entry) if sitemap && local == b"loc" => Tag::Loc,
        Some(Tag::Entry) if sitemap && local == b"lastmod" => Tag::Lastmod,
        Some(Tag::Entry) if in_namespace(ns, IMAGE_NS) && local == b"image" => Tag::Image,
        _ => Tag::Other,
    }
}

fn element_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.name().as_ref()).into_owned()
}

/// Reads every entry of a sitemap-shaped document
///
/// Fails when the document root is not `shape.root` in the sitemaps.org
/// namespace, when there is no root at all, or when the XML is malformed.
pub fn read_entries(body: &[u8], shape: Shape) -> Result<Vec<Entry>, FeedError> {
    let mut reader = NsReader::from_reader(body);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Tag> = Vec::new();
    let mut entries = Vec::new();
    let mut current = Entry::default();
    let mut text = String::new();
    let mut saw_root = false;

    loop {
        let (ns, event) = reader.read_resolved_event()?;
        match event {
            Event::Start(e) => {
                let tag = classify(shape, &ns, e.local_name().as_ref(), stack.last().copied());
                if stack.is_empty() {
                    if tag != Tag::Root {
                        return Err(FeedError::UnexpectedRoot {
                            expected: shape.root,
                            found: element_name(&e),
                        });
                    }
                    saw_root = true;
                }
                match tag {
                    Tag::Entry => current = Entry::default(),
                    Tag::Loc | Tag::Lastmod => text.clear(),
                    Tag::Image => current.images += 1,
                    _ => {}
                }
                stack.push(tag);
            }
            Event::Empty(e) => {
                let tag = classify(shape, &ns, e.local_name().as_ref(), stack.last().copied());
                if stack.is_empty() {
                    if tag != Tag::Root {
                        return Err(FeedError::UnexpectedRoot {
                            expected: shape.root,
                            found: element_name(&e),
                        });
                    }
                    // `<urlset/>`: a valid document without entries
                    return Ok(entries);
                }
                match tag {
                    Tag::Image => current.images += 1,
                    Tag::Entry => entries.push(Entry::default()),
                    _ => {}
                }
            }
            Event::Text(t) => {
                if matches!(stack.last(), Some(Tag::Loc | Tag::Lastmod)) {
                    text.push_str(&t.unescape()?);
                }
            }
            Event::CData(c) => {
                if matches!(stack.last(), Some(Tag::Loc | Tag::Lastmod)) {
                    text.push_str(&String::from_utf8_lossy(c.as_ref()));
                }
            }
            Event::End(_) => match stack.pop() {
                Some(Tag::Loc) => current.loc = Some(text.trim().to_string()),
                Some(Tag::Lastmod) => current.lastmod = Some(text.trim().to_string()),
                Some(Tag::Entry) => entries.push(std::mem::take(&mut current)),
                Some(Tag::Root) => break,
                _ => {}
            },
            Event::Eof => {
                if !stack.is_empty() {
                    return Err(FeedError::Truncated);
                }
                break;
            }
            _ => {}
        }
    }

    if !saw_root {
        return Err(FeedError::MissingRoot);
    }

    Ok(entries)
}
