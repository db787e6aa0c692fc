use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::DashError;

/// An owned XML element. Names are local names, so `<mpd:Period>` and `<Period>` look alike.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlElement>,
    pub text: String,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        XmlElement { name: name.into(), ..Default::default() }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.iter().find(|(key, _)| key == name).map(|(_, value)| value.as_str())
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    /// Direct children with the given local name, in document order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.children.iter().filter(move |child| child.name == name)
    }

    pub fn first_child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|child| child.name == name)
    }

    /// Every descendant with the given local name, depth-first in document order.
    pub fn descendants_named(&self, name: &str) -> Vec<&XmlElement> {
        let mut found = Vec::new();
        let mut stack: Vec<&XmlElement> = self.children.iter().rev().collect();
        while let Some(node) = stack.pop() {
            if node.name == name {
                found.push(node);
            }
            stack.extend(node.children.iter().rev());
        }
        found
    }

    pub fn trimmed_text(&self) -> &str {
        self.text.trim()
    }
}

/// Turns manifest text into an element tree.
///
/// The resolver and the DASH validator only see this trait, so callers can bring their own
/// parser (or none at all).
pub trait MpdTreeParser: Send + Sync {
    fn parse(&self, text: &str) -> Result<XmlElement, DashError>;
}

/// Default nesting limit for [`QuickXmlParser`]. Real MPDs stay well under ten levels.
pub const DEFAULT_MAX_XML_DEPTH: usize = 256;

/// [`MpdTreeParser`] backed by quick-xml.
///
/// Documents nested deeper than `max_depth` elements are rejected with
/// [`DashError::TooDeep`], which keeps the owned tree shallow enough to drop safely.
#[derive(Debug, Clone, Copy)]
pub struct QuickXmlParser {
    pub max_depth: usize,
}

impl QuickXmlParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_depth(max_depth: usize) -> Self {
        QuickXmlParser { max_depth }
    }

    fn check_depth(&self, open: usize) -> Result<(), DashError> {
        if open + 1 > self.max_depth {
            return Err(DashError::TooDeep(self.max_depth));
        }
        Ok(())
    }
}

impl Default for QuickXmlParser {
    fn default() -> Self {
        QuickXmlParser { max_depth: DEFAULT_MAX_XML_DEPTH }
    }
}

impl MpdTreeParser for QuickXmlParser {
    fn parse(&self, text: &str) -> Result<XmlElement, DashError> {
        let mut reader = Reader::from_str(text);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<XmlElement> = Vec::new();
        let mut root: Option<XmlElement> = None;

        loop {
            let event = reader
                .read_event()
                .map_err(|err| DashError::Syntax(format!("{} at byte {}", err, reader.error_position())))?;

            match event {
                Event::Start(ref e) => {
                    self.check_depth(stack.len())?;
                    stack.push(open_element(e)?);
                }
                Event::Empty(ref e) => {
                    self.check_depth(stack.len())?;
                    let element = open_element(e)?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::End(_) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| DashError::Syntax("closing tag without an open element".to_string()))?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::Text(ref e) => {
                    let content = e.unescape().map_err(|err| DashError::Syntax(err.to_string()))?;
                    push_text(&mut stack, &content)?;
                }
                Event::CData(ref e) => {
                    let content = String::from_utf8_lossy(e);
                    push_text(&mut stack, &content)?;
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(open) = stack.last() {
            return Err(DashError::Syntax(format!("element <{}> is never closed", open.name)));
        }
        root.ok_or(DashError::NoRoot)
    }
}

fn open_element(start: &BytesStart<'_>) -> Result<XmlElement, DashError> {
    let mut element = XmlElement::new(String::from_utf8_lossy(start.local_name().as_ref()));
    for attr in start.attributes() {
        let attr = attr.map_err(|err| DashError::Syntax(err.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
        let value = attr.unescape_value().map_err(|err| DashError::Syntax(err.to_string()))?;
        element.attributes.push((key, value.into_owned()));
    }
    Ok(element)
}

fn attach(stack: &mut [XmlElement], root: &mut Option<XmlElement>, element: XmlElement) -> Result<(), DashError> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_some() => {
            return Err(DashError::Syntax(format!("second root element <{}>", element.name)));
        }
        None => *root = Some(element),
    }
    Ok(())
}

fn push_text(stack: &mut [XmlElement], content: &str) -> Result<(), DashError> {
    match stack.last_mut() {
        Some(parent) => parent.text.push_str(content),
        None if content.trim().is_empty() => {}
        None => return Err(DashError::Syntax("text outside the root element".to_string())),
    }
    Ok(())
}
