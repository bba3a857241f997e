//! Generic labeled XML tree
//!
//! WordprocessingML fragments are parsed into a small tagged tree instead of
//! a typed document model: the EBD heuristics only need text leaves and
//! positional access to rows and cells. Attributes become `@_`-prefixed keys
//! and character data is stored under `#text`, so an element is either a
//! plain leaf (no attributes, no children) or an ordered map.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::ParseError;

/// Prefix that marks an attribute key inside a [`Node::Map`].
pub const ATTRIBUTE_PREFIX: &str = "@_";

/// Key holding an element's character data when it is stored as a map.
pub const TEXT_KEY: &str = "#text";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Leaf(String),
    List(Vec<Node>),
    /// Children in first-encountered key order. Repeated tags share one key
    /// whose value is a [`Node::List`].
    Map(Vec<(String, Node)>),
}

impl Node {
    /// Look up a child by key. Only maps have children.
    pub fn get(&self, key: &str) -> Option<&Node> {
        match self {
            Node::Map(entries) => entries
                .iter()
                .find(|(name, _)| name == key)
                .map(|(_, node)| node),
            _ => None,
        }
    }

    /// View this node as a sequence: lists yield their items, anything else
    /// yields itself.
    pub fn items(&self) -> &[Node] {
        match self {
            Node::List(items) => items,
            other => std::slice::from_ref(other),
        }
    }

    pub fn as_leaf(&self) -> Option<&str> {
        match self {
            Node::Leaf(text) => Some(text),
            _ => None,
        }
    }
}

/// Parser settings
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// Tag names that are always represented as a [`Node::List`], even when
    /// they occur only once under their parent.
    pub always_list: Vec<String>,
}

impl ParseOptions {
    pub fn with_lists<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            always_list: tags.into_iter().map(Into::into).collect(),
        }
    }

    fn is_list_tag(&self, name: &str) -> bool {
        self.always_list.iter().any(|tag| tag == name)
    }
}

/// Element under construction
struct Pending {
    name: String,
    entries: Vec<(String, Node)>,
    text: String,
    has_children: bool,
}

impl Pending {
    fn open(start: &BytesStart<'_>, position: u64) -> Result<Self, ParseError> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let mut entries = Vec::new();
        for attribute in start.attributes() {
            let attribute = attribute?;
            let key = String::from_utf8_lossy(attribute.key.as_ref());
            let value = attribute
                .unescape_value()
                .map_err(|source| ParseError::Xml { position, source })?
                .into_owned();
            entries.push((format!("{ATTRIBUTE_PREFIX}{key}"), Node::Leaf(value)));
        }
        Ok(Self {
            name,
            entries,
            text: String::new(),
            has_children: false,
        })
    }

    fn close(mut self) -> (String, Node) {
        let node = if self.entries.is_empty() && !self.has_children {
            Node::Leaf(self.text)
        } else {
            if !self.text.is_empty() {
                self.entries
                    .push((TEXT_KEY.to_string(), Node::Leaf(self.text)));
            }
            Node::Map(self.entries)
        };
        (self.name, node)
    }

    fn push_child(&mut self, name: String, node: Node, options: &ParseOptions) {
        self.has_children = true;
        insert_child(&mut self.entries, name, node, options);
    }
}

fn insert_child(entries: &mut Vec<(String, Node)>, name: String, node: Node, options: &ParseOptions) {
    match entries.iter_mut().find(|(key, _)| *key == name) {
        Some((_, Node::List(items))) => items.push(node),
        Some((_, existing)) => {
            let first = std::mem::replace(existing, Node::List(Vec::new()));
            *existing = Node::List(vec![first, node]);
        }
        None => {
            let value = if options.is_list_tag(&name) {
                Node::List(vec![node])
            } else {
                node
            };
            entries.push((name, value));
        }
    }
}

/// Parse an XML document or fragment into a [`Node::Map`] of its top-level
/// elements.
///
/// The input may be a single paragraph or table cut out of a larger
/// document: namespace prefixes are not resolved, so undeclared prefixes are
/// fine. Unbalanced input is an error.
pub fn parse_fragment(xml: &str, options: &ParseOptions) -> Result<Node, ParseError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false); // Don't trim to preserve spacing

    let mut root: Vec<(String, Node)> = Vec::new();
    let mut stack: Vec<Pending> = Vec::new();
    let mut buf = Vec::new();

    loop {
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|source| ParseError::Xml {
                position: reader.buffer_position(),
                source,
            })?;

        match event {
            Event::Start(ref e) => stack.push(Pending::open(e, reader.buffer_position())?),
            Event::Empty(ref e) => {
                let (name, node) = Pending::open(e, reader.buffer_position())?.close();
                attach(&mut stack, &mut root, name, node, options);
            }
            Event::End(_) => {
                // quick-xml checks that end names match their start tags
                if let Some(pending) = stack.pop() {
                    let (name, node) = pending.close();
                    attach(&mut stack, &mut root, name, node, options);
                }
            }
            Event::Text(ref e) => {
                if let Some(pending) = stack.last_mut() {
                    let text = e.unescape().map_err(|source| ParseError::Xml {
                        position: reader.buffer_position(),
                        source,
                    })?;
                    pending.text.push_str(&text);
                }
            }
            Event::CData(ref e) => {
                if let Some(pending) = stack.last_mut() {
                    pending.text.push_str(&String::from_utf8_lossy(e));
                }
            }
            Event::Eof => break,
            // Declarations, comments, processing instructions, doctype
            _ => {}
        }
        buf.clear();
    }

    if let Some(pending) = stack.pop() {
        return Err(ParseError::Unclosed(pending.name));
    }
    if root.is_empty() {
        return Err(ParseError::Empty);
    }
    Ok(Node::Map(root))
}

fn attach(
    stack: &mut [Pending],
    root: &mut Vec<(String, Node)>,
    name: String,
    node: Node,
    options: &ParseOptions,
) {
    match stack.last_mut() {
        Some(parent) => parent.push_child(name, node, options),
        None => insert_child(root, name, node, options),
    }
}
