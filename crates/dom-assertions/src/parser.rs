//! Scoped DOM query layer over `scraper`.
//!
//! A [`ScopedParser`] owns a shared, immutable parsed document plus an
//! optional scope root. Re-scoping never mutates a document: it produces a
//! parser pointing at a different node of the same (shared) document, or at
//! a freshly parsed fragment.

use std::fmt;
use std::rc::Rc;
use std::sync::OnceLock;

use ego_tree::NodeId;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::result::{DomError, DomResult};

/// Original markup together with its parsed tree
pub struct ParsedDocument {
    content: String,
    html: Html,
}

impl ParsedDocument {
    /// Parse a markup string
    #[must_use]
    pub fn parse(content: impl Into<String>) -> Self {
        let content = content.into();
        let html = Html::parse_document(&content);
        Self::from_html(content, html)
    }

    /// Parse a markup fragment, e.g. a single element's outer HTML
    #[must_use]
    pub fn parse_fragment(content: impl Into<String>) -> Self {
        let content = content.into();
        let html = Html::parse_fragment(&content);
        Self::from_html(content, html)
    }

    fn from_html(content: String, html: Html) -> Self {
        debug!(
            bytes = content.len(),
            recovered_errors = html.errors.len(),
            "parsed markup"
        );
        Self { content, html }
    }

    /// The markup this document was parsed from
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    fn element(&self, id: NodeId) -> Option<ElementRef<'_>> {
        self.html.tree.get(id).and_then(ElementRef::wrap)
    }
}

impl fmt::Debug for ParsedDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParsedDocument")
            .field("content_len", &self.content.len())
            .finish_non_exhaustive()
    }
}

/// Reference to a single matched element.
///
/// A handle carries the document it was found in, so it can never point
/// into a different tree.
#[derive(Debug, Clone)]
pub struct ElementHandle {
    document: Rc<ParsedDocument>,
    id: NodeId,
}

impl ElementHandle {
    fn new(document: &Rc<ParsedDocument>, element: ElementRef<'_>) -> Self {
        Self {
            document: Rc::clone(document),
            id: element.id(),
        }
    }

    fn element(&self) -> Option<ElementRef<'_>> {
        self.document.element(self.id)
    }

    /// Element type (local tag name)
    #[must_use]
    pub fn name(&self) -> String {
        self.element()
            .map(|el| el.value().name().to_string())
            .unwrap_or_default()
    }

    /// Raw attribute value
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<String> {
        self.element()
            .and_then(|el| el.value().attr(name).map(str::to_string))
    }

    /// Raw attributes
    #[must_use]
    pub fn attributes(&self) -> Vec<(String, String)> {
        self.element()
            .map(|el| {
                el.value()
                    .attrs()
                    .map(|(name, value)| (name.to_string(), value.to_string()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Concatenated text content
    #[must_use]
    pub fn text(&self) -> String {
        self.element()
            .map(|el| el.text().collect())
            .unwrap_or_default()
    }

    /// Whether both handles point at the same node of the same document
    #[must_use]
    pub fn same_node(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.document, &other.document) && self.id == other.id
    }
}

/// Selector queries relative to a scope root
#[derive(Debug, Clone)]
pub struct ScopedParser {
    document: Rc<ParsedDocument>,
    root: Option<NodeId>,
}

impl ScopedParser {
    /// Parse markup into a whole-document parser
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            document: Rc::new(ParsedDocument::parse(content)),
            root: None,
        }
    }

    /// A parser scoped to `handle` within the handle's own document
    #[must_use]
    pub fn from_handle(handle: &ElementHandle) -> Self {
        Self {
            document: Rc::clone(&handle.document),
            root: Some(handle.id),
        }
    }

    /// A parser scoped to the leading element of a markup fragment
    pub fn from_fragment(fragment: &str) -> DomResult<Self> {
        let (document, root) = parse_fragment_root(fragment)?;
        Ok(Self {
            document,
            root: Some(root),
        })
    }

    /// The original markup of the current document
    #[must_use]
    pub fn content(&self) -> &str {
        self.document.content()
    }

    /// A parser over the same document with no root set
    #[must_use]
    pub fn clone_from_root(&self) -> Self {
        Self {
            document: Rc::clone(&self.document),
            root: None,
        }
    }

    /// A parser over the same document, scoped to `handle`
    #[must_use]
    pub fn scoped_to(&self, handle: &ElementHandle) -> Self {
        let mut scoped = self.clone_from_root();
        scoped.set_root(handle);
        scoped
    }

    /// Narrow subsequent queries to `handle`
    pub fn set_root(&mut self, handle: &ElementHandle) {
        debug!(root = %handle.name(), "re-rooting scope");
        self.document = Rc::clone(&handle.document);
        self.root = Some(handle.id);
    }

    /// Narrow subsequent queries to the leading element of a parsed
    /// fragment. The scope is left untouched when the fragment holds no
    /// element.
    pub fn set_root_from_string(&mut self, fragment: &str) -> DomResult<()> {
        let (document, root) = parse_fragment_root(fragment)?;
        self.document = document;
        self.root = Some(root);
        Ok(())
    }

    /// The current root, if one is set
    #[must_use]
    pub fn root(&self) -> Option<ElementHandle> {
        self.root.map(|id| ElementHandle {
            document: Rc::clone(&self.document),
            id,
        })
    }

    fn root_element(&self) -> ElementRef<'_> {
        self.root
            .and_then(|id| self.document.element(id))
            .unwrap_or_else(|| self.document.html.root_element())
    }

    fn selector(selector: &str) -> DomResult<Selector> {
        Selector::parse(selector).map_err(|err| DomError::InvalidSelector {
            selector: selector.to_string(),
            message: err.to_string(),
        })
    }

    /// First element matching `selector` below the root
    pub fn query(&self, selector: &str) -> DomResult<Option<ElementHandle>> {
        let parsed = Self::selector(selector)?;
        let found = match self.root {
            Some(_) => self.root_element().select(&parsed).next(),
            None => self.document.html.select(&parsed).next(),
        };
        Ok(found.map(|el| ElementHandle::new(&self.document, el)))
    }

    /// Every element matching `selector` below the root, in document order
    pub fn query_all(&self, selector: &str) -> DomResult<Vec<ElementHandle>> {
        let parsed = Self::selector(selector)?;
        let handles = match self.root {
            Some(_) => self
                .root_element()
                .select(&parsed)
                .map(|el| ElementHandle::new(&self.document, el))
                .collect(),
            None => self
                .document
                .html
                .select(&parsed)
                .map(|el| ElementHandle::new(&self.document, el))
                .collect(),
        };
        Ok(handles)
    }

    /// Raw attribute lookup on any handle
    #[must_use]
    pub fn get_attribute_for(&self, handle: &ElementHandle, name: &str) -> Option<String> {
        handle.attribute(name)
    }

    /// Raw attributes of any handle
    #[must_use]
    pub fn attributes_for(&self, handle: &ElementHandle) -> Vec<(String, String)> {
        handle.attributes()
    }

    /// Raw attribute lookup on the root
    #[must_use]
    pub fn get_attribute_for_root(&self, name: &str) -> Option<String> {
        self.root_element().value().attr(name).map(str::to_string)
    }

    /// Whether the root carries the attribute
    #[must_use]
    pub fn has_attribute_for_root(&self, name: &str) -> bool {
        self.root_element().value().attr(name).is_some()
    }

    /// Text content of the root
    #[must_use]
    pub fn get_text(&self) -> String {
        self.root_element().text().collect()
    }

    /// Element type of the root
    #[must_use]
    pub fn get_type(&self) -> String {
        self.root_element().value().name().to_string()
    }
}

/// Where a fragment is parsed. Table parts such as `<tr>` or `<td>` are
/// dropped in body context and `<html>`/`<body>` only survive as a document.
#[derive(Debug, Clone, Copy)]
enum FragmentContext {
    Body,
    Table,
    Document,
}

impl FragmentContext {
    const ALL: [Self; 3] = [Self::Body, Self::Table, Self::Document];

    fn parse(self, fragment: &str) -> ParsedDocument {
        match self {
            Self::Body => ParsedDocument::parse_fragment(fragment),
            Self::Table => ParsedDocument::from_html(
                fragment.to_string(),
                Html::parse_fragment(&format!("<table>{fragment}</table>")),
            ),
            Self::Document => ParsedDocument::parse(fragment),
        }
    }

    /// First element named `tag`. Fragment parses wrap everything in a
    /// synthetic `<html>` which never counts.
    fn find(self, document: &ParsedDocument, tag: &str) -> Option<NodeId> {
        let skip = usize::from(!matches!(self, Self::Document));
        document
            .html
            .root_element()
            .descendants()
            .skip(skip)
            .filter_map(ElementRef::wrap)
            .find(|el| el.value().name().eq_ignore_ascii_case(tag))
            .map(|el| el.id())
    }
}

/// Tag name of the first start tag in `fragment`
#[allow(clippy::expect_used)]
fn leading_tag(fragment: &str) -> Option<&str> {
    static START_TAG: OnceLock<Regex> = OnceLock::new();
    START_TAG
        .get_or_init(|| Regex::new(r"<([A-Za-z][A-Za-z0-9:-]*)").expect("valid pattern"))
        .captures(fragment)
        .and_then(|caps| caps.get(1))
        .map(|tag| tag.as_str())
}

fn parse_fragment_root(fragment: &str) -> DomResult<(Rc<ParsedDocument>, NodeId)> {
    let invalid = || DomError::InvalidFragment {
        fragment: fragment.to_string(),
    };
    let tag = leading_tag(fragment).ok_or_else(invalid)?;

    for context in FragmentContext::ALL {
        let document = context.parse(fragment);
        if let Some(root) = context.find(&document, tag) {
            debug!(?context, tag, "rooted fragment");
            return Ok((Rc::new(document), root));
        }
    }
    Err(invalid())
}
