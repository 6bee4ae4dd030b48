//! Resource path chains.
//!
//! # Design
//! A `PathSegment` is a node in a singly linked, forward-only list. Each node
//! optionally holds a value (a literal identifier or a collection name) and
//! exclusively owns the rest of the chain. Chains are built by value:
//! `chain` consumes the head and hands it back, so a chain in progress always
//! has exactly one owner and cannot leak segments into another request.
//!
//! Values are stored raw. `render` joins them unchanged; `render_encoded`
//! percent-encodes literals for use in a URL.

use std::fmt;

use crate::error::ClientError;
use crate::resource::{collection_name, Resource};

/// The value carried by a single node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// An identifier, stored as given.
    Literal(String),
    /// A collection name derived from a `Resource`.
    Collection(String),
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Literal(value) | Segment::Collection(value) => f.write_str(value),
        }
    }
}

/// One node of a resource path chain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathSegment {
    value: Option<Segment>,
    next: Option<Box<PathSegment>>,
}

impl PathSegment {
    /// A node without a value. This is the head of every request chain.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A literal node holding `value`'s `Display` form.
    pub fn literal(value: impl fmt::Display) -> Self {
        Self::with_value(Segment::Literal(value.to_string()))
    }

    /// A collection node named after `R`.
    pub fn collection<R: Resource + ?Sized>() -> Self {
        Self::with_value(Segment::Collection(collection_name::<R>()))
    }

    /// A collection node with an explicit name.
    pub fn collection_named(name: impl Into<String>) -> Self {
        Self::with_value(Segment::Collection(name.into()))
    }

    fn with_value(value: Segment) -> Self {
        Self {
            value: Some(value),
            next: None,
        }
    }

    pub fn value(&self) -> Option<&Segment> {
        self.value.as_ref()
    }

    pub fn next(&self) -> Option<&PathSegment> {
        self.next.as_deref()
    }

    /// Attach `link` at the tail of the chain and return the head.
    pub fn chain(mut self, link: PathSegment) -> Self {
        self.append(link);
        self
    }

    fn append(&mut self, link: PathSegment) {
        let mut tail = &mut self.next;
        while let Some(node) = tail {
            tail = &mut node.next;
        }
        *tail = Some(Box::new(link));
    }

    fn nodes(&self) -> impl Iterator<Item = &PathSegment> {
        std::iter::successors(Some(self), |node| node.next())
    }

    /// Number of nodes that carry a value.
    pub fn len(&self) -> usize {
        self.nodes().filter(|node| node.value.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Join the chain's values with `/`, skipping nodes without a value.
    ///
    /// Fails with `ClientError::PathRender` when the last node has no value.
    pub fn render(&self) -> Result<String, ClientError> {
        self.join(|segment| segment.to_string())
    }

    /// Like `render`, with every literal percent-encoded so an identifier
    /// always stays a single path level.
    pub fn render_encoded(&self) -> Result<String, ClientError> {
        self.join(|segment| match segment {
            Segment::Literal(value) => urlencoding::encode(value).into_owned(),
            Segment::Collection(name) => name.clone(),
        })
    }

    fn join(&self, mut render: impl FnMut(&Segment) -> String) -> Result<String, ClientError> {
        let tail = self.nodes().last().unwrap_or(self);
        if tail.value.is_none() {
            return Err(ClientError::PathRender);
        }
        Ok(self
            .nodes()
            .filter_map(|node| node.value.as_ref())
            .map(&mut render)
            .collect::<Vec<_>>()
            .join("/"))
    }
}

// Unlink iteratively so long chains don't recurse on drop.
impl Drop for PathSegment {
    fn drop(&mut self) {
        let mut next = self.next.take();
        while let Some(mut node) = next {
            next = node.next.take();
        }
    }
}
