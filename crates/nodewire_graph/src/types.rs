// SPDX-License-Identifier: MIT OR Apache-2.0
//! Type descriptors and the subtype table used by the connect rules.
//!
//! Node kinds declare a runtime type; connectors declare what they accept.
//! Compatibility is a declared relation registered up-front by the
//! application, not a reflection lookup at connect time.

use serde::{Deserialize, Serialize};

/// Color for types registered without an explicit one
const DEFAULT_COLOR: [u8; 3] = [150, 150, 150];

/// Handle to a type registered in a [`TypeRegistry`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeId(u32);

/// What a connector accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AcceptedType {
    /// Accepts nodes whose declared type equals or subtypes the given type
    One(TypeId),
    /// Collection form: accepts any node whose declared type equals or
    /// subtypes the element type
    ManyOf(TypeId),
}

impl AcceptedType {
    /// The type the relation is checked against
    pub fn element(&self) -> TypeId {
        match *self {
            Self::One(t) | Self::ManyOf(t) => t,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TypeEntry {
    name: String,
    parent: Option<TypeId>,
    color: [u8; 3],
}

/// Registry of declared node types and their subtype relation.
///
/// Types form a single-inheritance hierarchy: each type has at most one
/// parent. The relation is fixed once registration is done, which surfaces
/// ill-formed type setups at registration time rather than at connect time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TypeRegistry {
    entries: Vec<TypeEntry>,
}

impl TypeRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a type with an optional parent type
    pub fn register(&mut self, name: impl Into<String>, parent: Option<TypeId>) -> TypeId {
        self.register_with_color(name, parent, DEFAULT_COLOR)
    }

    /// Register a type with a display color used for its connections
    pub fn register_with_color(
        &mut self,
        name: impl Into<String>,
        parent: Option<TypeId>,
        color: [u8; 3],
    ) -> TypeId {
        let id = TypeId(self.entries.len() as u32);
        self.entries.push(TypeEntry {
            name: name.into(),
            parent,
            color,
        });
        id
    }

    fn entry(&self, id: TypeId) -> Option<&TypeEntry> {
        self.entries.get(id.0 as usize)
    }

    /// Display name of a type. Ids minted by another registry yield a
    /// placeholder rather than a panic.
    pub fn name(&self, id: TypeId) -> &str {
        self.entry(id).map_or("<unknown>", |e| e.name.as_str())
    }

    /// Display color of a type; ids minted by another registry yield the
    /// default gray
    pub fn color(&self, id: TypeId) -> [u8; 3] {
        self.entry(id).map_or(DEFAULT_COLOR, |e| e.color)
    }

    /// Number of registered types
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no types have been registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True if `child` equals `ancestor` or is a (transitive) subtype of
    /// it. An id minted by another registry satisfies nothing but itself.
    pub fn satisfies(&self, child: TypeId, ancestor: TypeId) -> bool {
        let mut current = Some(child);
        while let Some(t) = current {
            if t == ancestor {
                return true;
            }
            current = self.entry(t).and_then(|e| e.parent);
        }
        false
    }
}
