//! Page descriptors.
//!
//! Rendering is owned by the UI layer; this crate only needs to know which
//! page a path resolves to.

use serde::Serialize;

/// Stable page identifier, known before the page bundle is loaded.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PageId(&'static str);

impl PageId {
    pub const fn new(id: &'static str) -> Self {
        Self(id)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl core::fmt::Display for PageId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.0)
    }
}

/// A loaded page implementation.
pub trait Page: Send + Sync {
    fn id(&self) -> PageId;

    fn title(&self) -> &str;
}

/// Page with nothing but an id and a title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticPage {
    id: PageId,
    title: String,
}

impl StaticPage {
    pub fn new(id: PageId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
        }
    }
}

impl Page for StaticPage {
    fn id(&self) -> PageId {
        self.id
    }

    fn title(&self) -> &str {
        &self.title
    }
}

/// The one loading placeholder shown while any page bundle is fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuspensePlaceholder {
    pub label: String,
}

impl Default for SuspensePlaceholder {
    fn default() -> Self {
        Self {
            label: "Loading…".to_string(),
        }
    }
}
