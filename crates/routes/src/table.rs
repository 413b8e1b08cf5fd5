//! Static route table: path pattern → page + access requirement.

use std::sync::Arc;

use jobhub_auth::Access;

use crate::error::RouteError;
use crate::lazy::LazyPage;
use crate::pattern::{PathPattern, RouteParams};

#[derive(Debug)]
pub struct RouteEntry {
    pub pattern: PathPattern,
    pub page: Arc<LazyPage>,
    pub access: Access,
}

/// A path resolved against the table.
#[derive(Debug, Clone)]
pub struct RouteMatch<'a> {
    pub entry: &'a RouteEntry,
    pub params: RouteParams,
}

/// Ordered routes plus the terminal not-found page.
///
/// The first registered pattern that matches wins; overlapping patterns are
/// rejected at build time, so order only matters for readability.
#[derive(Debug)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
    not_found: Arc<LazyPage>,
}

impl RouteTable {
    pub fn builder(not_found: LazyPage) -> RouteTableBuilder {
        RouteTableBuilder {
            entries: Vec::new(),
            not_found: Arc::new(not_found),
            error: None,
        }
    }

    pub fn lookup(&self, path: &str) -> Option<RouteMatch<'_>> {
        self.entries.iter().find_map(|entry| {
            entry
                .pattern
                .matches(path)
                .map(|params| RouteMatch { entry, params })
        })
    }

    pub fn not_found(&self) -> &Arc<LazyPage> {
        &self.not_found
    }

    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }
}

/// Collects routes; the first error is reported by `build`.
#[derive(Debug)]
pub struct RouteTableBuilder {
    entries: Vec<RouteEntry>,
    not_found: Arc<LazyPage>,
    error: Option<RouteError>,
}

impl RouteTableBuilder {
    pub fn route(mut self, pattern: &str, page: LazyPage, access: Access) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.push(pattern, page, access) {
                self.error = Some(e);
            }
        }
        self
    }

    pub fn public(self, pattern: &str, page: LazyPage) -> Self {
        self.route(pattern, page, Access::Public)
    }

    fn push(&mut self, pattern: &str, page: LazyPage, access: Access) -> Result<(), RouteError> {
        let pattern = PathPattern::parse(pattern)?;

        if page.id() == self.not_found.id() {
            return Err(RouteError::NotFoundPageRouted(pattern.to_string()));
        }
        if let Some(existing) = self.entries.iter().find(|e| e.pattern.overlaps(&pattern)) {
            return Err(RouteError::DuplicatePattern {
                pattern: pattern.to_string(),
                existing: existing.pattern.to_string(),
            });
        }

        self.entries.push(RouteEntry {
            pattern,
            page: Arc::new(page),
            access,
        });
        Ok(())
    }

    pub fn build(self) -> Result<RouteTable, RouteError> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(RouteTable {
                entries: self.entries,
                not_found: self.not_found,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{PageId, StaticPage};
    use jobhub_auth::Role;

    fn page(id: &'static str) -> LazyPage {
        LazyPage::ready(Arc::new(StaticPage::new(PageId::new(id), id)))
    }

    #[test]
    fn resolves_first_matching_route() {
        let table = RouteTable::builder(page("not-found"))
            .public("/jobs", page("jobs"))
            .route("/jobs/:id", page("job"), Access::Public)
            .route("/post-job", page("post-job"), Access::Role(Role::Employer))
            .build()
            .unwrap();

        let m = table.lookup("/jobs/7").unwrap();
        assert_eq!(m.entry.page.id(), PageId::new("job"));
        assert_eq!(m.params.get("id").map(String::as_str), Some("7"));

        let gated = table.lookup("/post-job").unwrap();
        assert_eq!(gated.entry.access, Access::Role(Role::Employer));

        assert!(table.lookup("/nowhere").is_none());
    }

    #[test]
    fn rejects_overlapping_patterns() {
        let err = RouteTable::builder(page("not-found"))
            .public("/jobs/:id", page("job"))
            .public("/jobs/:slug", page("job-by-slug"))
            .build()
            .unwrap_err();
        assert!(matches!(err, RouteError::DuplicatePattern { .. }));
    }

    #[test]
    fn not_found_page_cannot_be_linked() {
        let err = RouteTable::builder(page("not-found"))
            .public("/404", page("not-found"))
            .build()
            .unwrap_err();
        assert_eq!(err, RouteError::NotFoundPageRouted("/404".to_string()));
    }

    #[test]
    fn reports_first_error() {
        let err = RouteTable::builder(page("not-found"))
            .public("bad", page("a"))
            .public("/x/:", page("b"))
            .build()
            .unwrap_err();
        assert!(matches!(err, RouteError::InvalidPattern { ref pattern, .. } if pattern == "bad"));
    }
}
