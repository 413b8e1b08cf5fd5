//! Route composition: path + session → what to show.
//!
//! Public routes render regardless of the session. Every other route goes
//! through the authorization gate with its requirement. Pages that are not
//! loaded yet show the composer's single shared placeholder.

use std::sync::Arc;

use jobhub_auth::{explain, GateDecision, RedirectTarget, SessionState};

use crate::lazy::LazyPage;
use crate::page::{Page, SuspensePlaceholder};
use crate::pattern::RouteParams;
use crate::table::RouteTable;

pub const LOGIN_PATH: &str = "/login";
pub const DASHBOARD_PATH: &str = "/dashboard";

/// Fixed redirect destinations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub login: String,
    /// Where signed-in viewers go when a route is not for them.
    pub fallback: String,
}

impl Navigation {
    pub fn path_for(&self, target: RedirectTarget) -> &str {
        match target {
            RedirectTarget::Login => &self.login,
            RedirectTarget::Fallback => &self.fallback,
        }
    }
}

impl Default for Navigation {
    fn default() -> Self {
        Self {
            login: LOGIN_PATH.to_string(),
            fallback: DASHBOARD_PATH.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub target: RedirectTarget,
    pub to: String,
}

/// Routing decision before any page bundle is touched.
#[derive(Debug, Clone)]
pub enum Resolution {
    /// Session still loading; the gate shows its waiting indicator.
    Wait,
    Redirect(Redirect),
    Mount {
        page: Arc<LazyPage>,
        params: RouteParams,
    },
    NotFound(Arc<LazyPage>),
}

/// What the shell should display.
#[derive(Clone)]
pub enum View {
    Waiting,
    /// Page bundle still loading.
    Suspended(Arc<SuspensePlaceholder>),
    Redirect(Redirect),
    Page {
        page: Arc<dyn Page>,
        params: RouteParams,
    },
    NotFound(Arc<dyn Page>),
}

impl View {
    pub fn redirect_to(&self) -> Option<&str> {
        match self {
            View::Redirect(r) => Some(&r.to),
            _ => None,
        }
    }

    /// Title of the page being shown, if any.
    pub fn page_title(&self) -> Option<&str> {
        match self {
            View::Page { page, .. } | View::NotFound(page) => Some(page.title()),
            _ => None,
        }
    }
}

impl core::fmt::Debug for View {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            View::Waiting => f.write_str("Waiting"),
            View::Suspended(p) => f.debug_tuple("Suspended").field(&p.label).finish(),
            View::Redirect(r) => f.debug_tuple("Redirect").field(&r.to).finish(),
            View::Page { page, params } => f
                .debug_struct("Page")
                .field("id", &page.id())
                .field("params", params)
                .finish(),
            View::NotFound(page) => f.debug_tuple("NotFound").field(&page.id()).finish(),
        }
    }
}

#[derive(Debug)]
pub struct RouteComposer {
    table: RouteTable,
    navigation: Navigation,
    placeholder: Arc<SuspensePlaceholder>,
}

impl RouteComposer {
    pub fn new(table: RouteTable) -> Self {
        Self::with_navigation(table, Navigation::default())
    }

    pub fn with_navigation(table: RouteTable, navigation: Navigation) -> Self {
        Self {
            table,
            navigation,
            placeholder: Arc::new(SuspensePlaceholder::default()),
        }
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    pub fn placeholder(&self) -> &Arc<SuspensePlaceholder> {
        &self.placeholder
    }

    /// Match `path` and run the gate for protected routes.
    pub fn resolve(&self, path: &str, session: &SessionState) -> Resolution {
        let Some(matched) = self.table.lookup(path) else {
            tracing::debug!(path, "no route matched");
            return Resolution::NotFound(self.table.not_found().clone());
        };

        let entry = matched.entry;
        let Some(requirement) = entry.access.requirement() else {
            return Resolution::Mount {
                page: entry.page.clone(),
                params: matched.params,
            };
        };

        let explanation = explain(session, &requirement);
        match explanation.decision {
            GateDecision::Wait => Resolution::Wait,
            GateDecision::Render => Resolution::Mount {
                page: entry.page.clone(),
                params: matched.params,
            },
            GateDecision::Redirect(target) => {
                let to = self.navigation.path_for(target).to_string();
                tracing::debug!(
                    path,
                    pattern = %entry.pattern,
                    reason = %explanation.message(),
                    to = %to,
                    "route redirected"
                );
                Resolution::Redirect(Redirect { target, to })
            }
        }
    }

    /// Non-blocking render: pages that are not loaded yet show the shared
    /// placeholder.
    pub fn render_now(&self, path: &str, session: &SessionState) -> View {
        match self.resolve(path, session) {
            Resolution::Wait => View::Waiting,
            Resolution::Redirect(r) => View::Redirect(r),
            Resolution::Mount { page, params } => match page.get() {
                Some(page) => View::Page { page, params },
                None => View::Suspended(self.placeholder.clone()),
            },
            Resolution::NotFound(page) => match page.get() {
                Some(page) => View::NotFound(page),
                None => View::Suspended(self.placeholder.clone()),
            },
        }
    }

    /// Render, loading the page bundle first if needed.
    pub async fn render(&self, path: &str, session: &SessionState) -> View {
        match self.resolve(path, session) {
            Resolution::Wait => View::Waiting,
            Resolution::Redirect(r) => View::Redirect(r),
            Resolution::Mount { page, params } => View::Page {
                page: page.load().await,
                params,
            },
            Resolution::NotFound(page) => View::NotFound(page.load().await),
        }
    }
}
