//! The application's route table.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use jobhub_auth::{Access, Role};

use crate::composer::{DASHBOARD_PATH, LOGIN_PATH};
use crate::error::RouteError;
use crate::lazy::LazyPage;
use crate::page::{Page, PageId, StaticPage};
use crate::table::RouteTable;

pub mod pages {
    use crate::page::PageId;

    pub const HOME_OPTIMIZED: PageId = PageId::new("home-optimized");
    pub const HOME_CLASSIC: PageId = PageId::new("home-classic");
    pub const LOGIN: PageId = PageId::new("login");
    pub const REGISTER: PageId = PageId::new("register");
    pub const JOBS: PageId = PageId::new("jobs");
    pub const JOB_DETAIL: PageId = PageId::new("job-detail");
    pub const DASHBOARD: PageId = PageId::new("dashboard");
    pub const PROFILE: PageId = PageId::new("profile");
    pub const WORKERS: PageId = PageId::new("workers");
    pub const WORKER_DETAIL: PageId = PageId::new("worker-detail");
    pub const POST_JOB: PageId = PageId::new("post-job");
    pub const CERTIFICATIONS: PageId = PageId::new("certifications");
    pub const ADMIN: PageId = PageId::new("admin");
    pub const NOT_FOUND: PageId = PageId::new("not-found");
}

/// Which implementation backs the root page. Routing is identical for both.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HomeVariant {
    #[default]
    Optimized,
    Classic,
}

impl HomeVariant {
    pub fn from_flag(optimized: bool) -> Self {
        if optimized {
            HomeVariant::Optimized
        } else {
            HomeVariant::Classic
        }
    }

    fn page(self) -> LazyPage {
        match self {
            HomeVariant::Optimized => deferred(pages::HOME_OPTIMIZED, "Find work that fits"),
            HomeVariant::Classic => deferred(pages::HOME_CLASSIC, "Find work that fits"),
        }
    }
}

fn deferred(id: PageId, title: &'static str) -> LazyPage {
    LazyPage::new(id, move || async move {
        Arc::new(StaticPage::new(id, title)) as Arc<dyn Page>
    })
}

/// Build the standard table.
///
/// | path               | access             |
/// |--------------------|--------------------|
/// | `/`, `/login`, `/register`, `/jobs`, `/jobs/:id` | public |
/// | `/dashboard`, `/profile`, `/workers/:id` | any signed-in viewer |
/// | `/workers`, `/post-job` | employer |
/// | `/certifications`  | worker             |
/// | `/admin`           | admin              |
pub fn standard_routes(home: HomeVariant) -> Result<RouteTable, RouteError> {
    RouteTable::builder(deferred(pages::NOT_FOUND, "Page not found"))
        .public("/", home.page())
        .public(LOGIN_PATH, deferred(pages::LOGIN, "Sign in"))
        .public("/register", deferred(pages::REGISTER, "Create an account"))
        .public("/jobs", deferred(pages::JOBS, "Open positions"))
        .public("/jobs/:id", deferred(pages::JOB_DETAIL, "Job details"))
        .route(DASHBOARD_PATH, deferred(pages::DASHBOARD, "Dashboard"), Access::Authenticated)
        .route("/profile", deferred(pages::PROFILE, "My profile"), Access::Authenticated)
        .route("/workers", deferred(pages::WORKERS, "Workers"), Access::Role(Role::Employer))
        .route("/workers/:id", deferred(pages::WORKER_DETAIL, "Worker"), Access::Authenticated)
        .route("/post-job", deferred(pages::POST_JOB, "Post a job"), Access::Role(Role::Employer))
        .route(
            "/certifications",
            deferred(pages::CERTIFICATIONS, "My certifications"),
            Access::Role(Role::Worker),
        )
        .route("/admin", deferred(pages::ADMIN, "Administration"), Access::Role(Role::Admin))
        .build()
}
