//! `jobhub-routes`: route table and composition.
//!
//! Maps URL paths to deferred-loaded pages, wraps protected paths with the
//! authorization gate and exposes one shared loading placeholder.

pub mod composer;
pub mod error;
pub mod lazy;
pub mod page;
pub mod pattern;
pub mod standard;
pub mod table;

pub use composer::{Navigation, Redirect, Resolution, RouteComposer, View, DASHBOARD_PATH, LOGIN_PATH};
pub use error::RouteError;
pub use lazy::LazyPage;
pub use page::{Page, PageId, StaticPage, SuspensePlaceholder};
pub use pattern::{PathPattern, RouteParams};
pub use standard::{pages, standard_routes, HomeVariant};
pub use table::{RouteEntry, RouteMatch, RouteTable, RouteTableBuilder};
