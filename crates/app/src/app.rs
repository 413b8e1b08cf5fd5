//! Application wiring: session manager + route composer.

use std::sync::Arc;

use thiserror::Error;

use jobhub_auth::SessionState;
use jobhub_infra::{
    IdentityProvider, InMemoryIdentityProvider, InMemoryProfileStore, ProfileResolver, ProfileStore,
};
use jobhub_routes::{standard_routes, RouteComposer, RouteError, View};
use jobhub_session::SessionManager;

use crate::config::AppConfig;

/// Upper bound on redirects followed by `navigate`.
const MAX_REDIRECTS: usize = 8;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid route table: {0}")]
    Routes(#[from] RouteError),

    #[error("redirect loop starting at {0}")]
    RedirectLoop(String),
}

/// Collaborators the application runs against.
#[derive(Clone)]
pub struct Services {
    pub identity: Arc<dyn IdentityProvider>,
    pub profiles: Arc<dyn ProfileStore>,
}

impl Services {
    /// In-memory wiring (dev/test).
    pub fn in_memory() -> (Self, Arc<InMemoryIdentityProvider>, Arc<InMemoryProfileStore>) {
        let identity = Arc::new(InMemoryIdentityProvider::new());
        let profiles = Arc::new(InMemoryProfileStore::new());
        let services = Self {
            identity: identity.clone(),
            profiles: profiles.clone(),
        };
        (services, identity, profiles)
    }
}

/// Where a navigation ended up.
#[derive(Debug, Clone)]
pub struct Visit {
    pub path: String,
    pub view: View,
    /// Redirect destinations followed on the way, in order.
    pub redirects: Vec<String>,
}

#[derive(Debug)]
pub struct App {
    config: AppConfig,
    session: SessionManager,
    routes: RouteComposer,
}

impl App {
    /// Start the session manager and build the route table. Must be called
    /// inside a tokio runtime.
    pub fn build(config: AppConfig, services: Services) -> Result<Self, AppError> {
        let routes = RouteComposer::new(standard_routes(config.home_variant())?);
        let session = SessionManager::start(services.identity, ProfileResolver::new(services.profiles));

        tracing::info!(
            home = ?config.home_variant(),
            routes = routes.table().entries().len(),
            "application started"
        );

        Ok(Self {
            config,
            session,
            routes,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    pub fn routes(&self) -> &RouteComposer {
        &self.routes
    }

    /// What `path` shows right now, without loading any page bundle.
    pub fn show(&self, path: &str) -> View {
        self.routes.render_now(path, &self.session.state())
    }

    /// Render `path` against the current session, following redirects.
    pub async fn navigate(&self, path: &str) -> Result<Visit, AppError> {
        let mut current = path.to_string();
        let mut redirects = Vec::new();

        loop {
            let view = self.routes.render(&current, &self.session.state()).await;
            let next = view.redirect_to().map(str::to_string);
            let Some(to) = next else {
                return Ok(Visit {
                    path: current,
                    view,
                    redirects,
                });
            };

            if redirects.len() == MAX_REDIRECTS {
                return Err(AppError::RedirectLoop(path.to_string()));
            }
            tracing::debug!(from = %current, to = %to, "following redirect");
            redirects.push(to.clone());
            current = to;
        }
    }

    /// Wait until the session satisfies `pred`.
    ///
    /// Returns the last known state if the session manager shuts down first.
    pub async fn session_where(&self, pred: impl Fn(&SessionState) -> bool) -> SessionState {
        let mut stream = self.session.watch();
        while let Some(state) = stream.recv().await {
            if pred(&state) {
                return state;
            }
        }
        self.session.state()
    }

    pub fn shutdown(&self) {
        self.session.shutdown();
    }
}
