use anyhow::Context;

use jobhub_auth::{ProfileFields, Role, SessionState};
use jobhub_app::{App, AppConfig, Services};

const DEMO_SECRET: &str = "correct-horse";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    jobhub_observability::init();

    let config = AppConfig::from_env();
    let (services, _identity, _profiles) = Services::in_memory();
    let app = App::build(config, services).context("failed to build application")?;

    app.session_where(SessionState::is_settled).await;
    tour(&app, "anonymous").await?;

    for (email, role, name) in [
        ("erin@example.com", Role::Employer, "Erin's Bakery"),
        ("wade@example.com", Role::Worker, "Wade"),
    ] {
        let principal = app
            .session()
            .register(email, DEMO_SECRET, ProfileFields::new(role, name))
            .await
            .with_context(|| format!("failed to register {email}"))?;

        app.session_where(|s| {
            s.is_settled() && s.principal().map(|p| p.id) == Some(principal.id) && s.profile().is_some()
        })
        .await;
        tour(&app, role.as_str()).await?;

        app.session().logout().await.context("failed to sign out")?;
    }

    app.session()
        .login("erin@example.com", DEMO_SECRET)
        .await
        .context("failed to sign back in")?;
    let state = app
        .session_where(|s| s.is_settled() && s.profile().is_some())
        .await;
    tracing::info!(role = ?state.role(), "signed back in");

    app.shutdown();
    Ok(())
}

async fn tour(app: &App, viewer: &str) -> anyhow::Result<()> {
    for path in ["/", "/jobs/42", "/dashboard", "/post-job", "/certifications", "/admin", "/nowhere"] {
        let visit = app
            .navigate(path)
            .await
            .with_context(|| format!("navigation to {path} failed"))?;
        tracing::info!(
            viewer,
            requested = path,
            shown = %visit.path,
            title = visit.view.page_title().unwrap_or("-"),
            redirects = visit.redirects.len(),
            "visited"
        );
    }
    Ok(())
}
