use std::sync::Arc;
use std::time::Duration;

use jobhub_app::{App, AppConfig, Services};
use jobhub_auth::{AuthError, ProfileFields, Role, SessionState};
use jobhub_core::{Email, ValidationError};
use jobhub_infra::{InMemoryIdentityProvider, InMemoryProfileStore, ProfileResolver};
use jobhub_routes::{pages, View};
use serde_json::json;

const SECRET: &str = "s3cret!";

async fn until(app: &App, pred: impl Fn(&SessionState) -> bool) -> SessionState {
    tokio::time::timeout(Duration::from_secs(2), app.session_where(pred))
        .await
        .expect("timed out waiting for session state")
}

async fn let_tasks_run() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}

/// Register `email` with `role` and wait until its profile is visible.
async fn register_as(app: &App, email: &str, role: Role) {
    let principal = app
        .session()
        .register(email, SECRET, ProfileFields::new(role, email))
        .await
        .expect("registration failed");

    until(app, |s| {
        s.is_settled() && s.principal().map(|p| p.id) == Some(principal.id) && s.profile().is_some()
    })
    .await;
}

async fn landing(app: &App, path: &str) -> (String, View) {
    let visit = app.navigate(path).await.expect("navigation failed");
    (visit.path, visit.view)
}

fn shows(view: &View, id: jobhub_routes::PageId) -> bool {
    matches!(view, View::Page { page, .. } if page.id() == id)
}

#[tokio::test]
async fn post_job_is_for_employers_only() {
    let (services, _, _) = Services::in_memory();
    let app = App::build(AppConfig::default(), services).unwrap();
    until(&app, SessionState::is_settled).await;

    // Nobody signed in.
    let (path, view) = landing(&app, "/post-job").await;
    assert_eq!(path, "/login");
    assert!(shows(&view, pages::LOGIN));

    // Worker: bounced to the dashboard, never to login.
    register_as(&app, "wade@example.com", Role::Worker).await;
    let visit = app.navigate("/post-job").await.unwrap();
    assert_eq!(visit.redirects, vec!["/dashboard".to_string()]);
    assert!(shows(&visit.view, pages::DASHBOARD));
    app.session().logout().await.unwrap();

    // Employer: the page renders in place.
    register_as(&app, "erin@example.com", Role::Employer).await;
    let visit = app.navigate("/post-job").await.unwrap();
    assert!(visit.redirects.is_empty());
    assert!(shows(&visit.view, pages::POST_JOB));
}

#[tokio::test]
async fn logout_is_signed_out_before_it_returns() {
    let (services, _, _) = Services::in_memory();
    let app = App::build(AppConfig::default(), services).unwrap();
    register_as(&app, "erin@example.com", Role::Employer).await;

    app.session().logout().await.unwrap();
    assert_eq!(app.session().state(), SessionState::signed_out());

    let (path, _) = landing(&app, "/workers").await;
    assert_eq!(path, "/login");
}

#[tokio::test]
async fn sign_out_during_profile_lookup_ends_signed_out() {
    let (services, idp, profiles) = Services::in_memory();
    let ann = idp
        .add_account(&Email::parse("ann@example.com").unwrap(), SECRET)
        .unwrap();
    ProfileResolver::new(profiles.clone())
        .write(ann.id, ProfileFields::new(Role::Employer, "Ann"))
        .await
        .unwrap();

    let app = App::build(AppConfig::default(), services).unwrap();
    until(&app, SessionState::is_settled).await;

    profiles.hold_lookups();
    app.session().login("ann@example.com", SECRET).await.unwrap();
    until(&app, |s| s.principal().is_some() && s.loading()).await;
    assert!(matches!(app.show("/post-job"), View::Waiting));

    app.session().logout().await.unwrap();
    profiles.release_lookups();
    let_tasks_run().await;

    assert_eq!(app.session().state(), SessionState::signed_out());
    let (path, _) = landing(&app, "/post-job").await;
    assert_eq!(path, "/login");
}

#[tokio::test]
async fn failed_profile_write_leaves_a_signed_in_viewer_without_role() {
    let (services, _, profiles) = Services::in_memory();
    let app = App::build(AppConfig::default(), services).unwrap();
    until(&app, SessionState::is_settled).await;

    profiles.set_fail_writes(true);
    let result = app
        .session()
        .register("wade@example.com", SECRET, ProfileFields::new(Role::Worker, "Wade"))
        .await;
    assert!(matches!(result, Err(AuthError::ProfileWriteFailed(_))));

    let state = until(&app, |s| s.is_settled() && s.principal().is_some()).await;
    assert!(state.profile().is_none());

    // Any-signed-in routes still render.
    let (path, view) = landing(&app, "/dashboard").await;
    assert_eq!(path, "/dashboard");
    assert!(shows(&view, pages::DASHBOARD));

    // Role routes fall back to the dashboard, even the worker's own.
    for gated in ["/certifications", "/post-job", "/admin"] {
        let (path, _) = landing(&app, gated).await;
        assert_eq!(path, "/dashboard", "{gated}");
    }
}

#[tokio::test]
async fn unrestored_identity_keeps_protected_routes_waiting() {
    let idp = Arc::new(InMemoryIdentityProvider::pending());
    let profiles = Arc::new(InMemoryProfileStore::new());
    let services = Services {
        identity: idp.clone(),
        profiles: profiles.clone(),
    };
    let app = App::build(AppConfig::default(), services).unwrap();
    let_tasks_run().await;

    assert!(app.session().state().loading());
    assert!(matches!(app.show("/dashboard"), View::Waiting));
    let visit = app.navigate("/admin").await.unwrap();
    assert!(matches!(visit.view, View::Waiting));
    assert!(visit.redirects.is_empty());

    // Public routes do not wait on the session.
    let (path, view) = landing(&app, "/jobs/7").await;
    assert_eq!(path, "/jobs/7");
    match view {
        View::Page { page, params } => {
            assert_eq!(page.id(), pages::JOB_DETAIL);
            assert_eq!(params.get("id").map(String::as_str), Some("7"));
        }
        other => panic!("unexpected view {other:?}"),
    }

    idp.restore(None);
    until(&app, SessionState::is_settled).await;
    let (path, _) = landing(&app, "/dashboard").await;
    assert_eq!(path, "/login");
}

#[tokio::test]
async fn unknown_paths_show_the_not_found_page() {
    let (services, _, _) = Services::in_memory();
    let app = App::build(AppConfig::default(), services).unwrap();
    until(&app, SessionState::is_settled).await;

    let visit = app.navigate("/definitely/not/here").await.unwrap();
    assert!(visit.redirects.is_empty());
    match visit.view {
        View::NotFound(page) => assert_eq!(page.id(), pages::NOT_FOUND),
        other => panic!("unexpected view {other:?}"),
    }
}

#[tokio::test]
async fn malformed_email_never_reaches_the_provider() {
    let (services, idp, _) = Services::in_memory();
    let app = App::build(AppConfig::default(), services).unwrap();

    let result = app.session().login("not-an-email", SECRET).await;
    assert!(matches!(result, Err(AuthError::InvalidEmail(_))));
    assert_eq!(idp.current(), None);
}

#[tokio::test]
async fn submitted_profile_fields_cannot_grant_a_role() {
    let (services, _, _) = Services::in_memory();
    let app = App::build(AppConfig::default(), services).unwrap();
    until(&app, SessionState::is_settled).await;

    for smuggled in [
        json!({ "role": "worker", "displayName": "Wade", "ownerId": "00000000-0000-0000-0000-000000000000" }),
        json!({ "role": "worker", "displayName": "Wade", "createdAt": "2020-01-01T00:00:00Z" }),
    ] {
        assert!(serde_json::from_value::<ProfileFields>(smuggled).is_err());
    }
    assert_eq!(
        ProfileFields::new(Role::Worker, "Wade").with_field("role", "admin"),
        Err(ValidationError::ReservedField("role".to_string()))
    );

    let submitted: ProfileFields = serde_json::from_value(json!({
        "role": "worker",
        "displayName": "Wade",
        "skills": ["welding", "forklift"],
    }))
    .unwrap();
    let principal = app
        .session()
        .register("wade@example.com", SECRET, submitted)
        .await
        .unwrap();

    let state = until(&app, |s| s.is_settled() && s.profile().is_some()).await;
    let profile = state.profile().unwrap();
    assert_eq!(profile.role, Role::Worker);
    assert_eq!(profile.owner_id, principal.id);
    assert_eq!(profile.field("skills"), Some(&json!(["welding", "forklift"])));

    let (path, _) = landing(&app, "/admin").await;
    assert_eq!(path, "/dashboard");
    let (path, view) = landing(&app, "/certifications").await;
    assert_eq!(path, "/certifications");
    assert!(shows(&view, pages::CERTIFICATIONS));
}
