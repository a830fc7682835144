//! End-to-end portal flows through the real middleware stack, domain
//! services and Argon2 hashing, backed by in-memory repositories.

use std::sync::Arc;

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::cookie::{Cookie, Key, SameSite};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use chrono::{TimeZone, Utc};
use rstest::{fixture, rstest};
use serde_json::{Value, json};

use darpan_backend::Trace;
use darpan_backend::domain::{
    ApplicationSummary, ApplicationSummaryParts, Role, TRACE_ID_HEADER, UserId,
};
use darpan_backend::inbound::http::api_routes;
use darpan_backend::inbound::http::health::{HealthState, live, ready, root};
use darpan_backend::inbound::http::session_config::SessionSettings;
use darpan_backend::test_support::{
    InMemoryApplicationRepository, InMemoryUserRepository, http_state,
};

struct Portal {
    users: Arc<InMemoryUserRepository>,
    applications: Arc<InMemoryApplicationRepository>,
}

fn application(id: i64, owner: i64, service: Option<&str>) -> ApplicationSummary {
    ApplicationSummary::from(ApplicationSummaryParts {
        id,
        owner: UserId::new(owner).expect("owner id"),
        service_name: service.map(str::to_owned),
        status: "pending".to_owned(),
        submitted_on: Utc
            .with_ymd_and_hms(2024, 5, 1, 10, 0, 0)
            .single()
            .expect("valid timestamp"),
        last_update: None,
        current_official: Some("Ravi Kumar".to_owned()),
    })
}

#[fixture]
fn portal() -> Portal {
    // Ids are assigned from 1 in registration order.
    Portal {
        users: Arc::new(InMemoryUserRepository::new()),
        applications: Arc::new(InMemoryApplicationRepository::new(vec![
            application(3, 1, Some("Ration card")),
            application(1, 1, None),
            application(2, 2, Some("Birth certificate")),
        ])),
    }
}

async fn init(
    portal: &Portal,
) -> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error> {
    let session = SessionSettings {
        key: Key::generate(),
        cookie_secure: false,
        same_site: SameSite::Lax,
    };
    actix_test::init_service(
        App::new()
            .app_data(web::Data::new(http_state(
                portal.users.clone(),
                portal.applications.clone(),
            )))
            .app_data(web::Data::new(HealthState::new()))
            .wrap(Trace)
            .service(
                web::scope("/api")
                    .wrap(session.middleware())
                    .configure(api_routes),
            )
            .service(root)
            .service(ready)
            .service(live),
    )
    .await
}

async fn post_json<S, B>(app: &S, uri: &str, body: Value) -> ServiceResponse<B>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
{
    actix_test::call_service(
        app,
        actix_test::TestRequest::post().uri(uri).set_json(body).to_request(),
    )
    .await
}

async fn register<S, B>(app: &S, name: &str, email: &str, password: &str) -> ServiceResponse<B>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
{
    post_json(
        app,
        "/api/register",
        json!({"fullName": name, "email": email, "password": password}),
    )
    .await
}

async fn login<S, B>(app: &S, email: &str, password: &str) -> ServiceResponse<B>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
{
    post_json(
        app,
        "/api/login",
        json!({"email": email, "password": password}),
    )
    .await
}

fn session_cookie<B>(res: &ServiceResponse<B>) -> Cookie<'static> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie")
}

async fn get<S, B>(app: &S, uri: &str, cookie: Option<Cookie<'static>>) -> ServiceResponse<B>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
{
    let mut req = actix_test::TestRequest::get().uri(uri);
    if let Some(cookie) = cookie {
        req = req.cookie(cookie);
    }
    actix_test::call_service(app, req.to_request()).await
}

#[rstest]
#[actix_web::test]
async fn register_twice_then_login(portal: Portal) {
    let app = init(&portal).await;

    let first = register(&app, "Jane Doe", "jane@x.com", "pw1").await;
    assert_eq!(first.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(first).await;
    assert_eq!(
        body,
        json!({"success": true, "message": "Account created successfully. Please log in."})
    );

    let second = register(&app, "Jane Doe", "jane@x.com", "pw1").await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
    let body: Value = actix_test::read_body_json(second).await;
    assert_eq!(body["message"], "An account with this email already exists.");

    assert_eq!(portal.users.count_by_email("jane@x.com"), 1);
    let stored = portal.users.user_by_email("jane@x.com").expect("stored user");
    assert_eq!(stored.role(), Role::Citizen);

    let logged_in = login(&app, "jane@x.com", "pw1").await;
    assert_eq!(logged_in.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(logged_in).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["user"]["email"], "jane@x.com");
    assert_eq!(body["user"]["role"], "citizen");
    assert_eq!(body["user"]["fullName"], "Jane Doe");
    let user = body["user"].as_object().expect("user object");
    assert!(user.keys().all(|key| !key.to_lowercase().contains("password")));
}

#[rstest]
#[actix_web::test]
async fn unknown_email_and_wrong_password_look_identical(portal: Portal) {
    let app = init(&portal).await;
    register(&app, "Jane Doe", "jane@x.com", "pw1").await;

    let wrong = login(&app, "jane@x.com", "pw2").await;
    let unknown = login(&app, "nobody@x.com", "pw1").await;

    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
    let mut wrong: Value = actix_test::read_body_json(wrong).await;
    let mut unknown: Value = actix_test::read_body_json(unknown).await;
    // Trace ids differ per request by construction.
    for body in [&mut wrong, &mut unknown] {
        body.as_object_mut().expect("error object").remove("traceId");
    }
    assert_eq!(wrong, unknown);
}

#[rstest]
#[actix_web::test]
async fn citizens_list_only_their_own_applications(portal: Portal) {
    let app = init(&portal).await;
    register(&app, "Jane Doe", "jane@x.com", "pw1").await;
    register(&app, "Arjun Rao", "arjun@x.com", "pw2").await;

    let cookie = session_cookie(&login(&app, "jane@x.com", "pw1").await);

    let own = get(&app, "/api/applications/1", Some(cookie.clone())).await;
    assert_eq!(own.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(own).await;
    let listed = body["applications"].as_array().expect("array");
    assert_eq!(
        listed.iter().map(|a| a["id"].clone()).collect::<Vec<_>>(),
        vec![json!(1), json!(3)]
    );
    assert_eq!(listed[0]["serviceName"], Value::Null);
    assert_eq!(listed[1]["currentOfficial"], "Ravi Kumar");

    let other = get(&app, "/api/applications/2", Some(cookie)).await;
    assert_eq!(other.status(), StatusCode::FORBIDDEN);
}

#[rstest]
#[actix_web::test]
async fn users_without_applications_get_an_empty_list(portal: Portal) {
    let app = init(&portal).await;
    for (name, email) in [("A", "a@x.com"), ("B", "b@x.com"), ("C", "c@x.com")] {
        register(&app, name, email, "pw").await;
    }
    let cookie = session_cookie(&login(&app, "c@x.com", "pw").await);

    let res = get(&app, "/api/applications/3", Some(cookie)).await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body, json!({"applications": []}));
}

#[rstest]
#[actix_web::test]
async fn listing_without_a_session_is_unauthorised_and_traced(portal: Portal) {
    let app = init(&portal).await;

    let res = get(&app, "/api/applications/1", None).await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let header = res
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
        .expect("trace id header");
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["code"], "unauthorized");
    assert_eq!(body["traceId"], header.as_str());
}

#[rstest]
#[actix_web::test]
async fn database_outage_is_reported_generically(portal: Portal) {
    let app = init(&portal).await;
    portal.users.go_offline();

    let res = register(&app, "Jane Doe", "jane@x.com", "pw1").await;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["code"], "database_unavailable");
    assert_eq!(body["message"], "Database connection failed");
    assert!(body.get("details").is_none());
}

#[rstest]
#[actix_web::test]
async fn summaries_are_deterministic(portal: Portal) {
    let app = init(&portal).await;
    let data = json!({"data": {"district": "Pune", "applicants": [1, 2]}});

    let first = post_json(&app, "/api/generate-summary", data.clone()).await;
    let first: Value = actix_test::read_body_json(first).await;
    let second = post_json(&app, "/api/generate-summary", data).await;
    let second: Value = actix_test::read_body_json(second).await;

    assert_eq!(first, second);
    assert_eq!(
        first["summary"],
        "AI Summary for your data: Generate an executive summary based on this data: \
         {\"applicants\":[1,2],\"district\":\"Pune\"}"
    );
}

#[rstest]
#[actix_web::test]
async fn root_and_probes_respond(portal: Portal) {
    let app = init(&portal).await;

    let res = get(&app, "/", None).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["message"], "Welcome to the Project Darpan Backend API");

    assert_eq!(get(&app, "/health/live", None).await.status(), StatusCode::OK);
    assert_eq!(
        get(&app, "/health/ready", None).await.status(),
        StatusCode::SERVICE_UNAVAILABLE
    );
}
