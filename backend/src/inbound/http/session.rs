//! Session helpers that keep handlers free of framework-specific logic.
//!
//! A thin wrapper around Actix sessions: handlers persist or recover the
//! logged-in caller without touching cookie keys directly.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{AuthenticatedCaller, Error};

pub(crate) const USER_ID_KEY: &str = "user_id";
pub(crate) const ROLE_KEY: &str = "role";

/// Newtype exposing caller-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Start a fresh session for `caller`, discarding any previous state.
    pub fn persist_caller(&self, caller: &AuthenticatedCaller) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(USER_ID_KEY, caller.user_id().as_i64())
            .and_then(|()| self.0.insert(ROLE_KEY, caller.role().as_str()))
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Fetch the caller from the session, if one is logged in.
    ///
    /// Unreadable or inconsistent session values are treated as logged out.
    pub fn caller(&self) -> Result<Option<AuthenticatedCaller>, Error> {
        let read = |error| Error::internal(format!("failed to read session: {error}"));
        let user_id = self.0.get::<i64>(USER_ID_KEY).map_err(read)?;
        let role = self.0.get::<String>(ROLE_KEY).map_err(read)?;

        let (Some(user_id), Some(role)) = (user_id, role) else {
            return Ok(None);
        };
        match AuthenticatedCaller::try_from_parts(user_id, &role) {
            Ok(caller) => Ok(Some(caller)),
            Err(error) => {
                warn!(%error, "invalid caller in session cookie");
                Ok(None)
            }
        }
    }

    /// Require a logged-in caller or fail with `401 Unauthorized`.
    pub fn require_caller(&self) -> Result<AuthenticatedCaller, Error> {
        self.caller()?
            .ok_or_else(|| Error::unauthorized("login required"))
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Role, UserId};
    use crate::inbound::http::test_utils::{session_cookie, test_session_middleware};
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, web};
    use actix_web::test::{self as actix_test, TestRequest};
    use rstest::rstest;

    async fn require(session: SessionContext) -> Result<HttpResponse, Error> {
        let caller = session.require_caller()?;
        Ok(HttpResponse::Ok().body(format!("{}:{}", caller.user_id(), caller.role())))
    }

    #[rstest]
    #[actix_web::test]
    async fn round_trips_the_caller() {
        let app = actix_test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .route(
                    "/set",
                    web::get().to(|session: SessionContext| async move {
                        let caller =
                            AuthenticatedCaller::new(UserId::new(7).expect("id"), Role::Official);
                        session.persist_caller(&caller)?;
                        Ok::<_, Error>(HttpResponse::Ok())
                    }),
                )
                .route("/get", web::get().to(require)),
        )
        .await;

        let set_res =
            actix_test::call_service(&app, TestRequest::get().uri("/set").to_request()).await;
        assert_eq!(set_res.status(), StatusCode::OK);
        let cookie = session_cookie(&set_res);

        let get_res = actix_test::call_service(
            &app,
            TestRequest::get().uri("/get").cookie(cookie).to_request(),
        )
        .await;
        assert_eq!(get_res.status(), StatusCode::OK);
        assert_eq!(actix_test::read_body(get_res).await, "7:official");
    }

    #[rstest]
    #[actix_web::test]
    async fn missing_caller_is_unauthorised() {
        let app = actix_test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .route("/get", web::get().to(require)),
        )
        .await;

        let res = actix_test::call_service(&app, TestRequest::get().uri("/get").to_request()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[rstest]
    #[case::unknown_role(7, "superuser")]
    #[case::non_positive_id(0, "citizen")]
    #[actix_web::test]
    async fn tampered_values_are_unauthorised(#[case] user_id: i64, #[case] role: &'static str) {
        let app = actix_test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .route(
                    "/set",
                    web::get().to(move |session: Session| async move {
                        session.insert(USER_ID_KEY, user_id).expect("insert id");
                        session.insert(ROLE_KEY, role).expect("insert role");
                        HttpResponse::Ok()
                    }),
                )
                .route("/get", web::get().to(require)),
        )
        .await;

        let set_res =
            actix_test::call_service(&app, TestRequest::get().uri("/set").to_request()).await;
        let cookie = session_cookie(&set_res);

        let res = actix_test::call_service(
            &app,
            TestRequest::get().uri("/get").cookie(cookie).to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}
