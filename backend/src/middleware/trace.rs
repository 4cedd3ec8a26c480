//! Actix middleware that puts a fresh [`TraceId`] in scope for every request.
//!
//! The identifier is echoed in the `trace-id` response header so clients can
//! quote it when reporting failures.

use std::task::{Context, Poll};

use actix_web::Error;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{HeaderMap, HeaderName, HeaderValue};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::{Instrument, error, info_span};

use crate::domain::{TRACE_ID_HEADER, TraceId};

/// Tracing middleware factory.
///
/// # Examples
/// ```
/// use accounts::Trace;
/// use actix_web::App;
///
/// let _app = App::new().wrap(Trace);
/// ```
#[derive(Clone)]
pub struct Trace;

impl<S, B> Transform<S, ServiceRequest> for Trace
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = TraceMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TraceMiddleware { service }))
    }
}

/// Service wrapper produced by [`Trace`].
pub struct TraceMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for TraceMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let trace_id = TraceId::generate();
        let span = info_span!(
            "request",
            trace_id = %trace_id,
            method = %req.method(),
            path = %req.path()
        );
        let fut = self.service.call(req);
        Box::pin(
            TraceId::scope(trace_id, async move {
                let mut res = fut.await?;
                echo_trace_id(res.response_mut().headers_mut(), trace_id);
                Ok(res)
            })
            .instrument(span),
        )
    }
}

/// Write `trace_id` to the response headers, replacing any handler-set value.
fn echo_trace_id(headers: &mut HeaderMap, trace_id: TraceId) {
    match HeaderValue::from_str(&trace_id.to_string()) {
        Ok(value) => {
            headers.insert(HeaderName::from_static(TRACE_ID_HEADER), value);
        }
        Err(error) => error!(%error, %trace_id, "failed to encode trace id header"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::{TestRequest, call_service, init_service, read_body};
    use actix_web::{App, HttpResponse, ResponseError, web};
    use rstest::rstest;

    use crate::domain::Error as DomainError;

    fn header_of(res: &ServiceResponse) -> String {
        res.headers()
            .get(TRACE_ID_HEADER)
            .expect("trace id header")
            .to_str()
            .expect("header is ascii")
            .to_owned()
    }

    #[actix_web::test]
    async fn each_request_gets_its_own_trace_id() {
        let app = init_service(
            App::new()
                .wrap(Trace)
                .route("/", web::get().to(|| async { HttpResponse::Ok().finish() })),
        )
        .await;
        let first = call_service(&app, TestRequest::get().uri("/").to_request()).await;
        let second = call_service(&app, TestRequest::get().uri("/").to_request()).await;

        let first = header_of(&first);
        assert!(first.parse::<TraceId>().is_ok());
        assert_ne!(first, header_of(&second));
    }

    #[actix_web::test]
    async fn domain_errors_capture_the_request_trace_id() {
        let app = init_service(App::new().wrap(Trace).route(
            "/",
            web::get().to(|| async move {
                let error = DomainError::service_unavailable("session store offline");
                let body = error.trace_id().unwrap_or_default().to_owned();
                HttpResponse::build(error.status_code()).body(body)
            }),
        ))
        .await;
        let res = call_service(&app, TestRequest::get().uri("/").to_request()).await;
        let header = header_of(&res);
        let body = read_body(res).await;
        assert_eq!(std::str::from_utf8(&body).expect("utf8 body"), header);
    }

    #[rstest]
    fn echo_replaces_existing_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static(TRACE_ID_HEADER),
            HeaderValue::from_static("stale"),
        );
        let trace_id = TraceId::generate();
        echo_trace_id(&mut headers, trace_id);
        assert_eq!(
            headers.get(TRACE_ID_HEADER).and_then(|v| v.to_str().ok()),
            Some(trace_id.to_string().as_str())
        );
    }
}
