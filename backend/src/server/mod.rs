//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;

use state_builders::{build_schema_data, build_session_backend};

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use accounts::Trace;
use accounts::inbound::graphql::AccountSchema;
#[cfg(debug_assertions)]
use accounts::inbound::http::graphql::graphiql;
use accounts::inbound::http::graphql::{GRAPHQL_PATH, graphql};
use accounts::inbound::http::health::{HealthState, live, ready};
use accounts::inbound::http::session::SessionBackend;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    schema: web::Data<AccountSchema>,
    sessions: web::Data<SessionBackend>,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        schema,
        sessions,
    } = deps;

    let endpoint = web::resource(GRAPHQL_PATH).route(web::post().to(graphql));
    #[cfg(debug_assertions)]
    let endpoint = endpoint.route(web::get().to(graphiql));

    App::new()
        .app_data(health_state)
        .app_data(schema)
        .app_data(sessions)
        .wrap(Trace)
        .service(endpoint)
        .service(ready)
        .service(live)
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Parameters
/// - `health_state`: shared readiness state updated once the server is initialised.
/// - `config`: pre-built [`ServerConfig`] with cookie settings, bind address and adapters.
///
/// # Returns
/// A spawned [`Server`] that must be awaited to drive the listener.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket or starting the server fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let schema = build_schema_data(&config);
    let sessions = build_session_backend(&config);
    let bind_addr = config.bind_addr;

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            schema: schema.clone(),
            sessions: sessions.clone(),
        })
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::test;
    use rstest::rstest;
    use serde_json::json;

    use accounts::domain::TRACE_ID_HEADER;
    use accounts::inbound::http::session_config::SessionSettings;
    use accounts::outbound::session::InMemorySessionStore;
    use actix_web::cookie::{Key, SameSite};

    use super::*;

    fn test_config() -> ServerConfig {
        let settings = SessionSettings::new(
            Key::generate(),
            false,
            SameSite::Lax,
            std::time::Duration::from_secs(60),
        );
        let addr: SocketAddr = "127.0.0.1:0".parse().expect("loopback addr");
        ServerConfig::new(settings, addr).with_session_store(Arc::new(InMemorySessionStore::new()))
    }

    fn test_deps() -> AppDependencies {
        let config = test_config();
        AppDependencies {
            health_state: web::Data::new(HealthState::new()),
            schema: build_schema_data(&config),
            sessions: build_session_backend(&config),
        }
    }

    #[rstest]
    #[actix_web::test]
    async fn graphql_endpoint_is_mounted_with_trace_header() {
        let app = test::init_service(build_app(test_deps())).await;
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri(GRAPHQL_PATH)
                .set_json(json!({ "query": "{ me { id } }" }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        assert!(res.headers().contains_key(TRACE_ID_HEADER));
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body, json!({ "data": { "me": null } }));
    }

    #[rstest]
    #[actix_web::test]
    async fn readiness_reflects_shared_state() {
        let deps = test_deps();
        let health = deps.health_state.clone();
        let app = test::init_service(build_app(deps)).await;

        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/health/ready").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);

        health.mark_ready();
        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/health/ready").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
    }
}
