use std::net::{SocketAddr, TcpListener};

use axum::{routing, Router};
use futures::future::BoxFuture;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tower::ServiceBuilder;
use tower_http::{request_id::MakeRequestUuid, trace::TraceLayer, ServiceBuilderExt};

use crate::{
    queue::{self, DeclaredQueue},
    routes, schema,
    settings::{DatabaseSettings, Settings},
    trace,
};

pub type Server = BoxFuture<'static, hyper::Result<()>>;

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("invalid database settings")]
    Database(#[source] sqlx::Error),
    #[error("failed to create the database schema")]
    Schema(#[source] sqlx::Error),
    #[error("failed to declare the message queue")]
    Queue(#[from] lapin::Error),
    #[error("failed to bind the listener")]
    Bind(#[from] std::io::Error),
    #[error("failed to start the server")]
    Server(#[from] hyper::Error),
}

pub struct Application {
    port: u16,
    server: Server,
    queue: Option<DeclaredQueue>,
}

impl Application {
    /// Prepares the schema and the queue, then binds the listener. Any failure
    /// here aborts startup.
    pub async fn build(settings: Settings) -> Result<Self, BuildError> {
        let db_pool = get_connection_pool(&settings.database).map_err(BuildError::Database)?;
        if settings.database.create_schema {
            schema::create_all(&db_pool)
                .await
                .map_err(BuildError::Schema)?;
        }

        let queue = match &settings.queue.url {
            Some(url) => {
                let queue = queue::declare(url, &settings.queue.name).await?;
                tracing::info!(
                    queue = queue.name(),
                    connected = queue.is_connected(),
                    "broker ready"
                );
                Some(queue)
            }
            None => {
                tracing::info!("no broker configured, the queue is not declared");
                None
            }
        };

        let listener = TcpListener::bind((settings.address, settings.port))?;
        let port = listener.local_addr()?.port();
        tracing::info!("listening on {}:{}", settings.address, port);
        let server = run(listener, db_pool)?;

        Ok(Self {
            port,
            server,
            queue,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> hyper::Result<()> {
        let Self { server, queue, .. } = self;
        let result = server.await;
        drop(queue);
        result
    }
}

/// The pool connects lazily, so the service starts even when the database is
/// down and `/test-db-connection` can report it.
pub fn get_connection_pool(settings: &DatabaseSettings) -> Result<PgPool, sqlx::Error> {
    Ok(PgPoolOptions::new()
        .acquire_timeout(settings.connect_timeout)
        .connect_lazy_with(settings.connect_options()?))
}

pub fn run(listener: TcpListener, db_pool: PgPool) -> hyper::Result<Server> {
    let middleware = ServiceBuilder::new()
        .set_x_request_id(MakeRequestUuid)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(trace::MakeSpan)
                .on_response(trace::OnResponse),
        )
        .propagate_x_request_id();
    let server = hyper::Server::from_tcp(listener)?.serve(
        Router::new()
            .route("/", routing::get(routes::index))
            .route("/health_check", routing::get(routes::health_check))
            .route("/test-db-connection", routing::get(routes::test_db_connection))
            .route("/data", routing::get(routes::get_data))
            .layer(middleware)
            .with_state(db_pool)
            .into_make_service_with_connect_info::<SocketAddr>(),
    );
    Ok(Box::pin(server))
}
