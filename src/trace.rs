use std::net::SocketAddr;

use axum::extract::ConnectInfo;
use http::{Request, Response};
use once_cell::sync::Lazy;
use opentelemetry::{
    sdk::{
        trace::{self, Sampler},
        Resource,
    },
    trace::TraceError,
    KeyValue,
};
use opentelemetry_otlp::WithExportConfig;
use tracing::{field::Empty, subscriber::SetGlobalDefaultError, Level, Subscriber};
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_log::{log_tracer::SetLoggerError, LogTracer};
use tracing_subscriber::{filter::Targets, fmt::MakeWriter, layer::SubscriberExt, Registry};

const PKG_NAME: &str = env!("CARGO_PKG_NAME");
const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

static STDOUT: Lazy<(NonBlocking, WorkerGuard)> =
    Lazy::new(|| tracing_appender::non_blocking(std::io::stdout()));

pub fn stdout() -> impl for<'a> MakeWriter<'a> + Send + Sync + 'static {
    STDOUT.0.clone()
}

pub struct TraceSettings<'a, W>
where
    W: for<'b> MakeWriter<'b>,
{
    pub level: Level,
    pub writer: W,
    /// OTLP collector; spans are only exported when set.
    pub endpoint: Option<&'a str>,
    pub namespace: Option<&'a str>,
}

#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("failed to initialize the trace exporter")]
    Exporter(#[from] TraceError),
    #[error("failed to bridge log records")]
    Logger(#[from] SetLoggerError),
    #[error("failed to install the global subscriber")]
    Subscriber(#[from] SetGlobalDefaultError),
}

pub fn get_subscriber<W>(
    settings: TraceSettings<'_, W>,
) -> Result<Box<dyn Subscriber + Send + Sync>, InitError>
where
    W: for<'b> MakeWriter<'b> + Send + Sync + 'static,
{
    let filter = Targets::new().with_target(PKG_NAME, settings.level);
    let formatting_layer = BunyanFormattingLayer::new(PKG_NAME.to_string(), settings.writer);

    let subscriber = Registry::default()
        .with(filter)
        .with(JsonStorageLayer)
        .with(formatting_layer);

    let Some(endpoint) = settings.endpoint else {
        return Ok(Box::new(subscriber));
    };

    let mut resources = vec![
        KeyValue::new("service.name", PKG_NAME),
        KeyValue::new("service.version", PKG_VERSION),
    ];
    if let Some(name) = settings.namespace {
        resources.push(KeyValue::new("service.namespace", name.to_string()))
    }
    let tracer = opentelemetry_otlp::new_pipeline()
        .tracing()
        .with_exporter(
            opentelemetry_otlp::new_exporter()
                .tonic()
                .with_endpoint(endpoint),
        )
        .with_trace_config(
            trace::config()
                .with_sampler(Sampler::AlwaysOn)
                .with_resource(Resource::new(resources)),
        )
        .install_batch(opentelemetry::runtime::Tokio)?;
    let otel = tracing_opentelemetry::layer().with_tracer(tracer);

    Ok(Box::new(subscriber.with(otel)))
}

pub fn init_subscriber<S>(subscriber: S) -> Result<(), InitError>
where
    S: Subscriber + Send + Sync + 'static,
{
    LogTracer::init()?;
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

#[derive(Clone, Copy, Debug)]
pub struct MakeSpan;

impl<B> tower_http::trace::MakeSpan<B> for MakeSpan {
    fn make_span(&mut self, request: &Request<B>) -> tracing::Span {
        let peer = request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(socket_addr)| *socket_addr);

        let request_id = request
            .headers()
            .get("x-request-id")
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();

        let http_target = match request.uri().path_and_query() {
            Some(http_target) => http_target.as_str(),
            None => request.uri().path(),
        };

        let span = tracing::info_span!(
            "HTTP request",
            http.method = %request.method(),
            http.target = %http_target,
            http.status_code = Empty,
            net.sock.peer.addr = Empty,
            net.sock.peer.port = Empty,
            request_id = %request_id,
        );
        if let Some(peer) = peer {
            span.record("net.sock.peer.addr", &tracing::field::display(peer.ip()));
            span.record("net.sock.peer.port", peer.port());
        }
        span
    }
}

#[derive(Clone, Copy, Debug)]
pub struct OnResponse;

impl<B> tower_http::trace::OnResponse<B> for OnResponse {
    fn on_response(
        self,
        response: &Response<B>,
        latency: std::time::Duration,
        span: &tracing::Span,
    ) {
        span.record("http.status_code", response.status().as_u16());
        tracing::info!(
            parent: span,
            latency_ms = latency.as_millis() as u64,
            "finished processing request"
        );
    }
}
