//! Structured logging and optional OTLP export.
//!
//! Logs are JSON-formatted `tracing` events. When an OTLP endpoint is
//! configured, spans are additionally exported through the OTEL pipeline;
//! without one, the service logs to stdout only (the usual mode outside the
//! managed platform).

pub mod init;

pub use init::init_telemetry;
