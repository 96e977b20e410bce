pub mod app;
pub mod cli;
pub mod domain;
pub mod infra;

pub fn init() {
    // stdout is reserved for generated code; all diagnostics go to stderr.
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();
}
