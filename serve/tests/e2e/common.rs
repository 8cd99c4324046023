//! Shared helpers for e2e tests: spawn the server on a random port with given deps.

use std::sync::Arc;

use datahopper::{MockLlm, MockRedditSource, MockSearchProvider, ResearchDeps, ResearchRunner};
use serve::ServeOptions;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// Running server; dropping it shuts the server down.
pub struct TestServer {
    pub base_url: String,
    _shutdown: oneshot::Sender<()>,
}

/// Binds 127.0.0.1:0 and serves `deps` with default options.
pub async fn spawn_server(deps: ResearchDeps) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let runner = ResearchRunner::new(deps).unwrap();
    let (tx, rx) = oneshot::channel::<()>();
    tokio::spawn(serve::run_serve_on_listener(
        listener,
        runner,
        ServeOptions::default(),
        async move {
            let _ = rx.await;
        },
    ));
    TestServer {
        base_url: format!("http://{}", addr),
        _shutdown: tx,
    }
}

/// Deps whose model always fails, so every run ends in a node error.
pub fn failing_llm_deps() -> ResearchDeps {
    ResearchDeps::new(
        Arc::new(MockSearchProvider::default()),
        Arc::new(MockRedditSource::default()),
        Arc::new(MockLlm::failing("model unavailable")),
    )
}
