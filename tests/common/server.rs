use axum::{
    Router,
    body::Body,
    extract::State,
    http::{Response, StatusCode, Uri, header::CONTENT_TYPE},
    serve,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::net::TcpListener;
use url::Url;

/// Serves a fixed set of files below `/.git/`, 404 for everything else
pub struct TestHttpServer {
    url: Url,
}

impl TestHttpServer {
    pub async fn spawn(files: HashMap<String, Vec<u8>>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let url = Url::parse(&format!("http://{addr}/.git/")).unwrap();

        let router = Router::new()
            .fallback(serve_file)
            .with_state(Arc::new(files));

        let server = serve(listener, router);

        tokio::spawn(async move {
            let _ = server.await;
        });

        Self { url }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

async fn serve_file(
    State(files): State<Arc<HashMap<String, Vec<u8>>>>,
    uri: Uri,
) -> Response<Body> {
    let body = uri
        .path()
        .strip_prefix("/.git/")
        .and_then(|path| files.get(path));

    match body {
        Some(body) => Response::builder()
            .status(StatusCode::OK)
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(Body::from(body.clone()))
            .unwrap(),
        None => Response::builder()
            .status(StatusCode::NOT_FOUND)
            .body(Body::empty())
            .unwrap(),
    }
}
