//! Tiny HTTP/1.1 stub for exercising the remote catalog without a network.

use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::{Arc, Mutex},
};

use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpListener,
};

pub(crate) struct CatalogStub {
    pub addr: SocketAddr,
    /// Raw request heads, in arrival order.
    pub requests: Arc<Mutex<Vec<String>>>,
}

impl CatalogStub {
    pub fn base_url(&self) -> String {
        format!("http://{}/api", self.addr)
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

/// Serve `routes` (path -> JSON body) until the test runtime shuts down.
/// Unknown paths answer 404.
pub(crate) async fn serve(routes: Vec<(&str, String)>) -> CatalogStub {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let routes: HashMap<String, String> = routes
        .into_iter()
        .map(|(path, body)| (path.to_string(), body))
        .collect();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&requests);

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };

            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];
            while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                match socket.read(&mut chunk).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => buf.extend_from_slice(&chunk[..n]),
                }
            }

            let head = String::from_utf8_lossy(&buf).to_string();
            let path = head
                .lines()
                .next()
                .and_then(|line| line.split_whitespace().nth(1))
                .unwrap_or("/")
                .to_string();
            seen.lock().unwrap().push(head);

            let (status, body) = match routes.get(&path) {
                Some(body) => ("200 OK", body.clone()),
                None => ("404 Not Found", "{}".to_string()),
            };
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\n\
                 Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });

    CatalogStub { addr, requests }
}

/// Minimal valid template JSON.
pub(crate) fn template_json(id: &str, content: &str) -> String {
    serde_json::json!({
        "id": id,
        "name": format!("Template {id}"),
        "version": "1.0.0",
        "category": "styling",
        "content": content,
        "variables": [],
        "metadata": { "author": "stub" }
    })
    .to_string()
}
