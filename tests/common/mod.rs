//! Shared utilities for integration testing.

use std::net::SocketAddr;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Start a mock source that answers every request with the given raw
/// header lines and body.
pub async fn start_mock_source(
    addr: SocketAddr,
    header_lines: &'static [&'static str],
    body: &'static str,
) {
    let listener = TcpListener::bind(addr).await.unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        // Consume the request head before answering.
                        let mut buf = [0u8; 8192];
                        let _ = socket.read(&mut buf).await;

                        let mut response = String::from("HTTP/1.1 200 OK\r\n");
                        for line in header_lines {
                            response.push_str(line);
                            response.push_str("\r\n");
                        }
                        response.push_str(&format!(
                            "Content-Length: {}\r\nConnection: close\r\n\r\n{}",
                            body.len(),
                            body
                        ));
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });
}
