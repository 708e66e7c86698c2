//! One-shot HTTP server for exercising the client without the real network

use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::sync::mpsc;
use std::thread;

/// A stub that answers exactly one request, then shuts down
pub struct StubServer {
    pub base_url: String,
    request_line: mpsc::Receiver<String>,
}

impl StubServer {
    /// Serve `body` with the given status (e.g. `"200 OK"`) to the first request
    pub fn start(status: &str, body: &str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub server");
        let addr = listener.local_addr().expect("stub server address");
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));
                let mut first_line = String::new();
                let _ = reader.read_line(&mut first_line);

                // Drain headers; GET requests carry no body
                let mut line = String::new();
                while reader.read_line(&mut line).map(|n| n > 0).unwrap_or(false) {
                    if line == "\r\n" {
                        break;
                    }
                    line.clear();
                }

                let _ = tx.send(first_line.trim_end().to_string());
                let _ = stream.write_all(response.as_bytes());
                let _ = stream.flush();
            }
        });

        Self {
            base_url: format!("http://{}", addr),
            request_line: rx,
        }
    }

    /// The request line of the request that was served, if any
    pub fn request_line(&self) -> Option<String> {
        self.request_line.try_recv().ok()
    }
}
