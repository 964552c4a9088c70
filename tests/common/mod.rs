#![allow(dead_code)]

use std::{
    io::{BufRead, BufReader, Read, Write},
    net::{TcpListener, TcpStream},
    sync::Arc,
    thread,
};

use parking_lot::Mutex;
use reqwest::StatusCode;
use url::Url;

#[derive(Debug, Clone)]
pub struct Recorded {
    pub path: String,
    pub body: String,
}

type Responder = dyn Fn(usize, &Recorded) -> StatusCode + Send + Sync;

/// Minimal HTTP/1.1 server on an ephemeral port. Each request is answered
/// with the status the responder picks for it, given the number of requests
/// seen before.
pub struct ScriptedServer {
    pub base: Url,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl ScriptedServer {
    pub fn start<F>(responder: F) -> ScriptedServer
    where
        F: Fn(usize, &Recorded) -> StatusCode + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let responder: Arc<Responder> = Arc::new(responder);

        let shared = requests.clone();
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { return };
                let requests = shared.clone();
                let responder = responder.clone();
                thread::spawn(move || serve(stream, &requests, &*responder));
            }
        });

        ScriptedServer {
            base: Url::parse(&format!("http://{addr}/api/v1")).unwrap(),
            requests,
        }
    }

    /// Accepts `capacity` add_node requests, then answers `then`.
    pub fn with_capacity(capacity: usize, then: StatusCode) -> ScriptedServer {
        ScriptedServer::start(move |seen, _| {
            if seen < capacity { StatusCode::OK } else { then }
        })
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().clone()
    }

    pub fn node_ids(&self) -> Vec<u64> {
        self.requests()
            .iter()
            .map(|r| {
                let body: serde_json::Value = serde_json::from_str(&r.body).unwrap();
                body["node_id"].as_u64().unwrap()
            })
            .collect()
    }
}

fn serve(stream: TcpStream, requests: &Mutex<Vec<Recorded>>, responder: &Responder) {
    let mut writer = match stream.try_clone() {
        Ok(writer) => writer,
        Err(_) => return,
    };
    let mut reader = BufReader::new(stream);

    while let Some(request) = read_request(&mut reader) {
        let status = {
            let mut requests = requests.lock();
            let status = responder(requests.len(), &request);
            requests.push(request);
            status
        };
        let response = format!(
            "HTTP/1.1 {} {}\r\nContent-Length: 0\r\n\r\n",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown"),
        );
        if writer.write_all(response.as_bytes()).is_err() {
            return;
        }
    }
}

fn read_request(reader: &mut BufReader<TcpStream>) -> Option<Recorded> {
    let mut line = String::new();
    if reader.read_line(&mut line).ok()? == 0 {
        return None;
    }
    let path = line.split_whitespace().nth(1)?.to_string();

    let mut content_length = 0;
    loop {
        let mut header = String::new();
        if reader.read_line(&mut header).ok()? == 0 {
            return None;
        }
        let header = header.trim_end();
        if header.is_empty() {
            break;
        }
        if let Some((name, value)) = header.split_once(':') {
            if name.eq_ignore_ascii_case("content-length") {
                content_length = value.trim().parse().ok()?;
            }
        }
    }

    let mut body = vec![0; content_length];
    reader.read_exact(&mut body).ok()?;

    Some(Recorded {
        path,
        body: String::from_utf8(body).ok()?,
    })
}
