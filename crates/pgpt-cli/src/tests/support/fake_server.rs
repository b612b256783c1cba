//! Fake command server for behavioural tests.
//!
//! Accepts a single connection, decodes one JSON request from it, writes a
//! canned reply followed by a newline, and closes the socket the way the
//! reference server does.

use std::io::{self, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow};
use serde_json::Value;

/// What the server sends back once it has read the request.
#[derive(Debug, Clone)]
pub(in crate::tests) enum Reply {
    /// Writes the text and a trailing newline.
    Text(String),
    /// Closes the connection without writing anything.
    Silence,
}

pub(in crate::tests) struct FakeServer {
    port: u16,
    requests: Arc<Mutex<Vec<Value>>>,
    result: Arc<Mutex<Option<Result<()>>>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl FakeServer {
    pub fn spawn(reply: Reply) -> Result<Self> {
        let listener = TcpListener::bind(("127.0.0.1", 0)).context("bind fake server")?;
        listener
            .set_nonblocking(true)
            .context("fake server nonblocking")?;
        let port = listener.local_addr().context("local addr")?.port();
        let requests: Arc<Mutex<Vec<Value>>> = Arc::new(Mutex::new(Vec::new()));
        let result: Arc<Mutex<Option<Result<()>>>> = Arc::new(Mutex::new(None));
        let requests_clone = Arc::clone(&requests);
        let result_clone = Arc::clone(&result);
        let handle = thread::spawn(move || {
            let outcome = Self::serve_client(&listener, &reply, &requests_clone);
            if let Ok(mut guard) = result_clone.lock() {
                *guard = Some(outcome);
            }
        });
        Ok(Self {
            port,
            requests,
            result,
            handle: Some(handle),
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Waits for the server thread and returns every decoded request.
    pub fn take_requests(&mut self) -> Result<Vec<Value>> {
        if let Some(handle) = self.handle.take() {
            handle
                .join()
                .map_err(|_| anyhow!("fake server thread panicked"))?;
        }
        if let Some(outcome) = self
            .result
            .lock()
            .map_err(|error| anyhow!("lock fake server result: {error}"))?
            .take()
        {
            outcome.context("fake server failed")?;
        }
        let requests = self
            .requests
            .lock()
            .map_err(|error| anyhow!("lock requests: {error}"))?;
        Ok(requests.clone())
    }

    fn serve_client(
        listener: &TcpListener,
        reply: &Reply,
        requests: &Arc<Mutex<Vec<Value>>>,
    ) -> Result<()> {
        let deadline = Instant::now() + Duration::from_secs(2);
        loop {
            match listener.accept() {
                Ok((stream, _)) => {
                    stream
                        .set_nonblocking(false)
                        .context("blocking client stream")?;
                    Self::record_request(&stream, requests)?;
                    return Self::respond(stream, reply);
                }
                Err(ref error)
                    if error.kind() == io::ErrorKind::WouldBlock && Instant::now() < deadline =>
                {
                    thread::sleep(Duration::from_millis(10));
                }
                // The CLI rejected the invocation before connecting.
                Err(ref error) if error.kind() == io::ErrorKind::WouldBlock => return Ok(()),
                Err(error) => return Err(error).context("accept connection"),
            }
        }
    }

    fn record_request(stream: &TcpStream, requests: &Arc<Mutex<Vec<Value>>>) -> Result<()> {
        // Requests carry no delimiter, so decode exactly one JSON document.
        let reader = BufReader::new(stream.try_clone().context("clone stream")?);
        let request = serde_json::Deserializer::from_reader(reader)
            .into_iter::<Value>()
            .next()
            .context("connection closed before a request arrived")?
            .context("decode request")?;
        requests
            .lock()
            .map_err(|error| anyhow!("lock requests: {error}"))?
            .push(request);
        Ok(())
    }

    fn respond(mut stream: TcpStream, reply: &Reply) -> Result<()> {
        let Reply::Text(text) = reply else {
            return Ok(());
        };
        let payload = format!("{text}\n");
        match stream
            .write_all(payload.as_bytes())
            .and_then(|()| stream.flush())
        {
            // A client that stops reading early may already have hung up.
            Err(error)
                if matches!(
                    error.kind(),
                    io::ErrorKind::BrokenPipe | io::ErrorKind::ConnectionReset
                ) =>
            {
                Ok(())
            }
            other => other.context("write reply"),
        }
    }
}

impl Drop for FakeServer {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Returns a loopback port with nothing listening on it.
pub(in crate::tests) fn unused_port() -> Result<u16> {
    let listener = TcpListener::bind(("127.0.0.1", 0)).context("bind probe listener")?;
    let port = listener.local_addr().context("probe addr")?.port();
    drop(listener);
    Ok(port)
}
