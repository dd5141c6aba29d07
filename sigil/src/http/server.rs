//! HTTP server.
//!
//! Listens for requests and maps them to a handler, if any exists for the specified path.
//! If no handler is matched, return `404 - Not Found`.
//!
//! Each connection gets its own Tokio task. Connections are kept alive
//! between requests unless the client asks otherwise.
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::io::{AsyncWrite, AsyncWriteExt, BufReader, BufWriter};
use tokio::net::{TcpListener, TcpStream};
use tokio::select;
use tokio::signal::ctrl_c;
use tracing::{debug, error, info};

use super::{Error, Handler, Request, Response, Router};
use crate::colors::MaybeColorize;
use crate::config::{Config, Http};
use crate::session::SessionManager;

/// HTTP server.
pub struct Server {
    handlers: Arc<Router>,
    sessions: Arc<SessionManager>,
    http: Arc<Http>,
    addr: String,
}

impl Server {
    /// Create new HTTP server.
    ///
    /// Accepts a list of routes and their handlers, and the configuration
    /// holding the session secret key.
    pub fn new(handlers: Vec<Handler>, config: &Config) -> Result<Self, Error> {
        Ok(Server {
            handlers: Arc::new(Router::new(handlers)),
            sessions: Arc::new(SessionManager::from_config(config)?),
            http: Arc::new(config.http.clone()),
            addr: format!("{}:{}", config.general.host, config.general.port),
        })
    }

    /// Launch the server on the configured address.
    /// This blocks until the server is shut down (`SIGINT`/Ctrl-C).
    pub async fn launch(self) -> Result<(), Error> {
        let listener = TcpListener::bind(&self.addr).await?;

        select! {
            result = self.serve(listener) => result,
            _ = ctrl_c() => {
                info!("Shutting down...");
                Ok(())
            }
        }
    }

    /// Accept connections from a listener that's already bound.
    pub async fn serve(self, listener: TcpListener) -> Result<(), Error> {
        info!("Starting {} {}", "sigil".green(), "HTTP server".purple());
        self.handlers.log_routes();
        info!("Listening on {}", listener.local_addr()?);

        loop {
            let (stream, peer) = match listener.accept().await {
                Ok(conn) => conn,
                Err(err) => {
                    error!("accept error: {}", err);
                    continue;
                }
            };

            let handlers = self.handlers.clone();
            let sessions = self.sessions.clone();
            let http = self.http.clone();

            tokio::spawn(async move {
                debug!("{} new connection from {:?}", "http".purple(), peer);

                let stream = BufReader::new(BufWriter::new(stream));
                if let Err(err) = Self::handle_connection(stream, peer, handlers, sessions, http).await {
                    debug!("{} client {:?} disconnected: {}", "http".purple(), peer, err);
                }
            });
        }
    }

    async fn handle_connection(
        mut stream: BufReader<BufWriter<TcpStream>>,
        peer: SocketAddr,
        handlers: Arc<Router>,
        sessions: Arc<SessionManager>,
        http: Arc<Http>,
    ) -> Result<(), Error> {
        loop {
            let request = match Request::read(peer, &mut stream, &http, &sessions).await {
                Ok(request) => request,
                Err(err) => {
                    // Tell the client why before hanging up.
                    if let Error::ContentTooLarge(_) | Error::HeaderTooLarge(_) = err {
                        let response = Response::from_error(&err).keep_alive(false);
                        Self::send_response(&mut stream, &response).await?;
                    }

                    return Err(err);
                }
            };

            let start = Instant::now();
            let keep_alive = request.keep_alive();

            let (controller_name, response) = match handlers.find(request.path()) {
                Some(handler) => {
                    let response = match handler.handle_internal(&request).await {
                        Ok(response) => response,
                        Err(err) => {
                            error!("{}", err);
                            Response::internal_error()
                        }
                    };

                    (handler.controller_name(), response)
                }

                None => (std::any::type_name::<Self>(), Response::not_found()),
            };

            let response = match response.finish(&sessions) {
                Ok(response) => response,
                Err(err) => {
                    error!("{}", err);
                    Response::internal_error()
                }
            }
            .keep_alive(keep_alive);

            Self::log(&request, controller_name, &response, start.elapsed());
            Self::send_response(&mut stream, &response).await?;

            if !keep_alive {
                return Ok(());
            }
        }
    }

    fn log(request: &Request, controller_name: &str, response: &Response, duration: Duration) {
        let method = request.method().to_string();
        let path = request.path().base();
        let code = response.status().code();
        let duration = (duration.as_secs_f64() * 1000.0) as f32;

        let code = if code >= 500 {
            code.to_string().red()
        } else if code >= 400 {
            code.to_string().yellow()
        } else {
            code.to_string()
        };

        info!(
            "{} {} {} {} ({:.3} ms)",
            method.purple(),
            path.purple(),
            controller_name.green(),
            code,
            duration,
        );
    }

    async fn send_response(
        mut stream: impl AsyncWrite + Unpin,
        response: &Response,
    ) -> Result<(), Error> {
        response.send(&mut stream).await?;
        stream.flush().await?;

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::controller::{Controller, Error as ControllerError};
    use async_trait::async_trait;
    use tokio::io::AsyncReadExt;

    struct Hello;

    #[async_trait]
    impl Controller for Hello {
        async fn handle(&self, request: &Request) -> Result<Response, ControllerError> {
            let mut session = request.session().to_session();
            session.insert("seen", true);
            Ok(Response::new().text("hello").set_session(session))
        }
    }

    async fn server() -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = Server::new(vec![Hello.route("/hello")], &Config::default()).unwrap();
        tokio::spawn(server.serve(listener));
        addr
    }

    async fn roundtrip(addr: SocketAddr, raw: &str) -> String {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream.write_all(raw.as_bytes()).await.unwrap();

        let mut buf = String::new();
        stream.read_to_string(&mut buf).await.unwrap();
        buf
    }

    #[tokio::test]
    async fn test_serve() {
        let addr = server().await;

        let response = roundtrip(addr, "GET /hello HTTP/1.1\r\nConnection: close\r\n\r\n").await;
        assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(response.contains("set-cookie: sigil_session="));
        assert!(response.contains("connection: close\r\n"));
        assert!(response.ends_with("hello"));

        let response = roundtrip(addr, "GET /nope HTTP/1.1\r\nConnection: close\r\n\r\n").await;
        assert!(response.starts_with("HTTP/1.1 404 Not Found\r\n"));
        assert!(!response.contains("set-cookie"));
    }

    #[tokio::test]
    async fn test_keep_alive() {
        let addr = server().await;

        // Two requests on the same connection, the second one closes it.
        let response = roundtrip(
            addr,
            "GET /hello HTTP/1.1\r\n\r\nGET /hello HTTP/1.1\r\nConnection: close\r\n\r\n",
        )
        .await;
        assert_eq!(response.matches("HTTP/1.1 200 OK").count(), 2);
    }

    #[tokio::test]
    async fn test_content_too_large() {
        let addr = server().await;

        let response = roundtrip(
            addr,
            "POST /hello HTTP/1.1\r\nContent-Length: 999999999\r\n\r\n",
        )
        .await;
        assert!(response.starts_with("HTTP/1.1 413 Content Too Large\r\n"));
    }
}
