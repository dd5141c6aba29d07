//! HTTP/1.1 server, requests and responses.
pub mod body;
pub mod cookies;
pub mod error;
pub mod handler;
pub mod head;
pub mod headers;
pub mod path;
pub mod request;
pub mod response;
pub mod router;
pub mod server;
pub mod url;

pub use body::Body;
pub use cookies::{Cookie, CookieBuilder, Cookies, ToCookie};
pub use error::Error;
pub use handler::Handler;
pub use head::{Head, Method, Version};
pub use headers::Headers;
pub use path::Path;
pub use request::Request;
pub use response::{Response, Status};
pub use router::Router;
pub use server::Server;
pub use url::urldecode;
