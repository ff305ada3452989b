use std::convert::Infallible;

use bytes::Bytes;
use http_body_util::combinators::BoxBody;
use hyper::{Request, Response};

pub mod admin;
pub mod auth;
pub mod routes;
pub mod session;
pub mod user;
pub mod utils;

/// Request type seen by the middleware stack and handlers.  The connection
/// loop boxes hyper's incoming body into this shape.
pub type ApiRequest = Request<BoxBody<Bytes, hyper::Error>>;

/// Response type produced by every handler.
pub type ApiResponse = Response<BoxBody<Bytes, Infallible>>;
