pub mod mock;
pub mod transport;

pub use transport::{HttpRequest, HttpResponse, HttpTransport, Method, ReqwestTransport, RequestBody};
