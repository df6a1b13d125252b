mod args;
mod handler;

pub use args::parse_request;
pub use args::AxisWord;
pub use args::Request;
pub use args::MAX_AXIS_WORDS;
pub use handler::handle;
pub use handler::Error;
