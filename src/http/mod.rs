//! HTTP protocol layer module
//!
//! Content types, response builders, and the streaming file body.

pub mod body;
pub mod mime;
pub mod response;

// Re-export commonly used types
pub use body::FileBody;
pub use response::{
    build_405_response, build_error_response, build_file_response, build_options_response,
    ResponseBody,
};
