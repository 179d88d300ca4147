pub mod assertion;
pub mod error;
pub mod json_path;
pub mod report;
pub mod request;
pub mod response;
