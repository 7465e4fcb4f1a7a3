pub mod comments;
pub mod sse;
