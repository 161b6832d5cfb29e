// Core types for the hubgate GitHub tool gateway

pub mod content;
pub mod error;
pub mod pagination;
pub mod session;

pub use error::{classify, ErrorEnvelope, ErrorKind, GitHubError, GitHubResult, RateLimitHeaders};
pub use pagination::{parse_link_header, Pagination, ResultEnvelope};
pub use session::{RepoScope, RepoSnapshot, SessionState, StreamFrame, StreamSession};
