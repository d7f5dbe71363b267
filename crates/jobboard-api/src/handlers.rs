//! Request handlers.

pub mod admin;
pub mod applications;
pub mod dashboard;
pub mod health;
pub mod jobs;
pub mod session;

pub use admin::*;
pub use applications::*;
pub use dashboard::*;
pub use health::*;
pub use jobs::*;
pub use session::*;
