//! Business logic services.

pub mod admin_console;
pub mod applications;
pub mod dashboard;
pub mod job_posting;
pub mod listing;
pub mod session;
pub mod store;

pub use admin_console::{AdminConsole, AdminConsoleRegistry, AdminConsoleService};
pub use applications::ApplicationService;
pub use dashboard::DashboardService;
pub use job_posting::JobPostingService;
pub use listing::{JobDetail, ListingService};
pub use session::SessionResolver;
pub use store::{ApplicationStore, JobStore, ProfileStore};
