pub mod connections;
pub mod diagnostics;
pub mod insights;
pub mod profiles;
pub mod users;

pub use connections::{ConnectionRepository, ConnectionSummary, NewConnection};
pub use diagnostics::DiagnosticsRepository;
pub use insights::{InsightCard, InsightRepository};
pub use profiles::{Profile, ProfileRepository};
pub use users::{RecentUser, UserRepository, UserSummary};
