//! Database repositories
//!
//! One repository per aggregate. Single-statement operations accept any
//! `PgExecutor` so they run either on the pool or inside an open
//! transaction; multi-statement operations take `&mut PgConnection` and must
//! be called with a live transaction.

pub mod activity_repo;
pub mod area_repo;
pub mod assignment_repo;
pub mod payment_repo;
pub mod user_repo;

pub use activity_repo::ActivityRepository;
pub use area_repo::AreaRepository;
pub use assignment_repo::AssignmentRepository;
pub use payment_repo::PaymentRepository;
pub use user_repo::UserRepository;
