pub mod evaluation_repo;
pub mod job_repo;
pub mod order_repo;
pub mod user_repo;

pub use evaluation_repo::EvaluationRepository;
pub use job_repo::JobRepository;
pub use order_repo::OrderRepository;
pub use user_repo::UserRepository;
