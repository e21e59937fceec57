pub mod app;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod ids;
pub mod ledger;
pub mod models;
pub mod notify;
pub mod poller;
pub mod scheduler;
pub mod seed;
pub mod state;
pub mod stats;
pub mod storage;

pub use app::router;
pub use config::Config;
pub use poller::spawn_reminder_poller;
pub use state::AppState;
pub use storage::load_storage;
