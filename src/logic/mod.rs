pub mod poller;

pub use poller::{Poller, SharedState, fetch_ping_results, lock_state, poller_task};
