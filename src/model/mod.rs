pub mod app_state;
pub mod ping_result;

pub use app_state::AppState;
pub use ping_result::{Category, PingResult};
