pub mod load;
pub mod types;

pub use types::{Config, DEFAULT_BUFFER, DEFAULT_WORKERS, DatePolicy, OutputTarget, RemoteTarget};
