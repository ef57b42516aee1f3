pub mod configs;
pub mod networks;
pub mod references;
pub mod secrets;
pub mod services;
pub mod volumes;

pub use configs::rewrite_config_names;
pub use networks::rewrite_network_names;
pub use secrets::{rewrite_root_secrets, rewrite_secret_names};
pub use services::rewrite_service_names;
pub use volumes::rewrite_volume_names;
