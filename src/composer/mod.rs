pub mod document;
pub mod domains;
pub mod engine;
pub mod errors;
pub mod network;
pub mod rewrite;
pub mod token;
pub mod types;

pub use engine::{rewrite_compose_for_deployment, ComposeRewriter};
pub use errors::{ComposerError, ComposerResult};
pub use types::{Domain, RewriteConfig, RewriteMode, RewriteOutput, MANAGED_NETWORK};
