pub mod labels;
pub mod validator;

pub use labels::{add_domains_to_compose, create_domain_labels, DomainLabelOptions, Entrypoint};
pub use validator::assert_domains_match_services;
