use thiserror::Error;

#[derive(Error, Debug)]
pub enum ComposerError {
    #[error("Invalid compose document: {0}")]
    InvalidDocument(String),

    #[error(
        "Domain '{host}' references service '{service}' which is not defined in the compose file. Available services: {}",
        format_available(.available)
    )]
    ServiceNotFound {
        host: String,
        service: String,
        available: Vec<String>,
    },

    #[error("Domain '{host}' has no service name")]
    MissingServiceName { host: String },

    #[error("Invalid disambiguation token '{0}': use letters, digits, '_', '.' or '-' and start with a letter or digit")]
    InvalidToken(String),

    #[error("Renaming '{from}' to '{to}' clashes with the existing '{to}' entry; pick another token")]
    NameCollision { from: String, to: String },
}

fn format_available(available: &[String]) -> String {
    if available.is_empty() {
        "(none)".to_string()
    } else {
        available.join(", ")
    }
}

impl ComposerError {
    pub fn invalid_document(msg: impl Into<String>) -> Self {
        ComposerError::InvalidDocument(msg.into())
    }

    pub fn invalid_token(token: impl Into<String>) -> Self {
        ComposerError::InvalidToken(token.into())
    }

    pub fn name_collision(from: impl Into<String>, to: impl Into<String>) -> Self {
        ComposerError::NameCollision {
            from: from.into(),
            to: to.into(),
        }
    }

    pub fn service_not_found(
        host: impl Into<String>,
        service: impl Into<String>,
        available: Vec<String>,
    ) -> Self {
        ComposerError::ServiceNotFound {
            host: host.into(),
            service: service.into(),
            available,
        }
    }
}

pub type ComposerResult<T> = Result<T, ComposerError>;
