pub mod config;
pub mod site;
pub mod types;

pub use config::ConfigService;
pub use site::SiteService;
pub use types::{
    generate_id, BlogPost, ContactMessage, EntityKind, NewBlogPost, NewContactMessage,
    NewProgram, NewStaff, NewStory, NewSubscription, NewsletterConfig, NewsletterSubscription,
    Program, ServerConfig, SiteConfig, Staff, Story,
};

use crate::db::StoreError;
use crate::schema::ValidationErrors;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(ValidationErrors),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Internal(#[from] anyhow::Error),
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate { message, .. } => ServiceError::Conflict(message.to_string()),
            other => ServiceError::Internal(anyhow::Error::new(other)),
        }
    }
}
