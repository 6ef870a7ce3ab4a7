use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// An addressable student resolved from the enrollment store
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct Recipient {
    /// Email address the notice is delivered to
    #[schema(example = "student@example.com")]
    pub email: String,

    /// Display name
    #[schema(example = "Jordan Lee")]
    pub full_name: String,

    /// Role within the class
    #[schema(example = "student")]
    pub role: String,
}
