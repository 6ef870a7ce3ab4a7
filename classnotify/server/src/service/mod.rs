pub mod attachment;
pub mod compose;
pub mod dispatch;
pub mod error;
mod notify;
mod sql_executor;

pub use self::{error::Error, notify::NotificationService};
