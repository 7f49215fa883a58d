use async_trait::async_trait;

use crate::domain::{
    models::{User, UserId},
    TimeTrackingError,
};

/// Outbound port for re-reading user snapshots after a write.
#[async_trait]
pub trait UserDirectory: Send + Sync + 'static {
    async fn fresh(&self, user_id: &UserId) -> Result<User, TimeTrackingError>;
}
