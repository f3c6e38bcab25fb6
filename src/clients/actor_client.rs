//! Reads shared by every typed client.

use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::framework::{ActorEntity, FrameworkError, ResourceClient};

/// A typed wrapper over a [`ResourceClient`] that gets `get` and `list` for free.
///
/// Implementors only say where their `ResourceClient` lives; framework errors
/// become `Self::Error` through its `From<FrameworkError>` impl.
#[async_trait]
pub trait ActorClient<T: ActorEntity>: Send + Sync {
    type Error: From<FrameworkError> + Send + Sync;

    fn inner(&self) -> &ResourceClient<T>;

    /// `None` when there is no such entity.
    #[instrument(skip(self))]
    async fn get(&self, id: T::Id) -> Result<Option<T>, Self::Error> {
        debug!("Sending request");
        Ok(self.inner().get(id).await?)
    }

    /// Every entity, oldest first.
    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<T>, Self::Error> {
        let entities = self.inner().list().await?;
        debug!(count = entities.len(), "Listed");
        Ok(entities)
    }
}
