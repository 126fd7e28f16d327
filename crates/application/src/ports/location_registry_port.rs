//! Location registry port

use async_trait::async_trait;
use domain::Location;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port providing the set of monitored locations
#[cfg_attr(test, automock)]
#[async_trait]
pub trait LocationRegistryPort: Send + Sync {
    /// All locations to refresh, names unique
    async fn locations(&self) -> Result<Vec<Location>, ApplicationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn _assert_object_safe(_: &dyn LocationRegistryPort) {}

    #[test]
    fn trait_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn LocationRegistryPort>();
    }
}
