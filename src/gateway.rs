//! Request Gateway
//!
//! TigerStyle: The outward-facing API over [`UserStore`].
//!
//! Each call waits out the simulated latency, runs one store operation under
//! the store lock, and wraps the outcome in an [`ApiResponse`]. Store errors
//! stop here: callers only ever see an envelope.
//!
//! Each operation holds the store's write lock for its whole synchronous
//! body and never across the delay, so concurrent callers never observe a
//! half-applied operation.

use crate::config::GatewayConfig;
use crate::envelope::ApiResponse;
use crate::store::{new_shared_store, SharedUserStore, UserStore, UserStoreError};
use crate::users::{User, UserCreateInput, UserUpdateInput};

/// Async facade over a shared user store. Cheap to clone.
#[derive(Debug, Clone)]
pub struct UserGateway {
    store: SharedUserStore,
    config: GatewayConfig,
}

impl UserGateway {
    /// Wrap an existing shared store.
    pub fn new(store: SharedUserStore, config: GatewayConfig) -> Self {
        Self { store, config }
    }

    /// Take ownership of a store.
    pub fn from_store(store: UserStore, config: GatewayConfig) -> Self {
        Self::new(new_shared_store(store), config)
    }

    /// Handle to the underlying store.
    pub fn store(&self) -> &SharedUserStore {
        &self.store
    }

    pub async fn create_user(&self, input: UserCreateInput) -> ApiResponse<User> {
        tracing::debug!(email = %input.email, "create_user");
        self.dispatch("Failed to create user", move |store| {
            respond(store.create(input), "User created successfully", "Error creating user")
        })
        .await
    }

    pub async fn list_users(&self) -> ApiResponse<Vec<User>> {
        tracing::debug!("list_users");
        self.dispatch("Failed to fetch users", |store| {
            ApiResponse::ok(store.list(), "Users retrieved successfully")
        })
        .await
    }

    pub async fn get_user(&self, id: &str) -> ApiResponse<User> {
        tracing::debug!(user_id = %id, "get_user");
        let id = id.to_string();
        self.dispatch(format!("Failed to fetch user with ID {id}"), move |store| {
            respond(store.find(&id), "User retrieved successfully", "Error fetching user")
        })
        .await
    }

    pub async fn update_user(&self, id: &str, input: UserUpdateInput) -> ApiResponse<User> {
        tracing::debug!(user_id = %id, "update_user");
        let id = id.to_string();
        self.dispatch(format!("Failed to update user with ID {id}"), move |store| {
            respond(store.update(&id, input), "User updated successfully", "Error updating user")
        })
        .await
    }

    pub async fn delete_user(&self, id: &str) -> ApiResponse<()> {
        tracing::debug!(user_id = %id, "delete_user");
        let id = id.to_string();
        self.dispatch(format!("Failed to delete user with ID {id}"), move |store| {
            match store.delete(&id) {
                Ok(()) => ApiResponse::done("User deleted successfully"),
                Err(e) => {
                    tracing::warn!(user_id = %id, error = %e, "Error deleting user");
                    ApiResponse::failure(&e)
                }
            }
        })
        .await
    }

    pub async fn reset_all(&self) -> ApiResponse<()> {
        tracing::debug!("reset_all");
        self.dispatch("Failed to reset database", |store| {
            store.reset();
            tracing::info!("user store reset to seed set");
            ApiResponse::done("Database reset successfully")
        })
        .await
    }

    /// Run `op` on a spawned task after the simulated delay.
    ///
    /// The task owns the work: dropping the returned future stops the wait
    /// for the answer, not the operation itself.
    async fn dispatch<T, F>(&self, fallback: impl Into<String>, op: F) -> ApiResponse<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut UserStore) -> ApiResponse<T> + Send + 'static,
    {
        let store = self.store.clone();
        let delay = self.config.delay;

        let task = tokio::spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            let mut guard = store.write().await;
            op(&mut *guard)
        });

        match task.await {
            Ok(response) => response,
            Err(e) => {
                let fallback = fallback.into();
                tracing::error!(error = %e, "{}", fallback);
                ApiResponse::internal(fallback)
            }
        }
    }
}

fn respond<T>(
    result: Result<T, UserStoreError>,
    success_message: &str,
    failure_context: &str,
) -> ApiResponse<T> {
    match result {
        Ok(data) => ApiResponse::ok(data, success_message),
        Err(e) => {
            tracing::warn!(error = %e, "{}", failure_context);
            ApiResponse::failure(&e)
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
