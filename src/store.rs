//! User Store
//!
//! TigerStyle: The single owner of the user collection.
//!
//! Every operation is synchronous and either applies completely or leaves the
//! collection untouched. Invariants held between calls:
//! - one record per identifier
//! - no two records share an email (exact, case-sensitive match)
//! - `created_at <= updated_at`, and `updated_at` strictly increases on update

use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::clock::{Clock, SystemClock};
use crate::users::{self, User, UserCreateInput, UserUpdateInput};

/// Records restored by [`UserStore::reset`]: `(id, name, email, age)`.
const SEED_USERS: [(&str, &str, &str, u8); 3] = [
    ("1", "John Doe", "john@example.com", 28),
    ("2", "Jane Smith", "jane@example.com", 32),
    ("3", "Michael Johnson", "michael@example.com", 45),
];

// =============================================================================
// Errors
// =============================================================================

/// Failures raised by store operations. Display text is what callers see.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserStoreError {
    #[error("{0}")]
    Validation(String),

    #[error("Email already exists")]
    DuplicateEmail,

    #[error("User with ID {id} not found")]
    NotFound { id: String },
}

// =============================================================================
// User Store
// =============================================================================

/// In-memory user collection in insertion order.
#[derive(Debug)]
pub struct UserStore {
    users: Vec<User>,
    seed: Vec<User>,
    clock: Arc<dyn Clock>,
}

impl UserStore {
    /// Create a store on wall-clock time, populated with the seed set.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create a store on the given clock, populated with the seed set.
    ///
    /// Seed timestamps are taken once here, so every [`reset`](Self::reset)
    /// restores identical records.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        let now = clock.now();
        let seed: Vec<User> = SEED_USERS
            .iter()
            .map(|&(id, name, email, age)| User {
                id: id.to_string(),
                name: name.to_string(),
                email: email.to_string(),
                age,
                created_at: now,
                updated_at: now,
            })
            .collect();

        Self {
            users: seed.clone(),
            seed,
            clock,
        }
    }

    /// All live records in insertion order. The returned vector is a copy.
    pub fn list(&self) -> Vec<User> {
        self.users.clone()
    }

    /// Number of live records.
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// True if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Look up a record. A missing id is `None`, not an error.
    pub fn get(&self, id: &str) -> Option<User> {
        self.users.iter().find(|u| u.id == id).cloned()
    }

    /// Look up a record that must exist.
    pub fn find(&self, id: &str) -> Result<User, UserStoreError> {
        self.index_of(id).map(|index| self.users[index].clone())
    }

    /// Validate and append a new record.
    pub fn create(&mut self, input: UserCreateInput) -> Result<User, UserStoreError> {
        let age = users::validate_create(&input)?;
        if self.email_taken(&input.email, None) {
            return Err(UserStoreError::DuplicateEmail);
        }

        let now = self.clock.now();
        let user = User {
            id: users::generate_id(now),
            name: input.name,
            email: input.email,
            age,
            created_at: now,
            updated_at: now,
        };
        self.users.push(user.clone());

        tracing::debug!(user_id = %user.id, "user created");
        Ok(user)
    }

    /// Merge supplied fields over an existing record.
    pub fn update(&mut self, id: &str, input: UserUpdateInput) -> Result<User, UserStoreError> {
        let index = self.index_of(id)?;
        let age = users::validate_update(&input)?;
        if let Some(email) = &input.email {
            if self.email_taken(email, Some(id)) {
                return Err(UserStoreError::DuplicateEmail);
            }
        }

        let existing = &self.users[index];
        let updated = User {
            id: existing.id.clone(),
            name: input.name.unwrap_or_else(|| existing.name.clone()),
            email: input.email.unwrap_or_else(|| existing.email.clone()),
            age: age.unwrap_or(existing.age),
            created_at: existing.created_at,
            updated_at: self.next_updated_at(existing.updated_at),
        };
        self.users[index] = updated.clone();

        tracing::debug!(user_id = %id, "user updated");
        Ok(updated)
    }

    /// Remove a record.
    pub fn delete(&mut self, id: &str) -> Result<(), UserStoreError> {
        let index = self.index_of(id)?;
        self.users.remove(index);

        tracing::debug!(user_id = %id, "user deleted");
        Ok(())
    }

    /// Replace the whole collection with the seed set.
    pub fn reset(&mut self) {
        self.users = self.seed.clone();
        tracing::debug!(count = self.users.len(), "user store reset");
    }

    fn index_of(&self, id: &str) -> Result<usize, UserStoreError> {
        self.users
            .iter()
            .position(|u| u.id == id)
            .ok_or_else(|| UserStoreError::NotFound { id: id.to_string() })
    }

    fn email_taken(&self, email: &str, except_id: Option<&str>) -> bool {
        self.users
            .iter()
            .any(|u| u.email == email && Some(u.id.as_str()) != except_id)
    }

    /// Clock time, bumped past `previous` when the clock has not moved.
    fn next_updated_at(&self, previous: DateTime<Utc>) -> DateTime<Utc> {
        let now = self.clock.now();
        if now > previous {
            now
        } else {
            previous + Duration::milliseconds(1)
        }
    }
}

impl Default for UserStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Thread-safe user store
pub type SharedUserStore = Arc<RwLock<UserStore>>;

/// Create a new shared user store
pub fn new_shared_store(store: UserStore) -> SharedUserStore {
    Arc::new(RwLock::new(store))
}

// =============================================================================
// Tests
// =============================================================================
