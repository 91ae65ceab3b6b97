//! Session lifecycle: token persistence, user resolution with silent refresh,
//! and the access policy. The store never logs token material.

pub mod error;
pub mod policy;
pub mod storage;
pub mod store;
pub mod types;

pub use self::error::{SessionError, StorageError};
pub use self::policy::is_authorized;
pub use self::storage::{FileStorage, MemoryStorage, StoredTokens, TokenStorage};
pub use self::store::{SessionSnapshot, SessionStore, UserLookup};
pub use self::types::{TokenResponse, User};
