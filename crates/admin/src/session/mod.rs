//! Authentication state: the session store and its persistence.

mod storage;
mod store;

pub use storage::{FileStorage, MemoryStorage, SessionStorage, StorageError};
pub use store::{LOGIN_FAILED_MESSAGE, LoginOutcome, Session, SessionStore};
