pub(crate) mod envelope;
/// The file backed document store.
pub mod store;

pub use envelope::Meta;
pub use store::{StorageError, Store};
