mod reader;
mod selector;

pub use reader::{LocalStore, PlayerLevelData, StoreError};
pub use selector::select_active_file;

#[cfg(test)]
pub(crate) mod test_support {
    pub(crate) use super::reader::tests::{write_store, LEVEL_DATA};
}
