pub mod files;
pub mod list_store;
pub mod settings;
pub mod store;

pub use files::{
    atomic_write, ensure_data_dir, get_data_dir, init_local_data_dir, log_file, read_file,
    settings_file,
};
pub use list_store::{next_id_after, seed_items, ListStore, Loaded};
pub use settings::{load_settings, save_settings, Settings};
pub use store::{FileStore, KeyValueStore, MemoryStore};
