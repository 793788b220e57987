pub mod compat;
pub mod compress;
pub mod error;
pub mod format;
pub mod load;
pub mod save;

pub use compress::{load_compressed_file, save_compressed_file};
pub use error::PersistError;
pub use format::MapFile;
pub use load::{load, load_file};
pub use save::{save, save_file};
