pub mod load;
pub mod save;
pub mod types;

pub use load::SETTINGS_FILE;
pub use types::{
    Config, Language, MAX_EXTRACTION_RETRIES, OutputContainer, PackagerSettings, UserSettings,
};
