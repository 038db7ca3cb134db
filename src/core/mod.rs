pub mod achievements;
pub mod backup;
pub mod config;
pub mod counter;
pub mod del;
pub mod export;
pub mod import;
pub mod log;
pub mod reminder;
pub mod session;
pub mod settings;
pub mod stats;

pub use achievements::AchievementLogic;
pub use del::DeleteLogic;
pub use export::ExportLogic;
pub use import::{ImportLogic, ImportOptions};
pub use session::SessionLogic;
pub use settings::SettingsLogic;
pub use stats::{Period, StatsLogic};
