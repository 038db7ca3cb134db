pub mod achievement;
pub mod import_result;
pub mod session;
pub mod settings;

pub use achievement::{Achievement, AchievementDef, Condition};
pub use import_result::ImportResult;
pub use session::{NewSession, SetRecord, WorkoutSession};
pub use settings::{AppSettings, SettingsPatch};
