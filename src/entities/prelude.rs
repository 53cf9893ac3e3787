pub use super::daily_statistics::Entity as DailyStatistics;
pub use super::entries::Entity as Entries;
pub use super::exits::Entity as Exits;
pub use super::shift_parameters::Entity as ShiftParameters;
