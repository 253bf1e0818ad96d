pub mod month_window;

pub use month_window::{resolve_target_month, MonthWindow};
