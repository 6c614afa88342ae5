pub mod date_picker;
pub mod dropdown;

pub use date_picker::CalendarPicker;
pub use dropdown::{SelectDropdown, SelectOption};
