pub mod config;
pub mod core;
pub mod error;
pub mod forms;
pub mod hr;
pub mod runtime;
pub mod terminal;
pub mod ui;
pub mod widgets;

pub use error::{Error, Result};

pub use widgets::components::date_picker;
pub use widgets::components::dropdown;
pub use widgets::shared::calendar;

pub use ui::renderer;
pub use ui::span;
pub use ui::style;
