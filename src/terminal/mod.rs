pub mod backend;

pub use backend::{
    KeyCode, KeyEvent, KeyModifiers, PointerEvent, PointerKind, Terminal,
    TerminalEvent, TerminalSize,
};
