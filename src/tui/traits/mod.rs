//! Input routing contracts for TUI components
//!
//! The App routes keys in layers: global shortcuts first, then the focused
//! component. A component that does not consume a key returns
//! [`Handled::No`] and the key bubbles back up to the App.
//!
//! ```text
//! KeyEvent
//!    │
//!    ▼
//! App (global: Esc, Ctrl+C, Tab, F2, Ctrl+L/V/P/Y)
//!    │
//!    │ if not handled
//!    ▼
//! Focused component (Interactive::handle_key)
//!    │
//!    │ Handled::No
//!    ▼
//! App (fallback: Enter submits)
//! ```

mod interactive;

pub use interactive::{Handled, Interactive};
