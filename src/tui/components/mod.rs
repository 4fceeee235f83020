// Components module - reusable UI building blocks
//
// Rendered top to bottom:
// - Title bar: app name, session state, processor backend
// - Input box: the input surface (interactive)
// - Buttons: Clear / Paste / Process Text / Copy
// - Output panel: loading indicator, result or error
// - Logs panel: diagnostics (optional)
// - Status bar: key hints
//
// Toasts overlay everything.

pub mod buttons;
pub mod input_box;
pub mod logs_panel;
pub mod output_panel;
pub mod status_bar;
pub mod title_bar;
pub mod toast;

pub use buttons::Button;
pub use input_box::InputBox;
pub use toast::Toast;
