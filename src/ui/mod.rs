//! UI services and chrome descriptors
//!
//! Nothing here draws anything. These are the pieces a host UI needs to
//! present the editor: transient toasts, stylesheets to inject, the math
//! renderer, clipboard access, and toolbar/context-menu descriptors.

pub mod clipboard;
pub mod context_menu;
pub mod math;
mod services;
pub mod styles;
pub mod toast;
pub mod toolbar;

pub use clipboard::{ClipboardBackend, MemoryClipboard, SystemClipboard};
pub use context_menu::{run_menu_action, show_context_menu, ContextMenu, MenuAction, MenuItem, TableTarget};
pub use math::{MathRenderer, MathService, MathView, LatexRenderer};
pub use services::UiServices;
pub use styles::StyleInjector;
pub use toast::{Toast, ToastKind, ToastService};
pub use toolbar::{toolbar_buttons, ToolbarButton, ToolbarItem, DEFAULT_TOOLBAR_ITEMS};
