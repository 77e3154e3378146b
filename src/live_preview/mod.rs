//! Live-preview decorations
//!
//! Each markdown construct has a decorator that turns syntax nodes into
//! presentational instructions. Constructs away from the cursor are
//! "collapsed" (delimiters hidden, widgets substituted); constructs the
//! cursor touches are "revealed" (raw syntax shown with marker styling).
//! The composer runs them all and merges the output.

pub mod alerts;
pub mod blockquotes;
pub mod code;
pub mod composer;
pub mod cursor;
pub mod decoration;
pub mod emphasis;
pub mod footnotes;
pub mod headings;
pub mod horizontal_rules;
pub mod links;
pub mod lists;
pub mod math;

pub use composer::{compose, Construct, LivePreview};
pub use decoration::{Decoration, DecorationContext, TableWidget, Widget};
pub use links::link_target_at;
pub use lists::toggle_checkbox;
