//! Company handbook editing

pub mod editor;

pub use editor::{HandbookEditor, HandbookState};
