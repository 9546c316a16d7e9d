//! Presentation-component state machines.
//!
//! Each component owns its state exclusively; nothing here is shared or
//! synchronized. The machines are framework-free so a renderer can poll
//! them from whatever event loop it runs.

pub mod loading;
pub mod nav;
pub mod scroll;

pub use loading::LoadingScreen;
pub use nav::CollapsibleNav;
pub use scroll::{ScrollSection, Visibility};
