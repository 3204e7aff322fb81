//! App layer - central state management
//!
//! The App actor receives UI events and network responses,
//! updates state, and emits network commands and render state.

pub mod actor;
pub mod navigator;
pub mod state;

pub use actor::AppActor;
pub use navigator::Navigator;
pub use state::AppState;
