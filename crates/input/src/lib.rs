//! Input: the four movement directions, their key bindings, and the host-side
//! dispatcher that routes raw key events into an [`InputState`].
//!
//! # Invariants
//! - Only bound keys mutate input state; everything else is ignored silently.
//! - Key events never advance the simulation, they only flip held flags.
//! - A dropped [`Subscription`] never mutates its state again.

mod binding;
mod dispatch;
mod state;

pub use binding::{BindingError, Direction, KeyBindings};
pub use dispatch::{KeyDispatcher, KeyEvent, Subscription};
pub use state::InputState;
