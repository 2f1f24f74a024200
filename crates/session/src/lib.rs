//! Session: the per-frame loop and the host lifecycle that owns it.
//!
//! # Invariants
//! - Each frame reads one input snapshot, advances the world once, then draws.
//! - A cancelled loop neither advances nor draws.
//! - Unmounting deregisters the key listener and cancels the loop; dropping a
//!   mounted session does both.
//! - Single-threaded: the host drives frames and key events from one thread.

mod frame;
mod lifecycle;

pub use frame::{CancelToken, Frame, FrameLoop};
pub use lifecycle::Session;
