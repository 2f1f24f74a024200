use std::cell::RefCell;
use std::rc::Rc;

use roamfield_input::{InputState, KeyDispatcher, Subscription};
use roamfield_kernel::{ConfigError, SimConfig, World, WorldEvent};
use roamfield_render::Renderer;

use crate::frame::{CancelToken, Frame, FrameLoop};

/// A mounted scene: world, key listener, and frame loop.
///
/// Created by [`Session::mount`] when the host view appears. [`Session::unmount`]
/// (or dropping the session) releases the key listener and stops the loop.
pub struct Session {
    frame_loop: FrameLoop,
    input: Rc<RefCell<InputState>>,
    subscription: Option<Subscription>,
    cancel: CancelToken,
}

impl Session {
    /// Build the scene from `config` and register for key events on `dispatcher`.
    pub fn mount(config: SimConfig, dispatcher: &KeyDispatcher) -> Result<Self, ConfigError> {
        let world = World::new(config)?;
        let input = Rc::new(RefCell::new(InputState::new()));
        let cancel = CancelToken::new();
        let subscription = dispatcher.subscribe(input.clone(), world.config().keys.clone());
        tracing::info!(seed = world.seed(), tiles = world.tiles().len(), "session mounted");
        Ok(Self {
            frame_loop: FrameLoop::new(world, input.clone(), cancel.clone()),
            input,
            subscription: Some(subscription),
            cancel,
        })
    }

    /// Run one frame. Returns [`Frame::Halted`] once unmounted.
    pub fn frame<R: Renderer>(&mut self, renderer: &mut R) -> Frame<R::Output> {
        self.frame_loop.tick(renderer)
    }

    /// Release the key listener and cancel the frame loop. Idempotent.
    pub fn unmount(&mut self) {
        let had_listener = self.subscription.take().is_some();
        if !self.cancel.is_cancelled() || had_listener {
            self.cancel.cancel();
            self.input.borrow_mut().release_all();
            tracing::info!(tick = self.world().tick(), "session unmounted");
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.subscription.is_some() && self.frame_loop.is_running()
    }

    pub fn world(&self) -> &World {
        self.frame_loop.world()
    }

    /// Take the world events logged since the last drain. Long-running hosts
    /// call this every frame to keep the log bounded.
    pub fn drain_events(&mut self) -> Vec<WorldEvent> {
        self.frame_loop.drain_events()
    }

    /// Snapshot of the held keys.
    pub fn input(&self) -> InputState {
        *self.input.borrow()
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.unmount();
    }
}
