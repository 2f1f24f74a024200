use std::cell::{Cell, RefCell};
use std::rc::Rc;

use roamfield_input::InputState;
use roamfield_kernel::{TickReport, World, WorldEvent};
use roamfield_render::{DrawList, RenderView, Renderer};

/// Shared stop flag for a [`FrameLoop`]. Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Rc<Cell<bool>>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

/// Result of one [`FrameLoop::tick`].
#[derive(Debug)]
pub enum Frame<T> {
    /// The world advanced and the renderer produced `output`. Schedule another.
    Drawn { report: TickReport, output: T },
    /// The loop was cancelled. Do not schedule again.
    Halted,
}

impl<T> Frame<T> {
    pub fn is_halted(&self) -> bool {
        matches!(self, Self::Halted)
    }

    pub fn output(self) -> Option<T> {
        match self {
            Self::Drawn { output, .. } => Some(output),
            Self::Halted => None,
        }
    }
}

/// Drives the world one tick per host frame and hands the result to a renderer.
pub struct FrameLoop {
    world: World,
    input: Rc<RefCell<InputState>>,
    cancel: CancelToken,
}

impl FrameLoop {
    pub fn new(world: World, input: Rc<RefCell<InputState>>, cancel: CancelToken) -> Self {
        Self {
            world,
            input,
            cancel,
        }
    }

    /// Run one frame: cancellation check, input snapshot, world advance, draw.
    pub fn tick<R: Renderer>(&mut self, renderer: &mut R) -> Frame<R::Output> {
        if self.cancel.is_cancelled() {
            tracing::trace!("frame loop cancelled, not scheduling");
            return Frame::Halted;
        }
        let _span = tracing::info_span!("frame", tick = self.world.tick() + 1).entered();

        let snapshot = *self.input.borrow();
        let report = self.world.advance(&snapshot);

        let scene = DrawList::from_world(&self.world);
        let view = RenderView::from_camera(self.world.camera());
        let output = renderer.render(&scene, &view);

        Frame::Drawn { report, output }
    }

    pub fn is_running(&self) -> bool {
        !self.cancel.is_cancelled()
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Take the events the world logged since the last drain.
    pub fn drain_events(&mut self) -> Vec<WorldEvent> {
        self.world.drain_events()
    }
}
