use std::{cell::RefCell, rc::Rc};

use shared::domain::TickIndex;

use crate::error::ViewError;

/// A presentation unit driven by the playback clock.
///
/// Between a reset and the next pause the controller calls `tick` with
/// strictly consecutive indices, but playback may resume from a paused tick,
/// so implementations must not assume a fresh start on every run. Both calls
/// must return promptly; animations are detached from the caller.
pub trait View {
    /// Render the delta for advancing to `tick`, always in `0..max_ticks`.
    fn tick(&mut self, tick: TickIndex) -> Result<(), ViewError>;

    /// Restore the tick-0 presentation. Idempotent.
    fn reset(&mut self) -> Result<(), ViewError>;
}

/// Views stay owned by whoever assembled them; the controller only keeps a handle.
pub type SharedView = Rc<RefCell<dyn View>>;

pub fn share<V: View>(view: V) -> Rc<RefCell<V>> {
    Rc::new(RefCell::new(view))
}
