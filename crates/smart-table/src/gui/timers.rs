use smartmenu::gesture::{TimerId, Timers};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

type Sources = Rc<RefCell<HashMap<TimerId, glib::SourceId>>>;

/// One-shot timers on the GTK main loop.
///
/// A fired source drops its own entry before notifying, so `cancel` never
/// removes a source glib has already destroyed.
pub struct GlibTimers {
    next_id: u64,
    sources: Sources,
    on_fire: Rc<dyn Fn(TimerId)>,
}

impl GlibTimers {
    pub fn new(on_fire: impl Fn(TimerId) + 'static) -> Self {
        Self {
            next_id: 0,
            sources: Rc::default(),
            on_fire: Rc::new(on_fire),
        }
    }
}

impl Timers for GlibTimers {
    fn arm(&mut self, delay: Duration) -> TimerId {
        let id = TimerId::from(self.next_id);
        self.next_id += 1;

        let sources = self.sources.clone();
        let on_fire = self.on_fire.clone();
        let source = glib::timeout_add_local_once(delay, move || {
            sources.borrow_mut().remove(&id);
            on_fire(id);
        });
        self.sources.borrow_mut().insert(id, source);
        log::trace!("armed timer {} for {:?}", id, delay);
        id
    }

    fn cancel(&mut self, id: TimerId) {
        if let Some(source) = self.sources.borrow_mut().remove(&id) {
            source.remove();
            log::trace!("cancelled timer {}", id);
        }
    }
}

impl Drop for GlibTimers {
    fn drop(&mut self) {
        for (_, source) in self.sources.borrow_mut().drain() {
            source.remove();
        }
    }
}
