//! Execution/command thread rendezvous.
//!
//! A single-slot semaphore rather than a bare condition variable: a
//! `proceed()` issued before the execution thread reaches `wait()` leaves the
//! slot armed so the next `wait()` returns immediately. This closes the
//! lost-wakeup window on very fast steps right after a resume.
//!
//! There is at most one waiter in this system (the runtime's execution
//! thread); no ordering is guaranteed between concurrent waiters.

use parking_lot::{Condvar, Mutex};

type BeforeWaitCallback = Box<dyn Fn() + Send + Sync>;

pub struct Rendezvous {
    permit: Mutex<bool>,
    released: Condvar,
    before_wait: Mutex<Vec<BeforeWaitCallback>>,
}

impl Rendezvous {
    pub fn new() -> Self {
        Self {
            permit: Mutex::new(false),
            released: Condvar::new(),
            before_wait: Mutex::new(Vec::new()),
        }
    }

    /// Register instrumentation run on the waiting thread just before it
    /// parks. Callbacks must not call back into the rendezvous.
    pub fn on_before_wait(&self, callback: impl Fn() + Send + Sync + 'static) {
        self.before_wait.lock().push(Box::new(callback));
    }

    /// Block until `proceed` has been invoked at least once since the last
    /// `wait` returned.
    pub fn wait(&self) {
        for callback in self.before_wait.lock().iter() {
            callback();
        }
        let mut permit = self.permit.lock();
        while !*permit {
            self.released.wait(&mut permit);
        }
        *permit = false;
    }

    /// Release one waiter, or arm the slot when nobody is waiting yet.
    pub fn proceed(&self) {
        let mut permit = self.permit.lock();
        *permit = true;
        self.released.notify_one();
    }
}

impl Default for Rendezvous {
    fn default() -> Self {
        Self::new()
    }
}
