use std::rc::Rc;

/// Handle to a zero-argument change callback.
///
/// Handles are reference counted. Clones compare equal to each other and to
/// the handle they were cloned from; two handles built from separate
/// `Callback::new` calls never compare equal, even for the same closure body.
/// Keep a clone around to unsubscribe later.
#[derive(Clone)]
pub struct Callback(Rc<dyn Fn()>);

impl Callback {
    pub fn new(f: impl Fn() + 'static) -> Self {
        Self(Rc::new(f))
    }

    /// Run the callback.
    pub fn call(&self) {
        (self.0)()
    }
}

impl PartialEq for Callback {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Callback {}

impl std::fmt::Debug for Callback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Callback({:p})", Rc::as_ptr(&self.0).cast::<()>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn clones_are_equal() {
        let a = Callback::new(|| {});
        let b = a.clone();
        assert_eq!(a, b);
    }

    #[test]
    fn separate_handles_differ() {
        let a = Callback::new(|| {});
        let b = Callback::new(|| {});
        assert_ne!(a, b);
    }

    #[test]
    fn call_runs_closure() {
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        let cb = Callback::new(move || h.set(h.get() + 1));
        cb.call();
        cb.clone().call();
        assert_eq!(hits.get(), 2);
    }
}
