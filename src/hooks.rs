//! Lifecycle hooks the host's serializer calls around persistence.

/// Entry points a host calls before writing a container out and after
/// reading one back in. The raw entry list is already the persisted form,
/// so only loading has work to do.
pub trait PersistHooks {
    /// Called before the raw state is written out.
    fn on_before_persist(&mut self) {}

    /// Called after the raw state has been read in. Rebuilds the lookup
    /// view and advisory flags from the raw list.
    fn on_after_load(&mut self);
}

/// Store a recomputed advisory flag, logging when it changes.
pub(crate) fn update_advisory(flag: &mut bool, raised: bool, what: &str) {
    if *flag != raised {
        if raised {
            log::debug!("advisory raised: {what}");
        } else {
            log::debug!("advisory cleared: {what}");
        }
    }
    *flag = raised;
}

/// Runs `on_after_load` when dropped, including during unwinding, so a
/// panic inside a caller's closure cannot leave the lookup view out of step
/// with a half-edited raw list.
pub(crate) struct ReloadOnDrop<'a, C: PersistHooks + ?Sized>(pub(crate) &'a mut C);

impl<C: PersistHooks + ?Sized> Drop for ReloadOnDrop<'_, C> {
    fn drop(&mut self) {
        self.0.on_after_load();
    }
}
