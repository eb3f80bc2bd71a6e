use crate::module::{Bus, Resources};

/// What a module may touch during one lifecycle call.
///
/// Modules never see the engine itself: shared state goes through typed
/// [`Resources`], notifications through the [`Bus`].
pub struct ModuleCtx<'a, E: Send + 'static> {
    resources: &'a mut Resources,
    bus: &'a Bus<E>,
}

impl<'a, E: Send + 'static> ModuleCtx<'a, E> {
    #[inline]
    pub(crate) fn new(resources: &'a mut Resources, bus: &'a Bus<E>) -> Self {
        Self { resources, bus }
    }

    #[inline]
    pub fn resources(&mut self) -> &mut Resources {
        self.resources
    }

    #[inline]
    pub fn bus(&self) -> &Bus<E> {
        self.bus
    }

    /// Queue a notification for whoever drains the bus (usually the host loop).
    #[inline]
    pub fn publish(&self, ev: impl Into<E>) {
        self.bus.send(ev.into());
    }
}
