use crossbeam_channel::{Receiver, Sender};

/// Command/notification queue between modules and the host.
///
/// Producer side: any module can `send`.
/// Consumer side: by rules, the host (or exactly one module) drains it.
pub struct Bus<E: Send + 'static> {
    tx: Sender<E>,
    rx: Receiver<E>,
}

impl<E: Send + 'static> Bus<E> {
    #[inline]
    pub fn new(tx: Sender<E>, rx: Receiver<E>) -> Self {
        Self { tx, rx }
    }

    #[inline]
    pub fn unbounded() -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();
        Self::new(tx, rx)
    }

    #[inline]
    pub fn send(&self, ev: E) {
        let _ = self.tx.send(ev);
    }

    #[inline]
    pub fn try_recv(&self) -> Option<E> {
        self.rx.try_recv().ok()
    }

    #[inline]
    pub fn drain_into(&self, out: &mut Vec<E>) -> usize {
        let mut n = 0usize;
        while let Ok(ev) = self.rx.try_recv() {
            out.push(ev);
            n += 1;
        }
        n
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_preserves_send_order() {
        let bus = Bus::<u32>::unbounded();
        bus.send(1);
        bus.send(2);
        bus.send(3);

        assert_eq!(bus.try_recv(), Some(1));

        let mut out = Vec::new();
        assert_eq!(bus.drain_into(&mut out), 2);
        assert_eq!(out, vec![2, 3]);
        assert!(bus.try_recv().is_none());
    }
}
