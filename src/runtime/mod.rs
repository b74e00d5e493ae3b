//! Scheduling primitives used by the page controllers.
//!
//! A page owns a [`Mailbox`] of its own actions. Timers ([`Debouncer`]) and
//! network tasks ([`WatchedEffect`]) never touch page state directly; they post
//! an action into the mailbox, and the page applies actions one at a time.

mod debounce;
mod effect;

pub use debounce::Debouncer;
pub use effect::WatchedEffect;

use tokio::sync::mpsc;

/// Queue of actions waiting to be applied to a page.
#[derive(Debug)]
pub struct Mailbox<A> {
    tx: mpsc::UnboundedSender<A>,
    rx: mpsc::UnboundedReceiver<A>,
}

impl<A> Mailbox<A> {
    #[must_use]
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx }
    }

    /// A handle background tasks use to post completions.
    #[must_use]
    pub fn sender(&self) -> mpsc::UnboundedSender<A> {
        self.tx.clone()
    }

    /// Wait for the next action.
    ///
    /// The mailbox holds its own sender, so this only returns `None` if the
    /// channel is closed explicitly, which never happens in practice.
    pub async fn recv(&mut self) -> Option<A> {
        self.rx.recv().await
    }

    /// Take the next action if one is already queued.
    pub fn try_recv(&mut self) -> Option<A> {
        self.rx.try_recv().ok()
    }
}

impl<A> Default for Mailbox<A> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mailbox_delivers_in_order() {
        let mut mailbox = Mailbox::new();
        let tx = mailbox.sender();
        tx.send(1).unwrap();
        tx.send(2).unwrap();

        assert_eq!(mailbox.recv().await, Some(1));
        assert_eq!(mailbox.try_recv(), Some(2));
        assert_eq!(mailbox.try_recv(), None);
    }
}
