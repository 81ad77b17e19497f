//! Transient user notices.
//!
//! Notices ride a single-consumer channel rather than polled state so each
//! one is observed at most once (snackbar semantics).

use tokio::sync::mpsc;

/// A short, dismissible user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
}

impl Notice {
    pub fn text(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Receiving half handed to the screen; take it once per controller.
pub type NoticeReceiver = mpsc::UnboundedReceiver<Notice>;

/// Sending half owned by the controller. Send failures are ignored; a
/// notice with no listener is simply lost.
#[derive(Debug, Clone)]
pub(crate) struct NoticeSender(mpsc::UnboundedSender<Notice>);

impl NoticeSender {
    pub(crate) fn channel() -> (Self, NoticeReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self(tx), rx)
    }

    pub(crate) fn push(&self, notice: Notice) {
        let _ = self.0.send(notice);
    }
}
