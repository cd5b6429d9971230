use crate::application::ports::Connectivity;
use tokio::sync::watch;
use tracing::info;

/// Holds the current online state and fans out transitions. The platform
/// layer feeds it through [`ConnectivityMonitor::set_online`].
#[derive(Debug)]
pub struct ConnectivityMonitor {
    tx: watch::Sender<bool>,
}

impl ConnectivityMonitor {
    pub fn new(initially_online: bool) -> Self {
        let (tx, _rx) = watch::channel(initially_online);
        Self { tx }
    }

    /// Records a status report. Repeated reports of the same state are not
    /// forwarded to subscribers.
    pub fn set_online(&self, online: bool) {
        let changed = self.tx.send_if_modified(|current| {
            if *current == online {
                false
            } else {
                *current = online;
                true
            }
        });
        if changed {
            info!(online, "Connectivity changed");
        }
    }
}

impl Connectivity for ConnectivityMonitor {
    fn is_online(&self) -> bool {
        *self.tx.borrow()
    }

    fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}
