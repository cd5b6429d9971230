use spsi_lib::application::ports::Connectivity;
use tokio::sync::watch;

/// Connectivity driven directly by the test.
pub struct MockConnectivity {
    tx: watch::Sender<bool>,
}

impl MockConnectivity {
    pub fn new(online: bool) -> Self {
        let (tx, _rx) = watch::channel(online);
        Self { tx }
    }

    pub fn go_online(&self) {
        self.tx.send_replace(true);
    }

    pub fn go_offline(&self) {
        self.tx.send_replace(false);
    }
}

impl Connectivity for MockConnectivity {
    fn is_online(&self) -> bool {
        *self.tx.borrow()
    }

    fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}
