use tokio::sync::watch;

/// Source of online/offline state. Subscribers observe every transition
/// through the returned watch receiver.
pub trait Connectivity: Send + Sync {
    fn is_online(&self) -> bool;
    fn subscribe(&self) -> watch::Receiver<bool>;
}
