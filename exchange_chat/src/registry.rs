use std::{
    collections::HashSet,
    net::SocketAddr,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

/// A connected client is identified by its peer address.
pub type ConnectedClient = SocketAddr;

#[derive(Clone, Debug, Default)]
pub struct ConnectionRegistry(Arc<Mutex<HashSet<ConnectedClient>>>);

impl ConnectionRegistry {
    fn clients(&self) -> MutexGuard<'_, HashSet<ConnectedClient>> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn add(&self, client: ConnectedClient) -> bool {
        self.clients().insert(client)
    }

    pub fn remove(&self, client: &ConnectedClient) -> bool {
        self.clients().remove(client)
    }

    pub fn contains(&self, client: &ConnectedClient) -> bool {
        self.clients().contains(client)
    }

    pub fn len(&self) -> usize {
        self.clients().len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients().is_empty()
    }

    pub fn snapshot(&self) -> Vec<ConnectedClient> {
        self.clients().iter().copied().collect()
    }

    /// Adds `client` until the returned guard is dropped.
    pub fn register(&self, client: ConnectedClient) -> Registration {
        if !self.add(client) {
            tracing::warn!("{client} was already registered");
        }
        Registration {
            registry: self.clone(),
            client,
        }
    }
}

#[derive(Debug)]
pub struct Registration {
    registry: ConnectionRegistry,
    client: ConnectedClient,
}

impl Drop for Registration {
    fn drop(&mut self) {
        self.registry.remove(&self.client);
    }
}
