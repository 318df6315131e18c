//! Device session collaborators
//!
//! The decoder never owns device state. It asks a [`DeviceResolver`] who is
//! talking and a [`LastFixProvider`] where that device was last seen.
//! [`InMemorySessions`] implements both for the CLI and for tests.

use crate::types::{DeviceId, LastFix};
use log::debug;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Maps a connection (and optionally an IMEI) to a known device
pub trait DeviceResolver {
    /// Device already bound to this connection
    fn resolve_connection(&self, remote: &SocketAddr) -> Option<DeviceId>;

    /// Device identified by the IMEI carried in a frame
    fn resolve_imei(&self, remote: &SocketAddr, imei: &str) -> Option<DeviceId>;
}

/// Read-only access to a device's last known fix
pub trait LastFixProvider {
    fn last_fix(&self, device_id: DeviceId) -> Option<LastFix>;
}

impl<T: DeviceResolver + ?Sized> DeviceResolver for &T {
    fn resolve_connection(&self, remote: &SocketAddr) -> Option<DeviceId> {
        (**self).resolve_connection(remote)
    }

    fn resolve_imei(&self, remote: &SocketAddr, imei: &str) -> Option<DeviceId> {
        (**self).resolve_imei(remote, imei)
    }
}

impl<T: LastFixProvider + ?Sized> LastFixProvider for &T {
    fn last_fix(&self, device_id: DeviceId) -> Option<LastFix> {
        (**self).last_fix(device_id)
    }
}

impl<T: DeviceResolver + ?Sized> DeviceResolver for Arc<T> {
    fn resolve_connection(&self, remote: &SocketAddr) -> Option<DeviceId> {
        (**self).resolve_connection(remote)
    }

    fn resolve_imei(&self, remote: &SocketAddr, imei: &str) -> Option<DeviceId> {
        (**self).resolve_imei(remote, imei)
    }
}

impl<T: LastFixProvider + ?Sized> LastFixProvider for Arc<T> {
    fn last_fix(&self, device_id: DeviceId) -> Option<LastFix> {
        (**self).last_fix(device_id)
    }
}

#[derive(Debug, Default)]
struct SessionTable {
    devices: HashMap<String, DeviceId>,
    connections: HashMap<SocketAddr, DeviceId>,
    last_fixes: HashMap<DeviceId, LastFix>,
    next_id: u64,
}

impl SessionTable {
    fn register(&mut self, imei: &str) -> DeviceId {
        if let Some(&device_id) = self.devices.get(imei) {
            return device_id;
        }
        self.next_id += 1;
        let device_id = DeviceId(self.next_id);
        self.devices.insert(imei.to_string(), device_id);
        device_id
    }
}

/// Thread-safe in-memory device registry and last-fix store
#[derive(Debug, Default)]
pub struct InMemorySessions {
    table: RwLock<SessionTable>,
    register_unknown: bool,
}

impl InMemorySessions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept any IMEI, registering unknown devices on first sight
    pub fn with_register_unknown(mut self, register_unknown: bool) -> Self {
        self.register_unknown = register_unknown;
        self
    }

    /// Register a device by IMEI; registering twice returns the same id
    pub fn register(&self, imei: &str) -> DeviceId {
        self.write().register(imei)
    }

    pub fn device_id(&self, imei: &str) -> Option<DeviceId> {
        self.read().devices.get(imei).copied()
    }

    /// Bind a connection to a device so acknowledgements on it resolve
    pub fn bind(&self, remote: SocketAddr, device_id: DeviceId) {
        self.write().connections.insert(remote, device_id);
    }

    /// Store the fix established by an accepted position
    pub fn record_fix(&self, device_id: DeviceId, fix: LastFix) {
        self.write().last_fixes.insert(device_id, fix);
    }

    pub fn device_count(&self) -> usize {
        self.read().devices.len()
    }

    fn read(&self) -> RwLockReadGuard<'_, SessionTable> {
        self.table.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, SessionTable> {
        self.table.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl DeviceResolver for InMemorySessions {
    fn resolve_connection(&self, remote: &SocketAddr) -> Option<DeviceId> {
        self.read().connections.get(remote).copied()
    }

    fn resolve_imei(&self, remote: &SocketAddr, imei: &str) -> Option<DeviceId> {
        let mut table = self.write();
        let known = table.devices.get(imei).copied();
        let device_id = match known {
            Some(device_id) => device_id,
            None if self.register_unknown => {
                let device_id = table.register(imei);
                debug!("Registered unknown device {} as {}", imei, device_id);
                device_id
            }
            None => {
                debug!("Unknown device {} from {}", imei, remote);
                return None;
            }
        };
        table.connections.insert(*remote, device_id);
        Some(device_id)
    }
}

impl LastFixProvider for InMemorySessions {
    fn last_fix(&self, device_id: DeviceId) -> Option<LastFix> {
        self.read().last_fixes.get(&device_id).cloned()
    }
}
