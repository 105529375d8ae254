use std::collections::HashMap;
use std::net::TcpListener;
use std::sync::{Arc, Mutex};

/// Real localhost listeners standing in for service processes.
#[derive(Clone, Default)]
pub struct Listeners(Arc<Mutex<HashMap<u16, TcpListener>>>);

impl Listeners {
    pub fn bind(&self, port: u16) {
        let listener = TcpListener::bind(("127.0.0.1", port)).unwrap();
        self.0.lock().unwrap().insert(port, listener);
    }

    /// Returns whether anything was bound.
    pub fn close(&self, port: u16) -> bool {
        self.0.lock().unwrap().remove(&port).is_some()
    }

    pub fn is_bound(&self, port: u16) -> bool {
        self.0.lock().unwrap().contains_key(&port)
    }

    pub fn bound_ports(&self) -> Vec<u16> {
        let mut ports: Vec<u16> = self.0.lock().unwrap().keys().copied().collect();
        ports.sort_unstable();
        ports
    }
}

/// `n` distinct ports nothing is listening on.
pub fn free_ports(n: usize) -> Vec<u16> {
    let held: Vec<TcpListener> = (0..n)
        .map(|_| TcpListener::bind("127.0.0.1:0").unwrap())
        .collect();
    held.iter()
        .map(|l| l.local_addr().unwrap().port())
        .collect()
}
