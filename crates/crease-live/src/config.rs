/// Configuration for a [`LiveMatch`](crate::LiveMatch).
#[derive(Clone, Debug)]
pub struct LiveConfig {
    /// Capacity of the snapshot broadcast channel.
    pub snapshot_capacity: usize,
    /// How many of its own saves a session remembers so their echoes from
    /// the store are not applied back over newer local state.
    pub echo_window: usize,
}

impl Default for LiveConfig {
    fn default() -> Self {
        Self {
            snapshot_capacity: 64,
            echo_window: 256,
        }
    }
}
