//! Server state shared by the handlers.

use crate::usecase::RoomHandle;

/// Shared application state
pub struct AppState {
    /// Handle to the room event loop
    pub room: RoomHandle,
    /// Capacity of the outbound queue given to each new connection
    pub outbound_capacity: usize,
}

impl AppState {
    pub fn new(room: RoomHandle, outbound_capacity: usize) -> Self {
        Self {
            room,
            outbound_capacity,
        }
    }
}
