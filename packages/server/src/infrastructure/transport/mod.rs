//! Frame transport implementations.
//!
//! Implementations of the domain's `FrameReader` / `FrameWriter` seams. The
//! pumps depend on the traits only, never on these types directly.

#[cfg(test)]
pub mod memory;
pub mod websocket;

#[cfg(test)]
pub use memory::{MemoryPeer, MemoryReader, MemoryWriter, memory_transport};
pub use websocket::{WebSocketReader, WebSocketWriter, split_websocket};
