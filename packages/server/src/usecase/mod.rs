//! UseCase 層
//!
//! ルーム（アクター）、接続ごとのポンプ、接続の受け入れを実装するレイヤー。
//! UI 層から呼び出され、Domain 層を操作します。

pub mod client;
pub mod error;
pub mod room;
pub mod serve_connection;

pub use client::{InboundExit, InboundPump, OutboundExit, OutboundPump};
pub use error::RoomError;
pub use room::{DEFAULT_FORWARD_CAPACITY, Room, RoomHandle, RoomSnapshot};
pub use serve_connection::{ConnectionSummary, DEFAULT_OUTBOUND_CAPACITY, ServeConnectionUseCase};
