//! UseCase 層のエラー定義

use thiserror::Error;

/// [`RoomHandle`](super::RoomHandle) が返すエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RoomError {
    /// ルームのイベントループが停止している
    #[error("room is no longer running")]
    Closed,
}
