//! UseCase: クライアント（接続アダプタ）の受信・送信ポンプ
//!
//! 接続ごとに 2 つのポンプが動作する。
//!
//! - [`InboundPump`]: フレームを読み込み、送信者の表示名と現在時刻を付けた [`Message`] に変換してルームに転送する
//! - [`OutboundPump`]: 接続の送信キューを排出し、各メッセージをフレームとして書き込む
//!
//! どちらのポンプも共有の [`ConnectionCloser`] で接続を終了できる。
//! writer に触れるのは送信ポンプだけで、送信ポンプはルームにクライアントの削除を依頼しない。
//! キューが閉じられることがルームからの合図であり、その逆はない。

use crate::{
    domain::{
        ConnectionCloser, ConnectionId, Frame, FrameReader, FrameWriter, Message, MessageContent,
        OutboundReceiver, Timestamp, TransportError, UserName,
    },
    infrastructure::dto::websocket::{IncomingMessage, OutgoingMessage},
};

use super::room::RoomHandle;

/// 受信ポンプの終了理由
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundExit {
    /// 相手が接続を閉じた
    PeerClosed,
    /// フレームの読み込みに失敗した
    ReadFailed(TransportError),
    /// 送信ポンプが接続を閉じた
    ConnectionClosed,
    /// ルームのループが存在しない
    RoomClosed,
}

/// 送信ポンプの終了理由
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundExit {
    /// ルームが送信キューを閉じた（leave または追い出し）。キューは排出済み
    QueueClosed,
    /// フレームの書き込みに失敗した
    WriteFailed(TransportError),
    /// 受信ポンプが接続を閉じた
    ConnectionClosed,
}

/// 受信ポンプ（transport のフレーム → ルーム）
pub struct InboundPump<R> {
    id: ConnectionId,
    name: Option<UserName>,
    reader: R,
    room: RoomHandle,
    closer: ConnectionCloser,
}

impl<R: FrameReader> InboundPump<R> {
    /// 新しい InboundPump を作成
    pub fn new(
        id: ConnectionId,
        name: Option<UserName>,
        reader: R,
        room: RoomHandle,
        closer: ConnectionCloser,
    ) -> Self {
        Self {
            id,
            name,
            reader,
            room,
            closer,
        }
    }

    /// 接続が終わるまで読み込み、終了時に close を通知
    pub async fn run(mut self) -> InboundExit {
        let exit = loop {
            let frame = tokio::select! {
                _ = self.closer.closed() => break InboundExit::ConnectionClosed,
                frame = self.reader.read_frame() => frame,
            };

            let frame = match frame {
                Ok(Some(frame)) => frame,
                Ok(None) => break InboundExit::PeerClosed,
                Err(e) => {
                    tracing::warn!(connection_id = %self.id, "WebSocket error: {}", e);
                    break InboundExit::ReadFailed(e);
                }
            };

            let Some(message) = self.to_message(frame) else {
                continue;
            };

            if self.room.forward(message).await.is_err() {
                tracing::error!(connection_id = %self.id, "Room is gone, dropping connection");
                break InboundExit::RoomClosed;
            }
        };

        self.closer.close();
        exit
    }

    /// フレームからメッセージを作成。不正なフレームはログに出してスキップする
    fn to_message(&self, frame: Frame) -> Option<Message> {
        let raw = match IncomingMessage::content_from_frame(frame) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(connection_id = %self.id, "Dropping frame: {}", e);
                return None;
            }
        };

        match MessageContent::new(raw) {
            Ok(content) => Some(Message::new(content, self.name.clone(), Timestamp::now())),
            Err(e) => {
                tracing::warn!(connection_id = %self.id, "Invalid message content: {}", e);
                None
            }
        }
    }
}

/// 送信ポンプ（送信キュー → transport のフレーム）
pub struct OutboundPump<W> {
    id: ConnectionId,
    writer: W,
    queue: OutboundReceiver,
    closer: ConnectionCloser,
}

impl<W: FrameWriter> OutboundPump<W> {
    /// 新しい OutboundPump を作成
    pub fn new(
        id: ConnectionId,
        writer: W,
        queue: OutboundReceiver,
        closer: ConnectionCloser,
    ) -> Self {
        Self {
            id,
            writer,
            queue,
            closer,
        }
    }

    /// キューが閉じるか接続が終わるまでメッセージを書き込み、最後に transport を閉じる
    ///
    /// 相手が接続したまま受信を止めると、`write_frame` の中で待ち続ける。
    /// その間は追い出されてキューが閉じても気付かず、接続は終了しない。
    /// 書き込みのタイムアウトは設けていない。
    pub async fn run(mut self) -> OutboundExit {
        let exit = loop {
            let next = tokio::select! {
                biased;
                _ = self.closer.closed() => break OutboundExit::ConnectionClosed,
                next = self.queue.recv() => next,
            };

            let Some(message) = next else {
                break OutboundExit::QueueClosed;
            };

            let payload = match OutgoingMessage::from(message.as_ref()).to_json() {
                Ok(payload) => payload,
                Err(e) => {
                    tracing::error!(connection_id = %self.id, "Failed to serialize message: {}", e);
                    continue;
                }
            };

            let written = tokio::select! {
                biased;
                _ = self.closer.closed() => break OutboundExit::ConnectionClosed,
                written = self.writer.write_frame(Frame::Text(payload)) => written,
            };

            if let Err(e) = written {
                tracing::warn!(connection_id = %self.id, "Failed to send message: {}", e);
                break OutboundExit::WriteFailed(e);
            }
        };

        self.closer.close();
        self.writer.close().await;
        exit
    }
}
