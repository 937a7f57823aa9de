//! UseCase: ルーム（メンバーシップとブロードキャストの調停役）
//!
//! ルームはアクターとして動作する。単一のイベントループが [`Membership`] を所有し、
//! join / leave / forward（ブロードキャスト）/ snapshot の 4 つのキューを処理する。
//! メンバーシップの変更とファンアウトの判断は全てこのループ内で行われるため、ロックは不要。
//!
//! キューは固定の優先順位（join → leave → forward → snapshot）で 1 イベントずつ処理する。
//! そのため、クライアントの join はそのクライアントが後から送るメッセージより必ず先に処理され、
//! snapshot はそれより前に積まれたメッセージを全て反映する。
//! 代わりに、forward キューが空にならない間は snapshot 要求が待たされる。

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};

use crate::domain::{ConnectionId, Member, MemberInfo, Membership, Message, Timestamp};

use super::error::RoomError;

/// 全ての受信ポンプが共有する forward キューのデフォルト容量
pub const DEFAULT_FORWARD_CAPACITY: usize = 256;

/// ある時点のルームの状態
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomSnapshot {
    /// ルームの作成日時
    pub created_at: Timestamp,
    /// 参加中のメンバー（参加が古い順）
    pub members: Vec<MemberInfo>,
}

/// ルームのイベントループ。一度だけ作成され、[`Room::run`] で駆動される
pub struct Room {
    membership: Membership,
    created_at: Timestamp,
    join_rx: mpsc::UnboundedReceiver<Member>,
    leave_rx: mpsc::UnboundedReceiver<ConnectionId>,
    forward_rx: mpsc::Receiver<Message>,
    snapshot_rx: mpsc::UnboundedReceiver<oneshot::Sender<RoomSnapshot>>,
}

/// 接続がルームとやり取りするためのハンドル（Clone 可能）
///
/// 全てのハンドルが破棄されるとループは終了する。
#[derive(Debug, Clone)]
pub struct RoomHandle {
    join_tx: mpsc::UnboundedSender<Member>,
    leave_tx: mpsc::UnboundedSender<ConnectionId>,
    forward_tx: mpsc::Sender<Message>,
    snapshot_tx: mpsc::UnboundedSender<oneshot::Sender<RoomSnapshot>>,
}

impl Room {
    /// ループを起動せずにルームとハンドルを作成
    ///
    /// `forward_capacity` に 0 を渡した場合は 1 として扱う。
    pub fn new(forward_capacity: usize) -> (Self, RoomHandle) {
        let (join_tx, join_rx) = mpsc::unbounded_channel();
        let (leave_tx, leave_rx) = mpsc::unbounded_channel();
        let (forward_tx, forward_rx) = mpsc::channel(forward_capacity.max(1));
        let (snapshot_tx, snapshot_rx) = mpsc::unbounded_channel();

        let room = Self {
            membership: Membership::new(),
            created_at: Timestamp::now(),
            join_rx,
            leave_rx,
            forward_rx,
            snapshot_rx,
        };
        let handle = RoomHandle {
            join_tx,
            leave_tx,
            forward_tx,
            snapshot_tx,
        };
        (room, handle)
    }

    /// ルームを作成し、新しいタスクでループを起動
    pub fn spawn(forward_capacity: usize) -> RoomHandle {
        let (room, handle) = Self::new(forward_capacity);
        tokio::spawn(room.run());
        handle
    }

    /// 全てのハンドルが破棄されるまでイベントループを実行
    pub async fn run(mut self) {
        tracing::info!("Room event loop started");

        loop {
            tokio::select! {
                biased;
                Some(member) = self.join_rx.recv() => self.handle_join(member),
                Some(id) = self.leave_rx.recv() => self.handle_leave(id),
                Some(message) = self.forward_rx.recv() => self.handle_forward(message),
                Some(reply) = self.snapshot_rx.recv() => {
                    // the requester may have given up waiting
                    let _ = reply.send(self.snapshot());
                }
                else => break,
            }
        }

        tracing::info!(
            remaining = self.membership.len(),
            "Room event loop stopped: all handles dropped"
        );
    }

    fn handle_join(&mut self, member: Member) {
        let id = member.id;
        if self.membership.join(member) {
            tracing::warn!(connection_id = %id, "Member joined twice, previous entry replaced");
        }
        tracing::info!(
            connection_id = %id,
            members = self.membership.len(),
            "Member joined"
        );
    }

    fn handle_leave(&mut self, id: ConnectionId) {
        if self.membership.leave(&id) {
            tracing::info!(
                connection_id = %id,
                members = self.membership.len(),
                "Member left"
            );
        } else {
            tracing::debug!(connection_id = %id, "Leave for absent member ignored");
        }
    }

    fn handle_forward(&mut self, message: Message) {
        let outcome = self.membership.broadcast(Arc::new(message));

        for (id, reason) in &outcome.evicted {
            tracing::warn!(connection_id = %id, ?reason, "Member evicted from room");
        }
        tracing::debug!(
            delivered = outcome.delivered,
            evicted = outcome.evicted.len(),
            "Broadcasted message"
        );
    }

    fn snapshot(&self) -> RoomSnapshot {
        RoomSnapshot {
            created_at: self.created_at,
            members: self.membership.member_infos(),
        }
    }
}

impl RoomHandle {
    /// メンバーをルームに登録
    pub fn join(&self, member: Member) -> Result<(), RoomError> {
        self.join_tx.send(member).map_err(|_| RoomError::Closed)
    }

    /// メンバーの削除をルームに依頼。存在しないメンバーの leave は何もしない
    pub fn leave(&self, id: ConnectionId) {
        if self.leave_tx.send(id).is_err() {
            tracing::debug!(connection_id = %id, "Room already stopped, leave dropped");
        }
    }

    /// ブロードキャストするメッセージをルームに渡す
    ///
    /// forward キューが満杯の間は待機する。
    pub async fn forward(&self, message: Message) -> Result<(), RoomError> {
        self.forward_tx
            .send(message)
            .await
            .map_err(|_| RoomError::Closed)
    }

    /// ある時点のルームの状態を取得
    pub async fn snapshot(&self) -> Result<RoomSnapshot, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.snapshot_tx
            .send(reply_tx)
            .map_err(|_| RoomError::Closed)?;
        reply_rx.await.map_err(|_| RoomError::Closed)
    }
}
