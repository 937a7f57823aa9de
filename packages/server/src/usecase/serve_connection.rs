//! UseCase: 接続の受け入れから退室まで
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ServeConnectionUseCase::execute() メソッド
//! - join → ポンプ起動 → 受信ポンプ終了 → leave の一連の流れ
//!
//! ### なぜこのテストが必要か
//! - 接続終了時には必ず Room から削除されることを保証
//! - 追い出し済みのクライアントに対する leave も問題なく処理されることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：2 クライアント間でメッセージが届き、切断で退室する
//! - 異常系：Room が停止している
//! - エッジケース：送信が詰まったクライアントが追い出される

use tokio::sync::mpsc;

use crate::domain::{
    ConnectionCloser, ConnectionId, ConnectionIdFactory, FrameReader, FrameWriter, Member,
    Timestamp, UserName,
};

use super::{
    client::{InboundExit, InboundPump, OutboundExit, OutboundPump},
    error::RoomError,
    room::RoomHandle,
};

/// クライアントごとの送信キューのデフォルト容量
pub const DEFAULT_OUTBOUND_CAPACITY: usize = 256;

/// 接続の終了結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionSummary {
    pub id: ConnectionId,
    pub inbound: InboundExit,
    /// 送信ポンプのタスクが panic またはキャンセルされた場合は `None`
    pub outbound: Option<OutboundExit>,
}

/// 接続を Room に参加させ、切断まで面倒を見るユースケース
#[derive(Debug, Clone)]
pub struct ServeConnectionUseCase {
    room: RoomHandle,
    outbound_capacity: usize,
}

impl ServeConnectionUseCase {
    /// 新しい ServeConnectionUseCase を作成
    ///
    /// `outbound_capacity` に 0 を渡した場合は 1 として扱う。
    pub fn new(room: RoomHandle, outbound_capacity: usize) -> Self {
        Self {
            room,
            outbound_capacity: outbound_capacity.max(1),
        }
    }

    /// 1 つの接続を終了まで処理
    ///
    /// ルームに参加し、送信ポンプを起動して、受信ポンプを現在のタスクで実行する。
    /// 受信ポンプが終了したら無条件に leave する（既に追い出されている場合もある）。
    ///
    /// # Errors
    ///
    /// * `RoomError::Closed` - ルームが動作していない（writer は閉じられる）
    pub async fn execute<R, W>(
        &self,
        reader: R,
        mut writer: W,
        name: Option<UserName>,
    ) -> Result<ConnectionSummary, RoomError>
    where
        R: FrameReader,
        W: FrameWriter + 'static,
    {
        let id = ConnectionIdFactory::generate();
        let (outbound_tx, outbound_rx) = mpsc::channel(self.outbound_capacity);

        let member = Member::new(id, name.clone(), Timestamp::now(), outbound_tx);
        if let Err(e) = self.room.join(member) {
            writer.close().await;
            return Err(e);
        }
        tracing::info!(
            connection_id = %id,
            user = name.as_ref().map(UserName::as_str).unwrap_or("<anonymous>"),
            "Client connected"
        );

        let closer = ConnectionCloser::new();
        let outbound_task =
            tokio::spawn(OutboundPump::new(id, writer, outbound_rx, closer.clone()).run());

        let inbound = InboundPump::new(id, name, reader, self.room.clone(), closer)
            .run()
            .await;

        self.room.leave(id);

        let outbound = match outbound_task.await {
            Ok(exit) => Some(exit),
            Err(e) => {
                tracing::error!(connection_id = %id, "Outbound pump task failed: {}", e);
                None
            }
        };

        tracing::info!(
            connection_id = %id,
            ?inbound,
            ?outbound,
            "Client disconnected"
        );

        Ok(ConnectionSummary {
            id,
            inbound,
            outbound,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{Frame, MockFrameWriter, TransportError},
        infrastructure::transport::{MemoryPeer, memory_transport},
        usecase::room::{DEFAULT_FORWARD_CAPACITY, Room},
    };
    use std::time::Duration;
    use tokio::{task::JoinHandle, time::timeout};

    const WAIT: Duration = Duration::from_secs(2);

    fn name(value: &str) -> Option<UserName> {
        Some(UserName::new(value.to_string()).unwrap())
    }

    fn connect(
        usecase: &ServeConnectionUseCase,
        user: Option<UserName>,
        transport_capacity: usize,
    ) -> (
        MemoryPeer,
        JoinHandle<Result<ConnectionSummary, RoomError>>,
    ) {
        let (reader, writer, peer) = memory_transport(transport_capacity);
        let usecase = usecase.clone();
        let task = tokio::spawn(async move { usecase.execute(reader, writer, user).await });
        (peer, task)
    }

    async fn wait_for_members(room: &RoomHandle, expected: usize) {
        timeout(WAIT, async {
            loop {
                if room.snapshot().await.unwrap().members.len() == expected {
                    return;
                }
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("room did not reach the expected member count");
    }

    async fn recv_json(peer: &mut MemoryPeer) -> serde_json::Value {
        match timeout(WAIT, peer.recv()).await.unwrap() {
            Some(Frame::Text(payload)) => serde_json::from_str(&payload).unwrap(),
            other => panic!("expected a text frame, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_message_round_trip_between_clients() {
        // テスト項目: alice の発言が bob と carol、そして alice 自身に変更されずに届く
        // given (前提条件):
        let room = Room::spawn(DEFAULT_FORWARD_CAPACITY);
        let usecase = ServeConnectionUseCase::new(room.clone(), DEFAULT_OUTBOUND_CAPACITY);
        let (mut alice, _alice_task) = connect(&usecase, name("alice"), 8);
        let (mut bob, _bob_task) = connect(&usecase, name("bob"), 8);
        let (mut carol, _carol_task) = connect(&usecase, None, 8);
        wait_for_members(&room, 3).await;

        // when (操作):
        alice.send_text(r#"{"content":"hello"}"#).await.unwrap();

        // then (期待する結果):
        let at_bob = recv_json(&mut bob).await;
        let at_carol = recv_json(&mut carol).await;
        let at_alice = recv_json(&mut alice).await;
        for value in [&at_bob, &at_carol, &at_alice] {
            assert_eq!(value["content"], "hello");
            assert_eq!(value["sender"], "alice");
        }
        assert_eq!(at_bob["sentAt"], at_carol["sentAt"]);
        assert_eq!(at_bob["sentAt"], at_alice["sentAt"]);
    }

    #[tokio::test]
    async fn test_disconnect_leaves_room() {
        // テスト項目: 切断するとクライアントは Room から削除され、接続が閉じられる
        // given (前提条件):
        let room = Room::spawn(DEFAULT_FORWARD_CAPACITY);
        let usecase = ServeConnectionUseCase::new(room.clone(), DEFAULT_OUTBOUND_CAPACITY);
        let (mut alice, alice_task) = connect(&usecase, name("alice"), 8);
        let (_bob, _bob_task) = connect(&usecase, name("bob"), 8);
        wait_for_members(&room, 2).await;

        // when (操作):
        alice.hang_up();
        let summary = timeout(WAIT, alice_task).await.unwrap().unwrap().unwrap();

        // then (期待する結果):
        assert_eq!(summary.inbound, InboundExit::PeerClosed);
        assert_eq!(summary.outbound, Some(OutboundExit::ConnectionClosed));
        let snapshot = room.snapshot().await.unwrap();
        assert_eq!(snapshot.members.len(), 1);
        assert!(snapshot.members.iter().all(|m| m.id != summary.id));
        assert!(alice.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_stalled_client_is_evicted_and_disconnected() {
        // テスト項目: 受信しないクライアントはキューが溢れると追い出され、残りを排出した後に接続が閉じられる
        // given (前提条件): 送信キュー 1 件、transport バッファ 1 件
        let room = Room::spawn(DEFAULT_FORWARD_CAPACITY);
        let usecase = ServeConnectionUseCase::new(room.clone(), 1);
        let (mut stalled, stalled_task) = connect(&usecase, name("stalled"), 1);
        let (mut talker, _talker_task) = connect(&usecase, name("talker"), 64);
        wait_for_members(&room, 2).await;

        // when (操作): stalled は受信しないまま 8 件ブロードキャストされる
        for i in 0..8 {
            talker.send_text(format!("message {i}")).await.unwrap();
        }
        wait_for_members(&room, 1).await;

        // then (期待する結果):
        // stalled は追い出される前に受け取った分だけを順番通りに受信し、その後接続が閉じる
        let mut received = 0;
        while let Some(frame) = timeout(WAIT, stalled.recv()).await.unwrap() {
            let Frame::Text(payload) = frame else {
                panic!("expected a text frame");
            };
            let value: serde_json::Value = serde_json::from_str(&payload).unwrap();
            assert_eq!(value["content"], format!("message {received}"));
            received += 1;
        }
        assert!((1..8).contains(&received));

        let summary = timeout(WAIT, stalled_task).await.unwrap().unwrap().unwrap();
        assert_eq!(summary.outbound, Some(OutboundExit::QueueClosed));
        assert_eq!(summary.inbound, InboundExit::ConnectionClosed);

        // talker には全件届いている
        for i in 0..8 {
            assert_eq!(recv_json(&mut talker).await["content"], format!("message {i}"));
        }
    }

    #[tokio::test]
    async fn test_room_closed_rejects_connection() {
        // テスト項目: Room が停止している場合は接続を受け付けず、transport を閉じる
        // given (前提条件):
        let (room_loop, room) = Room::new(DEFAULT_FORWARD_CAPACITY);
        drop(room_loop);
        let usecase = ServeConnectionUseCase::new(room, DEFAULT_OUTBOUND_CAPACITY);
        let (reader, _writer, _peer) = memory_transport(1);
        let mut writer = MockFrameWriter::new();
        writer.expect_close().times(1).return_const(());

        // when (操作):
        let result = usecase.execute(reader, writer, None).await;

        // then (期待する結果):
        assert_eq!(result, Err(RoomError::Closed));
    }

    #[tokio::test]
    async fn test_read_error_ends_connection() {
        // テスト項目: 読み込みエラーで接続が終了し、Room から削除される
        // given (前提条件):
        let room = Room::spawn(DEFAULT_FORWARD_CAPACITY);
        let usecase = ServeConnectionUseCase::new(room.clone(), DEFAULT_OUTBOUND_CAPACITY);
        let (peer, task) = connect(&usecase, None, 8);
        wait_for_members(&room, 1).await;

        // when (操作):
        peer.fail(TransportError::Read("protocol violation".to_string()))
            .await
            .unwrap();
        let summary = timeout(WAIT, task).await.unwrap().unwrap().unwrap();

        // then (期待する結果):
        assert!(matches!(summary.inbound, InboundExit::ReadFailed(_)));
        wait_for_members(&room, 0).await;
    }
}
