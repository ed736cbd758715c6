use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
    routing::get,
    Router,
};
use futures_util::{stream::StreamExt, SinkExt};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use casino_eden_core::{ClientMessage, PlayerId, RoomId, ServerMessage};

use crate::coordinator::Coordinator;
use crate::error::LobbyError;
use crate::store::ClientSender;

/// 服务器全局状态
pub struct AppState {
    pub coordinator: Coordinator,
}

pub type SharedState = Arc<AppState>;

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/ws", get(websocket_handler))
        .with_state(state)
}

/// 处理 WebSocket 连接请求
async fn websocket_handler(ws: WebSocketUpgrade, State(state): State<SharedState>) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

/// 处理单个 WebSocket 连接的生命周期
async fn handle_socket(socket: WebSocket, state: SharedState) {
    let (mut sender, mut receiver) = socket.split();

    // 房间广播不能在持锁时等待，所以用无界通道
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();

    // 启动一个新任务，专门负责将通道中的消息发送到 WebSocket
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let payload = match serde_json::to_string(&msg) {
                Ok(payload) => payload,
                Err(e) => {
                    error!("序列化消息失败: {}", e);
                    continue;
                }
            };
            if sender.send(Message::Text(payload.into())).await.is_err() {
                // 发送失败，说明客户端已断开，退出任务
                break;
            }
        }
    });

    // 当前连接所在的房间和身份，加入或创建房间后填充
    let mut player_context: Option<(RoomId, PlayerId)> = None;

    while let Some(Ok(msg)) = receiver.next().await {
        let Message::Text(text) = msg else { continue };
        match serde_json::from_str::<ClientMessage>(text.as_str()) {
            Ok(client_msg) => {
                if let Err(e) = handle_client_message(client_msg, &state.coordinator, &tx, &mut player_context) {
                    // 错误只发给当前玩家
                    let _ = tx.send(ServerMessage::Error { message: e.to_string() });
                }
            }
            Err(e) => {
                warn!("解析消息失败: {}", e);
                let _ = tx.send(ServerMessage::Error { message: format!("无法识别的消息: {e}") });
            }
        }
    }

    // 客户端断开连接，等同于离开房间
    if let Some((room_id, player_id)) = player_context {
        info!("玩家 {} 从房间 {} 断开连接", player_id, room_id);
        if let Err(e) = state.coordinator.leave(room_id, player_id) {
            warn!("清理断开的玩家 {} 失败: {}", player_id, e);
        }
    }
    info!("客户端连接关闭");
}

/// 核心消息处理逻辑
fn handle_client_message(
    msg: ClientMessage,
    coordinator: &Coordinator,
    tx: &ClientSender,
    context: &mut Option<(RoomId, PlayerId)>,
) -> Result<(), LobbyError> {
    match msg {
        ClientMessage::CreateRoom { nickname } => {
            if context.is_some() {
                return Err(LobbyError::AlreadyInRoom);
            }
            let (room_id, _, player_id) = coordinator.create_room(nickname, tx.clone())?;
            *context = Some((room_id, player_id));
        }
        ClientMessage::JoinRoom { code, nickname } => {
            if context.is_some() {
                return Err(LobbyError::AlreadyInRoom);
            }
            *context = Some(coordinator.join_room(&code, nickname, tx.clone())?);
        }
        ClientMessage::StartGame => {
            let (room_id, player_id) = context.ok_or(LobbyError::NotInRoom)?;
            coordinator.start_game(room_id, player_id)?;
        }
        ClientMessage::PerformAction(action) => {
            let (room_id, player_id) = context.ok_or(LobbyError::NotInRoom)?;
            coordinator.apply_action(room_id, player_id, action)?;
        }
        ClientMessage::LeaveRoom => {
            let (room_id, player_id) = context.take().ok_or(LobbyError::NotInRoom)?;
            coordinator.leave(room_id, player_id)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::RoomStore;
    use casino_eden_core::{GameError, PlayerAction, TableConfig};

    fn coordinator() -> Coordinator {
        Coordinator::new(Arc::new(RoomStore::new()), TableConfig::default())
    }

    #[test]
    fn test_context_tracks_room_membership() {
        let c = coordinator();
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut context = None;

        assert_eq!(
            handle_client_message(ClientMessage::StartGame, &c, &tx, &mut context),
            Err(LobbyError::NotInRoom)
        );

        handle_client_message(ClientMessage::CreateRoom { nickname: "alice".into() }, &c, &tx, &mut context).unwrap();
        let (room_id, _) = context.unwrap();
        assert_eq!(
            handle_client_message(ClientMessage::CreateRoom { nickname: "again".into() }, &c, &tx, &mut context),
            Err(LobbyError::AlreadyInRoom)
        );

        handle_client_message(ClientMessage::LeaveRoom, &c, &tx, &mut context).unwrap();
        assert!(context.is_none());
        assert!(c.store().get(&room_id).is_none());
    }

    #[test]
    fn test_action_errors_are_reported() {
        let c = coordinator();
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut context = None;
        handle_client_message(ClientMessage::CreateRoom { nickname: "alice".into() }, &c, &tx, &mut context).unwrap();

        let err = handle_client_message(PlayerAction::Hit.into(), &c, &tx, &mut context).unwrap_err();
        assert!(matches!(err, LobbyError::Game(GameError::WrongPhase(_))));
        assert!(!err.to_string().is_empty());

        let mut stranger = None;
        assert_eq!(
            handle_client_message(
                ClientMessage::JoinRoom { code: "NOPE00".into(), nickname: "bob".into() },
                &c,
                &tx,
                &mut stranger
            ),
            Err(LobbyError::RoomNotFound)
        );
        assert!(stranger.is_none());
    }
}
