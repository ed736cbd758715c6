use std::sync::Arc;

use rand::Rng;
use tracing::{info, warn};
use uuid::Uuid;

use casino_eden_core::{
    GameError, GamePhase, GameView, PlayerAction, PlayerId, RoomId, ServerMessage, Table, TableConfig,
};

use crate::error::LobbyError;
use crate::store::{ClientSender, Room, RoomInner, RoomStore};

const CODE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const CODE_LEN: usize = 6;

/// 生成一个便于口头分享的房间码
fn generate_code<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..CODE_LEN)
        .map(|_| CODE_CHARSET[rng.random_range(0..CODE_CHARSET.len())] as char)
        .collect()
}

/// 多人房间的协调者。
///
/// 负责房间的创建、加入、离开和房主转移，并把玩家动作转交给房间内的牌桌。
/// 每次状态变化后，都会在持有房间锁的情况下把完整状态广播给房间内所有人。
pub struct Coordinator {
    store: Arc<RoomStore>,
    config: TableConfig,
}

impl Coordinator {
    pub fn new(store: Arc<RoomStore>, config: TableConfig) -> Self {
        Coordinator { store, config }
    }

    pub fn store(&self) -> &RoomStore {
        &self.store
    }

    /// 创建房间，创建者成为房主。返回 (房间, 房间码, 房主)。
    pub fn create_room(&self, nickname: String, sender: ClientSender) -> Result<(RoomId, String, PlayerId), LobbyError> {
        let mut table = Table::new(self.config);
        let player_id = table.add_player(nickname)?;

        let mut rng = rand::rng();
        let mut candidate = Room::new(Uuid::new_v4(), generate_code(&mut rng), player_id, table);
        candidate.inner.get_mut().connections.insert(player_id, sender.clone());
        let room = loop {
            match self.store.create(candidate) {
                Ok(room) => break room,
                Err(mut taken) => {
                    taken.code = generate_code(&mut rng);
                    candidate = taken;
                }
            }
        };

        info!("玩家 {} 创建了新房间 {} ({})", player_id, room.id, room.code);
        let inner = room.inner.lock();
        let _ = sender.send(ServerMessage::RoomCreated {
            room_id: room.id,
            code: room.code.clone(),
            your_id: player_id,
        });
        broadcast_state(&room, &inner);
        Ok((room.id, room.code.clone(), player_id))
    }

    /// 凭房间码加入房间，房间码大小写不敏感
    pub fn join_room(&self, code: &str, nickname: String, sender: ClientSender) -> Result<(RoomId, PlayerId), LobbyError> {
        let code = code.trim().to_ascii_uppercase();
        let room = self.store.find_by_code(&code).ok_or(LobbyError::RoomNotFound)?;

        let mut inner = room.inner.lock();
        if inner.closed {
            return Err(LobbyError::RoomNotFound);
        }
        let player_id = inner.table.add_player(nickname)?;
        inner.connections.insert(player_id, sender.clone());

        info!("玩家 {} 加入了房间 {}", player_id, room.id);
        let _ = sender.send(ServerMessage::JoinedRoom { room_id: room.id, your_id: player_id });
        broadcast_state(&room, &inner);
        Ok((room.id, player_id))
    }

    /// 房主开始新的一局。上一局已结束时先重置，再直接发牌（多人模式不下注）。
    pub fn start_game(&self, room_id: RoomId, requester: PlayerId) -> Result<(), LobbyError> {
        let room = self.room(room_id)?;
        let mut inner = room.inner.lock();
        if inner.host_id != requester {
            return Err(LobbyError::NotHost);
        }
        if inner.table.phase == GamePhase::Finished {
            inner.table.new_round()?;
        }
        inner.table.deal()?;

        info!("房间 {} 开始新的一局", room_id);
        broadcast_state(&room, &inner);
        Ok(())
    }

    /// 把要牌/停牌转交给牌桌。是否轮到该玩家由牌桌校验。
    pub fn apply_action(&self, room_id: RoomId, player_id: PlayerId, action: PlayerAction) -> Result<(), LobbyError> {
        let room = self.room(room_id)?;
        let mut inner = room.inner.lock();
        match action {
            PlayerAction::Hit => inner.table.hit(player_id).map(|_| ())?,
            PlayerAction::Stand => inner.table.stand(player_id)?,
        }
        broadcast_state(&room, &inner);
        Ok(())
    }

    /// 玩家离开或断线。
    /// 房间空了就删除；房主离开则由名单中的第一位玩家接任。
    pub fn leave(&self, room_id: RoomId, player_id: PlayerId) -> Result<(), LobbyError> {
        let room = self.room(room_id)?;
        let emptied = {
            let mut inner = room.inner.lock();
            inner.table.remove_player(player_id).map_err(|e| match e {
                GameError::PlayerNotFound(_) => LobbyError::NotInRoom,
                other => LobbyError::Game(other),
            })?;
            inner.connections.remove(&player_id);
            info!("玩家 {} 离开了房间 {}", player_id, room_id);

            match inner.table.players.first().map(|p| p.id) {
                None => {
                    inner.closed = true;
                    true
                }
                Some(first_id) => {
                    if inner.host_id == player_id {
                        inner.host_id = first_id;
                        info!("房间 {} 的房主已转移给 {}", room_id, first_id);
                    }
                    broadcast_state(&room, &inner);
                    false
                }
            }
        };

        // 释放房间锁之后再从房间表中删除
        if emptied {
            self.store.delete(&room_id);
            info!("房间 {} 已空，已被移除", room_id);
        }
        Ok(())
    }

    fn room(&self, room_id: RoomId) -> Result<Arc<Room>, LobbyError> {
        self.store.get(&room_id).ok_or(LobbyError::RoomNotFound)
    }
}

/// 向房间内所有玩家广播完整状态，按座位顺序发送
fn broadcast_state(room: &Room, inner: &RoomInner) {
    let view = GameView::new(room.id, &room.code, inner.host_id, &inner.table);
    for player in &inner.table.players {
        let Some(conn) = inner.connections.get(&player.id) else { continue };
        if conn.send(ServerMessage::GameState(view.clone())).is_err() {
            // 发送失败，说明该玩家已断开，后续由其自己的连接任务处理
            warn!("向玩家 {} 发送消息失败（可能已断开）", player.id);
        }
    }
}
