use crate::card::{Card, DealtCard};
use crate::hand::is_soft;
use crate::state::{GamePhase, Outcome, PlayerAction, PlayerId, PlayerStatus, RoomId, Table, Winner};
use serde::{Deserialize, Serialize};

// --- 客户端 -> 服务器 的消息 ---
// 这些是客户端可以发送给服务器的指令或动作。

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum ClientMessage {
    // --- 房间管理消息 ---
    /// 客户端请求创建一个新房间
    CreateRoom { nickname: String },
    /// 客户端凭房间码加入一个已存在的房间
    JoinRoom { code: String, nickname: String },
    /// 主动离开房间 (断开连接也会离开)
    LeaveRoom,

    // --- 游戏内消息 ---
    /// 房主开始新的一局
    StartGame,
    /// 玩家在轮到自己时执行的游戏动作
    PerformAction(PlayerAction),
}

// --- 服务器 -> 客户端 的消息 ---

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum ServerMessage {
    /// 创建房间成功，只发给创建者
    RoomCreated { room_id: RoomId, code: String, your_id: PlayerId },
    /// 加入房间成功，只发给加入者
    JoinedRoom { room_id: RoomId, your_id: PlayerId },
    /// 完整游戏状态的快照，每次状态变化后广播给房间内所有人
    GameState(GameView),
    /// 服务器向特定客户端发送错误信息
    Error { message: String },
}

/// 渲染一张牌所需的信息。暗牌不下发真实牌面。
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardView {
    pub card: Option<Card>,
    pub face_up: bool,
}

impl From<&DealtCard> for CardView {
    fn from(dealt: &DealtCard) -> Self {
        if dealt.hidden {
            CardView { card: None, face_up: false }
        } else {
            CardView { card: Some(dealt.card), face_up: true }
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PlayerView {
    pub id: PlayerId,
    pub name: String,
    pub hand: Vec<CardView>,
    pub score: u32,
    // 有 A 按 11 点计
    pub soft: bool,
    pub status: PlayerStatus,
    pub balance: u32,
    pub bet: u32,
    pub outcome: Option<Outcome>,
}

/// 广播给房间的游戏状态
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct GameView {
    pub room_id: RoomId,
    pub code: String,
    pub host_id: PlayerId,
    pub players: Vec<PlayerView>,
    pub dealer_hand: Vec<CardView>,
    // 只计算已翻开的牌
    pub dealer_score: u32,
    pub current_player_id: Option<PlayerId>,
    pub phase: GamePhase,
    pub winner: Option<Winner>,
}

impl GameView {
    pub fn new(room_id: RoomId, code: &str, host_id: PlayerId, table: &Table) -> Self {
        let players = table.players.iter()
            .map(|p| PlayerView {
                id: p.id,
                name: p.name.clone(),
                hand: p.hand.cards().iter().map(CardView::from).collect(),
                score: p.hand.score(),
                soft: is_soft(p.hand.cards(), true),
                status: p.status,
                balance: p.balance,
                bet: p.bet,
                outcome: p.outcome,
            })
            .collect();

        GameView {
            room_id,
            code: code.to_string(),
            host_id,
            players,
            dealer_hand: table.dealer.cards().iter().map(CardView::from).collect(),
            dealer_score: table.dealer.visible_score(),
            current_player_id: table.cur_player_id,
            phase: table.phase,
            winner: table.winner,
        }
    }
}

impl From<PlayerAction> for ClientMessage {
    fn from(action: PlayerAction) -> Self {
        ClientMessage::PerformAction(action)
    }
}

// --- 单元测试 ---

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::TableConfig;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use uuid::Uuid;

    #[test]
    fn test_hole_card_is_masked() {
        let mut table = Table::with_rng(TableConfig::default(), StdRng::seed_from_u64(3));
        let id = table.add_player("alice").unwrap();
        table.deal().unwrap();

        let view = GameView::new(Uuid::new_v4(), "ABC123", id, &table);
        assert_eq!(view.dealer_hand.len(), 2);
        assert!(view.dealer_hand[0].face_up);
        assert_eq!(view.dealer_hand[1], CardView { card: None, face_up: false });
        assert_eq!(view.dealer_score, table.dealer.visible_score());
        assert_eq!(view.players[0].hand.len(), 2);
        assert!(view.players[0].hand.iter().all(|c| c.card.is_some()));
        assert_eq!(view.current_player_id, Some(id));

        // 序列化后的快照里不能出现底牌
        let hole = table.dealer.cards()[1].card;
        let json = serde_json::to_string(&ServerMessage::GameState(view)).unwrap();
        let decoded: ServerMessage = serde_json::from_str(&json).unwrap();
        match decoded {
            ServerMessage::GameState(v) => assert!(v.dealer_hand.iter().all(|c| c.card != Some(hole) || c.face_up)),
            other => panic!("unexpected message {other:?}"),
        }
    }

    #[test]
    fn test_client_message_wire_format() {
        let msg = ClientMessage::JoinRoom { code: "K3X9QZ".into(), nickname: "bob".into() };
        let json = serde_json::to_string(&msg).unwrap();
        assert_eq!(json, r#"{"JoinRoom":{"code":"K3X9QZ","nickname":"bob"}}"#);
        let hit: ClientMessage = PlayerAction::Hit.into();
        assert_eq!(serde_json::to_string(&hit).unwrap(), r#"{"PerformAction":"Hit"}"#);
    }
}
