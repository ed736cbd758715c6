use crate::deck::{Deck, BLACKJACK_DECKS};
use crate::hand::Hand;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type RoomId = Uuid;
pub type PlayerId = Uuid;

/// 牌桌配置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableConfig {
    pub num_decks: usize,        // 牌靴中的副数
    pub starting_balance: u32,   // 入座及重新买入时的筹码
    pub max_players: usize,      // 最多座位数
}

impl Default for TableConfig {
    fn default() -> Self {
        TableConfig {
            num_decks: BLACKJACK_DECKS,
            starting_balance: 1000,
            max_players: 7,
        }
    }
}

/// 一张21点牌桌：玩家名单、庄家、本局牌靴和当前回合状态。
/// 回合流程见 logic 模块。
#[derive(Debug, Clone)]
pub struct Table {
    pub config: TableConfig,
    // 固定的轮转顺序，也是入座顺序
    pub players: Vec<Player>,
    pub phase: GamePhase,
    pub dealer: Hand,
    // 本局牌靴，只在两局之间重新洗牌。为空时下一次发牌会换一副新牌靴。
    pub deck: Deck,
    pub cur_player_id: Option<PlayerId>,
    // 展示用的单一赢家，真实输赢见每个玩家的 outcome
    pub winner: Option<Winner>,
    pub(crate) rng: StdRng,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub hand: Hand,
    pub balance: u32,  // 剩余筹码，下注时已扣除
    pub bet: u32,      // 本局下注额
    pub status: PlayerStatus,
    pub outcome: Option<Outcome>,  // 结算后才有值
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum GamePhase {
    Betting,
    Playing,
    DealerTurn,
    Finished,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PlayerStatus {
    /// 仍可要牌
    Playing,
    /// 已停牌
    Standing,
    /// 已爆牌
    Busted,
    /// 牌局进行中加入，等待下一局
    Waiting,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PlayerAction {
    Hit,    // 要牌
    Stand,  // 停牌
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Outcome {
    Win,   // 拿回两倍下注
    Push,  // 平局，退回下注
    Lose,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Winner {
    Dealer,
    Player(PlayerId),
}

// --- Table 的实现方法 ---

impl Table {
    pub fn new(config: TableConfig) -> Self {
        Self::with_rng(config, StdRng::from_os_rng())
    }

    /// 使用指定的随机源，测试中用固定种子复现洗牌结果
    pub fn with_rng(config: TableConfig, rng: StdRng) -> Self {
        Table {
            config,
            players: Vec::new(),
            phase: GamePhase::Betting,
            dealer: Hand::new(),
            deck: Deck::default(),
            cur_player_id: None,
            winner: None,
            rng,
        }
    }

    pub fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == *id)
    }

    pub fn player_mut(&mut self, id: &PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == *id)
    }

    pub(crate) fn index_of(&self, id: &PlayerId) -> Option<usize> {
        self.players.iter().position(|p| p.id == *id)
    }

    /// 获取当前行动的玩家 (如果存在)
    pub fn current_player(&self) -> Option<&Player> {
        self.cur_player_id.and_then(|id| self.player(&id))
    }
}
