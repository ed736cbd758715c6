use crate::card::Rank;
use crate::state::{GamePhase, PlayerId};
use thiserror::Error;

/// 游戏引擎的错误。
/// 除 `CorruptDeck` 外都是玩家输入错误：返回给请求方，状态不变。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("下注金额无效，请输入正整数")]
    InvalidBet,

    #[error("余额不足：当前余额 {balance}，下注 {amount}")]
    InsufficientBalance { balance: u32, amount: u32 },

    #[error("本局已经下过注了")]
    AlreadyBet,

    #[error("当前阶段 ({0:?}) 不允许该操作")]
    WrongPhase(GamePhase),

    #[error("还没轮到你行动")]
    NotYourTurn,

    #[error("玩家 {0} 不在牌桌上")]
    PlayerNotFound(PlayerId),

    #[error("牌桌已满（最多 {0} 人）")]
    TableFull(usize),

    #[error("没有玩家，无法发牌")]
    NoPlayers,

    #[error("余额还没用完，不能重新买入")]
    CannotRebuy,

    #[error("无法识别的点数: {0}")]
    UnknownRank(String),

    #[error("手里没有 {0}，不能要这张牌")]
    RankNotInHand(Rank),

    #[error("必须先去钓鱼（摸一张牌）")]
    MustGoFish,

    #[error("现在不需要摸牌")]
    NoPendingDraw,

    #[error("游戏已结束")]
    GameOver,

    #[error("牌堆已空")]
    EmptyDeck,

    #[error("牌堆校验失败：存在重复的牌")]
    CorruptDeck,
}
