//! # 21点与钓鱼的核心逻辑库
//!
//! 这个 `core` crate 包含牌堆、21点计分、21点回合状态机、
//! 钓鱼游戏引擎以及客户端-服务器通信消息的定义。
//! 它不做任何 I/O，可以被服务器、终端客户端等上层应用复用。

mod card;
mod deck;
mod error;
mod gofish;
mod hand;
mod logic;
mod message;
mod state;

pub use card::*;

pub use deck::*;

pub use error::GameError;

pub use gofish::*;

pub use hand::{is_soft, score, Hand};

pub use logic::{parse_bet, DEALER_STANDS_ON};

pub use message::*;

pub use state::*;
