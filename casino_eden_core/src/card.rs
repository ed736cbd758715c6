use serde::{Deserialize, Serialize};
use std::fmt;
// --- 核心数据结构定义 ---

/// 花色 (Suit)
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Serialize, Deserialize)]
pub enum Suit {
    Heart,   // 红心 ♥️
    Diamond, // 方块 ♦️
    Club,    // 梅花 ♣️
    Spade,   // 黑桃 ♠️
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Heart, Suit::Diamond, Suit::Club, Suit::Spade];
}

/// 点数 (Rank)
/// 21点中 J/Q/K 都算 10 点，A 默认 11 点，计分规则见 hand 模块
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Serialize, Deserialize)]
pub enum Rank {
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
}

impl Rank {
    pub const ALL: [Rank; 13] = [
        Rank::Two, Rank::Three, Rank::Four, Rank::Five, Rank::Six, Rank::Seven,
        Rank::Eight, Rank::Nine, Rank::Ten, Rank::Jack, Rank::Queen, Rank::King, Rank::Ace,
    ];

    /// 21点中的牌面分值，A 按 11 计
    pub fn blackjack_points(self) -> u32 {
        match self {
            Rank::Two => 2,
            Rank::Three => 3,
            Rank::Four => 4,
            Rank::Five => 5,
            Rank::Six => 6,
            Rank::Seven => 7,
            Rank::Eight => 8,
            Rank::Nine => 9,
            Rank::Ten | Rank::Jack | Rank::Queen | Rank::King => 10,
            Rank::Ace => 11,
        }
    }
}

/// 单张扑克牌 (Card)
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Serialize, Deserialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    pub fn new(rank: Rank, suit: Suit) -> Card {
        Card { rank, suit }
    }
}

/// 发到21点手牌中的牌，带有“暗牌”标记（庄家的第二张牌）。
/// 暗牌只影响展示和展示用的计分，翻开后按真实点数计算。
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
pub struct DealtCard {
    pub card: Card,
    pub hidden: bool,
}

impl DealtCard {
    pub fn face_up(card: Card) -> Self {
        DealtCard { card, hidden: false }
    }

    pub fn face_down(card: Card) -> Self {
        DealtCard { card, hidden: true }
    }
}

// --- 实现辅助功能 ---

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", match self {
            Suit::Spade => "♠️",
            Suit::Heart => "♥️",
            Suit::Club => "♣️",
            Suit::Diamond => "♦️",
        })
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", match self {
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
            Rank::Ace => "A",
        })
    }
}

impl std::str::FromStr for Rank {
    type Err = crate::GameError;

    /// 解析玩家输入的点数，大小写不敏感，`T` 与 `10` 等价
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rank = match s.trim().to_ascii_uppercase().as_str() {
            "2" => Rank::Two,
            "3" => Rank::Three,
            "4" => Rank::Four,
            "5" => Rank::Five,
            "6" => Rank::Six,
            "7" => Rank::Seven,
            "8" => Rank::Eight,
            "9" => Rank::Nine,
            "10" | "T" => Rank::Ten,
            "J" => Rank::Jack,
            "Q" => Rank::Queen,
            "K" => Rank::King,
            "A" => Rank::Ace,
            _ => return Err(crate::GameError::UnknownRank(s.trim().to_string())),
        };
        Ok(rank)
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.suit, self.rank)
    }
}

impl fmt::Display for DealtCard {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.hidden { write!(f, "🂠") } else { write!(f, "{}", self.card) }
    }
}

// --- 单元测试 ---

#[cfg(test)]
mod tests {
    use super::*;
    use Rank::*;

    #[test]
    fn test_face_cards_are_worth_ten() {
        for rank in [Ten, Jack, Queen, King] {
            assert_eq!(rank.blackjack_points(), 10);
        }
        assert_eq!(Ace.blackjack_points(), 11);
        assert_eq!(Seven.blackjack_points(), 7);
    }

    #[test]
    fn test_parse_rank() {
        assert_eq!("a".parse::<Rank>().unwrap(), Ace);
        assert_eq!("10".parse::<Rank>().unwrap(), Ten);
        assert_eq!(" t ".parse::<Rank>().unwrap(), Ten);
        assert_eq!("q".parse::<Rank>().unwrap(), Queen);
        assert!("11".parse::<Rank>().is_err());
    }

    #[test]
    fn test_card_equality_ignores_nothing_but_suit_and_rank() {
        let a = Card::new(Ace, Suit::Spade);
        assert_eq!(a, Card::new(Ace, Suit::Spade));
        assert_ne!(a, Card::new(Ace, Suit::Heart));
        // 暗牌标记不改变牌本身
        assert_eq!(DealtCard::face_down(a).card, DealtCard::face_up(a).card);
    }

    #[test]
    fn test_display() {
        assert_eq!(Card::new(Ten, Suit::Heart).to_string(), "♥️10");
        assert_eq!(DealtCard::face_down(Card::new(Two, Suit::Club)).to_string(), "🂠");
    }
}
