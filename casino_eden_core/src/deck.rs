use crate::card::{Card, Rank, Suit};
use crate::error::GameError;
use rand::Rng;
use rand::prelude::SliceRandom;
use std::collections::{HashMap, VecDeque};

/// 21点使用 6 副牌组成的牌靴
pub const BLACKJACK_DECKS: usize = 6;
/// 钓鱼游戏只用一副牌
pub const GO_FISH_DECKS: usize = 1;

/// 牌堆。
/// 由 `num_decks` 副完整的 52 张牌组成，只能从头部摸牌。
/// 同一 (花色, 点数) 最多出现 `num_decks` 次。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Deck {
    cards: VecDeque<Card>,
    num_decks: usize,
}

impl Deck {
    /// 按顺序创建 `num_decks` 副牌，未洗牌
    pub fn build(num_decks: usize) -> Deck {
        let mut cards = VecDeque::with_capacity(num_decks * 52);
        for _ in 0..num_decks {
            for &suit in &Suit::ALL {
                for &rank in &Rank::ALL {
                    cards.push_back(Card { rank, suit });
                }
            }
        }
        Deck { cards, num_decks }
    }

    /// 用给定顺序的牌构造牌堆，第一张最先被摸到
    pub fn from_cards(num_decks: usize, cards: impl IntoIterator<Item = Card>) -> Deck {
        Deck { cards: cards.into_iter().collect(), num_decks }
    }

    /// 创建、洗牌并校验一个新牌靴。
    /// 校验失败的牌堆不能用于发牌。
    pub fn shoe<R: Rng + ?Sized>(num_decks: usize, rng: &mut R) -> Result<Deck, GameError> {
        let mut deck = Deck::build(num_decks);
        deck.shuffle(rng);
        if deck.has_duplicates() {
            tracing::error!(num_decks, "新建牌堆中出现重复的牌");
            return Err(GameError::CorruptDeck);
        }
        Ok(deck)
    }

    /// Fisher–Yates 洗牌，每种排列等概率
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.make_contiguous().shuffle(rng);
    }

    /// 从牌堆头部摸一张牌
    pub fn draw(&mut self) -> Result<Card, GameError> {
        self.cards.pop_front().ok_or(GameError::EmptyDeck)
    }

    /// 是否有某张牌出现次数超过了副数
    pub fn has_duplicates(&self) -> bool {
        let mut counts: HashMap<Card, usize> = HashMap::new();
        for card in &self.cards {
            let count = counts.entry(*card).or_insert(0);
            *count += 1;
            if *count > self.num_decks {
                return true;
            }
        }
        false
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn num_decks(&self) -> usize {
        self.num_decks
    }

    pub fn cards(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }
}

// --- 单元测试 ---
