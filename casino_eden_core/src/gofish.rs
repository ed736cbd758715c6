//! 钓鱼 (Go Fish)：玩家对电脑，轮流向对方要某个点数的牌，凑齐四张即成一“书”。

use crate::card::{Card, Rank};
use crate::deck::{Deck, GO_FISH_DECKS};
use crate::error::GameError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// 开局每人的手牌数
pub const INITIAL_HAND_SIZE: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Player,
    Computer,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Player => Side::Computer,
            Side::Computer => Side::Player,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoFishPhase {
    Playing,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GoFishResult {
    PlayerWins,
    ComputerWins,
    Tie,
}

/// 要牌的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AskOutcome {
    /// 从对方手里拿到的张数，继续由提问方行动
    Caught(usize),
    /// 对方没有，提问方必须摸牌
    GoFish,
}

/// 摸牌的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FishOutcome {
    /// 摸到了要的点数，再来一轮
    LuckyDraw(Card),
    /// 摸到别的牌，轮到对方
    Drew(Card),
    /// 牌堆已空，轮到对方
    DeckEmpty,
}

/// 对局过程中发生的事件，供界面逐条展示
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GoFishEvent {
    Asked { side: Side, rank: Rank },
    Caught { side: Side, rank: Rank, count: usize },
    GoFish { side: Side },
    Drew { side: Side, card: Card, keeps_turn: bool },
    DeckEmpty { side: Side },
    /// 手牌打空后补摸一张
    Refilled { side: Side, card: Card },
    Book { side: Side, rank: Rank },
    GameOver(GoFishResult),
}

#[derive(Debug, Clone)]
pub struct GoFishGame {
    pub deck: Deck,
    pub player_hand: Vec<Card>,
    pub computer_hand: Vec<Card>,
    pub player_books: Vec<Rank>,
    pub computer_books: Vec<Rank>,
    pub turn: Side,
    // 上一次没要到的点数，提问方必须先摸牌
    pub pending_fish: Option<Rank>,
    pub phase: GoFishPhase,
    events: Vec<GoFishEvent>,
    rng: StdRng,
}

impl GoFishGame {
    /// 用新洗好的一副牌开局
    pub fn new(mut rng: StdRng) -> Result<Self, GameError> {
        let deck = Deck::shoe(GO_FISH_DECKS, &mut rng)?;
        Ok(Self::from_deck(deck, rng))
    }

    pub fn with_seed(seed: u64) -> Result<Self, GameError> {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// 用给定的牌堆开局：轮流给玩家和电脑各发 7 张，玩家先手
    pub fn from_deck(deck: Deck, rng: StdRng) -> Self {
        let mut game = GoFishGame {
            deck,
            player_hand: Vec::with_capacity(INITIAL_HAND_SIZE),
            computer_hand: Vec::with_capacity(INITIAL_HAND_SIZE),
            player_books: Vec::new(),
            computer_books: Vec::new(),
            turn: Side::Player,
            pending_fish: None,
            phase: GoFishPhase::Playing,
            events: Vec::new(),
            rng,
        };
        'deal: for _ in 0..INITIAL_HAND_SIZE {
            for side in [Side::Player, Side::Computer] {
                match game.deck.draw() {
                    Ok(card) => game.hand_mut(side).push(card),
                    Err(_) => break 'deal,
                }
            }
        }
        game.collect_books(Side::Player);
        game.collect_books(Side::Computer);
        game.start_turn(Side::Player);
        game
    }

    pub fn hand(&self, side: Side) -> &[Card] {
        match side {
            Side::Player => &self.player_hand,
            Side::Computer => &self.computer_hand,
        }
    }

    fn hand_mut(&mut self, side: Side) -> &mut Vec<Card> {
        match side {
            Side::Player => &mut self.player_hand,
            Side::Computer => &mut self.computer_hand,
        }
    }

    pub fn books(&self, side: Side) -> &[Rank] {
        match side {
            Side::Player => &self.player_books,
            Side::Computer => &self.computer_books,
        }
    }

    pub fn is_over(&self) -> bool {
        self.phase == GoFishPhase::GameOver
    }

    /// 结束后按书的数量判定胜负
    pub fn result(&self) -> Option<GoFishResult> {
        if !self.is_over() {
            return None;
        }
        let (mine, theirs) = (self.player_books.len(), self.computer_books.len());
        Some(if mine > theirs {
            GoFishResult::PlayerWins
        } else if theirs > mine {
            GoFishResult::ComputerWins
        } else {
            GoFishResult::Tie
        })
    }

    /// 取出并清空累积的事件
    pub fn drain_events(&mut self) -> Vec<GoFishEvent> {
        std::mem::take(&mut self.events)
    }

    /// 向对方要 `rank`。提问方手里必须至少有一张该点数的牌。
    pub fn ask(&mut self, asker: Side, rank: Rank) -> Result<AskOutcome, GameError> {
        self.check_turn(asker)?;
        if self.pending_fish.is_some() {
            return Err(GameError::MustGoFish);
        }
        if !self.hand(asker).iter().any(|c| c.rank == rank) {
            return Err(GameError::RankNotInHand(rank));
        }
        self.events.push(GoFishEvent::Asked { side: asker, rank });

        let target = self.hand_mut(asker.opponent());
        let taken: Vec<Card> = target.iter().filter(|c| c.rank == rank).copied().collect();
        target.retain(|c| c.rank != rank);

        if taken.is_empty() {
            self.pending_fish = Some(rank);
            self.events.push(GoFishEvent::GoFish { side: asker });
            return Ok(AskOutcome::GoFish);
        }

        let count = taken.len();
        self.hand_mut(asker).extend(taken);
        self.events.push(GoFishEvent::Caught { side: asker, rank, count });
        self.collect_books(asker);
        // 对方可能被要空了手牌
        self.collect_books(asker.opponent());
        self.start_turn(asker);
        Ok(AskOutcome::Caught(count))
    }

    /// 没要到牌后从牌堆摸一张
    pub fn go_fish(&mut self, side: Side) -> Result<FishOutcome, GameError> {
        self.check_turn(side)?;
        let asked = self.pending_fish.ok_or(GameError::NoPendingDraw)?;
        self.pending_fish = None;

        let card = match self.deck.draw() {
            Ok(card) => card,
            Err(_) => {
                self.events.push(GoFishEvent::DeckEmpty { side });
                self.start_turn(side.opponent());
                return Ok(FishOutcome::DeckEmpty);
            }
        };

        let keeps_turn = card.rank == asked;
        self.hand_mut(side).push(card);
        self.events.push(GoFishEvent::Drew { side, card, keeps_turn });
        self.collect_books(side);

        if keeps_turn {
            self.start_turn(side);
            Ok(FishOutcome::LuckyDraw(card))
        } else {
            self.start_turn(side.opponent());
            Ok(FishOutcome::Drew(card))
        }
    }

    /// 电脑行动：从自己手里随机抽一张牌，要这张牌的点数，要不到就摸牌，
    /// 直到轮到玩家或游戏结束。手里同点数的牌越多，越可能要这个点数。
    /// 返回这一过程中的全部事件。
    pub fn computer_turn(&mut self) -> Result<Vec<GoFishEvent>, GameError> {
        self.check_turn(Side::Computer)?;
        while !self.is_over() && self.turn == Side::Computer {
            if self.computer_hand.is_empty() {
                break;
            }
            let rank = self.computer_hand[self.rng.random_range(0..self.computer_hand.len())].rank;
            if self.ask(Side::Computer, rank)? == AskOutcome::GoFish {
                self.go_fish(Side::Computer)?;
            }
        }
        Ok(self.drain_events())
    }

    // --- 辅助逻辑函数 ---

    fn check_turn(&self, side: Side) -> Result<(), GameError> {
        if self.is_over() {
            return Err(GameError::GameOver);
        }
        if self.turn != side {
            return Err(GameError::NotYourTurn);
        }
        Ok(())
    }

    /// 把手里凑齐四张的点数移出手牌，记为一本书
    fn collect_books(&mut self, side: Side) {
        for rank in Rank::ALL {
            let count = self.hand(side).iter().filter(|c| c.rank == rank).count();
            if count == 4 {
                self.hand_mut(side).retain(|c| c.rank != rank);
                match side {
                    Side::Player => self.player_books.push(rank),
                    Side::Computer => self.computer_books.push(rank),
                }
                self.events.push(GoFishEvent::Book { side, rank });
            }
        }
    }

    /// 把行动权交给 `side`。手牌为空时先补摸一张。
    /// 牌堆已空且双方手里没有共同的点数时，再也凑不出新的书，游戏结束。
    fn start_turn(&mut self, side: Side) {
        self.turn = side;
        if self.hand(side).is_empty() {
            if let Ok(card) = self.deck.draw() {
                self.hand_mut(side).push(card);
                self.events.push(GoFishEvent::Refilled { side, card });
            }
        }

        if self.deck.is_empty() && !self.has_shared_rank() {
            self.phase = GoFishPhase::GameOver;
            self.pending_fish = None;
            if let Some(result) = self.result() {
                self.events.push(GoFishEvent::GameOver(result));
            }
        }
    }

    fn has_shared_rank(&self) -> bool {
        self.player_hand.iter().any(|p| self.computer_hand.iter().any(|c| c.rank == p.rank))
    }
}

// --- 单元测试 ---

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::Suit;
    use Rank::*;
    use Suit::*;

    fn card(rank: Rank, suit: Suit) -> Card {
        Card::new(rank, suit)
    }

    // 辅助函数：直接摆好双方手牌和牌堆
    fn game_with(player: Vec<Card>, computer: Vec<Card>, deck: Vec<Card>) -> GoFishGame {
        GoFishGame {
            deck: Deck::from_cards(GO_FISH_DECKS, deck),
            player_hand: player,
            computer_hand: computer,
            player_books: vec![],
            computer_books: vec![],
            turn: Side::Player,
            pending_fish: None,
            phase: GoFishPhase::Playing,
            events: vec![],
            rng: StdRng::seed_from_u64(5),
        }
    }

    #[test]
    fn test_initial_deal() {
        let game = GoFishGame::with_seed(99).unwrap();
        assert_eq!(game.deck.len(), 52 - 14);
        for side in [Side::Player, Side::Computer] {
            assert_eq!(game.hand(side).len() + 4 * game.books(side).len(), INITIAL_HAND_SIZE);
        }
        assert_eq!(game.turn, Side::Player);
        assert!(!game.is_over());
    }

    #[test]
    fn test_ask_takes_every_matching_card_and_books_them() {
        let mut game = game_with(
            vec![card(King, Spade), card(King, Heart), card(Three, Club)],
            vec![card(King, Diamond), card(King, Club), card(Five, Heart)],
            vec![card(Nine, Heart)],
        );
        assert_eq!(game.ask(Side::Player, King), Ok(AskOutcome::Caught(2)));

        assert_eq!(game.player_hand, vec![card(Three, Club)]);
        assert_eq!(game.player_books, vec![King]);
        assert_eq!(game.computer_hand, vec![card(Five, Heart)]);
        // 要到牌后继续行动
        assert_eq!(game.turn, Side::Player);
        assert!(game.drain_events().contains(&GoFishEvent::Book { side: Side::Player, rank: King }));
    }

    #[test]
    fn test_ask_requires_rank_in_hand_and_turn() {
        let mut game = game_with(vec![card(Two, Spade)], vec![card(Four, Club)], vec![]);
        let before = (game.player_hand.clone(), game.computer_hand.clone());
        assert_eq!(game.ask(Side::Player, Four), Err(GameError::RankNotInHand(Four)));
        assert_eq!(game.ask(Side::Computer, Four), Err(GameError::NotYourTurn));
        assert_eq!((game.player_hand.clone(), game.computer_hand.clone()), before);
        assert_eq!(game.go_fish(Side::Player), Err(GameError::NoPendingDraw));
    }

    #[test]
    fn test_go_fish_passes_turn_unless_lucky() {
        let mut game = game_with(
            vec![card(Two, Spade), card(Six, Heart)],
            vec![card(Four, Club)],
            vec![card(Jack, Club), card(Six, Club)],
        );
        assert_eq!(game.ask(Side::Player, Two), Ok(AskOutcome::GoFish));
        // 必须先摸牌
        assert_eq!(game.ask(Side::Player, Six), Err(GameError::MustGoFish));
        assert_eq!(game.go_fish(Side::Player), Ok(FishOutcome::Drew(card(Jack, Club))));
        assert_eq!(game.turn, Side::Computer);

        let mut game = game_with(
            vec![card(Six, Heart)],
            vec![card(Four, Club)],
            vec![card(Six, Club), card(Jack, Club)],
        );
        assert_eq!(game.ask(Side::Player, Six), Ok(AskOutcome::GoFish));
        assert_eq!(game.go_fish(Side::Player), Ok(FishOutcome::LuckyDraw(card(Six, Club))));
        assert_eq!(game.turn, Side::Player);
        assert_eq!(game.player_hand.len(), 2);
    }

    #[test]
    fn test_go_fish_with_empty_deck_passes_turn() {
        let mut game = game_with(vec![card(Two, Spade), card(Four, Heart)], vec![card(Four, Club)], vec![]);
        assert_eq!(game.ask(Side::Player, Two), Ok(AskOutcome::GoFish));
        assert_eq!(game.go_fish(Side::Player), Ok(FishOutcome::DeckEmpty));
        assert_eq!(game.turn, Side::Computer);
        assert!(!game.is_over());
    }

    #[test]
    fn test_game_ends_when_no_book_is_reachable() {
        // 牌堆空了，玩家手里没牌，电脑再怎么要也要不到
        let mut game = game_with(vec![], vec![card(Five, Spade)], vec![]);
        game.turn = Side::Computer;
        let events = game.computer_turn().unwrap();
        assert!(game.is_over());
        assert_eq!(game.result(), Some(GoFishResult::Tie));
        assert_eq!(events.last(), Some(&GoFishEvent::GameOver(GoFishResult::Tie)));
        assert_eq!(game.computer_turn(), Err(GameError::GameOver));

        // 不完整的牌堆发完后双方没有共同点数，直接结束
        let deck = Deck::from_cards(GO_FISH_DECKS, [card(Five, Spade), card(Nine, Heart), card(Five, Diamond)]);
        let mut game = GoFishGame::from_deck(deck, StdRng::seed_from_u64(1));
        assert_eq!(game.player_hand.len(), 2);
        assert_eq!(game.computer_hand, vec![card(Nine, Heart)]);
        assert!(game.is_over());
        assert_eq!(game.ask(Side::Player, Five), Err(GameError::GameOver));
    }

    #[test]
    fn test_partial_deck_game_finishes() {
        let deck = Deck::from_cards(
            GO_FISH_DECKS,
            [Two, Three, Two, Four, Three, Two, Nine, Two].map(|r| card(r, Heart)),
        );
        let mut game = GoFishGame::from_deck(deck, StdRng::seed_from_u64(8));
        for _ in 0..200 {
            if game.is_over() {
                break;
            }
            match game.turn {
                Side::Player => {
                    let rank = game.player_hand[0].rank;
                    if game.ask(Side::Player, rank).unwrap() == AskOutcome::GoFish {
                        game.go_fish(Side::Player).unwrap();
                    }
                }
                Side::Computer => {
                    game.computer_turn().unwrap();
                }
            }
        }
        assert!(game.is_over());
    }

    #[test]
    fn test_empty_hand_is_refilled() {
        let mut game = game_with(
            vec![card(Eight, Spade), card(Eight, Heart), card(Eight, Club)],
            vec![card(Eight, Diamond), card(Ace, Club)],
            vec![card(Queen, Heart)],
        );
        assert_eq!(game.ask(Side::Player, Eight), Ok(AskOutcome::Caught(1)));
        assert_eq!(game.player_books, vec![Eight]);
        assert_eq!(game.player_hand, vec![card(Queen, Heart)]);
        assert!(game.deck.is_empty());
        assert_eq!(game.turn, Side::Player);
    }

    #[test]
    fn test_game_ends_when_everything_is_empty() {
        let mut game = game_with(
            vec![card(Five, Spade), card(Five, Heart), card(Five, Club)],
            vec![card(Five, Diamond)],
            vec![],
        );
        game.ask(Side::Player, Five).unwrap();
        assert!(game.is_over());
        assert_eq!(game.result(), Some(GoFishResult::PlayerWins));
        assert_eq!(game.ask(Side::Player, Five), Err(GameError::GameOver));
        assert!(game.drain_events().contains(&GoFishEvent::GameOver(GoFishResult::PlayerWins)));
    }

    #[test]
    fn test_computer_keeps_asking_until_it_misses() {
        let mut game = game_with(
            vec![card(Seven, Spade), card(Seven, Heart), card(Two, Club)],
            vec![card(Seven, Club)],
            vec![card(Three, Diamond), card(Nine, Diamond)],
        );
        game.turn = Side::Computer;

        let events = game.computer_turn().unwrap();
        assert!(events.contains(&GoFishEvent::Caught { side: Side::Computer, rank: Seven, count: 2 }));
        assert!(events.contains(&GoFishEvent::GoFish { side: Side::Computer }));
        assert_eq!(game.player_hand, vec![card(Two, Club)]);
        assert_eq!(game.computer_hand.len(), 4);
        assert_eq!(game.deck.len(), 1);
        assert_eq!(game.turn, Side::Player);
        assert_eq!(game.computer_turn(), Err(GameError::NotYourTurn));
    }

    #[test]
    fn test_seeded_game_plays_to_completion() {
        let mut game = GoFishGame::with_seed(2024).unwrap();
        for _ in 0..1000 {
            if game.is_over() {
                break;
            }
            match game.turn {
                Side::Player => {
                    let rank = game.player_hand[0].rank;
                    if game.ask(Side::Player, rank).unwrap() == AskOutcome::GoFish {
                        game.go_fish(Side::Player).unwrap();
                    }
                }
                Side::Computer => {
                    game.computer_turn().unwrap();
                }
            }
        }
        assert!(game.is_over());
        assert_eq!(game.player_books.len() + game.computer_books.len(), 13);
        assert!(game.result().is_some());
    }
}
