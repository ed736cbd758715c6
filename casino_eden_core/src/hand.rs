use crate::card::{Card, DealtCard, Rank};

// --- 手牌计分 ---

/// 计算21点手牌分值。
///
/// 所有 A 先按 11 计，总分超过 21 时逐张把 A 降为 1，直到不爆或没有可降的 A。
/// `reveal_hidden` 为 false 时跳过暗牌（玩家行动期间展示庄家的已知点数）。
pub fn score(cards: &[DealtCard], reveal_hidden: bool) -> u32 {
    let (total, _) = soft_total(cards, reveal_hidden);
    total
}

/// 手牌是否为软牌（仍有一张 A 按 11 计）
pub fn is_soft(cards: &[DealtCard], reveal_hidden: bool) -> bool {
    let (_, soft_aces) = soft_total(cards, reveal_hidden);
    soft_aces > 0
}

/// 返回 (总分, 仍按 11 计的 A 的数量)
fn soft_total(cards: &[DealtCard], reveal_hidden: bool) -> (u32, u32) {
    let mut total = 0;
    let mut soft_aces = 0;
    for dealt in cards.iter().filter(|c| reveal_hidden || !c.hidden) {
        total += dealt.card.rank.blackjack_points();
        if dealt.card.rank == Rank::Ace {
            soft_aces += 1;
        }
    }
    while total > 21 && soft_aces > 0 {
        total -= 10;
        soft_aces -= 1;
    }
    (total, soft_aces)
}

/// 一手21点的牌，只能追加
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hand {
    cards: Vec<DealtCard>,
}

impl Hand {
    pub fn new() -> Self {
        Hand::default()
    }

    pub fn push(&mut self, card: Card) {
        self.cards.push(DealtCard::face_up(card));
    }

    /// 发一张暗牌 (庄家的底牌)
    pub fn push_hidden(&mut self, card: Card) {
        self.cards.push(DealtCard::face_down(card));
    }

    /// 翻开所有暗牌
    pub fn reveal(&mut self) {
        self.cards.iter_mut().for_each(|c| c.hidden = false);
    }

    pub fn cards(&self) -> &[DealtCard] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn clear(&mut self) {
        self.cards.clear();
    }

    /// 真实分值（包括暗牌）
    pub fn score(&self) -> u32 {
        score(&self.cards, true)
    }

    /// 展示用分值（不包括暗牌）
    pub fn visible_score(&self) -> u32 {
        score(&self.cards, false)
    }

    pub fn is_busted(&self) -> bool {
        self.score() > 21
    }
}

impl FromIterator<Card> for Hand {
    fn from_iter<I: IntoIterator<Item = Card>>(iter: I) -> Self {
        Hand { cards: iter.into_iter().map(DealtCard::face_up).collect() }
    }
}

// --- 单元测试 ---

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::Suit;
    use proptest::prelude::*;
    use Rank::*;

    fn hand(ranks: &[Rank]) -> Vec<DealtCard> {
        ranks.iter().map(|&r| DealtCard::face_up(Card::new(r, Suit::Spade))).collect()
    }

    #[test]
    fn test_known_totals() {
        assert_eq!(score(&hand(&[Ace, Ace]), false), 12);
        assert_eq!(score(&hand(&[Ace, King]), false), 21);
        assert_eq!(score(&hand(&[Ace, Ace, Nine]), false), 21);
        assert_eq!(score(&hand(&[Ten, Nine, Five]), false), 24);
        assert_eq!(score(&hand(&[Queen, Jack]), false), 20);
        assert_eq!(score(&hand(&[]), false), 0);
    }

    #[test]
    fn test_aces_demote_one_at_a_time() {
        // A + A + A + 8 = 11 + 1 + 1 + 8
        assert_eq!(score(&hand(&[Ace, Ace, Ace, Eight]), false), 21);
        // 四张 A 加 K 全部降级后依然不爆
        assert_eq!(score(&hand(&[Ace, Ace, Ace, Ace, King]), false), 14);
        // A + 9 + 5 + K: A 降为 1 后仍然爆牌，返回最小总分
        assert_eq!(score(&hand(&[Ace, Nine, Five, King]), false), 25);
    }

    #[test]
    fn test_hidden_cards_only_count_when_revealed() {
        let cards = vec![
            DealtCard::face_up(Card::new(Six, Suit::Heart)),
            DealtCard::face_down(Card::new(Ace, Suit::Club)),
        ];
        assert_eq!(score(&cards, false), 6);
        assert_eq!(score(&cards, true), 17);
        assert!(is_soft(&cards, true));
        assert!(!is_soft(&cards, false));
    }

    #[test]
    fn test_hand_reveal() {
        let mut h = Hand::new();
        h.push(Card::new(Ten, Suit::Heart));
        h.push_hidden(Card::new(Seven, Suit::Club));
        assert_eq!(h.visible_score(), 10);
        assert_eq!(h.score(), 17);
        h.reveal();
        assert_eq!(h.visible_score(), 17);
        assert!(h.cards().iter().all(|c| !c.hidden));
    }

    fn any_rank() -> impl Strategy<Value = Rank> {
        (0usize..13).prop_map(|i| Rank::ALL[i])
    }

    proptest! {
        #[test]
        fn prop_never_busts_unless_unavoidable(ranks in prop::collection::vec(any_rank(), 0..12)) {
            let cards = hand(&ranks);
            let total = score(&cards, true);
            // 所有 A 都按 1 计时的最小总分
            let hard_total: u32 = ranks.iter()
                .map(|r| if *r == Ace { 1 } else { r.blackjack_points() })
                .sum();
            if total > 21 {
                prop_assert_eq!(total, hard_total);
            }
            prop_assert!(total >= hard_total);
            prop_assert_eq!((total - hard_total) % 10, 0);
            // 结果确定
            prop_assert_eq!(total, score(&cards, true));
        }
    }
}
