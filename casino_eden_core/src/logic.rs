use crate::card::Card;
use crate::deck::Deck;
use crate::error::GameError;
use crate::state::*;
use uuid::Uuid;

/// 庄家在达到该点数前必须继续要牌 (软 17 也停牌)
pub const DEALER_STANDS_ON: u32 = 17;

/// 解析玩家输入的下注金额，非数字、负数和 0 都会被拒绝
pub fn parse_bet(input: &str) -> Result<u32, GameError> {
    match input.trim().parse::<i64>() {
        Ok(amount) if amount > 0 => u32::try_from(amount).map_err(|_| GameError::InvalidBet),
        _ => Err(GameError::InvalidBet),
    }
}

// --- 核心游戏流程 ---

impl Table {
    /// 新玩家入座。
    /// 下注阶段加入的玩家直接参与本局，否则等待下一局。
    pub fn add_player(&mut self, name: impl Into<String>) -> Result<PlayerId, GameError> {
        if self.players.len() >= self.config.max_players {
            return Err(GameError::TableFull(self.config.max_players));
        }
        let id = Uuid::new_v4();
        let status = if self.phase == GamePhase::Betting { PlayerStatus::Playing } else { PlayerStatus::Waiting };
        self.players.push(Player {
            id,
            name: name.into(),
            hand: crate::hand::Hand::new(),
            balance: self.config.starting_balance,
            bet: 0,
            status,
            outcome: None,
        });
        Ok(id)
    }

    /// 玩家离开牌桌。
    /// 若轮到其行动，则行动权交给下一位玩家（可能因此进入庄家回合并结算）。
    /// 后续流程失败时牌桌保持原样，玩家也不会被移除。
    pub fn remove_player(&mut self, id: PlayerId) -> Result<Player, GameError> {
        let idx = self.index_of(&id).ok_or(GameError::PlayerNotFound(id))?;
        let continues = match self.phase {
            GamePhase::Playing => self.cur_player_id == Some(id),
            GamePhase::Betting => true,
            _ => false,
        };
        if !continues {
            return Ok(self.players.remove(idx));
        }

        // 在副本上走完后续流程，成功后再替换
        let mut next = self.clone();
        let player = next.players.remove(idx);
        match next.phase {
            // 删除后 idx 位置就是原来的下一位
            GamePhase::Playing => next.advance_from(idx)?,
            GamePhase::Betting if next.all_bets_placed() => next.deal()?,
            _ => {}
        }
        *self = next;
        Ok(player)
    }

    /// 下注。
    /// 只能在下注阶段进行；所有在座玩家都下注后自动发牌。
    pub fn place_bet(&mut self, id: PlayerId, amount: u32) -> Result<(), GameError> {
        if self.phase != GamePhase::Betting {
            return Err(GameError::WrongPhase(self.phase));
        }
        let idx = self.index_of(&id).ok_or(GameError::PlayerNotFound(id))?;
        let player = &self.players[idx];
        if amount == 0 {
            return Err(GameError::InvalidBet);
        }
        if player.bet > 0 {
            return Err(GameError::AlreadyBet);
        }
        if amount > player.balance {
            return Err(GameError::InsufficientBalance { balance: player.balance, amount });
        }

        // 本次下注会触发发牌时，先准备好牌靴，保证失败时不会扣款
        let completes_table = self.players.iter()
            .enumerate()
            .all(|(i, p)| i == idx || p.status != PlayerStatus::Playing || p.bet > 0);
        if completes_table {
            self.ensure_shoe()?;
        }

        let player = &mut self.players[idx];
        player.balance -= amount;
        player.bet = amount;

        if completes_table {
            self.deal()?;
        }
        Ok(())
    }

    /// 发牌，开始本局。
    ///
    /// - 牌靴为空时换一副新洗好的牌靴。
    /// - 分两轮，每轮给每位参与的玩家发一张，再给庄家发一张；庄家第二张为暗牌。
    /// - 进入 Playing 阶段，第一位参与的玩家开始行动。
    ///
    /// 多人房间跳过下注，直接调用此函数。
    pub fn deal(&mut self) -> Result<(), GameError> {
        if self.phase != GamePhase::Betting {
            return Err(GameError::WrongPhase(self.phase));
        }
        if !self.players.iter().any(|p| p.status == PlayerStatus::Playing) {
            return Err(GameError::NoPlayers);
        }
        self.ensure_shoe()?;

        for round in 0..2 {
            for idx in 0..self.players.len() {
                if self.players[idx].status != PlayerStatus::Playing {
                    continue;
                }
                let card = self.draw_card()?;
                self.players[idx].hand.push(card);
            }
            let card = self.draw_card()?;
            if round == 0 {
                self.dealer.push(card);
            } else {
                self.dealer.push_hidden(card);
            }
        }

        self.phase = GamePhase::Playing;
        self.winner = None;
        self.advance_from(0)
    }

    /// 要牌。爆牌后自动轮到下一位。返回摸到的牌。
    pub fn hit(&mut self, id: PlayerId) -> Result<Card, GameError> {
        let idx = self.check_turn(id)?;
        let card = self.draw_card()?;
        let player = &mut self.players[idx];
        player.hand.push(card);
        if player.hand.is_busted() {
            player.status = PlayerStatus::Busted;
            self.advance_from(idx + 1)?;
        }
        Ok(card)
    }

    /// 停牌，轮到下一位
    pub fn stand(&mut self, id: PlayerId) -> Result<(), GameError> {
        let idx = self.check_turn(id)?;
        self.players[idx].status = PlayerStatus::Standing;
        self.advance_from(idx + 1)
    }

    /// 开始新的一局：清空手牌和下注，保留余额，下一次发牌使用新牌靴
    pub fn new_round(&mut self) -> Result<(), GameError> {
        match self.phase {
            GamePhase::Betting => return Ok(()),
            GamePhase::Finished => {}
            phase => return Err(GameError::WrongPhase(phase)),
        }
        for player in &mut self.players {
            player.hand.clear();
            player.bet = 0;
            player.status = PlayerStatus::Playing;
            player.outcome = None;
        }
        self.dealer.clear();
        self.deck = Deck::default();
        self.cur_player_id = None;
        self.winner = None;
        self.phase = GamePhase::Betting;
        Ok(())
    }

    /// 筹码输光后重新买入
    pub fn rebuy(&mut self, id: PlayerId) -> Result<(), GameError> {
        if !matches!(self.phase, GamePhase::Betting | GamePhase::Finished) {
            return Err(GameError::WrongPhase(self.phase));
        }
        let starting_balance = self.config.starting_balance;
        let player = self.player_mut(&id).ok_or(GameError::PlayerNotFound(id))?;
        if player.balance > 0 || player.bet > 0 {
            return Err(GameError::CannotRebuy);
        }
        player.balance = starting_balance;
        Ok(())
    }
}

// --- 辅助逻辑函数 ---

impl Table {
    /// 校验要牌/停牌的前置条件，返回玩家索引
    fn check_turn(&self, id: PlayerId) -> Result<usize, GameError> {
        if self.phase != GamePhase::Playing {
            return Err(GameError::WrongPhase(self.phase));
        }
        let idx = self.index_of(&id).ok_or(GameError::PlayerNotFound(id))?;
        if self.cur_player_id != Some(id) || self.players[idx].status != PlayerStatus::Playing {
            return Err(GameError::NotYourTurn);
        }
        Ok(idx)
    }

    fn all_bets_placed(&self) -> bool {
        let mut playing = self.players.iter().filter(|p| p.status == PlayerStatus::Playing).peekable();
        playing.peek().is_some() && playing.all(|p| p.bet > 0)
    }

    /// 从 start 开始按座位顺序寻找下一位仍可行动的玩家。
    /// 没有则进入庄家回合。
    fn advance_from(&mut self, start: usize) -> Result<(), GameError> {
        let n = self.players.len();
        let next = (0..n)
            .map(|k| (start + k) % n)
            .find(|&idx| self.players[idx].status == PlayerStatus::Playing);

        match next {
            Some(idx) => {
                self.cur_player_id = Some(self.players[idx].id);
                Ok(())
            }
            None => {
                self.cur_player_id = None;
                self.play_dealer()
            }
        }
    }

    /// 庄家回合：翻开底牌，不足 17 点持续要牌，然后结算
    fn play_dealer(&mut self) -> Result<(), GameError> {
        self.phase = GamePhase::DealerTurn;
        self.dealer.reveal();
        while self.dealer.score() < DEALER_STANDS_ON {
            let card = self.draw_card()?;
            self.dealer.push(card);
        }
        self.settle();
        self.phase = GamePhase::Finished;
        Ok(())
    }

    /// 结算每位玩家的输赢并派彩
    fn settle(&mut self) {
        let dealer_score = self.dealer.score();
        let dealer_busted = dealer_score > 21;

        let mut best_score = if dealer_busted { 0 } else { dealer_score };
        let mut winner = if dealer_busted { None } else { Some(Winner::Dealer) };

        for player in &mut self.players {
            let outcome = match player.status {
                PlayerStatus::Waiting => continue,
                PlayerStatus::Busted => Outcome::Lose,
                PlayerStatus::Playing | PlayerStatus::Standing => {
                    let score = player.hand.score();
                    if score > best_score {
                        best_score = score;
                        winner = Some(Winner::Player(player.id));
                    }
                    if dealer_busted || score > dealer_score {
                        Outcome::Win
                    } else if score == dealer_score {
                        Outcome::Push
                    } else {
                        Outcome::Lose
                    }
                }
            };
            match outcome {
                Outcome::Win => player.balance = player.balance.saturating_add(player.bet.saturating_mul(2)),
                Outcome::Push => player.balance = player.balance.saturating_add(player.bet),
                Outcome::Lose => {}
            }
            player.outcome = Some(outcome);
        }

        self.winner = winner;
    }

    fn ensure_shoe(&mut self) -> Result<(), GameError> {
        if self.deck.is_empty() {
            self.deck = Deck::shoe(self.config.num_decks, &mut self.rng)?;
        }
        Ok(())
    }

    /// 从本局牌靴摸牌，牌靴用完时换一副新牌靴
    fn draw_card(&mut self) -> Result<Card, GameError> {
        if self.deck.is_empty() {
            tracing::warn!("牌靴已用完，换一副新牌靴");
            self.ensure_shoe()?;
        }
        self.deck.draw()
    }
}

// --- 单元测试 ---
