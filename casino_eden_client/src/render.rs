use casino_eden_core::{
    CardView, GamePhase, GameView, GoFishEvent, GoFishResult, Outcome, PlayerId, PlayerStatus, Side, Winner,
};

pub fn cards(hand: &[CardView]) -> String {
    hand.iter()
        .map(|c| match c.card {
            Some(card) if c.face_up => card.to_string(),
            _ => "🂠".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn status(status: PlayerStatus) -> &'static str {
    match status {
        PlayerStatus::Playing => "行动中",
        PlayerStatus::Standing => "停牌",
        PlayerStatus::Busted => "爆牌",
        PlayerStatus::Waiting => "等待下一局",
    }
}

fn outcome(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::Win => "赢",
        Outcome::Push => "平",
        Outcome::Lose => "输",
    }
}

/// 把牌桌状态渲染成多行文本，`me` 所在的行会加上标记
pub fn game_view(view: &GameView, me: Option<PlayerId>) -> String {
    let mut out = String::new();
    let phase = match view.phase {
        GamePhase::Betting => "下注",
        GamePhase::Playing => "玩家行动",
        GamePhase::DealerTurn => "庄家行动",
        GamePhase::Finished => "本局结束",
    };
    if !view.code.is_empty() {
        out.push_str(&format!("房间码: {}  ", view.code));
    }
    out.push_str(&format!("阶段: {phase}\n"));
    out.push_str(&format!("庄家: {} ({}点)\n", cards(&view.dealer_hand), view.dealer_score));

    for p in &view.players {
        let marker = if view.current_player_id == Some(p.id) { "▶" } else { " " };
        let mut line = format!("{marker} {}", p.name);
        if Some(p.id) == me {
            line.push_str(" (你)");
        }
        if p.id == view.host_id && !view.code.is_empty() {
            line.push_str(" [房主]");
        }
        let soft = if p.soft { "软" } else { "" };
        line.push_str(&format!(": {} ({soft}{}点) {} 筹码 {}", cards(&p.hand), p.score, status(p.status), p.balance));
        if p.bet > 0 {
            line.push_str(&format!(" 下注 {}", p.bet));
        }
        if let Some(o) = p.outcome {
            line.push_str(&format!(" -> {}", outcome(o)));
        }
        out.push_str(&line);
        out.push('\n');
    }

    if let Some(winner) = view.winner {
        let name = match winner {
            Winner::Dealer => "庄家".to_string(),
            Winner::Player(id) => view.players.iter()
                .find(|p| p.id == id)
                .map_or_else(|| "未知玩家".to_string(), |p| p.name.clone()),
        };
        out.push_str(&format!("赢家: {name}\n"));
    }
    out
}

fn side(side: Side) -> &'static str {
    match side {
        Side::Player => "你",
        Side::Computer => "电脑",
    }
}

pub fn fish_event(event: &GoFishEvent) -> String {
    match event {
        GoFishEvent::Asked { side: s, rank } => format!("{} 要 {}", side(*s), rank),
        GoFishEvent::Caught { side: s, rank, count } => format!("{} 拿到了 {} 张 {}", side(*s), count, rank),
        GoFishEvent::GoFish { side: s } => format!("对方没有，{} 去钓鱼!", side(*s)),
        GoFishEvent::Drew { side: Side::Computer, keeps_turn, .. } => {
            if *keeps_turn { "电脑摸到了要的牌，继续行动".to_string() } else { "电脑摸了一张牌".to_string() }
        }
        GoFishEvent::Drew { side: Side::Player, card, keeps_turn } => {
            if *keeps_turn { format!("你摸到了 {card}，正是要的牌，继续行动") } else { format!("你摸到了 {card}") }
        }
        GoFishEvent::DeckEmpty { side: s } => format!("牌堆已空，{} 没有摸到牌", side(*s)),
        GoFishEvent::Refilled { side: Side::Player, card } => format!("你的手牌空了，补摸一张 {card}"),
        GoFishEvent::Refilled { side: Side::Computer, .. } => "电脑的手牌空了，补摸一张".to_string(),
        GoFishEvent::Book { side: s, rank } => format!("{} 凑成了一本 {}", side(*s), rank),
        GoFishEvent::GameOver(result) => match result {
            GoFishResult::PlayerWins => "游戏结束，你赢了!".to_string(),
            GoFishResult::ComputerWins => "游戏结束，电脑赢了".to_string(),
            GoFishResult::Tie => "游戏结束，平局".to_string(),
        },
    }
}
