use casino_eden_core::{AskOutcome, GameError, GoFishGame, Rank, Side};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::input::Input;
use crate::render;

/// 单机钓鱼：玩家对电脑
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut input = Input::new();
    let mut game = GoFishGame::new(StdRng::from_os_rng())?;

    println!("--- 钓鱼 (单机) ---");
    println!("ask <点数> 向电脑要牌，没要到时输入 fish 摸牌，quit 退出");
    report(&mut game);

    while !game.is_over() {
        if game.turn == Side::Computer {
            for event in game.computer_turn()? {
                println!("{}", render::fish_event(&event));
            }
            continue;
        }

        print_table(&game);
        let Some(line) = input.prompt("> ").await? else { break };
        let mut parts = line.split_whitespace();
        let result = match (parts.next(), parts.next()) {
            (Some("ask"), Some(rank)) => ask(&mut game, rank),
            (Some("fish"), None) => game.go_fish(Side::Player).map(|_| ()),
            (Some("quit"), None) => break,
            _ => {
                println!("用法: ask <点数> | fish | quit");
                continue;
            }
        };
        if let Err(e) = result {
            println!("{e}");
        }
        report(&mut game);
    }

    if game.is_over() {
        println!(
            "最终: 你 {} 本，电脑 {} 本",
            game.books(Side::Player).len(),
            game.books(Side::Computer).len()
        );
    }
    Ok(())
}

fn ask(game: &mut GoFishGame, rank: &str) -> Result<(), GameError> {
    let rank: Rank = rank.parse()?;
    if game.ask(Side::Player, rank)? == AskOutcome::GoFish {
        println!("输入 fish 摸一张牌");
    }
    Ok(())
}

fn report(game: &mut GoFishGame) {
    for event in game.drain_events() {
        println!("{}", render::fish_event(&event));
    }
}

fn print_table(game: &GoFishGame) {
    let mut hand = game.hand(Side::Player).to_vec();
    hand.sort_by_key(|c| c.rank);
    let hand: Vec<String> = hand.iter().map(|c| c.to_string()).collect();
    let books: Vec<String> = game.books(Side::Player).iter().map(|r| r.to_string()).collect();
    println!(
        "你的手牌: {}  书: [{}]  电脑手牌 {} 张，书 {} 本，牌堆剩余 {} 张",
        hand.join(" "),
        books.join(" "),
        game.hand(Side::Computer).len(),
        game.books(Side::Computer).len(),
        game.deck.len(),
    );
}
