use casino_eden_core::{parse_bet, GamePhase, GameView, PlayerAction, Table, TableConfig};
use uuid::Uuid;

use crate::input::Input;
use crate::render;

/// 单机21点：一名玩家对庄家，每局先下注
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut input = Input::new();
    let mut table = Table::new(TableConfig::default());
    let me = table.add_player("你")?;

    println!("--- 21点 (单机) ---");
    println!("输入 quit 退出");

    loop {
        let view = GameView::new(Uuid::nil(), "", me, &table);
        match table.phase {
            GamePhase::Betting => {
                let balance = table.player(&me).map_or(0, |p| p.balance);
                let hint = if balance == 0 {
                    "筹码已输光，输入 rebuy 重新买入: ".to_string()
                } else {
                    format!("筹码 {balance}，下注金额: ")
                };
                let Some(line) = input.prompt(&hint).await? else { break };
                let result = match line.as_str() {
                    "quit" => break,
                    "rebuy" => table.rebuy(me),
                    _ => parse_bet(&line).and_then(|amount| table.place_bet(me, amount)),
                };
                if let Err(e) = result {
                    println!("{e}");
                }
            }
            GamePhase::Playing | GamePhase::DealerTurn => {
                print!("{}", render::game_view(&view, Some(me)));
                let Some(line) = input.prompt("hit / stand > ").await? else { break };
                let result = match crate::parse_action(&line) {
                    Some(PlayerAction::Hit) => table.hit(me).map(|card| println!("你摸到了 {card}")),
                    Some(PlayerAction::Stand) => table.stand(me),
                    None if line == "quit" => break,
                    None => {
                        println!("未知命令: {line}");
                        continue;
                    }
                };
                if let Err(e) = result {
                    println!("{e}");
                }
            }
            GamePhase::Finished => {
                print!("{}", render::game_view(&view, Some(me)));
                let Some(line) = input.prompt("回车开始下一局 > ").await? else { break };
                if line == "quit" {
                    break;
                }
                table.new_round()?;
            }
        }
    }

    println!("再见!");
    Ok(())
}
