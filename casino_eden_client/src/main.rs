mod fish;
mod input;
mod net;
mod render;
mod solo;

use casino_eden_core::PlayerAction;

/// 要牌/停牌命令，联网和单机模式共用
fn parse_action(word: &str) -> Option<PlayerAction> {
    match word {
        "hit" | "h" => Some(PlayerAction::Hit),
        "stand" | "s" => Some(PlayerAction::Stand),
        _ => None,
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    match std::env::args().nth(1).as_deref() {
        Some("solo") => solo::run().await,
        Some("gofish") => fish::run().await,
        _ => {
            let url = std::env::var("CASINO_SERVER_URL").unwrap_or_else(|_| net::DEFAULT_SERVER_URL.to_string());
            net::run(&url).await
        }
    }
}
