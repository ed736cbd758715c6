use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};
use url::Url;

use casino_eden_core::{ClientMessage, PlayerId, ServerMessage};

use crate::input::Input;
use crate::render;

pub const DEFAULT_SERVER_URL: &str = "ws://127.0.0.1:25917/ws";

/// 解析一行用户输入
#[derive(Debug, PartialEq)]
enum Command {
    Send(ClientMessage),
    Exit,
}

fn parse_command(line: &str) -> Result<Command, String> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let msg = match parts.as_slice() {
        ["create"] => ClientMessage::CreateRoom { nickname: "新玩家".to_string() },
        ["create", nickname] => ClientMessage::CreateRoom { nickname: nickname.to_string() },
        ["join", code, nickname] => ClientMessage::JoinRoom { code: code.to_string(), nickname: nickname.to_string() },
        ["join", ..] => return Err("用法: join <房间码> <昵称>".to_string()),
        ["start"] => ClientMessage::StartGame,
        ["leave"] => ClientMessage::LeaveRoom,
        ["exit"] => return Ok(Command::Exit),
        [word] => match crate::parse_action(word) {
            Some(action) => action.into(),
            None => return Err(format!("未知命令: {line}")),
        },
        _ => return Err(format!("未知命令: {line}")),
    };
    Ok(Command::Send(msg))
}

pub async fn run(server_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    let url = Url::parse(server_url)?;

    println!("正在连接到: {}", url);
    let (ws_stream, _) = connect_async(url.as_str()).await?;
    println!("连接成功!");

    let (mut write, mut read) = ws_stream.split();

    // 启动一个任务来处理从服务器接收的消息
    tokio::spawn(async move {
        let mut me: Option<PlayerId> = None;
        while let Some(msg) = read.next().await {
            match msg {
                Ok(Message::Text(text)) => match serde_json::from_str::<ServerMessage>(text.as_str()) {
                    Ok(server_msg) => {
                        println!();
                        show(&server_msg, &mut me);
                        print!("> "); // 重新显示输入提示符
                        let _ = std::io::Write::flush(&mut std::io::stdout());
                    }
                    Err(e) => eprintln!("解析服务器消息失败: {}", e),
                },
                Ok(_) => {}
                Err(e) => {
                    eprintln!("接收消息时出错: {}", e);
                    break;
                }
            }
        }
    });

    let mut input = Input::new();

    println!("--- 21点客户端 ---");
    println!("可用命令:");
    println!("  create <昵称>             - 创建一个新房间");
    println!("  join <房间码> <昵称>      - 加入一个房间");
    println!("  start                     - 开始游戏 (仅房主)");
    println!("  hit                       - 要牌");
    println!("  stand                     - 停牌");
    println!("  leave                     - 离开房间");
    println!("  exit                      - 退出");

    loop {
        let Some(line) = input.prompt("> ").await? else { break };
        if line.is_empty() {
            continue;
        }
        match parse_command(&line) {
            Ok(Command::Send(msg)) => {
                let payload = serde_json::to_string(&msg)?;
                write.send(Message::Text(payload.into())).await?;
            }
            Ok(Command::Exit) => {
                println!("正在断开连接...");
                break;
            }
            Err(usage) => println!("{usage}"),
        }
    }

    let _ = write.close().await;
    Ok(())
}

fn show(msg: &ServerMessage, me: &mut Option<PlayerId>) {
    match msg {
        ServerMessage::RoomCreated { code, your_id, .. } => {
            *me = Some(*your_id);
            println!("房间已创建，房间码: {code}");
        }
        ServerMessage::JoinedRoom { your_id, .. } => {
            *me = Some(*your_id);
            println!("已加入房间");
        }
        ServerMessage::GameState(view) => print!("{}", render::game_view(view, *me)),
        ServerMessage::Error { message } => println!("[错误] {message}"),
    }
}
