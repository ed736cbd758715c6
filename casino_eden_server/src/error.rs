use casino_eden_core::GameError;
use thiserror::Error;

/// 房间管理的错误，都会以 `ServerMessage::Error` 的形式只发给请求方
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LobbyError {
    #[error("房间不存在")]
    RoomNotFound,

    #[error("只有房主可以开始游戏")]
    NotHost,

    #[error("你已经在一个房间里了")]
    AlreadyInRoom,

    #[error("请先加入或创建房间")]
    NotInRoom,

    #[error(transparent)]
    Game(#[from] GameError),
}
