use std::collections::HashMap;
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::Mutex;
use tokio::sync::mpsc;

use casino_eden_core::{PlayerId, RoomId, ServerMessage, Table};

/// 发往某个客户端 WebSocket 任务的通道
pub type ClientSender = mpsc::UnboundedSender<ServerMessage>;

/// 单个房间。
/// 房间内的所有可变状态都在同一把锁里，保证同一房间的操作逐个执行。
pub struct Room {
    pub id: RoomId,
    pub code: String,
    pub(crate) inner: Mutex<RoomInner>,
}

pub(crate) struct RoomInner {
    pub host_id: PlayerId,
    pub table: Table,
    // 将 PlayerId 映射到具体的网络连接
    pub connections: HashMap<PlayerId, ClientSender>,
    // 最后一名玩家离开后置位，之后的加入请求视为房间不存在
    pub closed: bool,
}

impl Room {
    pub(crate) fn new(id: RoomId, code: String, host_id: PlayerId, table: Table) -> Self {
        Room {
            id,
            code,
            inner: Mutex::new(RoomInner {
                host_id,
                table,
                connections: HashMap::new(),
                closed: false,
            }),
        }
    }

    pub fn host_id(&self) -> PlayerId {
        self.inner.lock().host_id
    }

    pub fn player_count(&self) -> usize {
        self.inner.lock().table.players.len()
    }
}

/// 内存中的房间表，按房间 ID 和房间码两种方式索引
#[derive(Default)]
pub struct RoomStore {
    rooms: DashMap<RoomId, Arc<Room>>,
    codes: DashMap<String, RoomId>,
}

impl RoomStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 登记新房间。房间码已被占用时原样退回，由调用方换一个码重试。
    pub fn create(&self, room: Room) -> Result<Arc<Room>, Room> {
        match self.codes.entry(room.code.clone()) {
            Entry::Occupied(_) => Err(room),
            Entry::Vacant(slot) => {
                slot.insert(room.id);
                let room = Arc::new(room);
                self.rooms.insert(room.id, room.clone());
                Ok(room)
            }
        }
    }

    pub fn get(&self, id: &RoomId) -> Option<Arc<Room>> {
        self.rooms.get(id).map(|r| r.value().clone())
    }

    pub fn find_by_code(&self, code: &str) -> Option<Arc<Room>> {
        let id = *self.codes.get(code)?.value();
        self.get(&id)
    }

    pub fn delete(&self, id: &RoomId) -> Option<Arc<Room>> {
        let (_, room) = self.rooms.remove(id)?;
        self.codes.remove(&room.code);
        Some(room)
    }

    /// 对每个房间调用 `f`。先复制出房间列表，回调期间不持有分片锁。
    pub fn for_each_room(&self, mut f: impl FnMut(&Room)) {
        let rooms: Vec<Arc<Room>> = self.rooms.iter().map(|r| r.value().clone()).collect();
        for room in rooms {
            f(&room);
        }
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}
