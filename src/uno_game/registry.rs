//! In-memory registry of running rooms.
//!
//! Each room sits behind its own mutex so operations on one room run one at
//! a time while different rooms proceed independently.

use super::game::{Game, GameView};
use chrono::{DateTime, Duration, Utc};
use log::info;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

#[derive(Debug)]
pub struct Room {
    pub game: Game,
    pub last_updated: DateTime<Utc>,
}

impl Room {
    pub fn new(game: Game) -> Self {
        Self {
            game,
            last_updated: Utc::now(),
        }
    }

    pub fn touch(&mut self) {
        self.last_updated = Utc::now();
    }
}

pub type RoomHandle = Arc<Mutex<Room>>;

#[derive(Debug, Clone, Default)]
pub struct RoomRegistry {
    rooms: Arc<RwLock<HashMap<String, RoomHandle>>>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a game under its own id and returns that id.
    pub async fn insert(&self, game: Game) -> String {
        let id = game.id.clone();
        self.rooms
            .write()
            .await
            .insert(id.clone(), Arc::new(Mutex::new(Room::new(game))));
        info!("Registered room {}", id);
        id
    }

    pub async fn get(&self, id: &str) -> Option<RoomHandle> {
        self.rooms.read().await.get(id).cloned()
    }

    /// Runs `f` against the room's game while holding the room lock.
    ///
    /// Returns `None` if no such room exists. The room's activity timestamp
    /// is refreshed afterwards.
    pub async fn with_room<T>(&self, id: &str, f: impl FnOnce(&mut Game) -> T) -> Option<T> {
        let handle = self.get(id).await?;
        let mut room = handle.lock().await;
        let result = f(&mut room.game);
        room.touch();
        Some(result)
    }

    /// Public lobby listing, sorted by room id.
    pub async fn list_public(&self) -> Vec<GameView> {
        let handles: Vec<RoomHandle> = self.rooms.read().await.values().cloned().collect();

        let mut views = Vec::with_capacity(handles.len());
        for handle in handles {
            views.push(handle.lock().await.game.public_view());
        }
        views.sort_by(|a, b| a.id.cmp(&b.id));
        views
    }

    pub async fn remove(&self, id: &str) -> bool {
        let removed = self.rooms.write().await.remove(id).is_some();
        if removed {
            info!("Removed room {}", id);
        }
        removed
    }

    /// Drops every room untouched for longer than `max_age`.
    pub async fn evict_idle(&self, max_age: Duration) -> usize {
        let cutoff = Utc::now() - max_age;
        let mut rooms = self.rooms.write().await;

        let mut stale = Vec::new();
        for (id, handle) in rooms.iter() {
            // A room that is busy right now is clearly not idle.
            if let Ok(room) = handle.try_lock() {
                if room.last_updated < cutoff {
                    stale.push(id.clone());
                }
            }
        }

        for id in &stale {
            rooms.remove(id);
        }
        if !stale.is_empty() {
            info!("Evicted {} idle rooms", stale.len());
        }
        stale.len()
    }

    pub async fn len(&self) -> usize {
        self.rooms.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rooms.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(name: &str) -> Game {
        Game::new(name, 4, ["alice", "bob"]).unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let registry = RoomRegistry::new();
        let id = registry.insert(game("Room")).await;

        assert_eq!(registry.len().await, 1);
        let handle = registry.get(&id).await.unwrap();
        assert_eq!(handle.lock().await.game.name, "Room");
        assert!(registry.get("missing").await.is_none());
    }

    #[tokio::test]
    async fn test_with_room_mutates_in_place() {
        let registry = RoomRegistry::new();
        let id = registry.insert(game("Room")).await;

        let current = registry
            .with_room(&id, |g| {
                g.skip_turn();
                g.current_player
            })
            .await;
        assert_eq!(current, Some(1));

        let handle = registry.get(&id).await.unwrap();
        assert_eq!(handle.lock().await.game.current_player, 1);
        assert!(registry.with_room("missing", |_| ()).await.is_none());
    }

    #[tokio::test]
    async fn test_list_public_hides_hands() {
        let registry = RoomRegistry::new();
        registry.insert(game("One")).await;
        registry.insert(game("Two")).await;

        let views = registry.list_public().await;
        assert_eq!(views.len(), 2);
        assert!(views[0].id < views[1].id);
        assert!(views
            .iter()
            .flat_map(|v| v.players.iter())
            .all(|p| p.hand.is_hidden()));
    }

    #[tokio::test]
    async fn test_remove() {
        let registry = RoomRegistry::new();
        let id = registry.insert(game("Room")).await;

        assert!(registry.remove(&id).await);
        assert!(!registry.remove(&id).await);
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn test_evict_idle() {
        let registry = RoomRegistry::new();
        let stale = registry.insert(game("Stale")).await;
        let fresh = registry.insert(game("Fresh")).await;

        registry.get(&stale).await.unwrap().lock().await.last_updated =
            Utc::now() - Duration::hours(2);

        assert_eq!(registry.evict_idle(Duration::hours(1)).await, 1);
        assert!(registry.get(&stale).await.is_none());
        assert!(registry.get(&fresh).await.is_some());
    }
}
