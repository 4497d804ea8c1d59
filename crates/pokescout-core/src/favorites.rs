//! The favorites store: a bounded, observable, session-persisted list.
//!
//! Holds at most ten entries, newest first, unique by id. Every mutation
//! is pushed through a `tokio::sync::watch` channel (late subscribers get
//! the latest snapshot for free) and mirrored to session storage in the
//! same call, with no suspension point in between.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::watch;
use tracing::debug;

use crate::models::{FavoriteCandidate, FavoriteEntry};
use crate::session::{SessionStore, FAVORITES_KEY};

/// Hard cap on the collection size
pub const MAX_FAVORITES: usize = 10;

/// Why an `add` was rejected. These are outcomes, not failures: the store
/// itself stays untouched and no error is logged.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddError {
    #[error("This pokemon is already in your favorites")]
    Duplicate,

    #[error("You can only keep up to 10 favorites")]
    Limit,
}

pub struct FavoritesStore {
    session: Arc<dyn SessionStore>,
    tx: watch::Sender<Vec<FavoriteEntry>>,
}

impl FavoritesStore {
    /// Build the store from the persisted snapshot.
    ///
    /// An absent snapshot means no favorites yet. A snapshot that is not a
    /// JSON array of entries is treated the same way, except the broken
    /// value is also overwritten with `[]` so it cannot trip us up twice.
    /// Recovery is silent by design; corruption of session data is not an
    /// event the user can act on.
    pub fn new(session: Arc<dyn SessionStore>) -> Self {
        let initial = read_snapshot(session.as_ref());
        let (tx, _) = watch::channel(initial);
        Self { session, tx }
    }

    /// Current snapshot of the collection, newest first.
    pub fn favorites(&self) -> Vec<FavoriteEntry> {
        self.tx.borrow().clone()
    }

    /// Live view of the collection. `borrow()` replays the latest snapshot
    /// immediately; `changed()` resolves after every subsequent mutation.
    pub fn subscribe(&self) -> watch::Receiver<Vec<FavoriteEntry>> {
        self.tx.subscribe()
    }

    /// Add a new favorite, alias defaulted to its name, prepended so the
    /// newest entry lists first.
    ///
    /// The duplicate check runs before the limit check: adding an id that
    /// is already present always reports `Duplicate`, even when the
    /// collection is full.
    pub fn add(&self, candidate: FavoriteCandidate) -> Result<(), AddError> {
        let current = self.tx.borrow().clone();

        if current.iter().any(|entry| entry.id == candidate.id) {
            return Err(AddError::Duplicate);
        }

        if current.len() >= MAX_FAVORITES {
            return Err(AddError::Limit);
        }

        let mut next = Vec::with_capacity(current.len() + 1);
        next.push(FavoriteEntry::from_candidate(candidate));
        next.extend(current);

        self.publish(next);
        Ok(())
    }

    /// Remove the entry with `id` if present. Removing an id that is not
    /// there is not an error; the current state is republished and
    /// persisted either way.
    pub fn remove(&self, id: u32) {
        let next: Vec<FavoriteEntry> = self
            .tx
            .borrow()
            .iter()
            .filter(|entry| entry.id != id)
            .cloned()
            .collect();

        self.publish(next);
    }

    /// Replace the alias of the entry with `id`, verbatim. Trimming and
    /// uniqueness are the caller's job (see [`crate::alias`]). When no
    /// entry matches, nothing is mutated, published or persisted.
    pub fn update_alias(&self, id: u32, new_alias: &str) {
        let mut next = self.tx.borrow().clone();
        let mut updated = false;

        for entry in &mut next {
            if entry.id == id {
                entry.alias = new_alias.to_string();
                updated = true;
            }
        }

        if updated {
            self.publish(next);
        }
    }

    /// Current membership of `id`.
    pub fn is_favorite(&self, id: u32) -> bool {
        self.tx.borrow().iter().any(|entry| entry.id == id)
    }

    /// Live membership stream for `id`: yields the current value on the
    /// first poll, then again after each store publish.
    pub fn watch_membership(&self, id: u32) -> MembershipWatch {
        MembershipWatch {
            rx: self.tx.subscribe(),
            id,
            replayed: false,
        }
    }

    // One uninterrupted read-modify-publish-persist step. watch sends are
    // synchronous, so subscribers and the snapshot can never disagree.
    fn publish(&self, next: Vec<FavoriteEntry>) {
        match serde_json::to_string(&next) {
            Ok(raw) => {
                self.tx.send_replace(next);
                self.session.set(FAVORITES_KEY, &raw);
            }
            Err(err) => {
                // Unreachable for these plain types, but the store must
                // not panic on a persistence problem.
                debug!("Failed to serialize favorites snapshot: {err}");
                self.tx.send_replace(next);
            }
        }
    }
}

/// Boolean membership stream handed out by
/// [`FavoritesStore::watch_membership`].
pub struct MembershipWatch {
    rx: watch::Receiver<Vec<FavoriteEntry>>,
    id: u32,
    replayed: bool,
}

impl MembershipWatch {
    /// Membership in the latest published snapshot.
    pub fn current(&self) -> bool {
        self.rx.borrow().iter().any(|entry| entry.id == self.id)
    }

    /// First call returns the current membership immediately; later calls
    /// wait for the next publish. `None` once the store has been dropped.
    pub async fn next(&mut self) -> Option<bool> {
        if !self.replayed {
            self.replayed = true;
            let seen = self
                .rx
                .borrow_and_update()
                .iter()
                .any(|entry| entry.id == self.id);
            return Some(seen);
        }

        match self.rx.changed().await {
            Ok(()) => {
                let seen = self
                    .rx
                    .borrow_and_update()
                    .iter()
                    .any(|entry| entry.id == self.id);
                Some(seen)
            }
            Err(_) => None,
        }
    }
}

fn read_snapshot(session: &dyn SessionStore) -> Vec<FavoriteEntry> {
    let Some(raw) = session.get(FAVORITES_KEY) else {
        return Vec::new();
    };

    match serde_json::from_str::<Vec<FavoriteEntry>>(&raw) {
        Ok(entries) => entries,
        Err(err) => {
            debug!("Discarding unreadable favorites snapshot: {err}");
            session.set(FAVORITES_KEY, "[]");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemorySessionStore;

    fn candidate(id: u32) -> FavoriteCandidate {
        FavoriteCandidate {
            id,
            name: format!("poke-{id}"),
            image: format!("img-{id}"),
        }
    }

    fn fresh_store() -> (Arc<MemorySessionStore>, FavoritesStore) {
        let session = Arc::new(MemorySessionStore::new());
        let store = FavoritesStore::new(session.clone());
        (session, store)
    }

    fn persisted(session: &MemorySessionStore) -> Vec<FavoriteEntry> {
        serde_json::from_str(&session.get(FAVORITES_KEY).expect("snapshot missing")).unwrap()
    }

    #[test]
    fn distinct_adds_grow_the_collection() {
        let (_, store) = fresh_store();

        for id in 1..=7 {
            store.add(candidate(id)).unwrap();
        }

        let favorites = store.favorites();
        assert_eq!(favorites.len(), 7);
        for id in 1..=7 {
            assert!(store.is_favorite(id));
        }
        assert!(!store.is_favorite(8));
    }

    #[test]
    fn newest_entry_lists_first() {
        let (_, store) = fresh_store();
        store.add(candidate(1)).unwrap();
        store.add(candidate(2)).unwrap();
        store.add(candidate(3)).unwrap();

        let ids: Vec<u32> = store.favorites().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[test]
    fn duplicate_add_is_rejected_and_collection_untouched() {
        let (session, store) = fresh_store();
        store.add(candidate(1)).unwrap();
        let before = store.favorites();

        assert_eq!(store.add(candidate(1)), Err(AddError::Duplicate));
        assert_eq!(store.favorites(), before);
        assert_eq!(persisted(&session), before);
    }

    #[test]
    fn eleventh_distinct_add_hits_the_limit() {
        let (_, store) = fresh_store();
        for id in 1..=10 {
            store.add(candidate(id)).unwrap();
        }

        assert_eq!(store.add(candidate(11)), Err(AddError::Limit));
        assert_eq!(store.favorites().len(), 10);
        assert!(!store.is_favorite(11));
    }

    #[test]
    fn duplicate_wins_over_limit_on_a_full_collection() {
        let (_, store) = fresh_store();
        for id in 1..=10 {
            store.add(candidate(id)).unwrap();
        }

        // id 5 is both a duplicate and over the limit; duplicate is checked first
        assert_eq!(store.add(candidate(5)), Err(AddError::Duplicate));
    }

    #[test]
    fn remove_clears_membership() {
        let (_, store) = fresh_store();
        store.add(candidate(1)).unwrap();
        store.add(candidate(2)).unwrap();

        store.remove(1);

        assert!(!store.is_favorite(1));
        assert!(store.is_favorite(2));
        assert_eq!(store.favorites().len(), 1);
    }

    #[test]
    fn removing_an_absent_id_still_republishes() {
        let (session, store) = fresh_store();
        store.add(candidate(1)).unwrap();

        let mut rx = store.subscribe();
        rx.borrow_and_update();
        assert!(!rx.has_changed().unwrap());

        store.remove(999);

        assert!(rx.has_changed().unwrap());
        assert_eq!(store.favorites().len(), 1);
        assert_eq!(persisted(&session), store.favorites());
    }

    #[test]
    fn update_alias_touches_only_the_target() {
        let (_, store) = fresh_store();
        store.add(candidate(1)).unwrap();
        store.add(candidate(2)).unwrap();

        store.update_alias(2, "Buddy");

        let favorites = store.favorites();
        let target = favorites.iter().find(|e| e.id == 2).unwrap();
        let other = favorites.iter().find(|e| e.id == 1).unwrap();

        assert_eq!(target.alias, "Buddy");
        assert_eq!(target.name, "poke-2");
        assert_eq!(target.image, "img-2");
        assert_eq!(other.alias, "poke-1");
    }

    #[test]
    fn update_alias_on_missing_id_publishes_nothing() {
        let (session, store) = fresh_store();
        store.add(candidate(1)).unwrap();
        let snapshot_before = session.get(FAVORITES_KEY);

        let mut rx = store.subscribe();
        rx.borrow_and_update();

        store.update_alias(999, "Ghost");

        assert!(!rx.has_changed().unwrap());
        assert_eq!(session.get(FAVORITES_KEY), snapshot_before);
    }

    #[test]
    fn snapshot_deep_equals_published_state_after_every_mutation() {
        let (session, store) = fresh_store();

        store.add(candidate(1)).unwrap();
        assert_eq!(persisted(&session), store.favorites());

        store.add(candidate(2)).unwrap();
        assert_eq!(persisted(&session), store.favorites());

        store.update_alias(1, "Chief");
        assert_eq!(persisted(&session), store.favorites());

        store.remove(2);
        assert_eq!(persisted(&session), store.favorites());

        store.remove(1);
        assert_eq!(persisted(&session), store.favorites());
        assert_eq!(session.get(FAVORITES_KEY).as_deref(), Some("[]"));
    }

    #[test]
    fn collection_survives_a_restart_through_the_snapshot() {
        let session = Arc::new(MemorySessionStore::new());
        {
            let store = FavoritesStore::new(session.clone());
            store.add(candidate(1)).unwrap();
            store.update_alias(1, "Sparky");
        }

        let store = FavoritesStore::new(session);
        let favorites = store.favorites();
        assert_eq!(favorites.len(), 1);
        assert_eq!(favorites[0].alias, "Sparky");
    }

    #[test]
    fn garbage_snapshot_resets_to_empty_and_rewrites() {
        let session = Arc::new(MemorySessionStore::new());
        session.set(FAVORITES_KEY, "definitely not json {");

        let store = FavoritesStore::new(session.clone());

        assert!(store.favorites().is_empty());
        assert_eq!(session.get(FAVORITES_KEY).as_deref(), Some("[]"));
    }

    #[test]
    fn non_array_snapshot_resets_to_empty_and_rewrites() {
        let session = Arc::new(MemorySessionStore::new());
        session.set(FAVORITES_KEY, r#"{"id": 1, "name": "pikachu"}"#);

        let store = FavoritesStore::new(session.clone());

        assert!(store.favorites().is_empty());
        assert_eq!(session.get(FAVORITES_KEY).as_deref(), Some("[]"));
    }

    #[test]
    fn absent_snapshot_starts_empty_without_writing() {
        let (session, store) = fresh_store();

        assert!(store.favorites().is_empty());
        assert_eq!(session.get(FAVORITES_KEY), None);
    }

    #[tokio::test]
    async fn membership_watch_replays_then_follows_mutations() {
        let (_, store) = fresh_store();
        store.add(candidate(1)).unwrap();

        let mut watch = store.watch_membership(1);
        assert_eq!(watch.next().await, Some(true));

        store.remove(1);
        assert_eq!(watch.next().await, Some(false));

        store.add(candidate(1)).unwrap();
        assert_eq!(watch.next().await, Some(true));
    }

    #[tokio::test]
    async fn membership_watch_replays_false_for_unknown_id() {
        let (_, store) = fresh_store();
        let mut watch = store.watch_membership(42);
        assert_eq!(watch.next().await, Some(false));
        assert!(!watch.current());
    }

    #[test]
    fn end_to_end_scenario() {
        let (session, store) = fresh_store();

        // fresh session, first add succeeds and the alias defaults to the name
        store
            .add(FavoriteCandidate {
                id: 1,
                name: "poke-1".to_string(),
                image: "img-1".to_string(),
            })
            .unwrap();
        let favorites = store.favorites();
        assert_eq!(favorites.len(), 1);
        assert_eq!(favorites[0].alias, "poke-1");

        // same id again is a duplicate
        assert_eq!(store.add(candidate(1)), Err(AddError::Duplicate));

        // fill up to ten, then the eleventh distinct id hits the limit
        for id in 2..=10 {
            store.add(candidate(id)).unwrap();
        }
        assert_eq!(store.add(candidate(11)), Err(AddError::Limit));

        // removal drops to nine, none of them id 1
        store.remove(1);
        let favorites = store.favorites();
        assert_eq!(favorites.len(), 9);
        assert!(favorites.iter().all(|e| e.id != 1));

        // alias update only touches id 2
        store.update_alias(2, "Buddy");
        let favorites = store.favorites();
        assert_eq!(favorites.iter().find(|e| e.id == 2).unwrap().alias, "Buddy");
        assert!(favorites
            .iter()
            .filter(|e| e.id != 2)
            .all(|e| e.alias == e.name));

        assert_eq!(persisted(&session), favorites);
    }
}
