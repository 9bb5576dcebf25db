//! Optimistic Mutation Engine
//!
//! Owns the in-memory ordered list for one link list and keeps it
//! synchronized with the remote store. Every mutation is applied to the
//! rendered `view` immediately, confirmed (or rolled back) when the matching
//! server call settles. Races between overlapping calls are resolved with a
//! per-operation sequence counter: only the most recently issued reorder's
//! outcome is honored, and a second refresh for an item already refreshing
//! is suppressed outright.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::domain::{DomainError, DomainResult, LinkItem, LinkList, ListEntry, Preview};
use crate::normalize::{hostname_of, normalize};
use crate::preview::PreviewFetcher;
use crate::repository::{LinkPatch, LinkStore, NewLink};


/// Per-input result of a batch add
#[derive(Debug)]
pub struct AddOutcome {
    /// The raw input as the user supplied it
    pub input: String,
    pub result: DomainResult<LinkItem>,
}

/// Mutable engine state. Guarded by a mutex that is never held across an
/// await, so independent operations interleave freely.
struct EngineState {
    /// Last state confirmed by the server
    committed: Vec<LinkItem>,
    /// What the UI renders; may be ahead of `committed`
    view: Vec<ListEntry>,
    /// Rollback target while one or more reorders are in flight.
    /// Captured before the first of any overlapping reorders.
    reorder_base: Option<Vec<ListEntry>>,
    /// Monotone counter; a reorder response whose captured value no longer
    /// matches has been superseded and is discarded.
    reorder_seq: u64,
    /// Items with a metadata refresh in flight
    refreshing: HashSet<String>,
    /// Items with a delete in flight
    removing: HashSet<String>,
    next_temp_id: u64,
}

impl EngineState {
    /// Keep `position` in lockstep with array order: for N confirmed
    /// entries the positions are always the permutation `0..N`.
    fn renumber(&mut self) {
        let mut pos = 0;
        for entry in &mut self.view {
            if let ListEntry::Confirmed(item) = entry {
                item.position = pos;
                pos += 1;
            }
        }
    }

    fn renumber_committed(&mut self) {
        for (pos, item) in self.committed.iter_mut().enumerate() {
            item.position = pos as i32;
        }
    }

    fn confirmed_ids(&self) -> Vec<String> {
        self.view
            .iter()
            .filter_map(|e| e.item_id().map(str::to_string))
            .collect()
    }

    fn entry_index(&self, id: &str) -> Option<usize> {
        self.view.iter().position(|e| e.item_id() == Some(id))
    }

    fn confirmed_mut(&mut self, id: &str) -> Option<&mut LinkItem> {
        self.view.iter_mut().find_map(|e| match e {
            ListEntry::Confirmed(item) if item.id == id => Some(item),
            _ => None,
        })
    }

    /// Restore the ordering captured in `base` without clobbering mutations
    /// that settled in the meantime. Membership and field values come from
    /// the present (`committed`, current placeholders, in-flight removes);
    /// only the ordering comes from the snapshot: items deleted since the
    /// snapshot stay gone, items confirmed since keep the head.
    fn rollback_view_to(&mut self, base: &[ListEntry]) {
        let base_ids: HashSet<&str> = base.iter().filter_map(ListEntry::item_id).collect();

        let mut view: Vec<ListEntry> = self
            .view
            .iter()
            .filter(|e| e.is_placeholder())
            .cloned()
            .collect();
        for item in &self.committed {
            if !base_ids.contains(item.id.as_str()) && !self.removing.contains(&item.id) {
                view.push(ListEntry::Confirmed(item.clone()));
            }
        }
        for entry in base {
            let Some(id) = entry.item_id() else {
                continue;
            };
            if self.removing.contains(id) {
                continue;
            }
            if let Some(item) = self.committed.iter().find(|c| c.id == id) {
                view.push(ListEntry::Confirmed(item.clone()));
            }
        }
        self.view = view;
        self.renumber();
    }
}

/// Optimistic mutation engine for one list
///
/// Constructed per list with an injected store and preview fetcher; all
/// mutations of the list go through the four operations below.
pub struct ListEngine {
    list_id: String,
    store: Arc<dyn LinkStore>,
    previews: Arc<dyn PreviewFetcher>,
    state: Mutex<EngineState>,
}

impl ListEngine {
    /// Engine over an empty list
    pub fn new(
        list_id: impl Into<String>,
        store: Arc<dyn LinkStore>,
        previews: Arc<dyn PreviewFetcher>,
    ) -> Self {
        Self {
            list_id: list_id.into(),
            store,
            previews,
            state: Mutex::new(EngineState {
                committed: Vec::new(),
                view: Vec::new(),
                reorder_base: None,
                reorder_seq: 0,
                refreshing: HashSet::new(),
                removing: HashSet::new(),
                next_temp_id: 1,
            }),
        }
    }

    /// Engine seeded from a list loaded off the server
    pub fn from_list(
        list: LinkList,
        store: Arc<dyn LinkStore>,
        previews: Arc<dyn PreviewFetcher>,
    ) -> Self {
        let mut items = list.items;
        items.sort_by_key(|item| item.position);
        let mut state = EngineState {
            committed: items.clone(),
            view: items.into_iter().map(ListEntry::Confirmed).collect(),
            reorder_base: None,
            reorder_seq: 0,
            refreshing: HashSet::new(),
            removing: HashSet::new(),
            next_temp_id: 1,
        };
        state.renumber();
        state.renumber_committed();
        Self {
            list_id: list.id,
            store,
            previews,
            state: Mutex::new(state),
        }
    }

    pub fn list_id(&self) -> &str {
        &self.list_id
    }

    /// The entries the UI renders, in display order
    pub async fn view(&self) -> Vec<ListEntry> {
        self.state.lock().await.view.clone()
    }

    /// Last server-confirmed items, in display order
    pub async fn committed(&self) -> Vec<LinkItem> {
        self.state.lock().await.committed.clone()
    }

    /// Server ids of confirmed entries, in display order
    pub async fn confirmed_ids(&self) -> Vec<String> {
        self.state.lock().await.confirmed_ids()
    }

    pub async fn has_placeholders(&self) -> bool {
        self.state.lock().await.view.iter().any(ListEntry::is_placeholder)
    }

    /// Whether a metadata refresh is in flight for `id`
    pub async fn is_refreshing(&self, id: &str) -> bool {
        self.state.lock().await.refreshing.contains(id)
    }

    /// Add a batch of pasted inputs to the head of the list.
    ///
    /// Inputs are normalized one at a time; invalid ones are reported and
    /// never sent. Valid ones get a placeholder entry immediately, then one
    /// create call each, issued sequentially so the final head-of-list order
    /// mirrors input order. A failed create removes only its own
    /// placeholder; the rest of the batch continues.
    pub async fn add_links(&self, inputs: &[String]) -> Vec<AddOutcome> {
        let mut outcomes = Vec::with_capacity(inputs.len());
        // Index where the next placeholder of this batch goes, so the batch
        // lands at the head in input order.
        let mut cursor = 0usize;

        for input in inputs {
            let Some(url) = normalize(input) else {
                outcomes.push(AddOutcome {
                    input: input.clone(),
                    result: Err(DomainError::InvalidInput(format!(
                        "not a valid URL: {}",
                        input.trim()
                    ))),
                });
                continue;
            };

            let temp_id;
            {
                let mut state = self.state.lock().await;
                temp_id = state.next_temp_id;
                state.next_temp_id += 1;
                let at = cursor.min(state.view.len());
                state.view.insert(
                    at,
                    ListEntry::Placeholder {
                        temp_id,
                        url: url.clone(),
                    },
                );
            }
            cursor += 1;

            let preview = self.previews.fetch_preview(&url).await;
            let created = self
                .store
                .create_link(
                    &self.list_id,
                    NewLink {
                        url: url.clone(),
                        title: preview.title.clone(),
                    },
                )
                .await;

            let mut state = self.state.lock().await;
            let slot = state
                .view
                .iter()
                .position(|e| matches!(e, ListEntry::Placeholder { temp_id: t, .. } if *t == temp_id));
            match created {
                Ok(mut item) => {
                    merge_preview(&mut item, &preview);
                    if let Some(slot) = slot {
                        state.view[slot] = ListEntry::Confirmed(item.clone());
                    }
                    state.renumber();
                    let at = cursor.saturating_sub(1).min(state.committed.len());
                    state.committed.insert(at, item.clone());
                    state.renumber_committed();
                    outcomes.push(AddOutcome {
                        input: input.clone(),
                        result: Ok(item),
                    });
                }
                Err(err) => {
                    log::warn!("create failed for {}: {}", url, err);
                    if let Some(slot) = slot {
                        state.view.remove(slot);
                        state.renumber();
                    }
                    cursor = cursor.saturating_sub(1);
                    outcomes.push(AddOutcome {
                        input: input.clone(),
                        result: Err(err),
                    });
                }
            }
        }

        outcomes
    }

    /// Remove an item optimistically.
    ///
    /// Idempotent: an id that is already gone from the view, or whose delete
    /// is still in flight, is a no-op and issues no second delete call. On
    /// failure the item is re-inserted at its original index.
    pub async fn remove_link(&self, id: &str) -> DomainResult<()> {
        let snapshot;
        let index;
        {
            let mut state = self.state.lock().await;
            if state.removing.contains(id) {
                return Ok(());
            }
            let Some(at) = state.entry_index(id) else {
                return Ok(());
            };
            index = at;
            snapshot = state.view.remove(at);
            state.renumber();
            state.removing.insert(id.to_string());
        }

        let result = self.store.delete_link(&self.list_id, id).await;

        let mut state = self.state.lock().await;
        state.removing.remove(id);
        match result {
            Ok(()) => {
                state.committed.retain(|item| item.id != id);
                state.renumber_committed();
                Ok(())
            }
            Err(err) => {
                log::warn!("delete failed for {}, restoring item: {}", id, err);
                let at = index.min(state.view.len());
                state.view.insert(at, snapshot);
                state.renumber();
                Err(err)
            }
        }
    }

    /// Re-fetch enrichment metadata for an item and persist it.
    ///
    /// A refresh for an id that is already refreshing is suppressed (not
    /// queued), so two in-flight refreshes for the same item can never
    /// interleave. On failure the item's fields revert to their pre-refresh
    /// values; the refreshing flag clears unconditionally.
    pub async fn refresh_metadata(&self, id: &str) -> DomainResult<()> {
        let url;
        let before;
        {
            let mut state = self.state.lock().await;
            if state.refreshing.contains(id) {
                log::debug!("refresh already in flight for {}, suppressed", id);
                return Ok(());
            }
            let Some(item) = state.confirmed_mut(id) else {
                return Err(DomainError::NotFound(format!("item {}", id)));
            };
            url = item.url.clone();
            before = item.clone();
            state.refreshing.insert(id.to_string());
        }

        let preview = self.previews.fetch_preview(&url).await;
        let patch = patch_from_preview(&url, &preview);
        {
            let mut state = self.state.lock().await;
            if state.entry_index(id).is_none() {
                // Removed while the preview fetch was in flight; there is
                // nothing left to patch server-side.
                state.refreshing.remove(id);
                return Ok(());
            }
            if let Some(item) = state.confirmed_mut(id) {
                apply_patch(item, &patch);
            }
        }

        let result = self.store.update_link(&self.list_id, id, patch).await;

        let mut state = self.state.lock().await;
        state.refreshing.remove(id);
        if state.entry_index(id).is_none() {
            // Removed while the refresh was in flight; nothing to apply.
            return Ok(());
        }
        match result {
            Ok(updated) => {
                if let Some(item) = state.confirmed_mut(id) {
                    let position = item.position;
                    *item = updated.clone();
                    item.position = position;
                }
                if let Some(item) = state.committed.iter_mut().find(|i| i.id == id) {
                    let position = item.position;
                    *item = updated;
                    item.position = position;
                }
                Ok(())
            }
            Err(err) => {
                log::warn!("refresh failed for {}, reverting fields: {}", id, err);
                if let Some(item) = state.confirmed_mut(id) {
                    let position = item.position;
                    *item = before;
                    item.position = position;
                }
                Err(err)
            }
        }
    }

    /// Reorder the list to the given full ordering of confirmed ids.
    ///
    /// Applies immediately; the rollback snapshot is the view from before
    /// the first of any overlapping reorders. When reorders overlap, only
    /// the most recently issued call's outcome counts; a superseded call's
    /// late response is ignored. An unchanged ordering is a no-op with no
    /// server call.
    pub async fn reorder(&self, order: &[String]) -> DomainResult<()> {
        let seq;
        {
            let mut state = self.state.lock().await;
            let current = state.confirmed_ids();
            if order == current.as_slice() {
                return Ok(());
            }
            if order.len() != current.len()
                || order.iter().collect::<HashSet<_>>() != current.iter().collect::<HashSet<_>>()
            {
                return Err(DomainError::InvalidInput(
                    "order must be a permutation of the list's item ids".to_string(),
                ));
            }

            if state.reorder_base.is_none() {
                state.reorder_base = Some(state.view.clone());
            }

            // Placeholders keep the head; confirmed entries follow `order`.
            let mut placeholders = Vec::new();
            let mut confirmed: Vec<LinkItem> = Vec::new();
            for entry in state.view.drain(..) {
                match entry {
                    ListEntry::Placeholder { .. } => placeholders.push(entry),
                    ListEntry::Confirmed(item) => confirmed.push(item),
                }
            }
            let mut view = placeholders;
            for id in order {
                if let Some(at) = confirmed.iter().position(|item| &item.id == id) {
                    view.push(ListEntry::Confirmed(confirmed.swap_remove(at)));
                }
            }
            state.view = view;
            state.renumber();

            state.reorder_seq += 1;
            seq = state.reorder_seq;
        }

        let result = self.store.reorder_links(&self.list_id, order).await;

        let mut state = self.state.lock().await;
        if seq != state.reorder_seq {
            log::debug!("reorder response superseded, discarding");
            return Ok(());
        }
        match result {
            Ok(()) => {
                let order_of = |id: &str| order.iter().position(|o| o == id);
                state
                    .committed
                    .sort_by_key(|item| order_of(&item.id).unwrap_or(usize::MAX));
                state.renumber_committed();
                state.reorder_base = None;
                Ok(())
            }
            Err(err) => {
                log::warn!("reorder failed, rolling back: {}", err);
                if let Some(base) = state.reorder_base.take() {
                    state.rollback_view_to(&base);
                }
                Err(err)
            }
        }
    }
}

/// Fill fields the server left empty from the fetched preview; the title
/// bottoms out at the URL's hostname so an item is never label-less.
fn merge_preview(item: &mut LinkItem, preview: &Preview) {
    item.title = item
        .title
        .take()
        .or_else(|| preview.title.clone())
        .or_else(|| hostname_of(&item.url));
    item.description = item.description.take().or_else(|| preview.description.clone());
    item.image_url = item.image_url.take().or_else(|| preview.image_url.clone());
    item.favicon_url = item.favicon_url.take().or_else(|| preview.favicon_url.clone());
}

/// Patch carrying the refreshed fields; only fields the preview actually
/// produced are sent, so a degraded fetch cannot wipe existing metadata.
fn patch_from_preview(url: &str, preview: &Preview) -> LinkPatch {
    LinkPatch {
        title: preview.title.clone().or_else(|| hostname_of(url)),
        description: preview.description.clone(),
        image_url: preview.image_url.clone(),
        favicon_url: preview.favicon_url.clone(),
        url: None,
    }
}

fn apply_patch(item: &mut LinkItem, patch: &LinkPatch) {
    if let Some(title) = &patch.title {
        item.title = Some(title.clone());
    }
    if let Some(description) = &patch.description {
        item.description = Some(description.clone());
    }
    if let Some(image_url) = &patch.image_url {
        item.image_url = Some(image_url.clone());
    }
    if let Some(favicon_url) = &patch.favicon_url {
        item.favicon_url = Some(favicon_url.clone());
    }
    if let Some(url) = &patch.url {
        item.url = url.clone();
    }
}
