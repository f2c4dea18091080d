#![forbid(unsafe_code)]

//! Layout observation port and its coalescing pipeline.
//!
//! The rendering layer reports geometry through [`LayoutObserver`], from as
//! many call sites as it has mounted elements. [`LayoutPipeline`] funnels
//! those reports into one [`ThrottledDebouncedProcessor`] per element kind;
//! each flush becomes one batch action on the [`BoardStore`].
//!
//! While a drag is active the coalescers throttle (one flush per interval,
//! so geometry keeps up with the moving pointer); otherwise they debounce
//! (one flush after the layout settles).
//!
//! Timers are not spawned here. The host calls [`LayoutPipeline::poll`]
//! from its tick loop, using [`LayoutPipeline::next_deadline`] to decide how
//! long it may sleep.
//!
//! Viewport changes bypass coalescing: they are rare and the hit tester must
//! never consult a stale visibility set.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use ahash::AHashMap;
use kanban_core::event::{LayoutElement, LayoutEvent};
use kanban_core::geometry::Coordinates;
use kanban_core::model::{CardId, ColumnId, ViewportState};
use kanban_core::update_coalescer::{CoalescerConfig, ThrottledDebouncedProcessor};
use web_time::Instant;

use crate::state::BoardAction;
use crate::store::BoardStore;

/// Port implemented by the engine and driven by the rendering layer.
pub trait LayoutObserver: Send + Sync {
    /// An element was laid out (or re-laid out) with the given box.
    fn on_layout(&self, event: LayoutEvent);

    /// The virtualized column list mounted a new set of indices.
    fn on_visible_columns(&self, viewport: ViewportState);

    /// A column's virtualized card list mounted a new set of indices.
    fn on_visible_cards(&self, column_id: ColumnId, viewport: ViewportState);
}

type Coalescer<K> = ThrottledDebouncedProcessor<K, Coordinates>;

struct Coalescers {
    board: Coalescer<()>,
    columns: Coalescer<ColumnId>,
    headers: Coalescer<ColumnId>,
    bodies: Coalescer<ColumnId>,
    cards: Coalescer<CardId>,
}

impl Coalescers {
    fn new(store: &Arc<BoardStore>, config: CoalescerConfig, now: Instant) -> Self {
        let board = {
            let store = Arc::clone(store);
            Coalescer::new_at(
                config,
                move |mut batch: AHashMap<(), Coordinates>| {
                    if let Some(c) = batch.remove(&()) {
                        store.dispatch(BoardAction::SetBoardCoordinates(c));
                    }
                },
                now,
            )
        };
        Self {
            board,
            columns: column_coalescer(store, config, now, BoardAction::SetColumnCoordinates),
            headers: column_coalescer(store, config, now, BoardAction::SetColumnHeaderCoordinates),
            bodies: column_coalescer(store, config, now, BoardAction::SetColumnBodyCoordinates),
            cards: {
                let store = Arc::clone(store);
                Coalescer::new_at(
                    config,
                    move |batch| {
                        store.dispatch(BoardAction::SetCardCoordinates(batch));
                    },
                    now,
                )
            },
        }
    }

    fn poll(&mut self, now: Instant) -> bool {
        // Non-short-circuiting: every due coalescer flushes.
        self.board.poll(now)
            | self.columns.poll(now)
            | self.headers.poll(now)
            | self.bodies.poll(now)
            | self.cards.poll(now)
    }

    fn flush(&mut self) -> bool {
        self.board.process_now()
            | self.columns.process_now()
            | self.headers.process_now()
            | self.bodies.process_now()
            | self.cards.process_now()
    }

    fn cancel(&mut self) {
        self.board.cancel();
        self.columns.cancel();
        self.headers.cancel();
        self.bodies.cancel();
        self.cards.cancel();
    }

    fn next_deadline(&self) -> Option<Instant> {
        [
            self.board.next_deadline(),
            self.columns.next_deadline(),
            self.headers.next_deadline(),
            self.bodies.next_deadline(),
            self.cards.next_deadline(),
        ]
        .into_iter()
        .flatten()
        .min()
    }

    fn pending_len(&self) -> usize {
        self.board.pending_len()
            + self.columns.pending_len()
            + self.headers.pending_len()
            + self.bodies.pending_len()
            + self.cards.pending_len()
    }
}

fn column_coalescer(
    store: &Arc<BoardStore>,
    config: CoalescerConfig,
    now: Instant,
    action: fn(AHashMap<ColumnId, Coordinates>) -> BoardAction,
) -> Coalescer<ColumnId> {
    let store = Arc::clone(store);
    Coalescer::new_at(
        config,
        move |batch| {
            store.dispatch(action(batch));
        },
        now,
    )
}

/// Coalescing [`LayoutObserver`] feeding a [`BoardStore`].
pub struct LayoutPipeline {
    store: Arc<BoardStore>,
    inner: Mutex<Coalescers>,
}

impl fmt::Debug for LayoutPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayoutPipeline")
            .field("store", &self.store)
            .field("pending", &self.pending_len())
            .finish()
    }
}

impl LayoutPipeline {
    #[must_use]
    pub fn new(store: Arc<BoardStore>, config: CoalescerConfig) -> Self {
        Self::new_at(store, config, Instant::now())
    }

    /// Pipeline whose throttle windows start at `now`.
    #[must_use]
    pub fn new_at(store: Arc<BoardStore>, config: CoalescerConfig, now: Instant) -> Self {
        let inner = Mutex::new(Coalescers::new(&store, config, now));
        Self { store, inner }
    }

    #[must_use]
    pub fn store(&self) -> &Arc<BoardStore> {
        &self.store
    }

    /// Queue one layout report at time `now`. The store only sees it once
    /// [`poll`](Self::poll) reaches the coalescer's deadline.
    pub fn observe_at(&self, event: LayoutEvent, now: Instant) {
        let throttling = self.store.is_dragging();
        tracing::trace!(
            target: "kanban.layout",
            kind = ?event.element.kind(),
            throttling,
            "layout observed"
        );
        let c = event.coordinates;
        let mut inner = self.lock();
        match event.element {
            LayoutElement::Board => inner.board.submit_at((), c, throttling, now),
            LayoutElement::Column(id) => inner.columns.submit_at(id, c, throttling, now),
            LayoutElement::ColumnHeader(id) => inner.headers.submit_at(id, c, throttling, now),
            LayoutElement::ColumnBody(id) => inner.bodies.submit_at(id, c, throttling, now),
            LayoutElement::Card(id) => inner.cards.submit_at(id, c, throttling, now),
        }
    }

    /// Flush every coalescer whose deadline has passed.
    pub fn poll(&self, now: Instant) -> bool {
        self.lock().poll(now)
    }

    /// Earliest deadline across all coalescers.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.lock().next_deadline()
    }

    /// Flush everything pending, regardless of deadlines.
    pub fn flush(&self) -> bool {
        self.lock().flush()
    }

    /// Disarm timers; pending geometry waits for the next flush.
    pub fn cancel(&self) {
        self.lock().cancel();
    }

    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.lock().pending_len()
    }

    fn lock(&self) -> MutexGuard<'_, Coalescers> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl LayoutObserver for LayoutPipeline {
    fn on_layout(&self, event: LayoutEvent) {
        self.observe_at(event, Instant::now());
    }

    fn on_visible_columns(&self, viewport: ViewportState) {
        self.store.dispatch(BoardAction::SetVisibleColumns(viewport));
    }

    fn on_visible_cards(&self, column_id: ColumnId, viewport: ViewportState) {
        let mut batch = AHashMap::with_capacity(1);
        batch.insert(column_id, viewport);
        self.store.dispatch(BoardAction::SetVisibleCards(batch));
    }
}
