//! Debounced list view state.
//!
//! [`MaterialListView`] owns one view's material snapshot and filter inputs. Every input
//! change schedules a filter pass through a [`Debouncer`]; settled results are published on a
//! `watch` channel with an increasing generation number. Tearing the view down cancels the
//! pending pass and makes the view ignore late fetch results.

use crate::debounce::Debouncer;
use crate::filter::{filter_materials, CategoryFilter, FilterQuery};
use crate::material::Material;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

/// One settled filter pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilteredMaterials {
    /// 0 before the first pass, then incremented per pass.
    pub generation: u64,
    pub query: FilterQuery,
    pub materials: Vec<Material>,
}

#[derive(Clone)]
struct FilterInputs {
    materials: Arc<Vec<Material>>,
    query: FilterQuery,
}

pub struct MaterialListView {
    materials: Arc<Vec<Material>>,
    query: FilterQuery,
    debouncer: Debouncer<FilterInputs>,
    output: watch::Receiver<FilteredMaterials>,
    cancel: CancellationToken,
}

impl MaterialListView {
    /// Creates the view and schedules the first (empty) pass, as mounting does.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(quiet_period: Duration) -> Self {
        Self::with_cancellation(quiet_period, CancellationToken::new())
    }

    /// Like [`MaterialListView::new`] but torn down when `cancel` fires.
    pub fn with_cancellation(quiet_period: Duration, cancel: CancellationToken) -> Self {
        let (tx, output) = watch::channel(FilteredMaterials::default());
        let mut generation = 0u64;

        let debouncer = Debouncer::spawn(quiet_period, cancel.clone(), move |inputs: FilterInputs| {
            generation += 1;
            let materials = filter_materials(&inputs.materials, &inputs.query);
            tracing::debug!(
                generation,
                total = inputs.materials.len(),
                shown = materials.len(),
                search = %inputs.query.search_term,
                category = %inputs.query.category,
                "filter pass"
            );
            tx.send_replace(FilteredMaterials {
                generation,
                query: inputs.query,
                materials,
            });
        });

        let view = Self {
            materials: Arc::new(Vec::new()),
            query: FilterQuery::default(),
            debouncer,
            output,
            cancel,
        };
        view.schedule();
        view
    }

    fn schedule(&self) {
        let scheduled = self.debouncer.push(FilterInputs {
            materials: self.materials.clone(),
            query: self.query.clone(),
        });
        if !scheduled {
            tracing::debug!("view torn down; filter pass not scheduled");
        }
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    pub fn query(&self) -> &FilterQuery {
        &self.query
    }

    /// Updates the search term. Setting the current value again schedules nothing.
    pub fn set_search_term(&mut self, search_term: impl Into<String>) {
        let search_term = search_term.into();
        if search_term == self.query.search_term {
            return;
        }
        self.query.search_term = search_term;
        self.schedule();
    }

    pub fn set_category(&mut self, category: CategoryFilter) {
        if category == self.query.category {
            return;
        }
        self.query.category = category;
        self.schedule();
    }

    /// Replaces the snapshot with freshly fetched materials.
    ///
    /// Ignored once the view is torn down so a late fetch cannot revive discarded state.
    pub fn replace_materials(&mut self, materials: Vec<Material>) {
        if self.is_torn_down() {
            tracing::warn!(
                count = materials.len(),
                "ignoring materials that arrived after teardown"
            );
            return;
        }
        self.materials = Arc::new(materials);
        self.schedule();
    }

    /// Drops a material from the snapshot (after the backend confirmed its deletion).
    pub fn remove_material(&mut self, id: &str) -> bool {
        if !self.materials.iter().any(|m| m.id == id) {
            return false;
        }
        let remaining = self.materials.iter().filter(|m| m.id != id).cloned().collect();
        self.materials = Arc::new(remaining);
        self.schedule();
        true
    }

    /// The most recently published pass.
    pub fn current(&self) -> FilteredMaterials {
        self.output.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<FilteredMaterials> {
        self.output.clone()
    }

    /// Waits for the next pass. Returns `None` once the view is torn down.
    pub async fn settled(&mut self) -> Option<FilteredMaterials> {
        tokio::select! {
            changed = self.output.changed() => match changed {
                Ok(()) => Some(self.output.borrow_and_update().clone()),
                Err(_) => None,
            },
            _ = self.cancel.cancelled() => None,
        }
    }

    /// Runs `fut` unless the view is torn down first.
    pub async fn guard<F: Future>(&self, fut: F) -> Option<F::Output> {
        unless_cancelled(&self.cancel, fut).await
    }

    pub fn cancellation(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Cancels the pending pass and any guarded fetch.
    pub fn teardown(&self) {
        self.cancel.cancel();
    }

    pub fn is_torn_down(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl Drop for MaterialListView {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Resolves `fut`, or returns `None` if `cancel` fires first.
pub async fn unless_cancelled<F: Future>(cancel: &CancellationToken, fut: F) -> Option<F::Output> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => None,
        output = fut => Some(output),
    }
}
