//! Pull-based recomputation graph: one threshold input, one memoized
//! filtered view of the penguin table, and any number of named outputs.
//!
//! # Design
//!
//! The graph owns a [`RangeInput`] and a generation counter. Changing the
//! input bumps the generation and drops the cached [`DerivedDataset`];
//! nothing is recomputed eagerly. [`ReactiveGraph::derived`] rebuilds the view
//! on the next read, and each output remembers the generation it last ran
//! against so [`ReactiveGraph::read_output`] only reruns it when stale.
//!
//! # Invariants
//!
//! 1. The input value is always inside `[min, max]`.
//! 2. Setting the current value again is a no-op: no generation bump, no
//!    invalidation.
//! 3. The derived view holds exactly the rows with `mass < threshold`.
//! 4. Every output read within one generation sees the same `Rc` snapshot.
//! 5. An output's compute function runs at most once per generation.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use super::input::RangeInput;
use crate::data::density::DensitySpec;
use crate::data::filter::below_threshold;
use crate::data::model::PenguinTable;
use crate::data::summary::SpeciesCount;

// ---------------------------------------------------------------------------
// DerivedDataset
// ---------------------------------------------------------------------------

/// Filtered, read-only view of the source table for one threshold.
#[derive(Debug, Clone)]
pub struct DerivedDataset {
    source: Rc<PenguinTable>,
    threshold: f64,
    generation: u64,
    rows: Vec<usize>,
}

impl DerivedDataset {
    fn compute(source: &Rc<PenguinTable>, threshold: f64, generation: u64) -> Self {
        Self {
            source: Rc::clone(source),
            threshold,
            generation,
            rows: below_threshold(source, threshold),
        }
    }

    pub fn source(&self) -> &PenguinTable {
        &self.source
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Input generation this view was computed for.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Indices into [`DerivedDataset::source`] of the selected rows.
    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Outputs
// ---------------------------------------------------------------------------

/// Something a renderer can draw.
#[derive(Debug, Clone, PartialEq)]
pub enum Artifact {
    Summary(Vec<SpeciesCount>),
    Density(DensitySpec),
}

impl Artifact {
    pub fn as_summary(&self) -> Option<&[SpeciesCount]> {
        match self {
            Artifact::Summary(rows) => Some(rows),
            _ => None,
        }
    }

    pub fn as_density(&self) -> Option<&DensitySpec> {
        match self {
            Artifact::Density(spec) => Some(spec),
            _ => None,
        }
    }
}

pub type ComputeFn = Box<dyn Fn(&DerivedDataset) -> Artifact>;

struct Output {
    compute: ComputeFn,
    /// Last artifact with the generation it was computed for.
    cached: Option<(u64, Rc<Artifact>)>,
    recomputes: u64,
}

/// A user-facing message raised by an explicit action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
}

// ---------------------------------------------------------------------------
// ReactiveGraph
// ---------------------------------------------------------------------------

pub struct ReactiveGraph {
    source: Rc<PenguinTable>,
    input: RangeInput,
    generation: u64,
    derived: Option<Rc<DerivedDataset>>,
    derived_recomputes: u64,
    outputs: BTreeMap<String, Output>,
    notifications: Vec<Notification>,
}

impl fmt::Debug for ReactiveGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReactiveGraph")
            .field("input", &self.input)
            .field("generation", &self.generation)
            .field("stale", &self.is_stale())
            .field("outputs", &self.outputs.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ReactiveGraph {
    /// Build a graph over a table that was loaded once and is shared
    /// read-only from here on.
    pub fn new(source: Rc<PenguinTable>, input: RangeInput) -> Self {
        Self {
            source,
            input,
            generation: 0,
            derived: None,
            derived_recomputes: 0,
            outputs: BTreeMap::new(),
            notifications: Vec::new(),
        }
    }

    pub fn source(&self) -> &Rc<PenguinTable> {
        &self.source
    }

    pub fn input(&self) -> &RangeInput {
        &self.input
    }

    pub fn value(&self) -> f64 {
        self.input.value()
    }

    /// Set the threshold, clamped to the input range. Invalidates the derived
    /// view only when the stored value actually changes.
    pub fn set_input(&mut self, value: f64) -> bool {
        if value.is_nan() {
            log::warn!("ignoring NaN threshold");
            return false;
        }
        let clamped = self.input.clamp(value);
        if clamped != value {
            log::warn!(
                "threshold {value} outside [{}, {}], clamped to {clamped}",
                self.input.min(),
                self.input.max()
            );
        }
        if !self.input.set(clamped) {
            log::trace!("threshold unchanged at {clamped}");
            return false;
        }

        self.generation += 1;
        self.derived = None;
        log::debug!(
            "threshold set to {clamped}, generation {}, {} output(s) stale",
            self.generation,
            self.outputs.len()
        );
        true
    }

    /// The filtered view for the current threshold, recomputed only after an
    /// invalidation.
    pub fn derived(&mut self) -> Rc<DerivedDataset> {
        if let Some(derived) = &self.derived {
            return Rc::clone(derived);
        }
        let derived = Rc::new(DerivedDataset::compute(
            &self.source,
            self.input.value(),
            self.generation,
        ));
        self.derived_recomputes += 1;
        log::debug!(
            "derived dataset recomputed: {} of {} rows below {}",
            derived.len(),
            self.source.len(),
            derived.threshold()
        );
        self.derived = Some(Rc::clone(&derived));
        derived
    }

    /// Register (or replace) a named output.
    pub fn register_output(
        &mut self,
        name: impl Into<String>,
        compute: impl Fn(&DerivedDataset) -> Artifact + 'static,
    ) {
        let name = name.into();
        let replaced = self
            .outputs
            .insert(
                name.clone(),
                Output {
                    compute: Box::new(compute),
                    cached: None,
                    recomputes: 0,
                },
            )
            .is_some();
        if replaced {
            log::debug!("output '{name}' re-registered");
        }
    }

    /// Read an output, rerunning it only if the derived view changed since it
    /// last ran. Unknown names give `None`.
    pub fn read_output(&mut self, name: &str) -> Option<Rc<Artifact>> {
        if !self.outputs.contains_key(name) {
            return None;
        }
        let derived = self.derived();
        let output = self.outputs.get_mut(name)?;

        if let Some((generation, artifact)) = &output.cached {
            if *generation == derived.generation() {
                return Some(Rc::clone(artifact));
            }
        }

        let artifact = Rc::new((output.compute)(&*derived));
        output.recomputes += 1;
        output.cached = Some((derived.generation(), Rc::clone(&artifact)));
        log::debug!("output '{name}' recomputed for generation {}", derived.generation());
        Some(artifact)
    }

    /// Read every registered output against one snapshot, in name order.
    pub fn read_all(&mut self) -> Vec<(String, Rc<Artifact>)> {
        let names: Vec<String> = self.outputs.keys().cloned().collect();
        names
            .into_iter()
            .filter_map(|name| {
                let artifact = self.read_output(&name)?;
                Some((name, artifact))
            })
            .collect()
    }

    /// Restore the default threshold through the normal `set_input` path and
    /// raise a notification, even if the value was already the default.
    pub fn trigger_reset(&mut self) -> bool {
        let default = self.input.default_value();
        log::info!("reset requested, restoring threshold to {default}");
        self.notifications.push(Notification {
            message: format!("Body mass threshold reset to {default}"),
        });
        self.set_input(default)
    }

    /// Hand pending notifications to the caller.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether the next `derived()` call has to recompute.
    pub fn is_stale(&self) -> bool {
        self.derived.is_none()
    }

    pub fn derived_recomputes(&self) -> u64 {
        self.derived_recomputes
    }

    pub fn output_recomputes(&self, name: &str) -> Option<u64> {
        self.outputs.get(name).map(|o| o.recomputes)
    }
}
