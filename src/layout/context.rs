use std::collections::BTreeMap;

use crate::foundation::core::Point;

/// Named anchor points registered while compiling wavelanes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodeBank {
    nodes: BTreeMap<String, Point>,
}

impl NodeBank {
    /// Register `name`; a later registration of the same name wins.
    pub fn insert(&mut self, name: impl Into<String>, at: Point) {
        self.nodes.insert(name.into(), at);
    }

    /// Position of `name`.
    pub fn get(&self, name: &str) -> Option<Point> {
        self.nodes.get(name).copied()
    }

    /// Number of registered names.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// `true` when no name is registered.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Every name and its position, sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Point)> {
        self.nodes.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// One entry of the row table used to turn a row index into a y offset.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum YStep {
    /// A group title row; it does not count as a row index.
    Title,
    /// Height of one row.
    Row(f64),
}

/// Mutable state of one draw.
///
/// Every draw owns its context; [`RenderContext::reset`] brings a context
/// back to its initial state before reuse.
#[derive(Clone, Debug, Default)]
pub struct RenderContext {
    /// Nodes registered by the wavelanes.
    pub nodes: NodeBank,
    y_steps: Vec<YStep>,
    wave_count: usize,
    group_count: usize,
}

impl RenderContext {
    /// Empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget nodes, rows and counters.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Record a row of height `dy`, preceded by a title marker if `is_title`.
    pub fn register_y_step(&mut self, dy: f64, is_title: bool) {
        if is_title {
            self.y_steps.push(YStep::Title);
        }
        self.y_steps.push(YStep::Row(dy));
    }

    /// Row table, in registration order.
    pub fn y_steps(&self) -> &[YStep] {
        &self.y_steps
    }

    /// Absolute y of the fractional row index `y`.
    ///
    /// Whole rows sum their registered heights; title markers shift the row
    /// count back by one. The fractional part is scaled by `factor`.
    pub fn adjust_y(&self, y: f64, factor: f64) -> f64 {
        let mut total = 0.0;
        let mut k: i64 = 0;
        let row = y.floor();
        for step in &self.y_steps {
            match step {
                YStep::Title => k -= 1,
                YStep::Row(_) if (k + 1) as f64 > row => break,
                YStep::Row(dy) => {
                    k += 1;
                    total += dy;
                }
            }
        }
        total + (y - k as f64) * factor
    }

    /// Unique identifier of the next wavelane.
    pub fn next_wave_id(&mut self) -> usize {
        self.wave_count += 1;
        self.wave_count
    }

    /// Unique identifier of the next wavegroup.
    pub fn next_group_id(&mut self) -> usize {
        self.group_count += 1;
        self.group_count
    }

    /// Number of groups laid out so far.
    pub fn group_count(&self) -> usize {
        self.group_count
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/context.rs"]
mod tests;
