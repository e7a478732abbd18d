//! Viewport intersection tracking for scroll-triggered reveals.
//!
//! Works like a browser intersection observer polled on scroll: each poll
//! measures how much of every observed element lies inside the (margin-
//! adjusted) viewport and reports the elements that have just started
//! intersecting at or above the threshold.

use std::collections::HashSet;

use super::dom::{Document, NodeId};

/// Fraction of an element's height inside `[view_top, view_bottom)`.
///
/// Zero-height elements count as fully visible when their top edge is in
/// view.
pub fn intersection_ratio(top: f64, height: f64, view_top: f64, view_bottom: f64) -> f64 {
    if view_bottom <= view_top {
        return 0.0;
    }
    if height <= 0.0 {
        return if top >= view_top && top < view_bottom { 1.0 } else { 0.0 };
    }
    let visible = (top + height).min(view_bottom) - top.max(view_top);
    (visible / height).clamp(0.0, 1.0)
}

#[derive(Debug, Clone)]
pub struct IntersectionObserver {
    threshold: f64,
    /// Shrinks the bottom edge of the viewport (a negative CSS root margin).
    bottom_inset: f64,
    targets: Vec<NodeId>,
    intersecting: HashSet<NodeId>,
}

impl IntersectionObserver {
    pub fn new(threshold: f64, bottom_inset: f64) -> Self {
        Self {
            threshold: threshold.clamp(0.0, 1.0),
            bottom_inset: bottom_inset.max(0.0),
            targets: Vec::new(),
            intersecting: HashSet::new(),
        }
    }

    pub fn observe(&mut self, node: NodeId) {
        if !self.targets.contains(&node) {
            self.targets.push(node);
        }
    }

    pub fn targets(&self) -> &[NodeId] {
        &self.targets
    }

    /// Measure every target and return those that crossed into view since
    /// the last poll, in observation order.
    pub fn poll<D: Document>(&mut self, doc: &D) -> Vec<NodeId> {
        let view_top = doc.scroll_y();
        let view_bottom = view_top + doc.viewport_height() - self.bottom_inset;

        let mut entered = Vec::new();
        for &node in &self.targets {
            let (Some(top), Some(height)) = (doc.offset_top(node), doc.offset_height(node)) else {
                continue;
            };
            let ratio = intersection_ratio(top, height, view_top, view_bottom);
            let is_in = ratio > 0.0 && ratio >= self.threshold;
            if is_in {
                if self.intersecting.insert(node) {
                    entered.push(node);
                }
            } else {
                self.intersecting.remove(&node);
            }
        }
        entered
    }
}
