//! Collision decoding and outcome dispatch
//!
//! Every collider the game creates is tagged in a side table with what it is
//! (the ball, or a slice of some kind) and, for slices, the floor level. After
//! each physics step the started contacts are decoded into at most one
//! `Outcome`.
//!
//! The outcome table is closed over `{Safe, Danger, Void}`: it is defined for
//! one or two slice contacts per step. Steps with no slice contact, or with
//! three or more, produce nothing. Adding a slice kind means extending
//! `outcome_for` by hand; the identifiers in `SliceKind::id` only document the
//! prime product encoding and are not used for dispatch.

use std::collections::HashMap;

use crate::physics::{ColliderHandle, ContactStart};

use super::slice::SliceKind;

/// What a collider represents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColliderKind {
    Ball,
    Slice(SliceKind),
}

/// Side data for one collider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColliderTag {
    pub kind: ColliderKind,
    /// Floor level, only set on slice colliders
    pub level: Option<u32>,
}

impl ColliderTag {
    pub fn ball() -> Self {
        Self {
            kind: ColliderKind::Ball,
            level: None,
        }
    }

    pub fn slice(kind: SliceKind, level: u32) -> Self {
        Self {
            kind: ColliderKind::Slice(kind),
            level: Some(level),
        }
    }
}

/// Collider handle -> tag side table
#[derive(Debug, Default)]
pub struct ColliderTags {
    tags: HashMap<ColliderHandle, ColliderTag>,
}

impl ColliderTags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, collider: ColliderHandle, tag: ColliderTag) {
        self.tags.insert(collider, tag);
    }

    pub fn get(&self, collider: ColliderHandle) -> Option<&ColliderTag> {
        self.tags.get(&collider)
    }

    /// Change what a collider reports as, keeping its level
    pub fn retag(&mut self, collider: ColliderHandle, kind: ColliderKind) {
        if let Some(tag) = self.tags.get_mut(&collider) {
            tag.kind = kind;
        }
    }

    pub fn remove(&mut self, collider: ColliderHandle) -> Option<ColliderTag> {
        self.tags.remove(&collider)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

/// What the ball should do after a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Landed on a safe slice: relaunch upward
    Bounce,
    /// Touched a danger slice: freeze
    Death,
    /// Fell through a void slice: score the floor
    Score,
}

/// Outcome for one or two slice contacts.
pub fn outcome_for(first: SliceKind, second: Option<SliceKind>) -> Outcome {
    use SliceKind::*;
    match (first, second) {
        (Danger, _) | (_, Some(Danger)) => Outcome::Death,
        (Safe, None) | (Safe, Some(Safe | Void)) | (Void, Some(Safe)) => Outcome::Bounce,
        (Void, None) | (Void, Some(Void)) => Outcome::Score,
    }
}

/// Slice contacts gathered from one step
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactSummary {
    /// One entry per slice collider involved, in event order
    pub kinds: Vec<SliceKind>,
    /// Level of the last event that carried one
    pub level: Option<u32>,
    /// An event referenced a collider with no tag
    pub unknown: bool,
}

impl ContactSummary {
    /// Decode a step's contact events against the tag table
    pub fn from_events(events: &[ContactStart], tags: &ColliderTags) -> Self {
        let mut summary = Self::default();

        for event in events {
            let (Some(a), Some(b)) = (tags.get(event.a), tags.get(event.b)) else {
                summary.unknown = true;
                continue;
            };

            if let Some(level) = a.level.or(b.level) {
                summary.level = Some(level);
            }

            for tag in [a, b] {
                if let ColliderKind::Slice(kind) = tag.kind {
                    summary.kinds.push(kind);
                }
            }
        }

        summary
    }

    pub fn outcome(&self) -> Option<Outcome> {
        if self.unknown {
            return None;
        }
        match self.kinds.as_slice() {
            [a] => Some(outcome_for(*a, None)),
            [a, b] => Some(outcome_for(*a, Some(*b))),
            _ => None,
        }
    }
}

/// A decoded outcome with the level it applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub outcome: Outcome,
    pub level: Option<u32>,
}

/// Decode a step's events into at most one outcome
pub fn resolve(events: &[ContactStart], tags: &ColliderTags) -> Option<Resolution> {
    let summary = ContactSummary::from_events(events, tags);
    if summary.unknown {
        log::warn!("Contact with untagged collider, ignoring {} events", events.len());
    }
    summary.outcome().map(|outcome| Resolution {
        outcome,
        level: summary.level,
    })
}
