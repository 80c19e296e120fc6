//! Floor layout derivation
//!
//! A floor is derived from a base template of `(span, kind)` groups: the
//! groups are shuffled, then laid end to end around the ring from 0°.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::error::GameError;

use super::slice::SliceKind;

/// One group of a base template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateGroup {
    /// Number of unit angles
    pub span: u32,
    pub kind: SliceKind,
}

/// One slice of a concrete floor layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SliceLayout {
    /// Degrees
    pub start_angle: u32,
    pub span: u32,
    pub kind: SliceKind,
}

impl SliceLayout {
    /// End angle in degrees (exclusive)
    pub fn end_angle(&self, unit: u32) -> u32 {
        self.start_angle + self.span * unit
    }
}

/// Four quadrants: one safe, one danger, two void
pub fn reference_template() -> Vec<TemplateGroup> {
    vec![
        TemplateGroup { span: 6, kind: SliceKind::Safe },
        TemplateGroup { span: 6, kind: SliceKind::Danger },
        TemplateGroup { span: 6, kind: SliceKind::Void },
        TemplateGroup { span: 6, kind: SliceKind::Void },
    ]
}

/// Shuffle the template and tile the ring with it
pub fn derive<R: Rng + ?Sized>(
    template: &[TemplateGroup],
    unit: u32,
    rng: &mut R,
) -> Result<Vec<SliceLayout>, GameError> {
    let mut groups = template.to_vec();
    groups.shuffle(rng);
    tile(&groups, unit)
}

/// Lay groups end to end from 0°. The ring must close at exactly 360°.
pub fn tile(groups: &[TemplateGroup], unit: u32) -> Result<Vec<SliceLayout>, GameError> {
    let mut start_angle = 0u32;
    let mut layout = Vec::with_capacity(groups.len());

    for group in groups {
        layout.push(SliceLayout {
            start_angle,
            span: group.span,
            kind: group.kind,
        });
        start_angle = group
            .span
            .checked_mul(unit)
            .and_then(|arc| start_angle.checked_add(arc))
            .ok_or(GameError::LayoutIntegrity {
                end_angle: start_angle,
            })?;
    }

    if start_angle != 360 {
        return Err(GameError::LayoutIntegrity {
            end_angle: start_angle,
        });
    }
    Ok(layout)
}
