// Copyright 2025 the Floorplan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Colours for area types, units, and interaction states.

use serde::{Deserialize, Serialize};

use crate::record::AreaType;
use crate::units::ApartmentNo;

/// 8-bit RGBA colour.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba8 {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha.
    pub a: u8,
}

impl Rgba8 {
    /// Opaque colour.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xff }
    }
}

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0100_0000_01b3;

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET_BASIS, |h, &b| {
        (h ^ u64::from(b)).wrapping_mul(FNV_PRIME)
    })
}

/// Colour scheme shared by all interaction modes.
///
/// Type and unit colours are picked from a fixed cycle by a stable hash, so an area type
/// keeps its colour across sessions and machines.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    /// Cycle used for area types and units.
    pub cycle: Vec<Rgba8>,
    /// Areas without a type.
    pub unclassified: Rgba8,
    /// Areas outside any unit.
    pub unassigned: Rgba8,
    /// Selected areas.
    pub selection: Rgba8,
    /// Areas carrying validation errors.
    pub error: Rgba8,
    /// Everything else.
    pub neutral: Rgba8,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            cycle: vec![
                Rgba8::rgb(0x4e, 0x79, 0xa7),
                Rgba8::rgb(0xf2, 0x8e, 0x2b),
                Rgba8::rgb(0x59, 0xa1, 0x4f),
                Rgba8::rgb(0xb0, 0x7a, 0xa1),
                Rgba8::rgb(0x76, 0xb7, 0xb2),
                Rgba8::rgb(0xed, 0xc9, 0x48),
                Rgba8::rgb(0xff, 0x9d, 0xa7),
                Rgba8::rgb(0x9c, 0x75, 0x5f),
            ],
            unclassified: Rgba8::rgb(0xd0, 0xd0, 0xd0),
            unassigned: Rgba8::rgb(0xe8, 0xe8, 0xe8),
            selection: Rgba8::rgb(0x1f, 0x6f, 0xeb),
            error: Rgba8::rgb(0xe1, 0x57, 0x59),
            neutral: Rgba8::rgb(0xf5, 0xf5, 0xf5),
        }
    }
}

impl Palette {
    fn pick(&self, seed: u64) -> Rgba8 {
        if self.cycle.is_empty() {
            return self.neutral;
        }
        let len = self.cycle.len() as u64;
        let i = usize::try_from(seed % len).unwrap_or_default();
        self.cycle[i]
    }

    /// Colour for an area type, or `unclassified` for `None`.
    pub fn color_for_type(&self, area_type: Option<&AreaType>) -> Rgba8 {
        match area_type {
            Some(t) => self.pick(fnv1a(t.as_str().as_bytes())),
            None => self.unclassified,
        }
    }

    /// Colour for a unit, or `unassigned` for `None`.
    pub fn color_for_unit(&self, apartment_no: Option<ApartmentNo>) -> Rgba8 {
        match apartment_no {
            Some(n) => self.pick(u64::from(n)),
            None => self.unassigned,
        }
    }
}
