// SPDX-FileCopyrightText: 2026 Sawari Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Folding of vehicle names, models, and colloquial phrases into the
//! closed category set.
//!
//! This module is the single authority for vehicle inference; no other
//! component re-implements keyword matching.

use sawari_core::VehicleCategory;

/// Maps a raw vehicle expression to its category.
///
/// Handles the category names themselves, specific Indian car models, and
/// the colloquial size/budget phrases users actually type. Unknown
/// expressions return `None` and are dropped by the normalizer.
pub fn fold_vehicle(raw: &str) -> Option<VehicleCategory> {
    let needle = raw.trim().to_ascii_lowercase();
    let category = match needle.as_str() {
        // Category names, with common spacing/casing variants.
        "hatchback" => VehicleCategory::Hatchback,
        "sedan" => VehicleCategory::Sedan,
        "suv" | "muv" => VehicleCategory::Suv,
        "tempotraveller" | "tempo traveller" | "tempo-traveller" | "tempo"
        | "traveller" | "12-seater" | "12 seater" | "tempotraveller12seater" => {
            VehicleCategory::TempoTraveller
        }

        // Hatchback models.
        "swift" | "alto" | "i10" | "i20" | "wagonr" | "wagon r" | "baleno" | "tiago" => {
            VehicleCategory::Hatchback
        }

        // Sedan models.
        "dzire" | "swift dzire" | "etios" | "city" | "honda city" | "amaze" | "aura"
        | "verna" | "ciaz" => VehicleCategory::Sedan,

        // SUV / MUV models.
        "innova" | "innova crysta" | "crysta" | "ertiga" | "scorpio" | "fortuner"
        | "xuv" | "xuv700" | "hexa" | "marazzo" | "bolero" | "creta" => VehicleCategory::Suv,

        // Colloquial phrases.
        "big car" | "badi gaadi" | "comfortable" | "luxury" => VehicleCategory::Suv,
        "small car" | "choti gaadi" | "budget" | "economical" => VehicleCategory::Hatchback,

        _ => return None,
    };
    Some(category)
}
