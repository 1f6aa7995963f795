//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of GeoX.
//! The GeoX project belongs to the Dunimd Team.
//!
//! Licensed under the Apache License, Version 2.0 (the "License");
//! You may not use this file except in compliance with the License.
//! You may obtain a copy of the License at
//!
//!     http://www.apache.org/licenses/LICENSE-2.0
//!
//! Unless required by applicable law or agreed to in writing, software
//! distributed under the License is distributed on an "AS IS" BASIS,
//! WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//! See the License for the specific language governing permissions and
//! limitations under the License.

//! # Mode Short Names
//!
//! Mode specific columns are named `<short>_ban`, `<short>_spd` and
//! `<short>_spdc`. Fixed-width tabular formats cap column names at ten
//! characters, which leaves five characters for the mode token.

use crate::errors::{GxError, Result};
use crate::model::{GxIdMapper, GxMode, GxModeKind};

/// Maximum length of a mode token.
pub const MAX_MODE_TOKEN_LEN: usize = 5;

/// Short token of a mode, at most five characters.
///
/// Predefined kinds map to fixed tokens. Custom modes use their name when it
/// fits, otherwise `m` followed by the mapped id. Anything longer is rejected.
pub fn short_mode_name(mode: &GxMode, mode_id_mapper: &GxIdMapper<GxMode>) -> Result<String> {
    let token = match mode.kind {
        GxModeKind::Car
        | GxModeKind::Bus
        | GxModeKind::Train
        | GxModeKind::Tram
        | GxModeKind::Ferry
        | GxModeKind::GoodsVehicle
        | GxModeKind::HeavyGoodsVehicle
        | GxModeKind::LargeHeavyGoodsVehicle => mode.kind.value(),
        GxModeKind::Bicycle => "cycle",
        GxModeKind::CarShare => "crsh",
        GxModeKind::CarHighOccupancy => "crhov",
        GxModeKind::Pedestrian => "pdstr",
        GxModeKind::MotorBike => "mtrbk",
        GxModeKind::Subway => "sbway",
        GxModeKind::LightRail => "lrail",
        GxModeKind::Custom => return custom_token(mode, mode_id_mapper),
    };
    Ok(token.to_string())
}

fn custom_token(mode: &GxMode, mode_id_mapper: &GxIdMapper<GxMode>) -> Result<String> {
    let name = mode.name.trim();
    if !name.is_empty() && name.chars().count() <= MAX_MODE_TOKEN_LEN && is_token_safe(name) {
        return Ok(name.to_string());
    }
    let mapped = mode_id_mapper(mode);
    if mapped.chars().count() < MAX_MODE_TOKEN_LEN && is_token_safe(&mapped) {
        return Ok(format!("m{}", mapped));
    }
    Err(GxError::configuration(format!(
        "Unable to create short name for mode {} ({}), exceeds {} characters",
        mode.name, mapped, MAX_MODE_TOKEN_LEN
    )))
}

fn is_token_safe(token: &str) -> bool {
    !token.contains(',') && !token.contains(':')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ids::id_mapper;
    use crate::model::GxIdMapperType;

    fn mapper() -> GxIdMapper<GxMode> {
        id_mapper(GxIdMapperType::Xml)
    }

    #[test]
    fn predefined_modes_use_fixed_tokens() {
        let cases = [
            (GxModeKind::Car, "car"),
            (GxModeKind::HeavyGoodsVehicle, "hgv"),
            (GxModeKind::Bicycle, "cycle"),
            (GxModeKind::CarHighOccupancy, "crhov"),
            (GxModeKind::LightRail, "lrail"),
        ];
        for (kind, expected) in cases {
            let mode = GxMode::new(1, "x", kind);
            assert_eq!(short_mode_name(&mode, &mapper()).expect("token"), expected);
        }
    }

    #[test]
    fn custom_modes_fall_back_to_mapped_id() {
        let short = GxMode::custom(1, "42", "taxi");
        assert_eq!(short_mode_name(&short, &mapper()).expect("name"), "taxi");

        let long = GxMode::custom(2, "42", "autonomous");
        assert_eq!(short_mode_name(&long, &mapper()).expect("id"), "m42");

        let hopeless = GxMode::custom(3, "12345", "autonomous");
        assert!(matches!(
            short_mode_name(&hopeless, &mapper()),
            Err(GxError::Configuration { .. })
        ));
    }
}
