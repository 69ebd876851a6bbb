//! # Bridge Parameter Catalogue
//!
//! Every parameter the drawing generator understands, with its display name,
//! value kind, declared default and allowed range. The catalogue drives form
//! construction (labels, defaults, min/max constraints) and display grouping.
//!
//! ## Example
//!
//! ```rust
//! use bridge_core::parameters::{definition, ParameterGroup};
//!
//! let toprl = definition("TOPRL").unwrap();
//! assert_eq!(toprl.name, "Top RL of Bridge");
//! assert_eq!(toprl.unit, "mm");
//!
//! let slab = ParameterGroup::SlabDesign.definitions();
//! assert!(slab.iter().any(|d| d.key == "SLBTHC"));
//! ```

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Parameters that must be filled in before a drawing can be generated
pub const REQUIRED_PARAMETERS: &[&str] = &["SCALE1", "SCALE2", "LBRIDGE", "NSPAN", "TOPRL", "SOFL", "CCBR"];

/// Numeric kind of a parameter value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Int,
    Float,
}

impl ValueKind {
    /// Human-readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            ValueKind::Int => "integer",
            ValueKind::Float => "number",
        }
    }
}

/// Static description of one bridge parameter
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParameterDefinition {
    /// Form key, e.g. `"TOPRL"`
    pub key: &'static str,
    /// Display name, e.g. `"Top RL of Bridge"`
    pub name: &'static str,
    pub kind: ValueKind,
    pub default: f64,
    pub min: f64,
    pub max: f64,
    /// Unit label shown next to the input ("" for dimensionless)
    pub unit: &'static str,
    pub description: &'static str,
}

impl ParameterDefinition {
    /// Whether the parameter is in the required list
    pub fn is_required(&self) -> bool {
        REQUIRED_PARAMETERS.contains(&self.key)
    }

    /// Default value formatted the way it appears in the form
    pub fn default_text(&self) -> String {
        format_number(self.default)
    }
}

/// Format a bound or default without a trailing `.0` for whole numbers
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

macro_rules! param {
    ($key:literal, $name:literal, $kind:ident, $default:expr, $min:expr, $max:expr, $unit:literal, $desc:literal) => {
        ParameterDefinition {
            key: $key,
            name: $name,
            kind: ValueKind::$kind,
            default: $default as f64,
            min: $min as f64,
            max: $max as f64,
            unit: $unit,
            description: $desc,
        }
    };
}

/// All parameter definitions, in catalogue order
pub static PARAMETER_DEFINITIONS: &[ParameterDefinition] = &[
    // Scale and general
    param!("SCALE1", "Primary Scale", Int, 100, 1, 1000, "", "Primary drawing scale factor"),
    param!("SCALE2", "Secondary Scale", Int, 100, 1, 1000, "", "Secondary drawing scale factor"),
    param!("SKEW", "Bridge Skew Angle", Float, 0, -45, 45, "°", "Angle of skew for the bridge in degrees"),
    param!("DATUM", "Drawing Datum", Float, 100000, 0, 200000, "mm", "Reference datum level for the drawing"),
    param!("TOPRL", "Top RL of Bridge", Float, 110000, 90000, 150000, "mm", "Top level of the bridge deck"),
    param!("LEFT", "Left Chainage", Float, 0, 0, 100000, "m", "Left-most chainage point"),
    param!("RIGHT", "Right Chainage", Float, 50000, 10000, 200000, "m", "Right-most chainage point"),
    // Bridge geometry
    param!("NSPAN", "Number of Spans", Int, 1, 1, 10, "", "Total number of bridge spans"),
    param!("LBRIDGE", "Bridge Length", Float, 30000, 5000, 200000, "mm", "Total length of the bridge"),
    param!("SPAN1", "Individual Span Length", Float, 30000, 5000, 50000, "mm", "Length of individual spans"),
    param!("CCBR", "Clear Carriageway Width", Float, 7500, 3000, 20000, "mm", "Clear width of the carriageway"),
    // Slab
    param!("SLBTHC", "Slab Thickness at Centre", Float, 1000, 200, 2000, "mm", "Thickness of slab at center"),
    param!("SLBTHE", "Slab Thickness at Edge", Float, 800, 200, 2000, "mm", "Thickness of slab at edge"),
    param!("SLBTHT", "Slab Thickness at Tip", Float, 600, 150, 1500, "mm", "Thickness of slab at tip"),
    param!("SOFL", "Soffit Level", Float, 108000, 90000, 148000, "mm", "Level of the bridge soffit"),
    // Kerb
    param!("KERBW", "Kerb Width", Float, 300, 100, 600, "mm", "Width of the kerb"),
    param!("KERBD", "Kerb Depth", Float, 150, 100, 300, "mm", "Depth of the kerb"),
    // Abutments
    param!("ABTLEN", "Abutment Length", Float, 10000, 5000, 20000, "mm", "Length of the abutment"),
    param!("ABTL", "Left Abutment Chainage", Float, 0, 0, 50000, "m", "Chainage of the left abutment"),
    param!("ALCW", "Left Abutment Cap Width", Float, 1200, 800, 2000, "mm", "Width of left abutment cap excluding dirt wall"),
    param!("ALCD", "Left Abutment Cap Depth", Float, 800, 500, 1500, "mm", "Depth of left abutment cap"),
    param!("ALFL", "Left Abutment Footing Level", Float, 105000, 90000, 145000, "mm", "Footing level of left abutment"),
    param!("ARFL", "Right Abutment Footing Level", Float, 105000, 90000, 145000, "mm", "Footing level of right abutment"),
    param!("ALFB", "Left Abutment Front Batter", Float, 0.1, 0, 0.5, "", "Front batter ratio for left abutment"),
    param!("ALFBL", "Left Abutment Front Batter RL", Float, 108000, 90000, 145000, "mm", "Reference level for left abutment front batter"),
    param!("ALFBR", "Right Abutment Front Batter RL", Float, 108000, 90000, 145000, "mm", "Reference level for right abutment front batter"),
    param!("ALTB", "Left Abutment Toe Batter", Float, 0.1, 0, 0.5, "", "Toe batter ratio for left abutment"),
    param!("ALTBL", "Left Abutment Toe Batter Level", Float, 107000, 90000, 145000, "mm", "Footing top level for left abutment toe batter"),
    param!("ALTBR", "Right Abutment Toe Batter Level", Float, 107000, 90000, 145000, "mm", "Footing top level for right abutment toe batter"),
    param!("ALFO", "Left Abutment Front Offset to Footing", Float, 500, 200, 1000, "mm", "Front offset to footing for left abutment"),
    param!("ALFD", "Left Abutment Footing Depth", Float, 1000, 500, 2000, "mm", "Depth of left abutment footing"),
    param!("ALBB", "Left Abutment Back Batter", Float, 0.05, 0, 0.3, "", "Back batter ratio for left abutment"),
    param!("ALBBL", "Left Abutment Back Batter RL", Float, 108000, 90000, 145000, "mm", "Reference level for left abutment back batter"),
    param!("ALBBR", "Right Abutment Back Batter RL", Float, 108000, 90000, 145000, "mm", "Reference level for right abutment back batter"),
    param!("DWTH", "Dirt Wall Thickness", Float, 300, 200, 500, "mm", "Thickness of dirt wall"),
    // Piers
    param!("CAPT", "Pier Cap Top RL", Float, 109000, 90000, 145000, "mm", "Top level of pier cap"),
    param!("CAPB", "Pier Cap Bottom RL", Float, 108000, 90000, 145000, "mm", "Bottom level of pier cap"),
    param!("CAPW", "Pier Cap Width", Float, 2000, 1000, 4000, "mm", "Width of pier cap"),
    param!("PIERTW", "Pier Top Width", Float, 1500, 800, 3000, "mm", "Top width of pier"),
    param!("BATTR", "Pier Batter", Float, 0.02, 0, 0.1, "", "Batter ratio for pier"),
    param!("PIERST", "Pier Straight Length", Float, 5000, 2000, 15000, "mm", "Straight length of pier"),
    param!("PIERN", "Pier Serial Number", Int, 1, 1, 20, "", "Serial number of pier"),
    param!("FUTRL", "Foundation RL", Float, 100000, 85000, 140000, "mm", "Foundation level"),
    param!("FUTD", "Foundation Depth", Float, 2000, 1000, 5000, "mm", "Depth of foundation"),
    param!("FUTW", "Foundation Width", Float, 3000, 2000, 8000, "mm", "Width of foundation"),
    param!("FUTL", "Foundation Length", Float, 8000, 5000, 20000, "mm", "Length of foundation"),
    // Approach slab
    param!("LASLAB", "Approach Slab Length", Float, 5000, 2000, 10000, "mm", "Length of approach slab"),
    param!("APWTH", "Approach Slab Width", Float, 8000, 5000, 15000, "mm", "Width of approach slab"),
    param!("APTHK", "Approach Slab Thickness", Float, 200, 150, 400, "mm", "Thickness of approach slab"),
    param!("WCTH", "Wearing Course Thickness", Float, 75, 50, 150, "mm", "Thickness of wearing course"),
    // Additional
    param!("RTL", "Road Top Level", Float, 110000, 90000, 150000, "mm", "Top level of road surface"),
    param!("XINCR", "X Direction Increment", Float, 1000, 100, 5000, "mm", "Chainage increment in X direction"),
    param!("YINCR", "Y Direction Increment", Float, 1000, 100, 5000, "mm", "Elevation increment in Y direction"),
    param!("NOCH", "Number of Chainages", Int, 50, 10, 200, "", "Total number of chainages"),
];

static BY_KEY: Lazy<HashMap<&'static str, &'static ParameterDefinition>> =
    Lazy::new(|| PARAMETER_DEFINITIONS.iter().map(|d| (d.key, d)).collect());

/// Look up a parameter definition by its form key
pub fn definition(key: &str) -> Option<&'static ParameterDefinition> {
    BY_KEY.get(key).copied()
}

/// Display groups for the parameter form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParameterGroup {
    General,
    BridgeGeometry,
    SlabDesign,
    Abutments,
    Piers,
    Approach,
}

impl ParameterGroup {
    pub const ALL: &'static [ParameterGroup] = &[
        ParameterGroup::General,
        ParameterGroup::BridgeGeometry,
        ParameterGroup::SlabDesign,
        ParameterGroup::Abutments,
        ParameterGroup::Piers,
        ParameterGroup::Approach,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            ParameterGroup::General => "General",
            ParameterGroup::BridgeGeometry => "Bridge Geometry",
            ParameterGroup::SlabDesign => "Slab Design",
            ParameterGroup::Abutments => "Abutments",
            ParameterGroup::Piers => "Piers",
            ParameterGroup::Approach => "Approach",
        }
    }

    /// Parameter keys shown in this group, in display order
    pub fn keys(&self) -> &'static [&'static str] {
        match self {
            ParameterGroup::General => &["SCALE1", "SCALE2", "SKEW", "DATUM", "TOPRL", "LEFT", "RIGHT", "RTL"],
            ParameterGroup::BridgeGeometry => &["NSPAN", "LBRIDGE", "SPAN1", "CCBR", "XINCR", "YINCR", "NOCH"],
            ParameterGroup::SlabDesign => &["SLBTHC", "SLBTHE", "SLBTHT", "SOFL", "KERBW", "KERBD", "WCTH"],
            ParameterGroup::Abutments => &[
                "ABTLEN", "ABTL", "ALCW", "ALCD", "ALFL", "ARFL", "ALFB", "ALFBL", "ALFBR", "ALTB", "ALTBL",
                "ALTBR", "ALFO", "ALFD", "ALBB", "ALBBL", "ALBBR", "DWTH",
            ],
            ParameterGroup::Piers => &[
                "CAPT", "CAPB", "CAPW", "PIERTW", "BATTR", "PIERST", "PIERN", "FUTRL", "FUTD", "FUTW", "FUTL",
            ],
            ParameterGroup::Approach => &["LASLAB", "APWTH", "APTHK"],
        }
    }

    /// Definitions for the keys of this group
    pub fn definitions(&self) -> Vec<&'static ParameterDefinition> {
        self.keys().iter().filter_map(|k| definition(k)).collect()
    }

    /// Group a key is displayed in, if any
    pub fn of(key: &str) -> Option<ParameterGroup> {
        ParameterGroup::ALL.iter().copied().find(|g| g.keys().contains(&key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_keys_are_unique() {
        let keys: HashSet<_> = PARAMETER_DEFINITIONS.iter().map(|d| d.key).collect();
        assert_eq!(keys.len(), PARAMETER_DEFINITIONS.len());
    }

    #[test]
    fn test_defaults_within_bounds() {
        for def in PARAMETER_DEFINITIONS {
            assert!(def.min <= def.default && def.default <= def.max, "{} default out of range", def.key);
        }
    }

    #[test]
    fn test_required_parameters_are_defined() {
        for key in REQUIRED_PARAMETERS {
            let def = definition(key).unwrap();
            assert!(def.is_required());
        }
        assert!(!definition("SKEW").unwrap().is_required());
    }

    #[test]
    fn test_every_grouped_key_has_definition() {
        for group in ParameterGroup::ALL {
            assert_eq!(group.definitions().len(), group.keys().len(), "{}", group.display_name());
        }
        assert_eq!(ParameterGroup::of("SOFL"), Some(ParameterGroup::SlabDesign));
        assert_eq!(ParameterGroup::of("NOPE"), None);
    }

    #[test]
    fn test_default_text() {
        assert_eq!(definition("TOPRL").unwrap().default_text(), "110000");
        assert_eq!(definition("ALFB").unwrap().default_text(), "0.1");
        assert_eq!(definition("SKEW").unwrap().default_text(), "0");
        assert_eq!(format_number(-45.0), "-45");
    }
}
