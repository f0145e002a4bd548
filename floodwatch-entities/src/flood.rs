use crate::geo::Coordinate;

/// Risk classification of a flood zone polygon as published
/// by the flood awareness dataset.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RiskLevel {
    None,
    Low,
    Medium,
    High,
    /// A label the dataset uses but we don't know.
    Unknown(String),
}

impl RiskLevel {
    pub fn from_label(label: Option<&str>) -> Self {
        match label.map(str::trim) {
            Some("High") => Self::High,
            Some("Medium") => Self::Medium,
            Some("Low") => Self::Low,
            Some("None") | Some("") | None => Self::None,
            Some(other) => Self::Unknown(other.to_owned()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::None => "None",
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Unknown(label) => label,
        }
    }

    pub const fn style(&self) -> ZoneStyle {
        match self {
            Self::High => ZoneStyle {
                stroke_color: "#FF0000",
                fill_color: "rgba(255, 0, 0, 0.3)",
            },
            Self::Medium => ZoneStyle {
                stroke_color: "#FFA500",
                fill_color: "rgba(255, 165, 0, 0.3)",
            },
            Self::Low => ZoneStyle {
                stroke_color: "#FFFF00",
                fill_color: "rgba(255, 255, 0, 0.3)",
            },
            Self::None | Self::Unknown(_) => ZoneStyle::DEFAULT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneStyle {
    pub stroke_color: &'static str,
    pub fill_color: &'static str,
}

impl ZoneStyle {
    pub const DEFAULT: Self = Self {
        stroke_color: "#00FF00",
        fill_color: "rgba(0, 255, 0, 0.3)",
    };
}

pub type PolygonRing = Vec<Coordinate>;

#[derive(Debug, Clone, PartialEq)]
pub struct FloodZone {
    /// Every ring of every polygon, i.e. a multi polygon
    /// is flattened into its rings.
    pub polygon_rings: Vec<PolygonRing>,
    pub risk_level: RiskLevel,
}

impl FloodZone {
    pub fn style(&self) -> ZoneStyle {
        self.risk_level.style()
    }

    pub fn is_empty(&self) -> bool {
        self.polygon_rings.iter().all(Vec::is_empty)
    }
}
