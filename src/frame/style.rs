//! Frame styles and what each one switches on.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Surface treatment of a frame. Has no effect on its dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameStyle {
    #[default]
    Minimal,
    Bold,
    Wood,
}

impl FrameStyle {
    pub const ALL: [FrameStyle; 3] = [FrameStyle::Minimal, FrameStyle::Bold, FrameStyle::Wood];

    /// Case-insensitive lookup of a style name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|style| style.name().eq_ignore_ascii_case(name))
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Minimal => "minimal",
            Self::Bold => "bold",
            Self::Wood => "wood",
        }
    }

    #[must_use]
    pub const fn policy(self) -> &'static StylePolicy {
        match self {
            Self::Minimal => &MINIMAL,
            Self::Bold => &BOLD,
            Self::Wood => &WOOD,
        }
    }
}

impl fmt::Display for FrameStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Rounded end edges applied while extruding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BevelPolicy {
    pub size: f64,
    pub thickness: f64,
    pub segments: usize,
    /// Upper bound as a share of the shortest profile edge.
    pub max_edge_ratio: f64,
    /// Upper bound as a share of the extruded length.
    pub max_length_ratio: f64,
}

/// Render hints for a style.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleMaterial {
    pub name: &'static str,
    /// Linear RGB in `[0, 1]`.
    pub color: [f64; 3],
    pub roughness: f64,
    pub metalness: f64,
}

impl StyleMaterial {
    /// `#rrggbb` form of the color.
    #[must_use]
    pub fn color_hex(&self) -> String {
        let channel = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "#{:02x}{:02x}{:02x}",
            channel(self.color[0]),
            channel(self.color[1]),
            channel(self.color[2])
        )
    }
}

/// Everything a style changes about the build.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StylePolicy {
    pub bevel: Option<BevelPolicy>,
    pub woodgrain: bool,
    /// Maximum spacing between extrusion stations along the body.
    pub body_spacing: Option<f64>,
    pub corner_inserts: bool,
    pub material: StyleMaterial,
}

const MINIMAL: StylePolicy = StylePolicy {
    bevel: None,
    woodgrain: false,
    body_spacing: None,
    corner_inserts: false,
    material: StyleMaterial {
        name: "light-grey",
        color: [0.85, 0.85, 0.84],
        roughness: 0.6,
        metalness: 0.0,
    },
};

const BOLD: StylePolicy = StylePolicy {
    bevel: Some(BevelPolicy {
        size: 0.8,
        thickness: 0.8,
        segments: 3,
        max_edge_ratio: 0.25,
        max_length_ratio: 0.1,
    }),
    woodgrain: false,
    body_spacing: None,
    corner_inserts: true,
    material: StyleMaterial {
        name: "charcoal",
        color: [0.2, 0.2, 0.22],
        roughness: 0.35,
        metalness: 0.1,
    },
};

const WOOD: StylePolicy = StylePolicy {
    bevel: None,
    woodgrain: true,
    body_spacing: Some(6.0),
    corner_inserts: false,
    material: StyleMaterial {
        name: "walnut",
        color: [0.36, 0.23, 0.13],
        roughness: 0.8,
        metalness: 0.0,
    },
};
