//! Standard bench layouts
//!
//! Presets are plain configuration data: lists of element constructors with
//! fixed positions and angles, plus the initial photons. They live outside
//! the core so the sim stays layout-agnostic; switching presets rebuilds the
//! scene wholesale.
//!
//! Mirror layouts account for the contact band: a branch approaching along a
//! line through a mirror's center reflects one step early, so mirrors that
//! feed a downstream element are offset by one step along the approach axis.

use glam::Vec2;
use std::f32::consts::{FRAC_PI_4, FRAC_PI_6};

use crate::sim::{
    Beamsplitter, Branch, Filter, Mirror, OpticalElement, Photon, SceneConfig, SimError, Waveplate,
};

/// The bench layouts selectable from the UI layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Preset {
    Vertical,
    #[default]
    Horizontal,
    FortyFiveDegree,
    Cyclical,
    Interferometer,
}

impl Preset {
    pub fn as_str(&self) -> &'static str {
        match self {
            Preset::Vertical => "Vertical",
            Preset::Horizontal => "Horizontal",
            Preset::FortyFiveDegree => "45-Degree",
            Preset::Cyclical => "Cyclical",
            Preset::Interferometer => "Interferometer",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "vertical" => Some(Preset::Vertical),
            "horizontal" => Some(Preset::Horizontal),
            "45-degree" | "45" | "diagonal" => Some(Preset::FortyFiveDegree),
            "cyclical" => Some(Preset::Cyclical),
            "interferometer" => Some(Preset::Interferometer),
            _ => None,
        }
    }

    pub const ALL: [Preset; 5] = [
        Preset::Vertical,
        Preset::Horizontal,
        Preset::FortyFiveDegree,
        Preset::Cyclical,
        Preset::Interferometer,
    ];

    /// Build the element list and initial photons for this layout
    pub fn build(
        &self,
        config: &SceneConfig,
    ) -> Result<(Vec<OpticalElement>, Vec<Photon>), SimError> {
        let (w, h) = (config.width, config.height);
        let speed = config.speed;

        match self {
            Preset::Vertical => single_filter_bench(w, h, speed, Vec2::new(0.0, 1.0)),
            Preset::Horizontal => single_filter_bench(w, h, speed, Vec2::new(1.0, 0.0)),
            Preset::FortyFiveDegree => {
                let d = 1.0 / 2.0_f32.sqrt();
                single_filter_bench(w, h, speed, Vec2::new(d, d))
            }
            Preset::Cyclical => {
                // Four 45° mirrors forming a closed rectangular loop, with a
                // waveplate on the bottom leg rotating the state each lap
                let elements = vec![
                    OpticalElement::Waveplate(Waveplate::new(
                        Vec2::new(w / 2.0, h / 2.0),
                        std::f32::consts::PI / 12.0,
                    )),
                    OpticalElement::Mirror(Mirror::new(
                        Vec2::new(3.0 * w / 4.0, h / 2.0),
                        FRAC_PI_4,
                    )),
                    OpticalElement::Mirror(Mirror::new(
                        Vec2::new(3.0 * w / 4.0, 3.0 * h / 4.0),
                        3.0 * FRAC_PI_4,
                    )),
                    OpticalElement::Mirror(Mirror::new(
                        Vec2::new(w / 4.0, 3.0 * h / 4.0),
                        FRAC_PI_4,
                    )),
                    OpticalElement::Mirror(Mirror::new(
                        Vec2::new(w / 4.0, h / 2.0),
                        3.0 * FRAC_PI_4,
                    )),
                ];
                let photon = Photon::new(
                    1,
                    Branch::new(
                        Vec2::new(w / 4.0 + 50.0, h / 2.0),
                        Vec2::new(speed, 0.0),
                        Vec2::new(1.0, 0.0),
                        1.0,
                    )?,
                );
                Ok((elements, vec![photon]))
            }
            Preset::Interferometer => {
                // Waveplate, splitter, two folding mirrors, recombining
                // splitter. Arm lengths are equal so both branches reach the
                // second splitter on the same tick.
                let bs1 = Vec2::new(w / 2.0, h / 4.0);
                let bs2 = Vec2::new(3.0 * w / 4.0, h / 2.0);
                let elements = vec![
                    OpticalElement::Waveplate(Waveplate::new(
                        Vec2::new(w / 4.0, h / 4.0),
                        FRAC_PI_6,
                    )),
                    OpticalElement::Beamsplitter(Beamsplitter::new(bs1)),
                    // Horizontal arm: fold downward at the far right
                    OpticalElement::Mirror(Mirror::new(
                        Vec2::new(bs2.x + speed, h / 4.0),
                        FRAC_PI_4,
                    )),
                    // Vertical arm: fold rightward at mid height
                    OpticalElement::Mirror(Mirror::new(
                        Vec2::new(w / 2.0, bs2.y + speed),
                        FRAC_PI_4,
                    )),
                    OpticalElement::Beamsplitter(Beamsplitter::new(bs2)),
                ];
                let photon = Photon::new(
                    1,
                    Branch::new(
                        Vec2::new(w / 4.0 - 100.0, h / 4.0),
                        Vec2::new(speed, 0.0),
                        Vec2::new(1.0, 0.0),
                        1.0,
                    )?,
                );
                Ok((elements, vec![photon]))
            }
        }
    }
}

/// The basic bench: one diagonal photon heading into one filter
fn single_filter_bench(
    w: f32,
    h: f32,
    speed: f32,
    axis: Vec2,
) -> Result<(Vec<OpticalElement>, Vec<Photon>), SimError> {
    let elements = vec![OpticalElement::Filter(Filter::new(
        Vec2::new(3.0 * w / 4.0, h / 2.0),
        axis,
    )?)];
    let d = 1.0 / 2.0_f32.sqrt();
    let photon = Photon::new(
        1,
        Branch::new(
            Vec2::new(w / 4.0, h / 2.0),
            Vec2::new(speed, 0.0),
            Vec2::new(d, d),
            1.0,
        )?,
    );
    Ok((elements, vec![photon]))
}
