use serde::{Deserialize, Serialize};

use crate::dataset::CefrLevel;

/// Batch accuracy bounds for one level. A missing bound never fires.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub up: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub down: Option<f64>,
}

impl Thresholds {
    pub const fn new(up: Option<f64>, down: Option<f64>) -> Self {
        Self { up, down }
    }

    fn is_valid(&self) -> bool {
        let in_range = |v: Option<f64>| v.is_none_or(|v| (0.0..=1.0).contains(&v));
        let ordered = match (self.down, self.up) {
            (Some(down), Some(up)) => down < up,
            _ => true,
        };
        in_range(self.up) && in_range(self.down) && ordered
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ThresholdTable {
    #[serde(rename = "A1", default = "default_a1")]
    pub a1: Thresholds,
    #[serde(rename = "A2", default = "default_a2")]
    pub a2: Thresholds,
    #[serde(rename = "B1", default = "default_b1")]
    pub b1: Thresholds,
    #[serde(rename = "B2", default = "default_b2")]
    pub b2: Thresholds,
    #[serde(rename = "C", default = "default_c")]
    pub c: Thresholds,
}

fn default_a1() -> Thresholds {
    Thresholds::new(Some(0.85), None)
}
fn default_a2() -> Thresholds {
    Thresholds::new(Some(0.9), Some(0.6))
}
fn default_b1() -> Thresholds {
    Thresholds::new(Some(0.94), Some(0.7))
}
fn default_b2() -> Thresholds {
    Thresholds::new(Some(0.975), Some(0.8))
}
fn default_c() -> Thresholds {
    Thresholds::new(None, Some(0.9))
}

impl Default for ThresholdTable {
    fn default() -> Self {
        Self {
            a1: default_a1(),
            a2: default_a2(),
            b1: default_b1(),
            b2: default_b2(),
            c: default_c(),
        }
    }
}

impl ThresholdTable {
    pub fn for_level(&self, level: CefrLevel) -> Thresholds {
        match level {
            CefrLevel::A1 => self.a1,
            CefrLevel::A2 => self.a2,
            CefrLevel::B1 => self.b1,
            CefrLevel::B2 => self.b2,
            CefrLevel::C => self.c,
        }
    }

    /// Resets any level whose bounds are out of 0..=1 or inverted.
    /// The ends of the ladder never promote past C or demote below A1.
    pub fn normalize(&mut self) {
        let defaults = ThresholdTable::default();
        for (slot, fallback) in [
            (&mut self.a1, defaults.a1),
            (&mut self.a2, defaults.a2),
            (&mut self.b1, defaults.b1),
            (&mut self.b2, defaults.b2),
            (&mut self.c, defaults.c),
        ] {
            if !slot.is_valid() {
                log::warn!("invalid thresholds {slot:?}, using {fallback:?}");
                *slot = fallback;
            }
        }
        self.a1.down = None;
        self.c.up = None;
    }
}
