use glam::Vec2;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::api::error::EngineResult;
use crate::api::types::BeamId;
use crate::components::beam::{BeamConfig, LengthClass};

/// One beam as written in a registry document.
///
/// Field names are the camelCase option names hosts use for the backdrop.
/// Every field is optional and lenient: numbers may be given as `200`, `"200"` or `"200px"`,
/// and anything unusable is treated as omitted.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BeamSpec {
    #[serde(deserialize_with = "lenient_number")]
    pub initial_x: Option<f32>,
    #[serde(deserialize_with = "lenient_number")]
    pub initial_y: Option<f32>,
    #[serde(deserialize_with = "lenient_number")]
    pub translate_x: Option<f32>,
    #[serde(deserialize_with = "lenient_number")]
    pub translate_y: Option<f32>,
    #[serde(deserialize_with = "lenient_number")]
    pub rotate: Option<f32>,
    #[serde(deserialize_with = "lenient_number")]
    pub duration: Option<f32>,
    #[serde(deserialize_with = "lenient_number")]
    pub delay: Option<f32>,
    #[serde(deserialize_with = "lenient_number")]
    pub repeat_delay: Option<f32>,
    /// A length class (`"h-8"`) or a class list containing one.
    #[serde(alias = "length", deserialize_with = "lenient_string")]
    pub class_name: Option<String>,
}

fn lenient_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f32>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    let number = match &value {
        Value::Number(n) => n.as_f64().map(|v| v as f32),
        Value::String(s) => {
            let s = s.trim();
            s.strip_suffix("px").unwrap_or(s).trim().parse::<f32>().ok()
        }
        _ => None,
    };
    Ok(number.filter(|v| v.is_finite()))
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => Some(s),
        _ => None,
    })
}

impl BeamSpec {
    /// Resolve into a config, applying defaults for omitted or invalid fields.
    pub fn resolve(&self, id: BeamId) -> BeamConfig {
        let mut config = BeamConfig::new(id);

        let initial_x = self.initial_x.unwrap_or(0.0);
        config.initial = Vec2::new(
            initial_x,
            self.initial_y.unwrap_or(BeamConfig::DEFAULT_INITIAL_Y),
        );
        config.target = Vec2::new(
            self.translate_x.unwrap_or(initial_x),
            self.translate_y.unwrap_or(BeamConfig::DEFAULT_TARGET_Y),
        );
        config.rotation = self.rotate.unwrap_or(0.0);

        match self.duration {
            Some(d) if d > 0.0 => config = config.with_duration(d),
            Some(d) => log::warn!("{}: duration {} must be positive, using default", id, d),
            None => {}
        }
        config = config.with_delay(non_negative(id, "delay", self.delay));
        config = config.with_repeat_delay(non_negative(id, "repeatDelay", self.repeat_delay));

        if let Some(classes) = &self.class_name {
            match LengthClass::from_class_list(classes) {
                Some(length) => config.length = length,
                None => log::warn!("{}: no length class in {:?}, using default", id, classes),
            }
        }

        config
    }
}

fn non_negative(id: BeamId, name: &str, value: Option<f32>) -> f32 {
    match value {
        Some(v) if v >= 0.0 => v,
        Some(v) => {
            log::warn!("{}: {} {} must not be negative, using 0", id, name, v);
            0.0
        }
        None => 0.0,
    }
}

/// Accepts either a bare array of beams or `{ "beams": [...] }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum RegistryDocument {
    List(Vec<BeamSpec>),
    Wrapped { beams: Vec<BeamSpec> },
}

/// Ordered, immutable list of beam configs. A beam's id is its index.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BeamRegistry {
    beams: Vec<BeamConfig>,
}

impl BeamRegistry {
    /// Build a registry, re-stamping ids to match positions.
    pub fn new(beams: Vec<BeamConfig>) -> Self {
        let beams = beams
            .into_iter()
            .enumerate()
            .map(|(i, mut c)| {
                c.id = BeamId(i as u32);
                c
            })
            .collect();
        Self { beams }
    }

    pub fn from_specs(specs: &[BeamSpec]) -> Self {
        let beams = specs
            .iter()
            .enumerate()
            .map(|(i, spec)| spec.resolve(BeamId(i as u32)))
            .collect();
        Self { beams }
    }

    /// Parse a registry from a JSON string.
    pub fn from_json(json: &str) -> EngineResult<Self> {
        let specs = match serde_json::from_str(json)? {
            RegistryDocument::List(specs) => specs,
            RegistryDocument::Wrapped { beams } => beams,
        };
        Ok(Self::from_specs(&specs))
    }

    /// The stock twenty-beam backdrop: vertical beams spread across the
    /// width plus two slanted ones, with staggered timings.
    pub fn default_backdrop() -> Self {
        use LengthClass::*;

        // (initial x, target x, duration, repeat delay, delay, length)
        const TABLE: [(f32, f32, f32, f32, f32, LengthClass); 20] = [
            (10.0, 10.0, 7.0, 3.0, 2.0, H14),
            (600.0, 600.0, 3.0, 3.0, 4.0, H14),
            (100.0, 100.0, 7.0, 7.0, 0.0, H6),
            (400.0, 400.0, 5.0, 14.0, 4.0, H14),
            (800.0, 800.0, 11.0, 2.0, 0.0, H20),
            (1000.0, 1000.0, 4.0, 2.0, 0.0, H12),
            (1200.0, 1200.0, 6.0, 4.0, 2.0, H6),
            (50.0, 50.0, 6.0, 5.0, 1.0, H8),
            (150.0, 150.0, 8.0, 6.0, 0.0, H4),
            (200.0, 200.0, 5.0, 8.0, 3.0, H14),
            (300.0, 300.0, 9.0, 4.0, 0.0, H16),
            (350.0, 350.0, 4.0, 10.0, 5.0, H10),
            (500.0, 500.0, 7.0, 7.0, 0.0, H14),
            (550.0, 550.0, 10.0, 3.0, 2.0, H6),
            (700.0, 700.0, 6.0, 9.0, 0.0, H14),
            (900.0, 900.0, 8.0, 5.0, 4.0, H14),
            (1100.0, 1100.0, 5.0, 6.0, 0.0, H8),
            (1300.0, 1300.0, 7.0, 8.0, 1.0, H14),
            (250.0, 350.0, 12.0, 6.0, 0.0, H10),
            (950.0, 850.0, 10.0, 4.0, 3.0, H12),
        ];

        let beams = TABLE
            .iter()
            .enumerate()
            .map(|(i, &(x, tx, duration, repeat_delay, delay, length))| {
                BeamConfig::vertical(BeamId(i as u32), x)
                    .with_target(Vec2::new(tx, BeamConfig::DEFAULT_TARGET_Y))
                    .with_duration(duration)
                    .with_repeat_delay(repeat_delay)
                    .with_delay(delay)
                    .with_length(length)
            })
            .collect();
        Self { beams }
    }

    pub fn get(&self, id: BeamId) -> Option<&BeamConfig> {
        self.beams.get(id.0 as usize)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BeamConfig> {
        self.beams.iter()
    }

    pub fn len(&self) -> usize {
        self.beams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.beams.is_empty()
    }

    pub fn into_configs(self) -> Vec<BeamConfig> {
        self.beams
    }
}
