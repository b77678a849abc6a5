//! Visualizer settings loading and validation.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    QamError, QamResult,
    noise::NoiseLevel,
    qam::ModulationOrder,
    render::{Canvas, DEFAULT_CANVAS_SIZE, DEFAULT_MARKER_RADIUS},
    waveform::DEFAULT_SAMPLES_PER_SYMBOL,
};

/// Startup parameters for a visualizer session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VisualizerConfig {
    /// Modulation order (perfect square >= 4, or 32).
    #[serde(default)]
    pub order: ModulationOrder,

    /// Noise as a slider percentage, 0 to 100.
    #[serde(default)]
    pub noise_percent: f64,

    #[serde(default = "default_samples_per_symbol")]
    pub samples_per_symbol: usize,

    /// Canvas edge length in pixels.
    #[serde(default = "default_canvas_size")]
    pub canvas_size: f64,

    #[serde(default = "default_marker_radius")]
    pub marker_radius: f64,

    /// Seed for reproducible noise. Unset means a fresh OS seed.
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Values given on the command line. `None` keeps the file value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Overrides {
    pub order: Option<usize>,
    pub noise_percent: Option<f64>,
    pub samples_per_symbol: Option<usize>,
    pub seed: Option<u64>,
}

fn default_samples_per_symbol() -> usize { DEFAULT_SAMPLES_PER_SYMBOL }
fn default_canvas_size() -> f64 { DEFAULT_CANVAS_SIZE }
fn default_marker_radius() -> f64 { DEFAULT_MARKER_RADIUS }

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self {
            order: ModulationOrder::default(),
            noise_percent: 0f64,
            samples_per_symbol: default_samples_per_symbol(),
            canvas_size: default_canvas_size(),
            marker_radius: default_marker_radius(),
            seed: None,
        }
    }
}

impl VisualizerConfig {
    pub fn noise(&self) -> QamResult<NoiseLevel> {
        NoiseLevel::from_percent(self.noise_percent)
    }

    pub fn canvas(&self) -> QamResult<Canvas> {
        Canvas::new(self.canvas_size, self.marker_radius)
    }

    /// Applies `overrides` on top of these settings and validates the result.
    pub fn with_overrides(mut self, overrides: &Overrides) -> QamResult<Self> {
        if let Some(m) = overrides.order {
            self.order = ModulationOrder::new(m)?;
        }
        if let Some(noise) = overrides.noise_percent {
            self.noise_percent = noise;
        }
        if let Some(samples_per_symbol) = overrides.samples_per_symbol {
            self.samples_per_symbol = samples_per_symbol;
        }
        if overrides.seed.is_some() {
            self.seed = overrides.seed;
        }

        self.validate()?;
        Ok(self)
    }

    /// Checks every field that serde cannot check on its own.
    pub fn validate(&self) -> QamResult<()> {
        self.noise()?;
        self.canvas()?;
        if self.samples_per_symbol == 0 {
            return Err(QamError::ZeroSamplesPerSymbol);
        }
        Ok(())
    }
}

/// Load configuration from a TOML file, or JSON when the extension is `.json`.
pub fn load_config(path: &Path) -> QamResult<VisualizerConfig> {
    let content = std::fs::read_to_string(path)?;

    let config: VisualizerConfig = if path.extension().is_some_and(|e| e == "json") {
        serde_json::from_str(&content)?
    } else {
        toml::from_str(&content)?
    };

    config.validate()?;
    tracing::debug!(?config, "loaded configuration from {:?}", path);

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_uses_defaults() {
        let config: VisualizerConfig = toml::from_str("").unwrap();
        assert_eq!(config, VisualizerConfig::default());
        assert_eq!(usize::from(config.order), 16);
        assert_eq!(config.noise_percent, 0f64);
        assert_eq!(config.samples_per_symbol, 100);
        assert_eq!(config.canvas_size, 400f64);
    }

    #[test]
    fn toml_overrides() {
        let config: VisualizerConfig = toml::from_str(
            "order = 32\nnoise_percent = 12.5\nsamples_per_symbol = 20\nseed = 9\n",
        )
        .unwrap();

        assert_eq!(usize::from(config.order), 32);
        assert_eq!(config.noise().unwrap().level(), 0.125);
        assert_eq!(config.samples_per_symbol, 20);
        assert_eq!(config.seed, Some(9));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn unsupported_order_fails_to_parse() {
        let result: Result<VisualizerConfig, _> = toml::from_str("order = 12");
        assert!(result.is_err());
    }

    #[test]
    fn validate_rejects_bad_fields() {
        let noisy = VisualizerConfig {
            noise_percent: 150f64,
            ..Default::default()
        };
        assert!(matches!(noisy.validate(), Err(QamError::NoiseOutOfRange(_))));

        let no_samples = VisualizerConfig {
            samples_per_symbol: 0,
            ..Default::default()
        };
        assert!(matches!(no_samples.validate(), Err(QamError::ZeroSamplesPerSymbol)));

        let flat = VisualizerConfig {
            canvas_size: 0f64,
            ..Default::default()
        };
        assert!(matches!(flat.validate(), Err(QamError::InvalidCanvas(_))));
    }

    fn from_file() -> VisualizerConfig {
        toml::from_str("order = 64\nnoise_percent = 20.0\nsamples_per_symbol = 10\nseed = 3\n")
            .unwrap()
    }

    #[test]
    fn flags_beat_file_values() {
        let overrides = Overrides {
            order: Some(4),
            noise_percent: Some(75f64),
            samples_per_symbol: Some(50),
            seed: Some(42),
        };
        let config = from_file().with_overrides(&overrides).unwrap();

        assert_eq!(usize::from(config.order), 4);
        assert_eq!(config.noise_percent, 75f64);
        assert_eq!(config.samples_per_symbol, 50);
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn unset_flags_keep_file_values() {
        let config = from_file().with_overrides(&Overrides::default()).unwrap();
        assert_eq!(config, from_file());

        let config = from_file()
            .with_overrides(&Overrides {
                noise_percent: Some(0f64),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(usize::from(config.order), 64);
        assert_eq!(config.noise_percent, 0f64);
        assert_eq!(config.seed, Some(3));
    }

    #[test]
    fn invalid_overrides_are_rejected() {
        let bad_order = Overrides {
            order: Some(12),
            ..Default::default()
        };
        assert!(matches!(
            from_file().with_overrides(&bad_order),
            Err(QamError::UnsupportedOrder(12))
        ));

        let bad_noise = Overrides {
            noise_percent: Some(-1f64),
            ..Default::default()
        };
        assert!(matches!(
            from_file().with_overrides(&bad_noise),
            Err(QamError::NoiseOutOfRange(_))
        ));

        let no_samples = Overrides {
            samples_per_symbol: Some(0),
            ..Default::default()
        };
        assert!(matches!(
            from_file().with_overrides(&no_samples),
            Err(QamError::ZeroSamplesPerSymbol)
        ));
    }

    #[test]
    fn load_json_and_toml_files() {
        let dir = std::env::temp_dir().join(format!("konstelacio-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let json_path = dir.join("settings.json");
        std::fs::write(&json_path, r#"{"order": 64, "noise_percent": 5}"#).unwrap();
        let config = load_config(&json_path).unwrap();
        assert_eq!(usize::from(config.order), 64);

        let toml_path = dir.join("settings.toml");
        std::fs::write(&toml_path, "order = 4\n").unwrap();
        let config = load_config(&toml_path).unwrap();
        assert_eq!(usize::from(config.order), 4);

        assert!(matches!(
            load_config(&dir.join("missing.toml")),
            Err(QamError::Io(_))
        ));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
