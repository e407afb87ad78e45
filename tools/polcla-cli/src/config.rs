use std::path::{Path, PathBuf};

use polcla_protocol::{AnnotatorFlags, PolclaError, Result};
use polcla_resolver::{ClauseBaseline, DependencyScope, Strategy, WindowBaseline, WindowDirection};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Paths of the corpus and lexicon files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Inputs {
    pub dependency: Option<PathBuf>,
    pub constituency: Option<PathBuf>,
    pub sentiment_lexicon: Option<PathBuf>,
    pub shifter_lexicon: Option<PathBuf>,
    pub intensifier_lexicon: Option<PathBuf>,
    /// Subjective-expression positions, one line per sentence.
    pub preset_expressions: Option<PathBuf>,
    pub output: Option<PathBuf>,
}

impl Inputs {
    /// Fills in every path given on the command line.
    pub fn override_with(&mut self, other: Inputs) {
        let Inputs {
            dependency,
            constituency,
            sentiment_lexicon,
            shifter_lexicon,
            intensifier_lexicon,
            preset_expressions,
            output,
        } = other;
        self.dependency = dependency.or(self.dependency.take());
        self.constituency = constituency.or(self.constituency.take());
        self.sentiment_lexicon = sentiment_lexicon.or(self.sentiment_lexicon.take());
        self.shifter_lexicon = shifter_lexicon.or(self.shifter_lexicon.take());
        self.intensifier_lexicon = intensifier_lexicon.or(self.intensifier_lexicon.take());
        self.preset_expressions = preset_expressions.or(self.preset_expressions.take());
        self.output = output.or(self.output.take());
    }
}

/// Annotator options as read from a TOML file.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AnnotatorConfig {
    pub normalize: bool,
    pub dependency_scope: bool,
    pub window_baseline: bool,
    pub clause_baseline: bool,
    pub baseline_window: i64,
    pub baseline_direction: WindowDirection,
    pub pos_lookup_sentiment: bool,
    pub pos_lookup_shifter: bool,
    pub shifter_orientation_check: bool,
    pub include_neutral_expressions: bool,
    pub flexible_mwes: bool,
    pub use_preset_expressions: bool,
    pub inputs: Inputs,
}

impl Default for AnnotatorConfig {
    fn default() -> Self {
        Self {
            normalize: true,
            dependency_scope: true,
            window_baseline: false,
            clause_baseline: false,
            baseline_window: 4,
            baseline_direction: WindowDirection::Both,
            pos_lookup_sentiment: true,
            pos_lookup_shifter: true,
            shifter_orientation_check: true,
            include_neutral_expressions: false,
            flexible_mwes: true,
            use_preset_expressions: false,
            inputs: Inputs::default(),
        }
    }
}

impl AnnotatorConfig {
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).map_err(|e| PolclaError::Configuration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| PolclaError::Configuration(format!("{}: {e}", path.display())))?;
        Self::from_toml(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if self.window_baseline && self.clause_baseline {
            return Err(PolclaError::Configuration(
                "window_baseline and clause_baseline are mutually exclusive".to_string(),
            ));
        }
        if !(self.dependency_scope || self.window_baseline || self.clause_baseline) {
            return Err(PolclaError::Configuration(
                "no resolution strategy enabled".to_string(),
            ));
        }
        if self.window_baseline && self.baseline_window < 1 {
            return Err(PolclaError::Configuration(format!(
                "baseline_window must be at least 1, got {}",
                self.baseline_window
            )));
        }
        Ok(())
    }

    /// Checks the input paths once the command line has been merged in.
    pub fn validate_inputs(&self) -> Result<()> {
        match (self.use_preset_expressions, &self.inputs.preset_expressions) {
            (true, None) => Err(PolclaError::Configuration(
                "use_preset_expressions needs [inputs] preset_expressions".to_string(),
            )),
            (false, Some(path)) => {
                warn!(path = %path.display(), "preset expressions ignored, use_preset_expressions is off");
                Ok(())
            }
            _ => Ok(()),
        }
    }

    pub fn to_flags(&self) -> AnnotatorFlags {
        let mut flags = AnnotatorFlags::empty();
        flags.set(AnnotatorFlags::NORMALIZE, self.normalize);
        flags.set(AnnotatorFlags::POS_LOOKUP_SENTIMENT, self.pos_lookup_sentiment);
        flags.set(AnnotatorFlags::POS_LOOKUP_SHIFTER, self.pos_lookup_shifter);
        flags.set(AnnotatorFlags::ORIENTATION_CHECK, self.shifter_orientation_check);
        flags.set(AnnotatorFlags::INCLUDE_NEUTRAL, self.include_neutral_expressions);
        flags.set(AnnotatorFlags::FLEXIBLE_MWES, self.flexible_mwes);
        flags
    }

    /// Resolvers in the order they are tried: the dependency scope first,
    /// then whichever baseline is enabled. Call after `validate`.
    pub fn strategies(&self) -> Vec<Strategy> {
        let orientation = self.shifter_orientation_check;
        let mut strategies = Vec::new();
        if self.dependency_scope {
            strategies.push(Strategy::DependencyScope(DependencyScope { orientation }));
        }
        if self.window_baseline {
            strategies.push(Strategy::WindowBaseline(WindowBaseline {
                direction: self.baseline_direction,
                window: u32::try_from(self.baseline_window).unwrap_or(1),
                orientation,
            }));
        }
        if self.clause_baseline {
            strategies.push(Strategy::ClauseBaseline(ClauseBaseline { orientation }));
        }
        strategies
    }
}
