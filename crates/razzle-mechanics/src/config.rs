//! Game configuration: parameters, validation, and file formats.
//!
//! [`GameParams`] is the raw, editable parameter record. [`GameConfig`] is the
//! validated, immutable form every rule and simulation call takes. The only way
//! to obtain a [`GameConfig`] is through validation, so no rule-engine call ever
//! sees a malformed configuration.
//!
//! Two input formats are supported: JSON with snake_case field names, and the
//! flat `key=value` parameter mapping (`numOfDiceP=3`, `yardsPerStep2P=7`, ...).

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MechError, MechResult};
use crate::rules::{self, STEP_COUNT};

/// Largest dice total a configuration may reach.
pub const MAX_SUM: u32 = 1 << 16;

/// Raw game parameters, before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameParams {
    /// Number of dice rolled together each turn.
    pub num_dice: u32,
    /// Faces per die.
    pub faces: u32,
    /// Maximum number of rolls in a session.
    pub max_rolls: u32,
    /// Amount staked at the start of a session.
    pub stake: i64,
    /// Half-width of the no-win band around the mean sum.
    pub no_win_half_width: f64,
    /// Upper sum bound for steps 1 through 5, checked in order.
    pub thresholds: [u32; STEP_COUNT],
    /// Payout for steps 1 through 5.
    pub payouts: [i64; STEP_COUNT],
}

impl Default for GameParams {
    fn default() -> Self {
        Self {
            num_dice: 3,
            faces: 6,
            max_rolls: 5,
            stake: 3,
            no_win_half_width: 2.0,
            thresholds: [3, 7, 14, 16, 18],
            payouts: [1, 2, 4, 6, 9],
        }
    }
}

impl GameParams {
    /// Set the number of dice.
    pub fn with_num_dice(mut self, num_dice: u32) -> Self {
        self.num_dice = num_dice;
        self
    }

    /// Set the number of faces per die.
    pub fn with_faces(mut self, faces: u32) -> Self {
        self.faces = faces;
        self
    }

    /// Set the maximum number of rolls per session.
    pub fn with_max_rolls(mut self, max_rolls: u32) -> Self {
        self.max_rolls = max_rolls;
        self
    }

    /// Set the stake.
    pub fn with_stake(mut self, stake: i64) -> Self {
        self.stake = stake;
        self
    }

    /// Set the no-win half-width.
    pub fn with_no_win_half_width(mut self, half_width: f64) -> Self {
        self.no_win_half_width = half_width;
        self
    }

    /// Set the five step thresholds.
    pub fn with_thresholds(mut self, thresholds: [u32; STEP_COUNT]) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Set the five step payouts.
    pub fn with_payouts(mut self, payouts: [i64; STEP_COUNT]) -> Self {
        self.payouts = payouts;
        self
    }

    /// Check every invariant, reporting the first violation.
    pub fn validate(&self) -> MechResult<()> {
        if self.num_dice == 0 {
            return Err(invalid("num_dice must be at least 1"));
        }
        if self.faces == 0 {
            return Err(invalid("faces must be at least 1"));
        }
        match self.num_dice.checked_mul(self.faces) {
            Some(max_sum) if max_sum <= MAX_SUM => {}
            _ => {
                return Err(invalid(format!(
                    "num_dice ({}) times faces ({}) must not exceed {MAX_SUM}",
                    self.num_dice, self.faces
                )));
            }
        }
        if self.max_rolls == 0 {
            return Err(invalid("max_rolls must be at least 1"));
        }
        if self.stake <= 0 {
            return Err(invalid(format!(
                "stake must be positive, got {}",
                self.stake
            )));
        }
        if !self.no_win_half_width.is_finite() || self.no_win_half_width < 0.0 {
            return Err(invalid(format!(
                "no_win_half_width must be a non-negative number, got {}",
                self.no_win_half_width
            )));
        }
        if let Some(i) = self.thresholds.windows(2).position(|w| w[0] > w[1]) {
            return Err(invalid(format!(
                "thresholds must be non-decreasing: step {} ({}) > step {} ({})",
                i + 1,
                self.thresholds[i],
                i + 2,
                self.thresholds[i + 1]
            )));
        }
        if let Some(i) = self.payouts.iter().position(|&p| p < 0) {
            return Err(invalid(format!(
                "payout for step {} must be non-negative, got {}",
                i + 1,
                self.payouts[i]
            )));
        }
        Ok(())
    }

    /// Validate and freeze into a [`GameConfig`].
    pub fn build(self) -> MechResult<GameConfig> {
        GameConfig::new(self)
    }

    /// Parse the flat `key=value` parameter format.
    ///
    /// Blank lines, `#` comments, `Final ...` summary lines and the derived
    /// `noScoreWindow` line are skipped. Keys that are absent keep their
    /// default value.
    pub fn from_flat_str(text: &str) -> MechResult<Self> {
        let mut params = Self::default();
        for (idx, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with("Final") {
                continue;
            }
            let (key, value) = line.split_once('=').ok_or_else(|| MechError::ParseParams {
                line: idx + 1,
                message: format!("expected key=value, got '{line}'"),
            })?;
            let key = key.trim();
            if key == NO_SCORE_WINDOW_KEY {
                continue;
            }
            let param = Param::from_key(key)
                .ok_or_else(|| MechError::UnknownParameter(key.to_string()))?;
            param
                .assign(&mut params, value.trim())
                .map_err(|message| MechError::ParseParams {
                    line: idx + 1,
                    message,
                })?;
        }
        Ok(params)
    }
}

fn invalid(message: impl Into<String>) -> MechError {
    MechError::InvalidConfig(message.into())
}

/// Derived line appended to rendered parameter files.
const NO_SCORE_WINDOW_KEY: &str = "noScoreWindow";

/// A validated, immutable game configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GameParams", into = "GameParams")]
pub struct GameConfig {
    params: GameParams,
}

impl TryFrom<GameParams> for GameConfig {
    type Error = MechError;

    fn try_from(params: GameParams) -> MechResult<Self> {
        Self::new(params)
    }
}

impl From<GameConfig> for GameParams {
    fn from(config: GameConfig) -> Self {
        config.params
    }
}

impl GameConfig {
    /// Validate `params` and wrap them.
    pub fn new(params: GameParams) -> MechResult<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    /// Parse a JSON configuration.
    pub fn from_json(json: &str) -> MechResult<Self> {
        let params: GameParams = serde_json::from_str(json)?;
        Self::new(params)
    }

    /// Parse the flat `key=value` parameter format.
    pub fn from_flat_str(text: &str) -> MechResult<Self> {
        Self::new(GameParams::from_flat_str(text)?)
    }

    /// Load a configuration file: JSON when the extension is `.json`,
    /// the flat parameter format otherwise.
    pub fn load(path: &Path) -> MechResult<Self> {
        let text = std::fs::read_to_string(path)?;
        if path.extension().is_some_and(|ext| ext == "json") {
            Self::from_json(&text)
        } else {
            Self::from_flat_str(&text)
        }
    }

    /// The underlying parameters.
    pub fn params(&self) -> &GameParams {
        &self.params
    }

    /// Number of dice rolled together.
    pub fn num_dice(&self) -> u32 {
        self.params.num_dice
    }

    /// Faces per die.
    pub fn faces(&self) -> u32 {
        self.params.faces
    }

    /// Maximum number of rolls in a session.
    pub fn max_rolls(&self) -> u32 {
        self.params.max_rolls
    }

    /// Amount staked per session.
    pub fn stake(&self) -> i64 {
        self.params.stake
    }

    /// Half-width of the no-win band.
    pub fn no_win_half_width(&self) -> f64 {
        self.params.no_win_half_width
    }

    /// Threshold for a step in `1..=5`.
    pub fn threshold(&self, step: rules::Step) -> Option<u32> {
        step_index(step).map(|i| self.params.thresholds[i])
    }

    /// All five thresholds in step order.
    pub fn thresholds(&self) -> &[u32; STEP_COUNT] {
        &self.params.thresholds
    }

    /// All five payouts in step order.
    pub fn payouts(&self) -> &[i64; STEP_COUNT] {
        &self.params.payouts
    }

    /// Render the flat parameter format, keys sorted, followed by the derived
    /// `noScoreWindow` line.
    pub fn to_flat_string(&self) -> String {
        let mut lines: Vec<(String, String)> = Param::ALL
            .iter()
            .map(|p| (p.key(), p.render(&self.params)))
            .collect();
        lines.sort();
        let band = rules::fail_band(self);
        let mut out = String::new();
        for (key, value) in lines {
            out.push_str(&format!("{key}={value}\n"));
        }
        out.push_str(&format!(
            "{NO_SCORE_WINDOW_KEY}=[{},{}]\n",
            band.min, band.max
        ));
        out
    }
}

fn step_index(step: rules::Step) -> Option<usize> {
    usize::from(step)
        .checked_sub(1)
        .filter(|&i| i < STEP_COUNT)
}

/// A single named game parameter, as it appears in the flat format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Param {
    /// `numOfDiceP`
    NumDice,
    /// `numFacesP`
    Faces,
    /// `maxRolls`
    MaxRolls,
    /// `payIn`
    Stake,
    /// `noWinRangeP`
    NoWinHalfWidth,
    /// `yardsPerStep{n}P`, zero-based index.
    Threshold(usize),
    /// `payoutPerStep{n}P`, zero-based index.
    Payout(usize),
}

impl Param {
    /// Every parameter.
    pub const ALL: [Param; 15] = [
        Param::NumDice,
        Param::Faces,
        Param::MaxRolls,
        Param::Stake,
        Param::NoWinHalfWidth,
        Param::Threshold(0),
        Param::Threshold(1),
        Param::Threshold(2),
        Param::Threshold(3),
        Param::Threshold(4),
        Param::Payout(0),
        Param::Payout(1),
        Param::Payout(2),
        Param::Payout(3),
        Param::Payout(4),
    ];

    /// The key used in the flat format.
    pub fn key(self) -> String {
        match self {
            Self::NumDice => "numOfDiceP".to_string(),
            Self::Faces => "numFacesP".to_string(),
            Self::MaxRolls => "maxRolls".to_string(),
            Self::Stake => "payIn".to_string(),
            Self::NoWinHalfWidth => "noWinRangeP".to_string(),
            Self::Threshold(i) => format!("yardsPerStep{}P", i + 1),
            Self::Payout(i) => format!("payoutPerStep{}P", i + 1),
        }
    }

    /// Look a parameter up by its flat-format key.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.key() == key)
    }

    /// Current value as a float (every parameter is numeric).
    pub fn value(self, params: &GameParams) -> f64 {
        match self {
            Self::NumDice => f64::from(params.num_dice),
            Self::Faces => f64::from(params.faces),
            Self::MaxRolls => f64::from(params.max_rolls),
            Self::Stake => params.stake as f64,
            Self::NoWinHalfWidth => params.no_win_half_width,
            Self::Threshold(i) => f64::from(params.thresholds[i]),
            Self::Payout(i) => params.payouts[i] as f64,
        }
    }

    /// Shift the parameter by `delta` units. Unsigned fields saturate at zero.
    pub fn adjust(self, params: &mut GameParams, delta: i64) {
        fn shift(v: u32, delta: i64) -> u32 {
            (i64::from(v) + delta).clamp(0, i64::from(u32::MAX)) as u32
        }
        match self {
            Self::NumDice => params.num_dice = shift(params.num_dice, delta),
            Self::Faces => params.faces = shift(params.faces, delta),
            Self::MaxRolls => params.max_rolls = shift(params.max_rolls, delta),
            Self::Stake => params.stake += delta,
            Self::NoWinHalfWidth => params.no_win_half_width += delta as f64,
            Self::Threshold(i) => params.thresholds[i] = shift(params.thresholds[i], delta),
            Self::Payout(i) => params.payouts[i] += delta,
        }
    }

    /// Parse `raw` and store it.
    pub fn assign(self, params: &mut GameParams, raw: &str) -> Result<(), String> {
        fn parse<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, String> {
            raw.parse()
                .map_err(|_| format!("invalid value for {key}: '{raw}'"))
        }
        let key = self.key();
        match self {
            Self::NumDice => params.num_dice = parse(&key, raw)?,
            Self::Faces => params.faces = parse(&key, raw)?,
            Self::MaxRolls => params.max_rolls = parse(&key, raw)?,
            Self::Stake => params.stake = parse(&key, raw)?,
            Self::NoWinHalfWidth => params.no_win_half_width = parse(&key, raw)?,
            Self::Threshold(i) => params.thresholds[i] = parse(&key, raw)?,
            Self::Payout(i) => params.payouts[i] = parse(&key, raw)?,
        }
        Ok(())
    }

    /// Render the current value for the flat format.
    pub fn render(self, params: &GameParams) -> String {
        match self {
            Self::NoWinHalfWidth => params.no_win_half_width.to_string(),
            other => format!("{}", other.value(params) as i64),
        }
    }
}

impl std::fmt::Display for Param {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}
