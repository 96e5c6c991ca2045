// Domain models - Core types and data structures

use std::fmt;

/// Value attached to a single flag
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverrideValue {
    /// Flag given with no value (`-y`, `-an`)
    Absent,
    /// Flag given once with a value
    Single(String),
    /// Repeatable flag given several times, in order of appearance
    Many(Vec<String>),
}

impl OverrideValue {
    /// Most recent value, if any
    pub fn last(&self) -> Option<&str> {
        match self {
            OverrideValue::Absent => None,
            OverrideValue::Single(value) => Some(value.as_str()),
            OverrideValue::Many(values) => values.last().map(String::as_str),
        }
    }

    /// All values in order
    pub fn values(&self) -> Vec<&str> {
        match self {
            OverrideValue::Absent => Vec::new(),
            OverrideValue::Single(value) => vec![value.as_str()],
            OverrideValue::Many(values) => values.iter().map(String::as_str).collect(),
        }
    }

    /// Append another value, promoting to `Many` when needed
    pub fn push(&mut self, value: String) {
        *self = match std::mem::replace(self, OverrideValue::Absent) {
            OverrideValue::Absent => OverrideValue::Single(value),
            OverrideValue::Single(first) => OverrideValue::Many(vec![first, value]),
            OverrideValue::Many(mut values) => {
                values.push(value);
                OverrideValue::Many(values)
            }
        };
    }

    fn from_values(mut values: Vec<String>) -> Self {
        match values.len() {
            0 => OverrideValue::Absent,
            1 => OverrideValue::Single(values.remove(0)),
            _ => OverrideValue::Many(values),
        }
    }
}

/// Insertion-ordered table of encoder flags
///
/// Used both for the user's override table and for the parameter set of a
/// single encoder pass. Replacing a key keeps its original position, so a
/// merged table serializes baseline-first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagTable {
    entries: Vec<(String, OverrideValue)>,
}

/// User-supplied overrides, parsed once and cloned per input file
pub type OverrideTable = FlagTable;

impl FlagTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a flag, replacing any existing value in place
    pub fn insert(&mut self, flag: impl Into<String>, value: OverrideValue) {
        let flag = flag.into();
        match self.position(&flag) {
            Some(index) => self.entries[index].1 = value,
            None => self.entries.push((flag, value)),
        }
    }

    /// Set a flag to a single value
    pub fn set(&mut self, flag: impl Into<String>, value: impl Into<String>) {
        self.insert(flag, OverrideValue::Single(value.into()));
    }

    /// Set a presence-only flag
    pub fn set_flag(&mut self, flag: impl Into<String>) {
        self.insert(flag, OverrideValue::Absent);
    }

    /// Accumulate a value for a repeatable flag
    pub fn push_value(&mut self, flag: impl Into<String>, value: impl Into<String>) {
        let flag = flag.into();
        match self.position(&flag) {
            Some(index) => self.entries[index].1.push(value.into()),
            None => self.entries.push((flag, OverrideValue::Single(value.into()))),
        }
    }

    pub fn get(&self, flag: &str) -> Option<&OverrideValue> {
        self.position(flag).map(|index| &self.entries[index].1)
    }

    pub fn contains(&self, flag: &str) -> bool {
        self.position(flag).is_some()
    }

    /// Remove a flag, returning its value
    pub fn remove(&mut self, flag: &str) -> Option<OverrideValue> {
        self.position(flag).map(|index| self.entries.remove(index).1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OverrideValue)> {
        self.entries.iter().map(|(flag, value)| (flag.as_str(), value))
    }

    /// Lay `overrides` on top of this table
    ///
    /// Overrides replace existing values entirely, except for flags listed in
    /// `additive`, whose values are concatenated (existing first).
    pub fn merge_over(&mut self, overrides: &FlagTable, additive: &[&str]) {
        for (flag, value) in overrides.iter() {
            let existing = self.get(flag);
            if additive.contains(&flag) {
                if let Some(existing) = existing {
                    let mut values: Vec<String> =
                        existing.values().into_iter().map(str::to_string).collect();
                    values.extend(value.values().into_iter().map(str::to_string));
                    self.insert(flag, OverrideValue::from_values(values));
                    continue;
                }
            }
            self.insert(flag, value.clone());
        }
    }

    /// Serialize to argv tokens
    pub fn to_args(&self) -> Vec<String> {
        let mut args = Vec::with_capacity(self.entries.len() * 2);
        for (flag, value) in &self.entries {
            match value {
                OverrideValue::Absent => args.push(flag.clone()),
                OverrideValue::Single(v) => {
                    args.push(flag.clone());
                    args.push(v.clone());
                }
                OverrideValue::Many(values) => {
                    for v in values {
                        args.push(flag.clone());
                        args.push(v.clone());
                    }
                }
            }
        }
        args
    }

    fn position(&self, flag: &str) -> Option<usize> {
        self.entries.iter().position(|(key, _)| key == flag)
    }
}

/// Parsed command line: input files plus the override template
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Invocation {
    pub files: Vec<String>,
    pub overrides: OverrideTable,
}

impl Invocation {
    /// Whether help output was requested
    pub fn wants_help(&self) -> bool {
        self.overrides.contains("-h")
    }
}

/// First video stream of the input
#[derive(Debug, Clone, PartialEq)]
pub struct VideoStreamInfo {
    pub height: u32,
    /// `nb_frames`; missing for some containers
    pub frame_count: Option<u64>,
}

/// First audio stream of the input
#[derive(Debug, Clone, PartialEq)]
pub struct AudioStreamInfo {
    pub codec_name: String,
    pub bit_rate_bps: Option<f64>,
}

/// Normalized probe result
#[derive(Debug, Clone, PartialEq)]
pub struct MediaInfo {
    pub path: String,
    /// Container duration in seconds
    pub duration: f64,
    pub video: Option<VideoStreamInfo>,
    pub audio: Option<AudioStreamInfo>,
}

/// Non-fatal problem found while planning
#[derive(Debug, Clone, PartialEq)]
pub struct PlanWarning {
    pub flag: String,
    pub message: String,
}

impl fmt::Display for PlanWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.flag, self.message)
    }
}

/// Concrete encode parameters for one input file
#[derive(Debug, Clone, PartialEq)]
pub struct EncodePlan {
    /// Target output size in kilobits
    pub target_size_kbits: f64,
    /// Effective (trimmed) duration in seconds
    pub duration: f64,
    pub video_bitrate_kbps: u32,
    pub audio_bitrate_kbps: f64,
    pub reencode_audio: bool,
    pub has_audio: bool,
    pub limit_resolution: bool,
    pub target_height: u32,
    pub limit_fps: bool,
    pub warnings: Vec<PlanWarning>,
}

/// Which of the two encoder passes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassNumber {
    /// Analysis pass, output discarded
    First,
    /// Final pass producing the output file
    Second,
}

impl PassNumber {
    pub fn as_u8(self) -> u8 {
        match self {
            PassNumber::First => 1,
            PassNumber::Second => 2,
        }
    }
}

impl fmt::Display for PassNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

/// Ready-to-run parameter set for one encoder pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassSpec {
    pub pass: PassNumber,
    pub flags: FlagTable,
    /// Positional output target (null device for pass 1)
    pub output: String,
}

impl PassSpec {
    /// Encoder argv, without the program name
    pub fn to_args(&self) -> Vec<String> {
        let mut args = self.flags.to_args();
        args.push(self.output.clone());
        args
    }
}

impl fmt::Display for PassSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_args().join(" "))
    }
}
