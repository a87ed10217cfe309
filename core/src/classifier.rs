//! Misconception classification.
//!
//! Each experiment family is a [`RuleSet`]: a tag, optional aliases, and an
//! ordered list of rules. Terminal-flag rules are consulted before proximity
//! rules, and proximity rules only run when the snapshot carries no failure
//! flag at all. Adding a family is a [`Classifier::register`] call.

use mentor_types::{ExperimentFamily, MisconceptionCode, SimulationSnapshot, Thresholds};
use std::borrow::Cow;

/// A numeric quantity read from a snapshot.
#[derive(Debug, Clone, PartialEq)]
pub enum Measure {
    Field(Cow<'static, str>),
    /// Absolute value of the inner measure.
    Magnitude(Box<Measure>),
    /// `numerator / denominator`; absent when the denominator is zero.
    Ratio(Box<Measure>, Box<Measure>),
    /// First inner measure that yields a value.
    FirstOf(Vec<Measure>),
}

impl Measure {
    #[must_use]
    pub const fn field(name: &'static str) -> Self {
        Self::Field(Cow::Borrowed(name))
    }

    #[must_use]
    pub fn magnitude(self) -> Self {
        Self::Magnitude(Box::new(self))
    }

    #[must_use]
    pub fn ratio(numerator: Self, denominator: Self) -> Self {
        Self::Ratio(Box::new(numerator), Box::new(denominator))
    }

    /// Circuit current: the `current` field, else `voltage / resistance`.
    #[must_use]
    pub fn circuit_current() -> Self {
        Self::FirstOf(vec![
            Self::field("current"),
            Self::ratio(Self::field("voltage"), Self::field("resistance")),
        ])
        .magnitude()
    }

    #[must_use]
    pub fn read(&self, snapshot: &SimulationSnapshot) -> Option<f64> {
        match self {
            Self::Field(name) => snapshot.number(name),
            Self::Magnitude(inner) => inner.read(snapshot).map(f64::abs),
            Self::Ratio(numerator, denominator) => {
                let denominator = denominator.read(snapshot)?;
                if denominator.abs() < f64::EPSILON {
                    return None;
                }
                let value = numerator.read(snapshot)? / denominator;
                value.is_finite().then_some(value)
            }
            Self::FirstOf(measures) => measures.iter().find_map(|m| m.read(snapshot)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Above,
    Below,
}

/// Strict comparison of a measure against a limit.
#[derive(Debug, Clone, PartialEq)]
pub struct Threshold {
    pub measure: Measure,
    pub comparison: Comparison,
    pub limit: f64,
}

impl Threshold {
    #[must_use]
    pub fn above(measure: Measure, limit: f64) -> Self {
        Self {
            measure,
            comparison: Comparison::Above,
            limit,
        }
    }

    #[must_use]
    pub fn below(measure: Measure, limit: f64) -> Self {
        Self {
            measure,
            comparison: Comparison::Below,
            limit,
        }
    }

    /// A missing or non-numeric measure never holds.
    #[must_use]
    pub fn holds(&self, snapshot: &SimulationSnapshot) -> bool {
        let Some(value) = self.measure.read(snapshot) else {
            return false;
        };
        match self.comparison {
            Comparison::Above => value > self.limit,
            Comparison::Below => value < self.limit,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    /// The simulation already reported one of `names` (case-insensitive).
    TerminalFlag {
        names: Vec<Cow<'static, str>>,
        code: MisconceptionCode,
    },
    /// Every threshold holds and no failure flag is set.
    Proximity {
        all: Vec<Threshold>,
        code: MisconceptionCode,
    },
}

impl Rule {
    #[must_use]
    pub fn flag(name: &'static str, code: MisconceptionCode) -> Self {
        Self::flags(&[name], code)
    }

    /// A terminal flag reported under any of several names.
    #[must_use]
    pub fn flags(names: &[&'static str], code: MisconceptionCode) -> Self {
        Self::TerminalFlag {
            names: names.iter().copied().map(Cow::Borrowed).collect(),
            code,
        }
    }

    #[must_use]
    pub fn proximity(all: Vec<Threshold>, code: MisconceptionCode) -> Self {
        Self::Proximity { all, code }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RuleSet {
    pub tag: Cow<'static, str>,
    pub aliases: Vec<String>,
    pub rules: Vec<Rule>,
}

impl RuleSet {
    #[must_use]
    pub fn new(tag: impl Into<Cow<'static, str>>, rules: Vec<Rule>) -> Self {
        Self {
            tag: tag.into(),
            aliases: Vec::new(),
            rules,
        }
    }

    #[must_use]
    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push_aliases(aliases);
        self
    }

    fn push_aliases<I, S>(&mut self, aliases: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases
            .extend(aliases.into_iter().map(|a| a.into().trim().to_ascii_lowercase()));
    }

    fn answers_to(&self, discriminator: &str) -> bool {
        self.tag.eq_ignore_ascii_case(discriminator)
            || self.aliases.iter().any(|alias| alias == discriminator)
    }

    /// Built-in rules for one of the shipped experiment families.
    #[must_use]
    pub fn builtin(family: ExperimentFamily, thresholds: &Thresholds) -> Self {
        let rules = match family {
            ExperimentFamily::Circuit => vec![
                Rule::flag("OVERLOAD", MisconceptionCode::OVERLOAD_TRIGGERED),
                Rule::proximity(
                    vec![Threshold::above(
                        Measure::circuit_current(),
                        thresholds.circuit.current_limit,
                    )],
                    MisconceptionCode::APPROACHING_OVERLOAD,
                ),
            ],
            ExperimentFamily::Titration => vec![
                Rule::flags(
                    &["OVERSHOOT", "PH_EXTREME"],
                    MisconceptionCode::ENDPOINT_MISSED,
                ),
                Rule::proximity(
                    vec![
                        Threshold::above(
                            Measure::FirstOf(vec![Measure::field("pH"), Measure::field("ph")]),
                            thresholds.titration.ph_limit,
                        ),
                        Threshold::below(
                            Measure::FirstOf(vec![
                                Measure::field("baseVolume"),
                                Measure::field("base_volume"),
                            ]),
                            thresholds.titration.volume_floor,
                        ),
                    ],
                    MisconceptionCode::ADDED_TOO_FAST,
                ),
            ],
            ExperimentFamily::Enzyme => vec![
                Rule::flags(
                    &["DENATURED", "ENZYME_DENATURATION"],
                    MisconceptionCode::DENATURATION_TRIGGERED,
                ),
                Rule::proximity(
                    vec![Threshold::above(
                        Measure::field("temperature"),
                        thresholds.enzyme.temperature_limit,
                    )],
                    MisconceptionCode::APPROACHING_DENATURATION,
                ),
            ],
        };
        Self::new(family.tag(), rules)
    }

    #[must_use]
    pub fn classify(&self, snapshot: &SimulationSnapshot) -> Option<MisconceptionCode> {
        if let Some(flag) = snapshot.failure_flag() {
            return self.rules.iter().find_map(|rule| match rule {
                Rule::TerminalFlag { names, code }
                    if names.iter().any(|n| n.eq_ignore_ascii_case(flag)) =>
                {
                    Some(code.clone())
                }
                _ => None,
            });
        }

        self.rules.iter().find_map(|rule| match rule {
            Rule::Proximity { all, code } if all.iter().all(|t| t.holds(snapshot)) => {
                Some(code.clone())
            }
            _ => None,
        })
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::from_thresholds(&Thresholds::default())
    }
}

/// Registry of rule sets keyed by experiment-family tag.
#[derive(Debug, Clone)]
pub struct Classifier {
    families: Vec<RuleSet>,
}

impl Classifier {
    /// A classifier with no families; every snapshot classifies as `None`.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            families: Vec::new(),
        }
    }

    #[must_use]
    pub fn from_thresholds(thresholds: &Thresholds) -> Self {
        let mut classifier = Self::empty();
        for family in ExperimentFamily::all() {
            classifier.register(RuleSet::builtin(*family, thresholds));
        }
        classifier
    }

    /// Add a family, replacing any existing rule set with the same tag.
    pub fn register(&mut self, rule_set: RuleSet) -> &mut Self {
        match self
            .families
            .iter_mut()
            .find(|existing| existing.tag.eq_ignore_ascii_case(&rule_set.tag))
        {
            Some(existing) => *existing = rule_set,
            None => self.families.push(rule_set),
        }
        self
    }

    /// Registers configured aliases per family tag. Returns the tags that
    /// matched no registered family.
    pub fn add_family_aliases<'a, I>(&mut self, families: I) -> Vec<&'a str>
    where
        I: IntoIterator<Item = (&'a String, &'a Vec<String>)>,
    {
        families
            .into_iter()
            .filter(|(tag, aliases)| !self.add_aliases(tag, aliases.iter()))
            .map(|(tag, _)| tag.as_str())
            .collect()
    }

    /// Extra discriminator values for `tag`. Returns `false` for unknown tags.
    pub fn add_aliases<I, S>(&mut self, tag: &str, aliases: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let Some(family) = self
            .families
            .iter_mut()
            .find(|family| family.tag.eq_ignore_ascii_case(tag))
        else {
            return false;
        };
        family.push_aliases(aliases);
        true
    }

    #[must_use]
    pub fn family_for(&self, discriminator: &str) -> Option<&RuleSet> {
        let discriminator = discriminator.trim().to_ascii_lowercase();
        self.families
            .iter()
            .find(|family| family.answers_to(&discriminator))
    }

    #[must_use]
    pub fn tags(&self) -> Vec<&str> {
        self.families.iter().map(|f| f.tag.as_ref()).collect()
    }

    #[must_use]
    pub fn classify(&self, snapshot: &SimulationSnapshot) -> Option<MisconceptionCode> {
        let discriminator = snapshot.discriminator()?;
        self.family_for(&discriminator)?.classify(snapshot)
    }
}
