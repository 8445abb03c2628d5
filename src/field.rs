//! The field registry: one typed descriptor per searchable property.
//!
//! A descriptor is either *literal* (read straight off a record attribute) or
//! *derived* (mined out of a text attribute by an [`Extraction`]). Operator
//! legality and value coercion are decided by the descriptor's
//! [`OperatorClass`]; the optional [`Domain`] bounds which literals a query may
//! name. Aliases are resolved case-insensitively and must be unique across the
//! whole registry, which [`FieldRegistry::new`] enforces.

use std::collections::HashMap;
use std::fmt;

use regex::Regex;
use serde::Serialize;

use crate::error::{Result, SpellfallError};
use crate::record::OtherHasher;
use crate::units::{self, Dimension};

// ------------- Operators -------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OperatorClass {
    Numeric,
    Text,
    Boolean,
}

impl OperatorClass {
    pub fn permits(&self, operator: Operator) -> bool {
        match self {
            Self::Numeric => true,
            Self::Text | Self::Boolean => matches!(operator, Operator::Eq | Operator::NotEq),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,
    NotEq,
    GtEq,
    Gt,
    LtEq,
    Lt,
}

impl Operator {
    // two-character tokens precede their one-character prefixes
    pub const ALL: [Operator; 6] = [
        Operator::NotEq,
        Operator::GtEq,
        Operator::LtEq,
        Operator::Gt,
        Operator::Lt,
        Operator::Eq,
    ];
    pub fn token(&self) -> &'static str {
        match self {
            Self::Eq => ":",
            Self::NotEq => "!=",
            Self::GtEq => ">=",
            Self::Gt => ">",
            Self::LtEq => "<=",
            Self::Lt => "<",
        }
    }
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|operator| operator.token() == token)
    }
}
impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

// ------------- Domains -------------
#[derive(Debug, Clone)]
pub enum Domain {
    Unbounded,
    Range { min: i64, max: i64 },
    Set(&'static [&'static str]),
}

impl Domain {
    pub fn admits_number(&self, number: f64) -> bool {
        match self {
            Self::Unbounded => true,
            Self::Range { min, max } => {
                number.fract() == 0.0 && number >= *min as f64 && number <= *max as f64
            }
            Self::Set(_) => false,
        }
    }
    pub fn admits_text(&self, text: &str) -> bool {
        match self {
            Self::Unbounded => true,
            Self::Set(values) => values.contains(&text),
            Self::Range { .. } => false,
        }
    }
    pub fn describe(&self) -> String {
        match self {
            Self::Unbounded => String::from("any value"),
            Self::Range { min, max } => format!("a whole number from {min} to {max}"),
            Self::Set(values) => format!("one of {}", values.join(", ")),
        }
    }
    pub fn literals(&self) -> Option<Vec<String>> {
        match self {
            Self::Unbounded => None,
            Self::Range { min, max } => Some((*min..=*max).map(|n| n.to_string()).collect()),
            Self::Set(values) => Some(values.iter().map(|v| v.to_string()).collect()),
        }
    }
}

pub const CONDITIONS: &[&str] = &[
    "blinded", "charmed", "deafened", "exhaustion", "frightened", "grappled", "incapacitated",
    "invisible", "paralyzed", "petrified", "poisoned", "prone", "restrained", "stunned",
    "unconscious",
];
pub const DAMAGE_TYPES: &[&str] = &[
    "acid", "bludgeoning", "cold", "fire", "force", "lightning", "necrotic", "piercing", "poison",
    "psychic", "radiant", "slashing", "thunder",
];
pub const ABILITIES: &[&str] = &[
    "strength", "dexterity", "constitution", "intelligence", "wisdom", "charisma",
];
pub const CLASSES: &[&str] = &[
    "bard", "cleric", "druid", "paladin", "ranger", "sorcerer", "warlock", "wizard",
];
pub const SCHOOLS: &[&str] = &[
    "abjuration", "conjuration", "divination", "enchantment", "evocation", "illusion",
    "necromancy", "transmutation",
];
pub const SHAPES: &[&str] = &["cone", "cube", "cylinder", "line", "sphere"];
pub const COMPONENTS: &[&str] = &["v", "s", "m"];

// ------------- Extraction -------------
/// Record attributes a field can read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    Name,
    Level,
    Concentration,
    Ritual,
    HigherLevel,
    School,
    Range,
    Components,
    Material,
    Duration,
    CastingTime,
    Classes,
    Description,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    DiceAverage,
    DiceMaximum,
    Length,
    Time,
    AreaSize,
    AreaShape,
    GoldCost,
}

#[derive(Debug)]
pub enum Extraction {
    /// Every candidate whose templates match the source text becomes a tag.
    SetMembership { candidates: Vec<(&'static str, Vec<Regex>)> },
    /// The first pattern that matches is captured and transformed into one tag.
    SingleShot { patterns: Vec<Regex>, transform: Transform },
}

fn case_insensitive(pattern: &str) -> Result<Regex> {
    Ok(Regex::new(&format!("(?i){pattern}"))?)
}

impl Extraction {
    /// Instantiates each `{value}` template once per candidate value.
    pub fn set_membership(values: &'static [&'static str], templates: &[&str]) -> Result<Self> {
        let mut candidates = Vec::with_capacity(values.len());
        for value in values {
            let escaped = regex::escape(value);
            let regexes = templates
                .iter()
                .map(|template| case_insensitive(&template.replace("{value}", &escaped)))
                .collect::<Result<Vec<_>>>()?;
            candidates.push((*value, regexes));
        }
        Ok(Self::SetMembership { candidates })
    }
    pub fn single_shot(patterns: &[String], transform: Transform) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|pattern| case_insensitive(pattern))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::SingleShot { patterns, transform })
    }
}

// ------------- FieldDescriptor -------------
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Matching {
    Exact,
    /// Text buckets match when their key contains the queried literal.
    Contains,
}

#[derive(Debug)]
pub enum FieldKind {
    Literal(Attribute),
    Derived { source: Attribute, extraction: Extraction },
}

#[derive(Debug)]
pub struct FieldDescriptor {
    name: &'static str,
    aliases: Vec<&'static str>,
    class: OperatorClass,
    domain: Domain,
    dimension: Option<Dimension>,
    matching: Matching,
    kind: FieldKind,
}

impl FieldDescriptor {
    pub fn literal(
        name: &'static str,
        aliases: &[&'static str],
        class: OperatorClass,
        attribute: Attribute,
    ) -> Self {
        Self::new(name, aliases, class, FieldKind::Literal(attribute))
    }
    pub fn derived(
        name: &'static str,
        aliases: &[&'static str],
        class: OperatorClass,
        source: Attribute,
        extraction: Extraction,
    ) -> Self {
        Self::new(name, aliases, class, FieldKind::Derived { source, extraction })
    }
    fn new(name: &'static str, aliases: &[&'static str], class: OperatorClass, kind: FieldKind) -> Self {
        let mut all = vec![name];
        all.extend(aliases.iter().copied().filter(|alias| *alias != name));
        Self {
            name,
            aliases: all,
            class,
            domain: Domain::Unbounded,
            dimension: None,
            matching: Matching::Exact,
            kind,
        }
    }
    pub fn with_domain(mut self, domain: Domain) -> Self {
        self.domain = domain;
        self
    }
    pub fn with_dimension(mut self, dimension: Dimension) -> Self {
        self.dimension = Some(dimension);
        self
    }
    pub fn with_matching(mut self, matching: Matching) -> Self {
        self.matching = matching;
        self
    }
    pub fn name(&self) -> &'static str {
        self.name
    }
    pub fn aliases(&self) -> &[&'static str] {
        &self.aliases
    }
    pub fn class(&self) -> OperatorClass {
        self.class
    }
    pub fn domain(&self) -> &Domain {
        &self.domain
    }
    pub fn dimension(&self) -> Option<Dimension> {
        self.dimension
    }
    pub fn matching(&self) -> Matching {
        self.matching
    }
    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }
    pub fn is_derived(&self) -> bool {
        matches!(self.kind, FieldKind::Derived { .. })
    }
    pub fn summary(&self) -> FieldSummary {
        FieldSummary {
            name: self.name.to_string(),
            aliases: self.aliases.iter().map(|alias| alias.to_string()).collect(),
            operator_class: self.class,
            domain: self.domain.literals(),
        }
    }
}

/// What a presentation layer needs to render syntax help for one field.
#[derive(Debug, Clone, Serialize)]
pub struct FieldSummary {
    pub name: String,
    pub aliases: Vec<String>,
    pub operator_class: OperatorClass,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<Vec<String>>,
}

// ------------- FieldRegistry -------------
#[derive(Debug)]
pub struct FieldRegistry {
    fields: Vec<FieldDescriptor>,
    by_alias: HashMap<String, usize, OtherHasher>,
}

impl FieldRegistry {
    pub fn new(fields: Vec<FieldDescriptor>) -> Result<Self> {
        let mut by_alias = HashMap::<String, usize, OtherHasher>::default();
        for (position, field) in fields.iter().enumerate() {
            for alias in field.aliases() {
                let alias = alias.to_lowercase();
                if let Some(previous) = by_alias.insert(alias.clone(), position) {
                    return Err(SpellfallError::Config(format!(
                        "alias '{alias}' is claimed by both '{}' and '{}'",
                        fields[previous].name(),
                        field.name()
                    )));
                }
            }
        }
        Ok(Self { fields, by_alias })
    }
    /// The registry of every spell field this crate knows how to search.
    pub fn standard() -> Result<Self> {
        Self::new(standard_fields()?)
    }
    pub fn resolve(&self, alias: &str) -> Option<&FieldDescriptor> {
        self.by_alias
            .get(&alias.to_lowercase())
            .map(|position| &self.fields[*position])
    }
    pub fn get(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.name() == name)
    }
    pub fn iter(&self) -> std::slice::Iter<'_, FieldDescriptor> {
        self.fields.iter()
    }
    pub fn len(&self) -> usize {
        self.fields.len()
    }
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
    pub fn summaries(&self) -> Vec<FieldSummary> {
        self.fields.iter().map(FieldDescriptor::summary).collect()
    }
}

fn area_of_effect_patterns() -> Vec<String> {
    let length = units::alternation(&[units::LENGTH_UNITS]);
    let modifier = units::alternation(&[units::AREA_MODIFIERS]);
    let shapes = SHAPES.join("|");
    vec![
        // 10-foot-radius, 40-foot-high cylinder
        format!(r"\b(?P<number>[0-9]+)\s*-?\s*(?P<unit>{length})\b\s*-?\s*(?P<modifier>{modifier})\b[^.]*?\b(?P<shape>cylinder)\b"),
        // cylinder that is 10 feet in radius
        format!(r"\b(?P<shape>cylinder)\b[^.]*?\b(?P<number>[0-9]+)\s*-?\s*(?P<unit>{length})\b[^.]*?\b(?P<modifier>{modifier})\b"),
        // 20-foot-radius sphere, 60-foot cone, 15-foot cube
        format!(r"\b(?P<number>[0-9]+)\s*-?\s*(?P<unit>{length})\b\s*-?\s*(?:(?P<modifier>{modifier})\s*-?\s*)?(?P<shape>{shapes})\b"),
        // 30-foot-long line
        format!(r"\b(?P<number>[0-9]+)\s*-?\s*(?P<unit>{length})\b\s*-?\s*\w+\s+(?P<shape>line)\b"),
        // line 100 feet long
        format!(r"\b(?P<shape>line)\s+[^.]*?\b(?P<number>[0-9]+)\s*-?\s*(?P<unit>{length})\b"),
        // wall up to 60 feet long
        format!(r"\b(?P<shape>wall)\b[^.]*?\b(?P<number>[0-9]+)\s*-?\s*(?P<unit>{length})\s+long\b"),
    ]
}

fn length_patterns() -> Vec<String> {
    let textual = units::alternation(&[units::TEXTUAL_LENGTHS]);
    let length = units::alternation(&[units::LENGTH_UNITS]);
    vec![
        format!(r"^\s*(?P<textual>{textual})\b"),
        format!(r"\b(?P<number>[0-9]+)\s*-?\s*(?P<unit>{length})\b"),
    ]
}

fn time_patterns() -> Vec<String> {
    let textual = units::alternation(&[units::TEXTUAL_TIMES]);
    let time = units::alternation(&[units::TIME_UNITS]);
    vec![
        format!(r"\b(?P<textual>{textual})\b"),
        format!(r"\b(?P<number>[0-9]+)\s*(?P<unit>{time})\b"),
    ]
}

fn standard_fields() -> Result<Vec<FieldDescriptor>> {
    use Attribute as A;
    use OperatorClass::{Boolean, Numeric, Text};

    let dice = vec![String::from(
        r"\b(?P<dice>[0-9]+\s?d\s?[0-9]+(?:\s*\+\s*[0-9]+)?)\s+\w+\s+damage\b",
    )];
    let gold = vec![String::from(r"\b(?P<amount>[0-9]{1,3}(?:,[0-9]{3})+|[0-9]+)\s?gp\b")];

    Ok(vec![
        FieldDescriptor::literal("name", &["n"], Text, A::Name).with_matching(Matching::Contains),
        FieldDescriptor::literal("level", &["l"], Numeric, A::Level)
            .with_domain(Domain::Range { min: 0, max: 9 }),
        FieldDescriptor::derived(
            "school",
            &["sch"],
            Text,
            A::School,
            Extraction::set_membership(SCHOOLS, &[r"\b{value}\b"])?,
        )
        .with_domain(Domain::Set(SCHOOLS)),
        FieldDescriptor::derived(
            "class",
            &["cls"],
            Text,
            A::Classes,
            Extraction::set_membership(CLASSES, &[r"\b{value}\b"])?,
        )
        .with_domain(Domain::Set(CLASSES)),
        FieldDescriptor::literal("components", &["comp"], Text, A::Components)
            .with_domain(Domain::Set(COMPONENTS)),
        FieldDescriptor::literal("concentration", &["conc"], Boolean, A::Concentration),
        FieldDescriptor::literal("ritual", &["r"], Boolean, A::Ritual),
        FieldDescriptor::literal("higher_level", &["hl", "upcast"], Boolean, A::HigherLevel),
        FieldDescriptor::derived(
            "condition",
            &["cond"],
            Text,
            A::Description,
            Extraction::set_membership(CONDITIONS, &[r"\b{value}\b"])?,
        )
        .with_domain(Domain::Set(CONDITIONS)),
        FieldDescriptor::derived(
            "damage_type",
            &["dt"],
            Text,
            A::Description,
            Extraction::set_membership(
                DAMAGE_TYPES,
                &[
                    r"\b[0-9]+\s?d\s?[0-9]+\s?(?:\+\s?[0-9]+)?\s?{value} damage\b",
                    r"\btakes? {value} damage\b",
                ],
            )?,
        )
        .with_domain(Domain::Set(DAMAGE_TYPES)),
        FieldDescriptor::derived(
            "damage_amount",
            &["da"],
            Numeric,
            A::Description,
            Extraction::single_shot(&dice, Transform::DiceAverage)?,
        ),
        FieldDescriptor::derived(
            "damage_max",
            &["dmax"],
            Numeric,
            A::Description,
            Extraction::single_shot(&dice, Transform::DiceMaximum)?,
        ),
        FieldDescriptor::derived(
            "saving_throw",
            &["st"],
            Text,
            A::Description,
            Extraction::set_membership(
                ABILITIES,
                &[
                    // "makes all Wisdom saving throws with advantage" is not a saving throw
                    r"\b(?:makes?|succeeds? on|fails?)\s+(?:{value}|(?:[^a\s]|a[^l]|al[^l]|all\S)[^.]*?\b{value}) saving throws?\b",
                    r"\bsaving throws? of {value}\b",
                ],
            )?,
        )
        .with_domain(Domain::Set(ABILITIES)),
        FieldDescriptor::derived(
            "range",
            &["rg"],
            Numeric,
            A::Range,
            Extraction::single_shot(&length_patterns(), Transform::Length)?,
        )
        .with_dimension(Dimension::Length),
        FieldDescriptor::derived(
            "duration",
            &["dur"],
            Numeric,
            A::Duration,
            Extraction::single_shot(&time_patterns(), Transform::Time)?,
        )
        .with_dimension(Dimension::Time),
        FieldDescriptor::derived(
            "casting_time",
            &["ct"],
            Numeric,
            A::CastingTime,
            Extraction::single_shot(&time_patterns(), Transform::Time)?,
        )
        .with_dimension(Dimension::Time),
        FieldDescriptor::derived(
            "aoe_size",
            &["aoe_sz"],
            Numeric,
            A::Description,
            Extraction::single_shot(&area_of_effect_patterns(), Transform::AreaSize)?,
        )
        .with_dimension(Dimension::Length),
        FieldDescriptor::derived(
            "aoe_shape",
            &["aoe_sh"],
            Text,
            A::Description,
            Extraction::single_shot(&area_of_effect_patterns(), Transform::AreaShape)?,
        )
        .with_domain(Domain::Set(SHAPES)),
        FieldDescriptor::derived(
            "gp_cost",
            &["material", "gp"],
            Numeric,
            A::Material,
            Extraction::single_shot(&gold, Transform::GoldCost)?,
        ),
    ])
}
