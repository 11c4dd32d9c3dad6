use std::collections::{BTreeMap, BTreeSet};

use crate::bricks::{Brick, BrickArgs, Equation, analogue, digital, register};
use crate::foundation::error::{UndulateError, UndulateResult};

/// Builds the geometry of a symbol from its arguments.
pub type Constructor = fn(char, &BrickArgs) -> UndulateResult<Brick>;

/// Categories used by the filters to treat families of symbols alike.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tag {
    /// Duplicated rather than stretched by `.`.
    Clock,
    /// Bus values; consecutive equal values merge.
    Data,
    /// Extends or overlays the previous brick instead of taking a slot.
    Repeat,
    /// Width unaffected by slewing.
    Analogue,
    /// Register field.
    Register,
}

/// Per-slot parameter a symbol consumes from the wavelane description.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Param {
    /// Bus label.
    Data,
    /// Horizontal extent of a transition.
    Slewing,
    /// High fraction of a clock or impulse slot.
    DutyCycle,
    /// Slot length in bricks.
    Period,
    /// Analogue level or sample expression.
    Equation,
    /// Bit index of a register field.
    Position,
    /// Lines printed below a register field.
    Attribute,
    /// Fill of a register field.
    Style,
    /// Width of a register field in bricks.
    ScaleWidth,
}

impl Param {
    /// Every parameter, in declaration order.
    pub const ALL: [Param; 9] = [
        Param::Data,
        Param::Slewing,
        Param::DutyCycle,
        Param::Period,
        Param::Equation,
        Param::Position,
        Param::Attribute,
        Param::Style,
        Param::ScaleWidth,
    ];

    /// Singular key of the parameter in a wavelane description.
    pub fn key(self) -> &'static str {
        match self {
            Param::Data => "data",
            Param::Slewing => "slewing",
            Param::DutyCycle => "duty_cycle",
            Param::Period => "period",
            Param::Equation => "equation",
            Param::Position => "position",
            Param::Attribute => "attribute",
            Param::Style => "style",
            Param::ScaleWidth => "scale_width",
        }
    }

    /// Plural key holding one value per slot (`data` is its own plural).
    pub fn plural_key(self) -> &'static str {
        match self {
            Param::Data => "data",
            Param::Slewing => "slewings",
            Param::DutyCycle => "duty_cycles",
            Param::Period => "periods",
            Param::Equation => "equations",
            Param::Position => "positions",
            Param::Attribute => "attributes",
            Param::Style => "styles",
            Param::ScaleWidth => "scale_widths",
        }
    }

    /// Store `value` into the matching field of `args`.
    pub fn apply(self, value: &ParamValue, args: &mut BrickArgs) -> UndulateResult<()> {
        match self {
            Param::Data => args.digital.data = value.to_text(),
            Param::Slewing => args.slewing = value.to_number(self)?,
            Param::DutyCycle => args.digital.duty_cycle = value.to_number(self)?,
            Param::Period => args.period = value.to_number(self)?,
            Param::ScaleWidth => args.field.scale_width = value.to_number(self)?,
            Param::Position => args.field.position = value.to_number(self)?.trunc() as i64,
            Param::Style => args.field.style = value.to_text(),
            Param::Attribute => {
                args.field.attributes = match value {
                    ParamValue::Texts(items) => items.clone(),
                    ParamValue::Text(s) if s.is_empty() => Vec::new(),
                    other => vec![other.to_text()],
                }
            }
            Param::Equation => {
                args.analogue.equation = match value {
                    ParamValue::Equation(eq) => eq.clone(),
                    ParamValue::Number(v) => Equation::Level(*v),
                    ParamValue::Text(s) => Equation::Expr(s.clone()),
                    ParamValue::Texts(_) => {
                        return Err(UndulateError::validation(
                            "an equation cannot be a list of strings",
                        ));
                    }
                }
            }
        }
        Ok(())
    }
}

/// A value supplied for a [`Param`].
#[derive(Clone, Debug, PartialEq)]
pub enum ParamValue {
    /// Numeric value.
    Number(f64),
    /// Single label or expression source.
    Text(String),
    /// Several lines.
    Texts(Vec<String>),
    /// Analogue equation.
    Equation(Equation),
}

impl ParamValue {
    fn to_number(&self, param: Param) -> UndulateResult<f64> {
        match self {
            ParamValue::Number(v) => Ok(*v),
            ParamValue::Text(s) => s.trim().parse().map_err(|_| {
                UndulateError::validation(format!("{}: '{s}' is not a number", param.key()))
            }),
            ParamValue::Equation(Equation::Level(v)) => Ok(*v),
            other => Err(UndulateError::validation(format!(
                "{}: expected a number, got {other:?}",
                param.key()
            ))),
        }
    }

    fn to_text(&self) -> String {
        match self {
            ParamValue::Number(v) => format_number(*v),
            ParamValue::Text(s) => s.clone(),
            ParamValue::Texts(items) => items.join(" "),
            ParamValue::Equation(Equation::Level(v)) => format_number(*v),
            ParamValue::Equation(Equation::Expr(s)) => s.clone(),
            ParamValue::Equation(Equation::Points(_)) => String::new(),
        }
    }
}

// integers print without a fractional part
fn format_number(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{v}")
    }
}

/// Registration record of a symbol.
#[derive(Clone, Debug)]
pub struct SymbolSpec {
    /// Builds the brick of the symbol.
    pub constructor: Constructor,
    /// Families the symbol belongs to.
    pub tags: Vec<Tag>,
    /// Parameters consumed per slot, with their defaults.
    pub params: Vec<(Param, ParamValue)>,
}

impl SymbolSpec {
    /// Spec with no tags and no parameters.
    pub fn new(constructor: Constructor) -> Self {
        Self {
            constructor,
            tags: Vec::new(),
            params: Vec::new(),
        }
    }

    /// Add tags.
    pub fn tags(mut self, tags: &[Tag]) -> Self {
        self.tags.extend_from_slice(tags);
        self
    }

    /// Declare a parameter with its default.
    pub fn param(mut self, param: Param, default: ParamValue) -> Self {
        self.params.push((param, default));
        self
    }
}

/// Registry mapping one-character symbols to their constructors.
#[derive(Clone, Debug, Default)]
pub struct BrickFactory {
    symbols: BTreeMap<char, SymbolSpec>,
}

impl BrickFactory {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the digital, analogue and register families.
    pub fn standard() -> Self {
        let mut factory = Self::new();
        digital::register_symbols(&mut factory);
        analogue::register_symbols(&mut factory);
        register::register_symbols(&mut factory);
        factory
    }

    /// Register or replace `symbol`.
    pub fn register(&mut self, symbol: char, spec: SymbolSpec) {
        self.symbols.insert(symbol, spec);
    }

    /// Registration record of `symbol`.
    pub fn spec(&self, symbol: char) -> Option<&SymbolSpec> {
        self.symbols.get(&symbol)
    }

    /// Whether `symbol` is registered.
    pub fn contains(&self, symbol: char) -> bool {
        self.symbols.contains_key(&symbol)
    }

    /// Whether `symbol` carries `tag`. Unknown symbols carry none.
    pub fn has_tag(&self, symbol: char, tag: Tag) -> bool {
        self.spec(symbol).is_some_and(|s| s.tags.contains(&tag))
    }

    /// Parameters declared by `symbol`.
    pub fn params(&self, symbol: char) -> &[(Param, ParamValue)] {
        self.spec(symbol).map_or(&[], |s| s.params.as_slice())
    }

    /// Union of the parameters of every registered symbol; the first
    /// registration of a parameter provides its default.
    pub fn get_parameters(&self) -> BTreeMap<Param, ParamValue> {
        let mut out = BTreeMap::new();
        for spec in self.symbols.values() {
            for (param, default) in &spec.params {
                out.entry(*param).or_insert_with(|| default.clone());
            }
        }
        out
    }

    /// Registered symbols.
    pub fn symbols(&self) -> BTreeSet<char> {
        self.symbols.keys().copied().collect()
    }

    /// Build the brick of `symbol`.
    pub fn create(&self, symbol: char, args: &BrickArgs) -> UndulateResult<Brick> {
        let spec = self.spec(symbol).ok_or_else(|| UndulateError::UnknownSymbol {
            signal: String::new(),
            symbol,
            position: 0,
        })?;
        (spec.constructor)(symbol, args)
    }

    /// Rebuild `brick` from its own, possibly modified, arguments.
    pub fn regenerate(&self, brick: &Brick) -> UndulateResult<Brick> {
        self.create(brick.symbol, &brick.args)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/bricks/factory.rs"]
mod tests;
