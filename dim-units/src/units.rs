//! Unit definitions - SI base, coherent derived and common non-SI units
//!
//! Metric prefixes are not stored per unit: `resolve` composes them at lookup
//! time (`km` = `k` x `m`) for units registered as prefixable.

use std::collections::HashMap;
use std::f64::consts::PI;
use std::sync::LazyLock;
use dim_core::Dimension;
use crate::Unit;

/// Global unit registry, built once on first use
pub static UNITS: LazyLock<UnitRegistry> = LazyLock::new(UnitRegistry::new);

/// Metric prefixes: (symbol, name, factor). Two-letter `da` comes before `d`.
pub const PREFIXES: [(&str, &str, f64); 24] = [
    ("Q", "quetta", 1e30),
    ("R", "ronna", 1e27),
    ("Y", "yotta", 1e24),
    ("Z", "zetta", 1e21),
    ("E", "exa", 1e18),
    ("P", "peta", 1e15),
    ("T", "tera", 1e12),
    ("G", "giga", 1e9),
    ("M", "mega", 1e6),
    ("k", "kilo", 1e3),
    ("h", "hecto", 1e2),
    ("da", "deca", 1e1),
    ("d", "deci", 1e-1),
    ("c", "centi", 1e-2),
    ("m", "milli", 1e-3),
    ("u", "micro", 1e-6),
    ("n", "nano", 1e-9),
    ("p", "pico", 1e-12),
    ("f", "femto", 1e-15),
    ("a", "atto", 1e-18),
    ("z", "zepto", 1e-21),
    ("y", "yocto", 1e-24),
    ("r", "ronto", 1e-27),
    ("q", "quecto", 1e-30),
];

/// Registry of all known units
pub struct UnitRegistry {
    units: HashMap<String, Unit>,
    /// Preferred symbol for a dimension when formatting results
    display: HashMap<Dimension, String>,
}

impl UnitRegistry {
    pub fn new() -> Self {
        let mut registry = UnitRegistry {
            units: HashMap::new(),
            display: HashMap::new(),
        };
        registry.register_all_units();
        registry
    }

    /// Get a unit by its exact symbol
    pub fn get(&self, symbol: &str) -> Option<&Unit> {
        self.units.get(symbol)
    }

    /// Resolve a symbol, composing a metric prefix when needed.
    ///
    /// An exact symbol always wins over a prefixed reading (`Pa` is pascal,
    /// `min` is minute). Unknown symbols are `None`: the caller decides what
    /// an unresolved identifier means.
    pub fn resolve(&self, symbol: &str) -> Option<Unit> {
        if let Some(unit) = self.units.get(symbol) {
            return Some(unit.clone());
        }

        PREFIXES.iter().find_map(|(prefix, name, factor)| {
            let rest = symbol.strip_prefix(prefix)?;
            let base = self.units.get(rest).filter(|u| u.prefixable)?;
            Some(Unit {
                symbol: symbol.to_string(),
                name: format!("{}{}", name, base.name),
                dimension: base.dimension,
                scale: factor * base.scale,
                prefixable: false,
            })
        })
    }

    /// Check whether a symbol names a unit (with or without prefix)
    pub fn is_unit(&self, symbol: &str) -> bool {
        self.resolve(symbol).is_some()
    }

    /// Preferred display symbol for a dimension, if one is registered
    pub fn display_symbol(&self, dimension: &Dimension) -> Option<&str> {
        self.display.get(dimension).map(String::as_str)
    }

    /// All registered units (prefix compositions excluded)
    pub fn iter(&self) -> impl Iterator<Item = &Unit> {
        self.units.values()
    }

    fn register(&mut self, unit: Unit) {
        self.units.insert(unit.symbol.clone(), unit);
    }

    /// Register a canonical unit and make it the display name of its dimension
    fn register_display(&mut self, unit: Unit) {
        debug_assert!(unit.is_canonical());
        self.display.insert(unit.dimension, unit.symbol.clone());
        self.register(unit);
    }

    fn register_all_units(&mut self) {
        self.register_base_units();
        self.register_derived_units();
        self.register_length_units();
        self.register_mass_units();
        self.register_time_units();
        self.register_volume_units();
        self.register_energy_units();
        self.register_pressure_units();
        self.register_angle_units();
    }

    fn register_base_units(&mut self) {
        self.register_display(Unit::new("m", "meter", Dimension::LENGTH, 1.0).prefixed());
        // kg is the canonical mass unit; prefixes attach to g
        self.register_display(Unit::new("kg", "kilogram", Dimension::MASS, 1.0));
        self.register(Unit::new("g", "gram", Dimension::MASS, 1e-3).prefixed());
        self.register_display(Unit::new("s", "second", Dimension::TIME, 1.0).prefixed());
        self.register_display(Unit::new("A", "ampere", Dimension::CURRENT, 1.0).prefixed());
        self.register_display(Unit::new("K", "kelvin", Dimension::TEMPERATURE, 1.0).prefixed());
        self.register_display(Unit::new("mol", "mole", Dimension::AMOUNT, 1.0).prefixed());
        self.register_display(Unit::new("cd", "candela", Dimension::LUMINOSITY, 1.0).prefixed());
    }

    fn register_derived_units(&mut self) {
        self.register_display(Unit::new("N", "newton", Dimension::FORCE, 1.0).prefixed());
        self.register_display(Unit::new("J", "joule", Dimension::ENERGY, 1.0).prefixed());
        self.register_display(Unit::new("W", "watt", Dimension::POWER, 1.0).prefixed());
        self.register_display(Unit::new("Pa", "pascal", Dimension::PRESSURE, 1.0).prefixed());
        self.register_display(Unit::new("Hz", "hertz", Dimension::FREQUENCY, 1.0).prefixed());
        self.register_display(Unit::new("C", "coulomb", Dimension::CHARGE, 1.0).prefixed());
        self.register_display(Unit::new("V", "volt", Dimension::VOLTAGE, 1.0).prefixed());
        self.register_display(Unit::new("ohm", "ohm", Dimension::RESISTANCE, 1.0).prefixed());
        self.register_display(Unit::new("F", "farad", Dimension::CAPACITANCE, 1.0).prefixed());
        self.register_display(Unit::new("S", "siemens", Dimension::CONDUCTANCE, 1.0).prefixed());
        self.register_display(Unit::new("Wb", "weber", Dimension::MAGNETIC_FLUX, 1.0).prefixed());
        self.register_display(Unit::new("T", "tesla", Dimension::FLUX_DENSITY, 1.0).prefixed());
        self.register_display(Unit::new("H", "henry", Dimension::INDUCTANCE, 1.0).prefixed());
        self.register_display(Unit::new("kat", "katal", Dimension::CATALYTIC_ACTIVITY, 1.0).prefixed());

        // Same dimension as another unit; never chosen for display
        self.register(Unit::new("Bq", "becquerel", Dimension::FREQUENCY, 1.0).prefixed());
        self.register(Unit::new("Gy", "gray", Dimension::DOSE, 1.0).prefixed());
        self.register(Unit::new("Sv", "sievert", Dimension::DOSE, 1.0).prefixed());
        self.register(Unit::new("lm", "lumen", Dimension::LUMINOSITY, 1.0).prefixed());
        self.register(Unit::new("lx", "lux", Dimension::ILLUMINANCE, 1.0).prefixed());
    }

    fn register_length_units(&mut self) {
        self.register(Unit::new("in", "inch", Dimension::LENGTH, 0.0254));
        self.register(Unit::new("ft", "foot", Dimension::LENGTH, 0.3048));
        self.register(Unit::new("yd", "yard", Dimension::LENGTH, 0.9144));
        self.register(Unit::new("mi", "mile", Dimension::LENGTH, 1609.344));
        self.register(Unit::new("nmi", "nautical mile", Dimension::LENGTH, 1852.0));
        self.register(Unit::new("au", "astronomical unit", Dimension::LENGTH, 149_597_870_700.0));
        self.register(Unit::new("ly", "light year", Dimension::LENGTH, 9_460_730_472_580_800.0));
        self.register(Unit::new("pc", "parsec", Dimension::LENGTH, 30_856_775_814_913_673.0));
    }

    fn register_mass_units(&mut self) {
        self.register(Unit::new("t", "tonne", Dimension::MASS, 1000.0));
        self.register(Unit::new("lb", "pound", Dimension::MASS, 0.45359237));
        self.register(Unit::new("oz", "ounce", Dimension::MASS, 0.028349523125));
        self.register(Unit::new("Da", "dalton", Dimension::MASS, 1.66053906660e-27));
    }

    fn register_time_units(&mut self) {
        self.register(Unit::new("min", "minute", Dimension::TIME, 60.0));
        self.register(Unit::new("h", "hour", Dimension::TIME, 3600.0));
        self.register(Unit::new("d", "day", Dimension::TIME, 86400.0));
        self.register(Unit::new("wk", "week", Dimension::TIME, 604_800.0));
        self.register(Unit::new("yr", "year", Dimension::TIME, 31_556_952.0)); // average Gregorian
    }

    fn register_volume_units(&mut self) {
        self.register(Unit::new("L", "liter", Dimension::VOLUME, 1e-3).prefixed());
        self.register(Unit::new("gal", "US gallon", Dimension::VOLUME, 0.003785411784));
    }

    fn register_energy_units(&mut self) {
        self.register(Unit::new("eV", "electronvolt", Dimension::ENERGY, 1.602176634e-19).prefixed());
        self.register(Unit::new("cal", "calorie", Dimension::ENERGY, 4.184).prefixed());
        self.register(Unit::new("Wh", "watt hour", Dimension::ENERGY, 3600.0).prefixed());
    }

    fn register_pressure_units(&mut self) {
        self.register(Unit::new("bar", "bar", Dimension::PRESSURE, 100_000.0).prefixed());
        self.register(Unit::new("atm", "atmosphere", Dimension::PRESSURE, 101_325.0));
        self.register(Unit::new("psi", "pound per square inch", Dimension::PRESSURE, 6894.757293168361));
    }

    fn register_angle_units(&mut self) {
        self.register(Unit::new("rad", "radian", Dimension::DIMENSIONLESS, 1.0).prefixed());
        self.register(Unit::new("sr", "steradian", Dimension::DIMENSIONLESS, 1.0));
        self.register(Unit::new("deg", "degree", Dimension::DIMENSIONLESS, PI / 180.0));
    }
}

impl Default for UnitRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve a symbol against the global registry
pub fn resolve(symbol: &str) -> Option<Unit> {
    UNITS.resolve(symbol)
}
