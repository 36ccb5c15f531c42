//! The built-in type catalogue and type-name resolution.
//!
//! Field and alias types resolve against three layers: a small closed set
//! of primitives, the static namespaced catalogue below, and the document's
//! own `@type` aliases. Namespaced names may carry a leading `types::`
//! qualifier, which is stripped before lookup.

use std::collections::HashSet;

/// The closed set of primitive type names.
pub const PRIMITIVES: [&str; 5] = ["i32", "f64", "string", "bool", "color"];

/// Namespace qualifiers the resolver dispatches on.
pub const KNOWN_NAMESPACES: [&str; 3] = ["math", "time", "physics"];

/// The optional qualifier prefix in front of a namespaced type.
const NAMESPACE_QUALIFIER: &str = "types::";

/// Every namespaced builtin, in short form (without the `types::` prefix).
///
/// New unit types under a known namespace are still accepted when missing
/// here (see [`classify`]), so this list drives exact matches and the
/// remediation hint, not the outer acceptance boundary.
static NAMESPACED_BUILTINS: &[&str] = &[
    // math
    "math::vector2",
    "math::vector3",
    "math::vector4",
    "math::quaternion",
    "math::matrix3x3",
    "math::matrix4x4",
    // time
    "time::datetime",
    "time::duration",
    "time::year",
    "time::day",
    "time::hour",
    "time::minute",
    // physics
    "physics::meter",
    "physics::kilogram",
    "physics::second",
    "physics::ampere",
    "physics::kelvin",
    "physics::mole",
    "physics::candela",
    "physics::squareMeter",
    "physics::cubicMeter",
    "physics::meterPerSecond",
    "physics::meterPerSecondSquared",
    "physics::radianPerSecond",
    "physics::radianPerSecondSquared",
    "physics::hertz",
    "physics::kilogramPerCubicMeter",
    "physics::kilogramMeterPerSecond",
    "physics::newton",
    "physics::newtonMeter",
    "physics::pascal",
    "physics::joule",
    "physics::watt",
    "physics::newtonPerMeter",
    "physics::dimensionless",
    "physics::kilogramSquareMeter",
    "physics::joulePerKilogramKelvin",
    "physics::joulePerKilogram",
    "physics::joulePerKelvin",
    "physics::coulomb",
    "physics::volt",
    "physics::ohm",
    "physics::ohmMeter",
    "physics::farad",
    "physics::voltPerMeter",
    "physics::tesla",
    "physics::weber",
    "physics::henry",
    "physics::siemens",
    "physics::coulombPerCubicMeter",
    "physics::coulombPerSquareMeter",
    "physics::faradPerMeter",
    "physics::henryPerMeter",
    "physics::amperePerMeter",
    "physics::amperePerSquareMeter",
    "physics::voltPerKelvin",
    "physics::pascalSecond",
    "physics::squareMeterPerSecond",
    "physics::newtonSecond",
    "physics::newtonPerCubicMeter",
    "physics::jouleSecond",
    "physics::kilogramPerMole",
    "physics::cubicMeterPerKilogram",
    "physics::meterPerCubicSecond",
    "physics::lumen",
    "physics::lux",
    "physics::lumenSecond",
    "physics::candelaPerSquareMeter",
    "physics::wattPerSteradian",
    "physics::wattPerSquareMeter",
    "physics::wattPerMeterKelvin",
    "physics::joulePerSquareMeter",
    "physics::radian",
    "physics::steradian",
    "physics::bit",
    "physics::decibel",
    "physics::katal",
    "physics::molePerCubicMeter",
    "physics::newtonPerMeterSquared",
    "physics::joulePerMole",
    "physics::joulePerMoleKelvin",
    "physics::kelvinPerWatt",
    "physics::kilogramPerSecond",
    "physics::cubicMeterPerSecond",
    "physics::inverseMeter",
    "physics::newtonPerCoulomb",
    "physics::weberPerMeter",
    "physics::teslaSquareMeter",
    "physics::arcDegree",
    "physics::arcMinute",
    "physics::arcSecond",
    "physics::bar",
    "physics::millimeterOfMercury",
    "physics::atmosphere",
    "physics::torr",
    "physics::poise",
    "physics::stokes",
    "physics::sverdrup",
    "physics::rayl",
    "physics::gal",
    "physics::maxwell",
    "physics::gauss",
    "physics::oersted",
    "physics::gilbert",
    "physics::franklin",
    "physics::debye",
    "physics::angstrom",
    "physics::lambert",
    "physics::phot",
    "physics::stilb",
    "physics::kayser",
    "physics::calorie",
    "physics::britishThermalUnit",
    "physics::langley",
    "physics::fahrenheit",
    "physics::celsius",
    "physics::rankine",
    "physics::curie",
    "physics::roentgen",
    "physics::rutherford",
    "physics::fermi",
    "physics::dalton",
    "physics::byte",
    "physics::baud",
    "physics::erlang",
    "physics::metabolicEquivalent",
    "physics::jansky",
    "physics::machNumber",
    "physics::knots",
    "physics::nauticalMile",
    "physics::horsepower",
    "physics::dioptre",
    "physics::percentage",
    "physics::becquerel",
    "physics::gray",
    "physics::sievert",
    "physics::electronVolt",
    "physics::barn",
    "physics::lightYear",
    "physics::parsec",
    "physics::astronomicalUnit",
    "physics::hubbleConstant",
];

/// Remediation hint attached to every unknown-type diagnostic.
pub const TYPE_HINT: &str = "Accepted types: primitives (i32, f64, string, bool, color), \
     types::math::* (vector2…matrix4x4), \
     types::time::* (datetime, duration, year, day, hour, minute), \
     types::physics::* (meter, kilogram, second, …), or a @type alias.";

/// What a type name resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeClass {
    /// One of the five primitives.
    Primitive,
    /// A `@type` alias declared in the current document.
    Alias,
    /// An exact entry of the static namespaced catalogue.
    NamespacedBuiltin,
    /// `<namespace>::<identifier>` under a known namespace but absent from
    /// the catalogue. Accepted so the resolver tolerates unit types added
    /// to the type system before this catalogue learns about them.
    NamespacedGeneric,
    /// Anything else.
    Unknown,
}

/// Resolves `name` against the catalogue and the document's aliases.
///
/// Resolution order matters: aliases are checked before the stripped
/// namespace path, since a bare-word alias could otherwise never match.
/// An alias is also allowed to shadow a primitive or builtin name; the
/// earlier layers win, so the shadowing alias simply resolves as that
/// layer.
pub fn classify(name: &str, aliases: &HashSet<String>) -> TypeClass {
    if PRIMITIVES.contains(&name) {
        return TypeClass::Primitive;
    }
    if aliases.contains(name) {
        return TypeClass::Alias;
    }

    let stripped = name.strip_prefix(NAMESPACE_QUALIFIER).unwrap_or(name);

    if NAMESPACED_BUILTINS.contains(&stripped) {
        return TypeClass::NamespacedBuiltin;
    }

    let parts: Vec<&str> = stripped.split("::").collect();
    if parts.len() == 2
        && KNOWN_NAMESPACES.contains(&parts[0])
        && !parts[1].trim().is_empty()
    {
        return TypeClass::NamespacedGeneric;
    }

    TypeClass::Unknown
}

/// True when `name` is a valid field or base type in a document with the
/// given alias set.
pub fn is_known_type(name: &str, aliases: &HashSet<String>) -> bool {
    classify(name, aliases) != TypeClass::Unknown
}
