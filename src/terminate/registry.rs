use std::collections::BTreeMap;
use std::fmt;

use crate::error::{Error, Result};
use crate::terminate::criterion::{Criterion, DEFAULT_PROGRESS_FLOOR, DEFAULT_QUOTIENT, DEFAULT_STRIPS};
use crate::terminate::terminator::Terminator;

/// Builds a terminator from the parameter text that follows its prefix.
pub type TerminatorFactory = fn(&str) -> Option<Terminator>;

/// A terminator name after the policy prefix has been stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminatorName<'a> {
    /// Whether a stop is vetoed while the validation error is still below
    /// the training error. A leading `-` turns this off.
    pub ensure_validation_above_training: bool,
    pub name: &'a str,
}

impl<'a> TerminatorName<'a> {
    pub fn parse(name: &'a str) -> TerminatorName<'a> {
        let name = name.trim();
        match name.strip_prefix('-') {
            Some(rest) => TerminatorName {
                ensure_validation_above_training: false,
                name: rest.trim(),
            },
            None => TerminatorName {
                ensure_validation_above_training: true,
                name,
            },
        }
    }

    /// `"none"` and the empty name mean no early stopping.
    pub fn is_none(&self) -> bool {
        self.name.is_empty() || self.name.eq_ignore_ascii_case("none")
    }
}

/// Table of terminator name prefixes.
///
/// A name is matched against the longest registered prefix, compared
/// without regard to ASCII case; the rest of the name is handed to the
/// factory. `"GL5"` resolves to the `GL` factory with parameters `"5"`.
#[derive(Clone, Default)]
pub struct TerminatorRegistry {
    factories: BTreeMap<String, TerminatorFactory>,
}

impl fmt::Debug for TerminatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.factories.keys()).finish()
    }
}

impl TerminatorRegistry {
    pub fn empty() -> TerminatorRegistry {
        TerminatorRegistry::default()
    }

    /// `dummy`, `FT#`, `UP#`, `GL#`, `PQ#` and `PR#[,floor,strips,quotient]`.
    pub fn standard() -> TerminatorRegistry {
        let mut registry = TerminatorRegistry::empty();
        registry.register("dummy", |params| params.is_empty().then(Terminator::dummy));
        registry.register("FT", |params| parse_raises(params).map(Terminator::fast));
        registry.register("UP", |params| parse_raises(params).map(Terminator::up));
        registry.register("GL", |params| parse_threshold(params).map(Terminator::gl));
        registry.register("PQ", |params| parse_threshold(params).map(Terminator::pq));
        registry.register("PR", parse_combined);
        registry
    }

    pub fn register(&mut self, prefix: &str, factory: TerminatorFactory) {
        self.factories.insert(prefix.to_ascii_uppercase(), factory);
    }

    pub fn prefixes(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    /// Builds the terminator `name` refers to. Fails with
    /// `UnknownTerminator` if no prefix matches or the parameters do not
    /// parse.
    pub fn create(&self, name: &str) -> Result<Terminator> {
        let upper = name.trim().to_ascii_uppercase();
        let unknown = || Error::UnknownTerminator(name.to_owned());
        let (prefix, factory) = self
            .factories
            .iter()
            .filter(|(prefix, _)| upper.starts_with(prefix.as_str()))
            .max_by_key(|(prefix, _)| prefix.len())
            .ok_or_else(unknown)?;
        let params = name.trim()[prefix.len()..].trim();
        factory(params).ok_or_else(unknown)
    }
}

fn parse_raises(params: &str) -> Option<usize> {
    params.parse().ok().filter(|n| *n > 0)
}

fn parse_threshold(params: &str) -> Option<f64> {
    params.parse::<f64>().ok().filter(|t| t.is_finite() && *t >= 0.0)
}

fn parse_combined(params: &str) -> Option<Terminator> {
    let mut parts = params.split(',').map(str::trim);
    let gl_threshold = parse_threshold(parts.next()?)?;
    let progress_floor = match parts.next() {
        Some(p) => p.parse().ok()?,
        None => DEFAULT_PROGRESS_FLOOR,
    };
    let strips = match parts.next() {
        Some(s) => s.parse().ok()?,
        None => DEFAULT_STRIPS,
    };
    let quotient = match parts.next() {
        Some(r) => r.parse().ok()?,
        None => DEFAULT_QUOTIENT,
    };
    if parts.next().is_some() {
        return None;
    }
    Some(Terminator::new(
        Criterion::Combined {
            gl_threshold,
            progress_floor,
            strips,
            quotient,
        },
        true,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_names_resolve() {
        let registry = TerminatorRegistry::standard();
        assert_eq!(
            registry.create("GL5").unwrap().criterion(),
            &Criterion::GeneralizationLoss { threshold: 5.0 }
        );
        let ft = registry.create("ft3").unwrap();
        assert_eq!(ft.criterion(), &Criterion::RaiseCount { max_raises: 3 });
        assert!(!ft.is_saving());
        assert!(registry.create("UP3").unwrap().is_saving());
        assert_eq!(registry.create("dummy").unwrap().criterion(), &Criterion::Dummy);
        assert_eq!(
            registry.create("PR2.5,0.2,4").unwrap().criterion(),
            &Criterion::Combined {
                gl_threshold: 2.5,
                progress_floor: 0.2,
                strips: 4,
                quotient: DEFAULT_QUOTIENT,
            }
        );
    }

    #[test]
    fn unknown_or_malformed_names_fail() {
        let registry = TerminatorRegistry::standard();
        for bad in ["XY3", "GL", "GLx", "FT-1", "FT0", "UP0", "PR1,2,3,4,5", "dummy7", ""] {
            assert!(
                matches!(registry.create(bad), Err(Error::UnknownTerminator(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn leading_dash_turns_the_policy_off() {
        let plain = TerminatorName::parse("GL2");
        assert!(plain.ensure_validation_above_training);
        assert_eq!(plain.name, "GL2");
        let relaxed = TerminatorName::parse("-GL2");
        assert!(!relaxed.ensure_validation_above_training);
        assert_eq!(relaxed.name, "GL2");
        assert!(TerminatorName::parse("none").is_none());
    }

    #[test]
    fn registered_factories_extend_the_table() {
        let mut registry = TerminatorRegistry::standard();
        registry.register("never", |_| Some(Terminator::dummy()));
        assert!(registry.create("never").is_ok());
        assert!(registry.prefixes().any(|p| p == "NEVER"));
    }
}
