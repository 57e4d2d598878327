//! Ordered, name-keyed collections of filters and their composition.
//!
//! A set is built during definition and read afterwards. Mutation needs
//! `&mut FilterSet`, so a set that is being cast against (shared `&`
//! borrows, possibly across threads) cannot change underneath a caller.

use indexmap::IndexMap;

use crate::error::DefinitionError;
use crate::filter::{Block, Filter};
use crate::options::Options;
use crate::registry::TypeTag;

#[derive(Debug, Clone, Default)]
pub struct FilterSet {
    filters: IndexMap<String, Filter>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a filter. Names are unique within a set.
    pub fn add(&mut self, filter: Filter) -> Result<(), DefinitionError> {
        if self.filters.contains_key(filter.name()) {
            return Err(DefinitionError::DuplicateFilter(filter.name().to_string()));
        }
        self.filters.insert(filter.name().to_string(), filter);
        Ok(())
    }

    /// Add or overwrite a filter, returning the one it displaced. Used to
    /// re-declare an inherited name in a child set.
    pub fn replace(&mut self, filter: Filter) -> Option<Filter> {
        self.filters.insert(filter.name().to_string(), filter)
    }

    /// Declare one filter of type `tag` per name, all sharing `options`
    /// and `block`.
    pub fn declare(
        &mut self,
        tag: TypeTag,
        names: &[&str],
        options: Options,
        block: Option<Block<'_>>,
    ) -> Result<(), DefinitionError> {
        for name in names {
            self.add(Filter::new(*name, tag, options.clone(), block)?)?;
        }
        Ok(())
    }

    // ── Per-type declarations ────────────────────

    pub fn boolean(&mut self, name: &str, options: Options) -> Result<(), DefinitionError> {
        self.declare(TypeTag::Boolean, &[name], options, None)
    }

    pub fn integer(&mut self, name: &str, options: Options) -> Result<(), DefinitionError> {
        self.declare(TypeTag::Integer, &[name], options, None)
    }

    pub fn float(&mut self, name: &str, options: Options) -> Result<(), DefinitionError> {
        self.declare(TypeTag::Float, &[name], options, None)
    }

    pub fn decimal(&mut self, name: &str, options: Options) -> Result<(), DefinitionError> {
        self.declare(TypeTag::Decimal, &[name], options, None)
    }

    pub fn string(&mut self, name: &str, options: Options) -> Result<(), DefinitionError> {
        self.declare(TypeTag::String, &[name], options, None)
    }

    pub fn symbol(&mut self, name: &str, options: Options) -> Result<(), DefinitionError> {
        self.declare(TypeTag::Symbol, &[name], options, None)
    }

    pub fn date(&mut self, name: &str, options: Options) -> Result<(), DefinitionError> {
        self.declare(TypeTag::Date, &[name], options, None)
    }

    pub fn date_time(&mut self, name: &str, options: Options) -> Result<(), DefinitionError> {
        self.declare(TypeTag::DateTime, &[name], options, None)
    }

    pub fn time(&mut self, name: &str, options: Options) -> Result<(), DefinitionError> {
        self.declare(TypeTag::Time, &[name], options, None)
    }

    pub fn model(&mut self, name: &str, options: Options) -> Result<(), DefinitionError> {
        self.declare(TypeTag::Model, &[name], options, None)
    }

    pub fn interface(&mut self, name: &str, options: Options) -> Result<(), DefinitionError> {
        self.declare(TypeTag::Interface, &[name], options, None)
    }

    pub fn file(&mut self, name: &str, options: Options) -> Result<(), DefinitionError> {
        self.declare(TypeTag::File, &[name], options, None)
    }

    /// Declare an array whose elements are checked by the single filter
    /// `block` declares.
    pub fn array(
        &mut self,
        name: &str,
        options: Options,
        block: impl Fn(&mut FilterSet) -> Result<(), DefinitionError>,
    ) -> Result<(), DefinitionError> {
        self.declare(TypeTag::Array, &[name], options, Some(&block))
    }

    pub fn hash(
        &mut self,
        name: &str,
        options: Options,
        block: impl Fn(&mut FilterSet) -> Result<(), DefinitionError>,
    ) -> Result<(), DefinitionError> {
        self.declare(TypeTag::Hash, &[name], options, Some(&block))
    }

    // ── Composition ──────────────────────────────

    /// An independent copy of `parent` for a child definition. Changes to
    /// the copy never reach the parent.
    pub fn inherit(parent: &FilterSet) -> FilterSet {
        parent.clone()
    }

    /// The subset of `source` selected by `only` (inclusion list) or
    /// `except` (exclusion list), in `source` order. Giving both non-empty
    /// is ambiguous and rejected. Names in `only` that `source` does not
    /// declare are ignored.
    pub fn import(
        source: &FilterSet,
        only: Option<&[&str]>,
        except: Option<&[&str]>,
    ) -> Result<FilterSet, DefinitionError> {
        // An empty list given alongside the other list counts as absent.
        let (only, except) = match (only, except) {
            (Some(o), Some(e)) if o.is_empty() => (None, Some(e)),
            (Some(o), Some(e)) if e.is_empty() => (Some(o), None),
            pair => pair,
        };
        if only.is_some() && except.is_some() {
            return Err(DefinitionError::AmbiguousImport);
        }
        let selected = |name: &str| match (only, except) {
            (Some(only), _) => only.contains(&name),
            (None, Some(except)) => !except.contains(&name),
            (None, None) => true,
        };
        let filters: IndexMap<String, Filter> = source
            .filters
            .iter()
            .filter(|(name, _)| selected(name.as_str()))
            .map(|(name, filter)| (name.clone(), filter.clone()))
            .collect();
        tracing::debug!(
            imported = filters.len(),
            available = source.len(),
            "filters imported"
        );
        Ok(FilterSet { filters })
    }

    /// Import a subset of `source` into this set. Fails on the first name
    /// this set already declares.
    pub fn import_into(
        &mut self,
        source: &FilterSet,
        only: Option<&[&str]>,
        except: Option<&[&str]>,
    ) -> Result<(), DefinitionError> {
        for filter in FilterSet::import(source, only, except)?.filters.into_values() {
            self.add(filter)?;
        }
        Ok(())
    }

    // ── Lookup ───────────────────────────────────

    pub fn get(&self, name: &str) -> Option<&Filter> {
        self.filters.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.filters.contains_key(name)
    }

    /// Filter names in declaration order.
    pub fn names(&self) -> Vec<&str> {
        self.filters.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn iter(&self) -> indexmap::map::Values<'_, String, Filter> {
        self.filters.values()
    }
}

impl<'a> IntoIterator for &'a FilterSet {
    type Item = &'a Filter;
    type IntoIter = indexmap::map::Values<'a, String, Filter>;

    fn into_iter(self) -> Self::IntoIter {
        self.filters.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> FilterSet {
        let mut set = FilterSet::new();
        set.integer("x", Options::new()).unwrap();
        set.string("y", Options::new()).unwrap();
        set
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut set = source();
        assert_eq!(
            set.float("x", Options::new()),
            Err(DefinitionError::DuplicateFilter("x".to_string()))
        );
        assert_eq!(set.get("x").map(Filter::tag), Some(TypeTag::Integer));
    }

    #[test]
    fn declare_shares_options_across_names() {
        let mut set = FilterSet::new();
        set.declare(
            TypeTag::Float,
            &["lat", "lng"],
            Options::new().default_value(0),
            None,
        )
        .unwrap();
        assert_eq!(set.names(), vec!["lat", "lng"]);
        assert!(set.iter().all(Filter::has_default));
    }

    #[test]
    fn iteration_follows_declaration_order() {
        let mut set = FilterSet::new();
        for name in ["c", "a", "b"] {
            set.boolean(name, Options::new()).unwrap();
        }
        let names: Vec<&str> = set.iter().map(Filter::name).collect();
        assert_eq!(names, vec!["c", "a", "b"]);
    }

    #[test]
    fn inherit_never_touches_the_parent() {
        let parent = source();
        let mut child = FilterSet::inherit(&parent);
        child.boolean("z", Options::new()).unwrap();
        child.replace(Filter::new("x", TypeTag::Float, Options::new(), None).unwrap());
        assert_eq!(parent.names(), vec!["x", "y"]);
        assert_eq!(parent.get("x").map(Filter::tag), Some(TypeTag::Integer));
        assert_eq!(child.names(), vec!["x", "y", "z"]);
        assert_eq!(child.get("x").map(Filter::tag), Some(TypeTag::Float));
    }

    #[test]
    fn import_only_and_except_are_complements() {
        let source = source();
        let only = FilterSet::import(&source, Some(&["x"]), None).unwrap();
        let except = FilterSet::import(&source, None, Some(&["x"])).unwrap();
        assert_eq!(only.names(), vec!["x"]);
        assert_eq!(except.names(), vec!["y"]);

        let complement = FilterSet::import(&source, None, Some(&["y"])).unwrap();
        assert_eq!(only.names(), complement.names());
    }

    #[test]
    fn import_everything_by_default() {
        let all = FilterSet::import(&source(), None, None).unwrap();
        assert_eq!(all.names(), vec!["x", "y"]);
    }

    #[test]
    fn import_with_both_lists_is_ambiguous() {
        assert_eq!(
            FilterSet::import(&source(), Some(&["x"]), Some(&["y"])).unwrap_err(),
            DefinitionError::AmbiguousImport
        );
    }

    #[test]
    fn import_ignores_an_empty_companion_list() {
        let subset = FilterSet::import(&source(), Some(&["y"]), Some(&[])).unwrap();
        assert_eq!(subset.names(), vec!["y"]);
    }

    #[test]
    fn import_into_detects_collisions() {
        let mut set = FilterSet::new();
        set.string("y", Options::new()).unwrap();
        assert_eq!(
            set.import_into(&source(), None, None),
            Err(DefinitionError::DuplicateFilter("y".to_string()))
        );

        let mut set = FilterSet::new();
        set.import_into(&source(), Some(&["y"]), None).unwrap();
        assert_eq!(set.names(), vec!["y"]);
    }
}
