//! Filter options and default values.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::registry::OptionKey;
use crate::value::Value;

/// Produces a default value on demand. Providers take no arguments, so a
/// default can never depend on sibling attributes.
pub type DefaultProvider = Arc<dyn Fn() -> Value + Send + Sync>;

/// The `default` option: a fixed value or a provider evaluated lazily.
#[derive(Clone)]
pub enum DefaultValue {
    Value(Value),
    Provider(DefaultProvider),
}

impl DefaultValue {
    pub fn provider(f: impl Fn() -> Value + Send + Sync + 'static) -> Self {
        DefaultValue::Provider(Arc::new(f))
    }

    /// The raw, uncast default.
    pub fn resolve(&self) -> Value {
        match self {
            DefaultValue::Value(value) => value.clone(),
            DefaultValue::Provider(provider) => provider(),
        }
    }
}

impl fmt::Debug for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultValue::Value(value) => f.debug_tuple("Value").field(value).finish(),
            DefaultValue::Provider(_) => f.write_str("Provider(..)"),
        }
    }
}

/// One option value. The variant determines its [`OptionKey`].
#[derive(Debug, Clone)]
pub enum OptionValue {
    Default(DefaultValue),
    Desc(String),
    Format(String),
    Class(String),
    Methods(Vec<String>),
    Strip(bool),
    Digits(u32),
    Base(u32),
}

impl OptionValue {
    pub fn key(&self) -> OptionKey {
        match self {
            OptionValue::Default(_) => OptionKey::Default,
            OptionValue::Desc(_) => OptionKey::Desc,
            OptionValue::Format(_) => OptionKey::Format,
            OptionValue::Class(_) => OptionKey::Class,
            OptionValue::Methods(_) => OptionKey::Methods,
            OptionValue::Strip(_) => OptionKey::Strip,
            OptionValue::Digits(_) => OptionKey::Digits,
            OptionValue::Base(_) => OptionKey::Base,
        }
    }
}

/// The options of one filter declaration, keyed by [`OptionKey`].
///
/// `Options` accepts any key; whether the filter's type recognizes it is
/// checked when the filter is constructed.
#[derive(Debug, Clone, Default)]
pub struct Options {
    entries: IndexMap<OptionKey, OptionValue>,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an option, replacing any earlier value for the same key.
    pub fn with(mut self, option: OptionValue) -> Self {
        self.set(option);
        self
    }

    pub fn set(&mut self, option: OptionValue) {
        self.entries.insert(option.key(), option);
    }

    pub fn default_value(self, value: impl Into<Value>) -> Self {
        self.with(OptionValue::Default(DefaultValue::Value(value.into())))
    }

    pub fn default_with(self, f: impl Fn() -> Value + Send + Sync + 'static) -> Self {
        self.with(OptionValue::Default(DefaultValue::provider(f)))
    }

    pub fn desc(self, desc: impl Into<String>) -> Self {
        self.with(OptionValue::Desc(desc.into()))
    }

    pub fn format(self, format: impl Into<String>) -> Self {
        self.with(OptionValue::Format(format.into()))
    }

    pub fn class(self, class: impl Into<String>) -> Self {
        self.with(OptionValue::Class(class.into()))
    }

    pub fn methods<S: Into<String>>(self, methods: impl IntoIterator<Item = S>) -> Self {
        self.with(OptionValue::Methods(
            methods.into_iter().map(Into::into).collect(),
        ))
    }

    pub fn strip(self, strip: bool) -> Self {
        self.with(OptionValue::Strip(strip))
    }

    pub fn digits(self, digits: u32) -> Self {
        self.with(OptionValue::Digits(digits))
    }

    pub fn base(self, base: u32) -> Self {
        self.with(OptionValue::Base(base))
    }

    pub fn keys(&self) -> impl Iterator<Item = OptionKey> + '_ {
        self.entries.keys().copied()
    }

    pub fn contains(&self, key: OptionKey) -> bool {
        self.entries.contains_key(&key)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get_default(&self) -> Option<&DefaultValue> {
        match self.entries.get(&OptionKey::Default) {
            Some(OptionValue::Default(default)) => Some(default),
            _ => None,
        }
    }

    pub fn get_desc(&self) -> Option<&str> {
        match self.entries.get(&OptionKey::Desc) {
            Some(OptionValue::Desc(desc)) => Some(desc),
            _ => None,
        }
    }

    pub fn get_format(&self) -> Option<&str> {
        match self.entries.get(&OptionKey::Format) {
            Some(OptionValue::Format(format)) => Some(format),
            _ => None,
        }
    }

    pub fn get_class(&self) -> Option<&str> {
        match self.entries.get(&OptionKey::Class) {
            Some(OptionValue::Class(class)) => Some(class),
            _ => None,
        }
    }

    pub fn get_methods(&self) -> &[String] {
        match self.entries.get(&OptionKey::Methods) {
            Some(OptionValue::Methods(methods)) => methods,
            _ => &[],
        }
    }

    pub fn get_strip(&self) -> Option<bool> {
        match self.entries.get(&OptionKey::Strip) {
            Some(OptionValue::Strip(strip)) => Some(*strip),
            _ => None,
        }
    }

    pub fn get_digits(&self) -> Option<u32> {
        match self.entries.get(&OptionKey::Digits) {
            Some(OptionValue::Digits(digits)) => Some(*digits),
            _ => None,
        }
    }

    pub fn get_base(&self) -> Option<u32> {
        match self.entries.get(&OptionKey::Base) {
            Some(OptionValue::Base(base)) => Some(*base),
            _ => None,
        }
    }
}
