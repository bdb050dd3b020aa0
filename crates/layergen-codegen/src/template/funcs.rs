//! Helper functions callable from templates.

use heck::{ToKebabCase, ToLowerCamelCase, ToSnakeCase, ToUpperCamelCase};
use std::collections::BTreeMap;

/// A template helper: takes one string argument and returns a string.
pub type Helper = fn(&str) -> String;

/// Named helpers available to a template at compile time.
///
/// # Built-in helpers
///
/// | Name | Example |
/// |------|---------|
/// | `toLower` | `UserProfile` → `userprofile` |
/// | `toUpper` | `UserProfile` → `USERPROFILE` |
/// | `snakeCase` | `UserProfile` → `user_profile` |
/// | `camelCase` | `UserProfile` → `userProfile` |
/// | `pascalCase` | `user_profile` → `UserProfile` |
/// | `kebabCase` | `UserProfile` → `user-profile` |
#[derive(Debug, Clone)]
pub struct FuncMap {
    helpers: BTreeMap<String, Helper>,
}

impl Default for FuncMap {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl FuncMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self {
            helpers: BTreeMap::new(),
        }
    }

    /// Create a map with all built-in helpers registered.
    pub fn with_builtins() -> Self {
        let mut funcs = Self::new();
        funcs.register_builtins();
        funcs
    }

    fn register_builtins(&mut self) {
        self.insert("toLower", str::to_lowercase);
        self.insert("toUpper", str::to_uppercase);
        self.insert("snakeCase", |s| s.to_snake_case());
        self.insert("camelCase", |s| s.to_lower_camel_case());
        self.insert("pascalCase", |s| s.to_upper_camel_case());
        self.insert("kebabCase", |s| s.to_kebab_case());
    }

    /// Register a helper, replacing any existing one with the same name.
    pub fn insert(&mut self, name: impl Into<String>, helper: Helper) -> &mut Self {
        self.helpers.insert(name.into(), helper);
        self
    }

    /// Remove a helper.
    pub fn remove(&mut self, name: &str) -> Option<Helper> {
        self.helpers.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<Helper> {
        self.helpers.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.helpers.contains_key(name)
    }

    /// Names of all registered helpers, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.helpers.keys().map(String::as_str)
    }
}
