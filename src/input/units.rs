//! Default unit labels for calculation input parameters
//!
//! Only labels are assigned here; no values are converted.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

/// Unit roles recognized by [`apply_default_units`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Length,
    Energy,
    Pressure,
    Force,
}

impl Role {
    /// All roles, in the order defaults are applied
    pub const ALL: [Role; 4] = [Role::Length, Role::Energy, Role::Pressure, Role::Force];

    /// Key used for this role when no rename is given
    #[must_use]
    pub const fn canonical_key(self) -> &'static str {
        match self {
            Role::Length => "length_unit",
            Role::Energy => "energy_unit",
            Role::Pressure => "pressure_unit",
            Role::Force => "force_unit",
        }
    }

    /// Unit label assigned when the key is missing
    #[must_use]
    pub const fn default_unit(self) -> &'static str {
        match self {
            Role::Length => "angstrom",
            Role::Energy => "eV",
            Role::Pressure => "GPa",
            Role::Force => "eV/angstrom",
        }
    }
}

/// Which parameter key holds each unit role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitKeys {
    #[serde(default = "default_length_key")]
    pub length: String,
    #[serde(default = "default_energy_key")]
    pub energy: String,
    #[serde(default = "default_pressure_key")]
    pub pressure: String,
    #[serde(default = "default_force_key")]
    pub force: String,
}

fn default_length_key() -> String {
    Role::Length.canonical_key().to_string()
}

fn default_energy_key() -> String {
    Role::Energy.canonical_key().to_string()
}

fn default_pressure_key() -> String {
    Role::Pressure.canonical_key().to_string()
}

fn default_force_key() -> String {
    Role::Force.canonical_key().to_string()
}

impl Default for UnitKeys {
    fn default() -> Self {
        Self {
            length: default_length_key(),
            energy: default_energy_key(),
            pressure: default_pressure_key(),
            force: default_force_key(),
        }
    }
}

impl UnitKeys {
    /// Key name used for `role`
    #[must_use]
    pub fn key(&self, role: Role) -> &str {
        match role {
            Role::Length => &self.length,
            Role::Energy => &self.energy,
            Role::Pressure => &self.pressure,
            Role::Force => &self.force,
        }
    }

    #[must_use]
    pub fn with_length_key(mut self, key: impl Into<String>) -> Self {
        self.length = key.into();
        self
    }

    #[must_use]
    pub fn with_energy_key(mut self, key: impl Into<String>) -> Self {
        self.energy = key.into();
        self
    }

    #[must_use]
    pub fn with_pressure_key(mut self, key: impl Into<String>) -> Self {
        self.pressure = key.into();
        self
    }

    #[must_use]
    pub fn with_force_key(mut self, key: impl Into<String>) -> Self {
        self.force = key.into();
        self
    }
}

/// A mutable string-keyed parameter mapping
pub trait InputParams {
    fn has_param(&self, key: &str) -> bool;

    fn set_param(&mut self, key: &str, value: &'static str);
}

impl<V, S> InputParams for HashMap<String, V, S>
where
    V: From<&'static str>,
    S: BuildHasher,
{
    fn has_param(&self, key: &str) -> bool {
        self.contains_key(key)
    }

    fn set_param(&mut self, key: &str, value: &'static str) {
        self.insert(key.to_string(), V::from(value));
    }
}

impl<V> InputParams for BTreeMap<String, V>
where
    V: From<&'static str>,
{
    fn has_param(&self, key: &str) -> bool {
        self.contains_key(key)
    }

    fn set_param(&mut self, key: &str, value: &'static str) {
        self.insert(key.to_string(), V::from(value));
    }
}

/// Fill in default unit labels for any role whose key is missing
///
/// Roles are visited length, energy, pressure, force. Existing values are
/// never touched, whatever their type. If two roles share a key, the first
/// one visited supplies the default.
pub fn apply_default_units<P: InputParams + ?Sized>(input: &mut P, keys: &UnitKeys) {
    for role in Role::ALL {
        let key = keys.key(role);
        if !input.has_param(key) {
            input.set_param(key, role.default_unit());
        }
    }
}
