//! The user registry: profiles, the ordered address list, and events.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use mutuum_types::{Address, ReentrancyGuard};

use crate::name::validate_display_name;
use crate::{RegistryError, Result};

/// A registered user's profile.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Permanently true once the address registers.
    pub registered: bool,
    /// Display name, 1..=50 UTF-8 bytes. May be updated in place.
    pub name: String,
    /// Block timestamp at registration.
    pub registration_time: u64,
}

/// Events emitted by the registry, in emission order.
///
/// The first address-typed field of each event is the indexed topic in
/// the on-chain encoding.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistryEvent {
    /// A new address registered.
    UserRegistered {
        /// The registering address.
        user: Address,
        /// The registered display name.
        name: String,
        /// Block timestamp at registration.
        time: u64,
    },
    /// A registered address changed its display name.
    UserProfileUpdated {
        /// The updating address.
        user: Address,
        /// The new display name.
        name: String,
    },
}

/// Authoritative identity directory.
#[derive(Clone, Debug, Default)]
pub struct UserRegistry {
    profiles: HashMap<Address, UserProfile>,
    order: Vec<Address>,
    events: Vec<RegistryEvent>,
    guard: ReentrancyGuard,
}

impl UserRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the caller with a display name.
    ///
    /// One-shot: an address can register exactly once.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::AlreadyRegistered`] if the caller is registered
    /// - [`RegistryError::NameInvalid`] if the name is empty or over 50 bytes
    pub fn register(&mut self, caller: Address, name: &str, now: u64) -> Result<()> {
        let _enter = self.guard.enter().ok_or(RegistryError::Reentrancy)?;
        if self.profiles.contains_key(&caller) {
            return Err(RegistryError::AlreadyRegistered);
        }
        validate_display_name(name)?;

        self.profiles.insert(
            caller,
            UserProfile {
                registered: true,
                name: name.to_string(),
                registration_time: now,
            },
        );
        self.order.push(caller);
        debug!(user = %caller, name, "user registered");
        self.events.push(RegistryEvent::UserRegistered {
            user: caller,
            name: name.to_string(),
            time: now,
        });
        Ok(())
    }

    /// Update the caller's display name in place.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::NotRegistered`] if the caller never registered
    /// - [`RegistryError::NameInvalid`] if the new name fails validation
    pub fn update_name(&mut self, caller: Address, new_name: &str) -> Result<()> {
        let _enter = self.guard.enter().ok_or(RegistryError::Reentrancy)?;
        validate_display_name(new_name)?;
        let profile = self
            .profiles
            .get_mut(&caller)
            .ok_or(RegistryError::NotRegistered)?;
        profile.name = new_name.to_string();
        self.events.push(RegistryEvent::UserProfileUpdated {
            user: caller,
            name: new_name.to_string(),
        });
        Ok(())
    }

    /// Whether `addr` is registered.
    #[must_use]
    pub fn is_registered(&self, addr: Address) -> bool {
        self.profiles.contains_key(&addr)
    }

    /// The profile for `addr`, if registered.
    #[must_use]
    pub fn profile(&self, addr: Address) -> Option<&UserProfile> {
        self.profiles.get(&addr)
    }

    /// The `i`-th registered address, in registration order.
    #[must_use]
    pub fn registered_at_index(&self, i: u64) -> Option<Address> {
        self.order.get(usize::try_from(i).ok()?).copied()
    }

    /// Total number of registered addresses.
    #[must_use]
    pub fn total_registered(&self) -> u64 {
        self.order.len() as u64
    }

    /// The ordered event log.
    #[must_use]
    pub fn events(&self) -> &[RegistryEvent] {
        &self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> Address {
        Address::repeat_byte(1)
    }

    fn bob() -> Address {
        Address::repeat_byte(2)
    }

    #[test]
    fn test_register_records_profile_and_event() {
        let mut registry = UserRegistry::new();
        registry.register(alice(), "alice", 100).unwrap();

        let profile = registry.profile(alice()).unwrap();
        assert!(profile.registered);
        assert_eq!(profile.name, "alice");
        assert_eq!(profile.registration_time, 100);
        assert_eq!(
            registry.events(),
            &[RegistryEvent::UserRegistered {
                user: alice(),
                name: "alice".to_string(),
                time: 100,
            }]
        );
    }

    #[test]
    fn test_registration_is_one_shot() {
        let mut registry = UserRegistry::new();
        registry.register(alice(), "alice", 100).unwrap();
        let err = registry.register(alice(), "alice-again", 200).unwrap_err();
        assert_eq!(err, RegistryError::AlreadyRegistered);
        // Original profile untouched.
        assert_eq!(registry.profile(alice()).unwrap().name, "alice");
    }

    #[test]
    fn test_invalid_names_rejected() {
        let mut registry = UserRegistry::new();
        assert!(registry.register(alice(), "", 100).is_err());
        assert!(registry.register(alice(), &"x".repeat(51), 100).is_err());
        assert!(!registry.is_registered(alice()));
    }

    #[test]
    fn test_update_name() {
        let mut registry = UserRegistry::new();
        registry.register(alice(), "alice", 100).unwrap();
        registry.update_name(alice(), "alice-2").unwrap();
        assert_eq!(registry.profile(alice()).unwrap().name, "alice-2");
        assert_eq!(registry.events().len(), 2);
        assert!(matches!(
            registry.events()[1],
            RegistryEvent::UserProfileUpdated { .. }
        ));
    }

    #[test]
    fn test_update_name_requires_registration() {
        let mut registry = UserRegistry::new();
        let err = registry.update_name(bob(), "bob").unwrap_err();
        assert_eq!(err, RegistryError::NotRegistered);
    }

    #[test]
    fn test_ordered_listing() {
        let mut registry = UserRegistry::new();
        registry.register(alice(), "alice", 100).unwrap();
        registry.register(bob(), "bob", 101).unwrap();
        assert_eq!(registry.total_registered(), 2);
        assert_eq!(registry.registered_at_index(0), Some(alice()));
        assert_eq!(registry.registered_at_index(1), Some(bob()));
        assert_eq!(registry.registered_at_index(2), None);
    }
}
