use super::Registry;
use crate::error::AccessResult;

/// A type collected by `#[access(auto_register)]`.
///
/// Submitted by the derive macro; not meant to be constructed by hand.
pub struct AutoRegistration {
    #[cfg_attr(not(feature = "auto_register"), allow(dead_code))]
    prepare: fn(&'static Registry) -> AccessResult,
}

impl AutoRegistration {
    #[inline]
    pub const fn new(prepare: fn(&'static Registry) -> AccessResult) -> Self {
        Self { prepare }
    }
}

#[cfg(feature = "auto_register")]
inventory::collect!(AutoRegistration);

impl Registry {
    /// Builds the schema of every type annotated with
    /// `#[access(auto_register)]`, returning how many were prepared.
    ///
    /// Already-built schemas are reused, so repeated calls are cheap.
    /// Without the `auto_register` feature, this prepares nothing.
    ///
    /// # Examples
    ///
    /// ```
    /// use vc_access::{Accessible, Registry, RegistryConfig};
    ///
    /// #[derive(Accessible, Default)]
    /// #[access(default, auto_register)]
    /// pub struct Sensor {
    ///     pub id: u32,
    /// }
    ///
    /// let registry = Registry::new(RegistryConfig::default()).leak();
    /// let prepared = registry.auto_register().unwrap();
    ///
    /// # if cfg!(feature = "auto_register") {
    /// assert!(prepared >= 1);
    /// assert!(registry.is_initialized::<Sensor>());
    /// # }
    /// ```
    pub fn auto_register(&'static self) -> AccessResult<usize> {
        #[cfg(feature = "auto_register")]
        {
            let mut prepared = 0;
            for entry in inventory::iter::<AutoRegistration> {
                (entry.prepare)(self)?;
                prepared += 1;
            }
            log::debug!("auto-registered {prepared} types");
            Ok(prepared)
        }
        #[cfg(not(feature = "auto_register"))]
        {
            Ok(0)
        }
    }
}
