use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::declare::{CustomKind, MemberAccess};
use crate::discovery::Candidate;
use crate::info::{MemberDescriptor, MemberKind, Options};
use crate::registry::Registry;
use crate::value::PrimitiveKind;

// -----------------------------------------------------------------------------
// AccessStrategy

/// How a member's value is reached.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AccessStrategy {
    /// A field, through references.
    Field,
    /// The storage behind a property, used when `BACKING_FIELDS` is set.
    BackingField,
    /// A property's getter and setter.
    Property,
    /// A typed custom pair.
    Custom,
    /// A pair that talks to sinks and sources directly.
    Interface,
    /// The member's accessors, wrapped in conversions.
    Converting,
}

// -----------------------------------------------------------------------------
// ValueRoute

/// How a member value is handed to sinks and taken from sources.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueRoute {
    /// The typed primitive call, bypassing value interface dispatch.
    Direct(PrimitiveKind),
    /// The value interface of the exposed type, overrides included.
    Interface,
}

// -----------------------------------------------------------------------------
// AccessPlan

/// The resolved access plan of one member.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AccessPlan {
    strategy: AccessStrategy,
    route: ValueRoute,
    readable: bool,
    writable: bool,
    skip_default: bool,
    error_if_unreadable: bool,
    error_if_unwritable: bool,
}

impl AccessPlan {
    #[inline]
    pub const fn strategy(&self) -> AccessStrategy {
        self.strategy
    }

    #[inline]
    pub const fn route(&self) -> ValueRoute {
        self.route
    }

    #[inline]
    pub const fn is_readable(&self) -> bool {
        self.readable
    }

    #[inline]
    pub const fn is_writable(&self) -> bool {
        self.writable
    }

    #[inline]
    pub const fn skip_default(&self) -> bool {
        self.skip_default
    }

    #[inline]
    pub const fn error_if_unreadable(&self) -> bool {
        self.error_if_unreadable
    }

    #[inline]
    pub const fn error_if_unwritable(&self) -> bool {
        self.error_if_unwritable
    }
}

// -----------------------------------------------------------------------------
// Planning

/// A member with its plan and the accessor the plan selected.
pub(crate) struct PlannedMember<T> {
    pub descriptor: MemberDescriptor,
    pub plan: AccessPlan,
    pub access: Arc<dyn MemberAccess<T>>,
}

pub(crate) fn plan_members<T>(
    candidates: Vec<Candidate<T>>,
    options: Options,
    registry: &Registry,
) -> Vec<PlannedMember<T>> {
    candidates
        .into_iter()
        .map(|candidate| plan(candidate, options, registry))
        .collect()
}

fn plan<T>(candidate: Candidate<T>, options: Options, registry: &Registry) -> PlannedMember<T> {
    let Candidate {
        mut descriptor,
        primary,
        backing,
        custom,
    } = candidate;

    let (strategy, access) = match (custom, backing) {
        (Some((kind, access)), _) => {
            let strategy = match kind {
                CustomKind::Typed => AccessStrategy::Custom,
                CustomKind::Interface => AccessStrategy::Interface,
                CustomKind::Converting => AccessStrategy::Converting,
            };
            (strategy, access)
        }
        (None, Some(backing))
            if descriptor.kind == MemberKind::Property
                && options.contains(Options::BACKING_FIELDS) =>
        {
            (AccessStrategy::BackingField, backing)
        }
        _ => match descriptor.kind {
            MemberKind::Field => (AccessStrategy::Field, primary),
            _ => (AccessStrategy::Property, primary),
        },
    };

    let (readable, writable) = match strategy {
        AccessStrategy::Field | AccessStrategy::BackingField => (true, true),
        AccessStrategy::Property => (
            access.can_read() && (descriptor.read_public || descriptor.explicit),
            access.can_write() && (descriptor.write_public || descriptor.explicit),
        ),
        AccessStrategy::Custom | AccessStrategy::Interface | AccessStrategy::Converting => {
            (access.can_read(), access.can_write())
        }
    };
    descriptor.readable = readable;
    descriptor.writable = writable;

    let route = match access.primitive() {
        Some(kind)
            if strategy != AccessStrategy::Interface
                && options.contains(Options::DIRECT_PRIMITIVES)
                && !registry.has_interface_id(access.exposed_type().id()) =>
        {
            ValueRoute::Direct(kind)
        }
        _ => ValueRoute::Interface,
    };

    let plan = AccessPlan {
        strategy,
        route,
        readable,
        writable,
        skip_default: descriptor.skip_default,
        error_if_unreadable: descriptor.error_if_unreadable,
        error_if_unwritable: descriptor.error_if_unwritable,
    };

    PlannedMember {
        descriptor,
        plan,
        access,
    }
}
