//! Member Discovery: from declared members to ordered descriptors.

use alloc::boxed::Box;
use alloc::string::ToString;
use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::declare::{CustomKind, Level, MemberAccess, MemberDecl, RwField};
use crate::error::{AccessError, AccessResult};
use crate::info::{DEFAULT_ORDER, MemberDescriptor, MemberKind, Options};
use crate::utils::HashMap;

/// A discovered member, before planning.
pub(crate) struct Candidate<T> {
    pub descriptor: MemberDescriptor,
    pub primary: Arc<dyn MemberAccess<T>>,
    pub backing: Option<Arc<dyn MemberAccess<T>>>,
    pub custom: Option<(CustomKind, Arc<dyn MemberAccess<T>>)>,
}

/// Selects, deduplicates and orders the members of `ty`.
///
/// Levels are visited from the root base to `ty`. Without `INHERITED`, only
/// the last level is considered.
pub(crate) fn discover<T>(
    ty: &'static str,
    levels: Vec<Level<T>>,
    options: Options,
) -> AccessResult<Vec<Candidate<T>>> {
    let skip = if options.contains(Options::INHERITED) {
        0
    } else {
        levels.len().saturating_sub(1)
    };

    let mut selected: Vec<Candidate<T>> = Vec::new();
    let mut by_name: HashMap<Box<str>, usize> = HashMap::default();

    for (depth, level) in levels.into_iter().enumerate().skip(skip) {
        for member in level.members {
            for candidate in candidates(ty, level.type_name, depth, member, options)? {
                let name = &candidate.descriptor.serialized_name;
                let Some(&index) = by_name.get(name) else {
                    by_name.insert(name.clone(), selected.len());
                    selected.push(candidate);
                    continue;
                };
                let existing = &selected[index].descriptor;
                let incoming = &candidate.descriptor;
                let replace = if existing.explicit != incoming.explicit {
                    incoming.explicit
                } else if existing.depth != incoming.depth {
                    incoming.depth > existing.depth
                } else {
                    return Err(AccessError::NamingConflict {
                        ty,
                        name: incoming.serialized_name.to_string(),
                    });
                };
                if replace {
                    selected[index] = candidate;
                }
            }
        }
    }

    selected.sort_by(|a, b| {
        let (a, b) = (&a.descriptor, &b.descriptor);
        a.order
            .cmp(&b.order)
            .then_with(|| a.serialized_name.as_bytes().cmp(b.serialized_name.as_bytes()))
    });
    for (ordinal, candidate) in selected.iter_mut().enumerate() {
        candidate.descriptor.ordinal = ordinal;
    }
    Ok(selected)
}

/// The candidates produced by one member: one per directive, or a single
/// ambient one when the policy admits it.
fn candidates<T>(
    ty: &'static str,
    declaring_type: &'static str,
    depth: usize,
    member: MemberDecl<T>,
    options: Options,
) -> AccessResult<Vec<Candidate<T>>> {
    if member.kind == MemberKind::Indexer || member.ignored {
        return Ok(Vec::new());
    }

    let explicit = !member.directives.is_empty();
    if !explicit && !admitted(&member, options) {
        return Ok(Vec::new());
    }

    let primary = match (&member.primary, &member.custom) {
        (Some(primary), _) => primary.clone(),
        (None, Some((_, custom))) => custom.clone(),
        (None, None) => {
            return Err(AccessError::NoAccessor {
                ty,
                member: member.name,
            });
        }
    };
    let after_type = match &member.custom {
        Some((_, custom)) => custom.exposed_type(),
        None => member.value_type,
    };

    let descriptor = |directive: Option<&RwField>| {
        let serialized_name: Box<str> = directive
            .and_then(RwField::get_name)
            .unwrap_or(member.name)
            .into();
        MemberDescriptor {
            name: member.name,
            serialized_name,
            kind: member.kind,
            declaring_type,
            depth,
            before_type: member.value_type,
            after_type,
            readable: false,
            writable: false,
            read_public: member.read_public,
            write_public: member.write_public,
            is_static: member.is_static,
            ordinal: 0,
            order: directive.and_then(|d| d.order).unwrap_or(DEFAULT_ORDER),
            skip_default: directive
                .and_then(|d| d.skip_default)
                .unwrap_or(options.contains(Options::SKIP_DEFAULT)),
            error_if_unreadable: directive
                .and_then(|d| d.must_read)
                .unwrap_or(options.contains(Options::CANNOT_READ_ERROR)),
            error_if_unwritable: directive
                .and_then(|d| d.must_write)
                .unwrap_or(options.contains(Options::CANNOT_WRITE_ERROR)),
            explicit: directive.is_some(),
        }
    };

    let descriptors: Vec<MemberDescriptor> = if explicit {
        member.directives.iter().map(|d| descriptor(Some(d))).collect()
    } else {
        Vec::from([descriptor(None)])
    };

    Ok(descriptors
        .into_iter()
        .map(|descriptor| Candidate {
            descriptor,
            primary: primary.clone(),
            backing: member.backing.clone(),
            custom: member.custom.clone(),
        })
        .collect())
}

/// The ambient policy for members without directives.
fn admitted<T>(member: &MemberDecl<T>, options: Options) -> bool {
    if options.contains(Options::OPT_IN) || member.is_static {
        return false;
    }
    match member.kind {
        MemberKind::Field => options.contains(Options::FIELDS) && member.read_public,
        MemberKind::Property => {
            options.contains(Options::PROPERTIES) && (member.read_public || member.write_public)
        }
        MemberKind::Indexer => false,
    }
}
