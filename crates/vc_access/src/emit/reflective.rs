use alloc::boxed::Box;
use alloc::string::ToString;
use alloc::sync::Arc;

use super::RwOps;
use crate::declare::MemberAccess;
use crate::error::{AccessError, AccessResult};
use crate::plan::{AccessPlan, PlannedMember};
use crate::registry::Registry;
use crate::value::{DataReader, DataWriter, Key, StopToken, ValueReader, ValueWriter};

struct Member<T> {
    name: Box<str>,
    plan: AccessPlan,
    access: Arc<dyn MemberAccess<T>>,
}

/// Interpretive member access; the plan is consulted on every call.
pub(crate) struct ReflectiveRw<T> {
    ty: &'static str,
    members: Box<[Member<T>]>,
}

impl<T: 'static> ReflectiveRw<T> {
    pub fn new(ty: &'static str, members: &[PlannedMember<T>]) -> Self {
        Self {
            ty,
            members: members
                .iter()
                .map(|member| Member {
                    name: member.descriptor.serialized_name.clone(),
                    plan: member.plan,
                    access: member.access.clone(),
                })
                .collect(),
        }
    }
}

impl<T: 'static> RwOps<T> for ReflectiveRw<T> {
    fn read(&self, target: &T, ordinal: usize, writer: &mut dyn ValueWriter, registry: &'static Registry) -> AccessResult {
        let Some(member) = self.members.get(ordinal) else {
            return writer.write_null();
        };
        if member.plan.is_readable() {
            member.access.read(target, writer, member.plan.route(), registry)
        } else if member.plan.error_if_unreadable() {
            Err(AccessError::CannotRead {
                ty: self.ty,
                member: member.name.to_string(),
            })
        } else {
            writer.write_null()
        }
    }

    fn write(
        &self,
        target: &mut T,
        ordinal: usize,
        reader: &mut dyn ValueReader,
        registry: &'static Registry,
    ) -> AccessResult {
        let Some(member) = self.members.get(ordinal) else {
            return reader.skip();
        };
        if member.plan.is_writable() {
            member.access.write(target, reader, member.plan.route(), registry)
        } else if member.plan.error_if_unwritable() {
            Err(AccessError::CannotWrite {
                ty: self.ty,
                member: member.name.to_string(),
            })
        } else {
            reader.skip()
        }
    }

    fn read_all(&self, target: &T, writer: &mut dyn DataWriter, stop: &StopToken, registry: &'static Registry) -> AccessResult {
        let start = stop.take_saved().unwrap_or(0);
        for (ordinal, member) in self.members.iter().enumerate().skip(start) {
            let plan = member.plan;
            if !plan.is_readable() {
                continue;
            }
            let key = Key::Str(&member.name);
            member
                .access
                .read_entry(target, writer, key, plan.route(), plan.skip_default(), registry)?;
            if stop.checkpoint(ordinal) {
                return Ok(());
            }
        }
        Ok(())
    }

    fn write_all(
        &self,
        target: &mut T,
        reader: &mut dyn DataReader,
        stop: &StopToken,
        registry: &'static Registry,
    ) -> AccessResult {
        let start = stop.take_saved().unwrap_or(0);
        for (ordinal, member) in self.members.iter().enumerate().skip(start) {
            if !member.plan.is_writable() {
                continue;
            }
            if let Some(source) = reader.entry(Key::Str(&member.name))? {
                member.access.write(target, source, member.plan.route(), registry)?;
            }
            if stop.checkpoint(ordinal) {
                return Ok(());
            }
        }
        Ok(())
    }
}
