use alloc::boxed::Box;
use alloc::string::ToString;
use alloc::vec::Vec;

use super::RwOps;
use crate::declare::{ReadEntryFn, ReadFn, WriteFn};
use crate::error::{AccessError, AccessResult};
use crate::plan::PlannedMember;
use crate::registry::Registry;
use crate::value::{DataReader, DataWriter, Key, StopToken, ValueReader, ValueWriter};

struct Slot<T> {
    name: Box<str>,
    read: ReadFn<T>,
    write: WriteFn<T>,
    /// `None` for members skipped by bulk reads.
    read_entry: Option<ReadEntryFn<T>>,
}

/// Per-ordinal specialized closures.
///
/// Inaccessible members get closures implementing the policy chosen at
/// discovery: an error, a null write or a skipped source.
pub(crate) struct CompiledRw<T> {
    slots: Box<[Slot<T>]>,
    readable: Box<[usize]>,
    writable: Box<[usize]>,
}

impl<T: 'static> CompiledRw<T> {
    pub fn new(ty: &'static str, members: &[PlannedMember<T>]) -> Self {
        let mut slots = Vec::with_capacity(members.len());
        let mut readable = Vec::new();
        let mut writable = Vec::new();

        for (ordinal, member) in members.iter().enumerate() {
            let plan = member.plan;
            let name: Box<str> = member.descriptor.serialized_name.clone();
            let compiled = member.access.compile(plan.route(), plan.skip_default());

            let (read, read_entry) = match (plan.is_readable(), compiled.read, compiled.read_entry) {
                (true, Some(read), Some(read_entry)) => {
                    readable.push(ordinal);
                    (read, Some(read_entry))
                }
                _ => (denied_read(ty, &name, plan.error_if_unreadable()), None),
            };
            let write = match (plan.is_writable(), compiled.write) {
                (true, Some(write)) => {
                    writable.push(ordinal);
                    write
                }
                _ => denied_write(ty, &name, plan.error_if_unwritable()),
            };

            slots.push(Slot {
                name,
                read,
                write,
                read_entry,
            });
        }

        Self {
            slots: slots.into_boxed_slice(),
            readable: readable.into_boxed_slice(),
            writable: writable.into_boxed_slice(),
        }
    }
}

fn denied_read<T>(ty: &'static str, name: &str, error: bool) -> ReadFn<T> {
    if error {
        let member = name.to_string();
        Box::new(move |_: &T, _: &mut dyn ValueWriter, _: &'static Registry| {
            Err(AccessError::CannotRead {
                ty,
                member: member.clone(),
            })
        })
    } else {
        Box::new(|_: &T, writer: &mut dyn ValueWriter, _: &'static Registry| writer.write_null())
    }
}

fn denied_write<T>(ty: &'static str, name: &str, error: bool) -> WriteFn<T> {
    if error {
        let member = name.to_string();
        Box::new(move |_: &mut T, _: &mut dyn ValueReader, _: &'static Registry| {
            Err(AccessError::CannotWrite {
                ty,
                member: member.clone(),
            })
        })
    } else {
        Box::new(|_: &mut T, reader: &mut dyn ValueReader, _: &'static Registry| reader.skip())
    }
}

impl<T: 'static> RwOps<T> for CompiledRw<T> {
    #[inline]
    fn read(&self, target: &T, ordinal: usize, writer: &mut dyn ValueWriter, registry: &'static Registry) -> AccessResult {
        match self.slots.get(ordinal) {
            Some(slot) => (slot.read)(target, writer, registry),
            None => writer.write_null(),
        }
    }

    #[inline]
    fn write(
        &self,
        target: &mut T,
        ordinal: usize,
        reader: &mut dyn ValueReader,
        registry: &'static Registry,
    ) -> AccessResult {
        match self.slots.get(ordinal) {
            Some(slot) => (slot.write)(target, reader, registry),
            None => reader.skip(),
        }
    }

    fn read_all(&self, target: &T, writer: &mut dyn DataWriter, stop: &StopToken, registry: &'static Registry) -> AccessResult {
        let start = stop.take_saved().unwrap_or(0);
        let from = self.readable.partition_point(|&ordinal| ordinal < start);
        for &ordinal in &self.readable[from..] {
            let slot = &self.slots[ordinal];
            if let Some(read_entry) = &slot.read_entry {
                read_entry(target, writer, Key::Str(&slot.name), registry)?;
            }
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
        let from = self.writable.partition_point(|&ordinal| ordinal < start);
        for &ordinal in &self.writable[from..] {
            let slot = &self.slots[ordinal];
            if let Some(source) = reader.entry(Key::Str(&slot.name))? {
                (slot.write)(target, source, registry)?;
            }
            if stop.checkpoint(ordinal) {
                return Ok(());
            }
        }
        Ok(())
    }
}
