//! Object, list, map and nullable helpers built on the structured contract.
//!
//! Wire layout:
//! * list: 4-byte count, then the items back to back;
//! * map: 4-byte count, then `(string key, item)` pairs back to back;
//! * nullable: 1-byte presence flag, then the payload only when present.
//!
//! Reads come in two flavors. The spawning flavor builds fresh items with a
//! caller-supplied spawner (any `FnMut(&mut ZioReader) -> Result<T>`, or
//! `T::zio_spawn` through the shorthand methods). The `_into` flavor
//! repopulates an existing collection in place and checks the stored shape
//! against it before touching any item.

use crate::backend::{Sink, Source};
use crate::digest::Digest;
use crate::error::{Error, Result};
use crate::reader::ZioReader;
use crate::traits::{Versioned, ZioRead, ZioSpawn, ZioWrite};
use crate::writer::ZioWriter;
use indexmap::IndexMap;

/// Upper bound on capacity reserved from an untrusted count before items arrive.
const MAX_PREALLOCATED_ITEMS: usize = 1024;

impl<S: Sink, D: Digest> ZioWriter<S, D> {
    /// Writes a self-serializing value.
    pub fn write_object<T: ZioWrite + ?Sized>(&mut self, value: &T) -> Result<()> {
        value.zio_write(self)
    }

    /// Writes a versioned record: its `VERSION` tag, then its fields.
    pub fn write_record<T: Versioned>(&mut self, record: &T) -> Result<()> {
        self.write_version(T::VERSION)?;
        record.write_fields(self)
    }

    fn write_count(&mut self, count: usize) -> Result<()> {
        let count = i32::try_from(count)
            .map_err(|_| Error::invalid_data(format!("{count} items exceed the 4-byte count")))?;
        self.write_int(count)
    }

    /// Writes a list: item count, then each item in order.
    pub fn write_list<T: ZioWrite>(&mut self, items: &[T]) -> Result<()> {
        self.write_count(items.len())?;
        for item in items {
            item.zio_write(self)?;
        }
        Ok(())
    }

    /// Writes a string-keyed map in its iteration order.
    pub fn write_map<T: ZioWrite>(&mut self, map: &IndexMap<String, T>) -> Result<()> {
        self.write_entries(map.iter())
    }

    /// Writes any sized sequence of `(key, item)` pairs with the map layout.
    pub fn write_entries<'a, K, T, I>(&mut self, entries: I) -> Result<()>
    where
        K: AsRef<str> + 'a,
        T: ZioWrite + 'a,
        I: ExactSizeIterator<Item = (&'a K, &'a T)>,
    {
        self.write_count(entries.len())?;
        for (key, item) in entries {
            self.write_str(key.as_ref())?;
            item.zio_write(self)?;
        }
        Ok(())
    }

    /// Writes a presence flag, then the value when there is one.
    pub fn write_nullable<T: ZioWrite + ?Sized>(&mut self, value: Option<&T>) -> Result<()> {
        match value {
            Some(value) => {
                self.write_bool(true)?;
                value.zio_write(self)
            }
            None => self.write_bool(false),
        }
    }
}

impl<S: Source, D: Digest> ZioReader<S, D> {
    /// Spawns a fresh self-serializing value.
    pub fn read_object<T: ZioSpawn>(&mut self) -> Result<T> {
        T::zio_spawn(self)
    }

    /// Repopulates `value` in place.
    pub fn read_object_into<T: ZioRead + ?Sized>(&mut self, value: &mut T) -> Result<()> {
        value.zio_read(self)
    }

    /// Reads a versioned record into `record` and returns the version found.
    pub fn read_record_into<T: Versioned>(&mut self, record: &mut T) -> Result<i32> {
        let version = self.read_version()?;
        record.read_fields(version, self)?;
        Ok(version)
    }

    fn read_count(&mut self) -> Result<usize> {
        let count = self.read_int()?;
        usize::try_from(count)
            .map_err(|_| Error::invalid_data(format!("negative item count {count}")))
    }

    /// Reads a list, building each item with `spawn`.
    pub fn read_list_with<T, F>(&mut self, mut spawn: F) -> Result<Vec<T>>
    where
        F: FnMut(&mut Self) -> Result<T>,
    {
        let count = self.read_count()?;
        let mut items = Vec::with_capacity(count.min(MAX_PREALLOCATED_ITEMS));
        for _ in 0..count {
            items.push(spawn(self)?);
        }
        Ok(items)
    }

    /// Reads a list of spawnable items.
    pub fn read_list<T: ZioSpawn>(&mut self) -> Result<Vec<T>> {
        self.read_list_with(|input| T::zio_spawn(input))
    }

    /// Repopulates exactly `items.len()` existing items in order.
    ///
    /// Fails with `CountMismatch`, leaving every item untouched, when the
    /// stored count differs.
    pub fn read_list_into<T: ZioRead>(&mut self, items: &mut [T]) -> Result<()> {
        let found = self.read_count()?;
        if found != items.len() {
            return Err(Error::count_mismatch(items.len(), found));
        }
        for item in items.iter_mut() {
            item.zio_read(self)?;
        }
        Ok(())
    }

    /// Reads a string-keyed map, building each item with `spawn`.
    ///
    /// A key appearing twice is rejected as invalid data.
    pub fn read_map_with<T, F>(&mut self, mut spawn: F) -> Result<IndexMap<String, T>>
    where
        F: FnMut(&mut Self) -> Result<T>,
    {
        let count = self.read_count()?;
        let mut map = IndexMap::with_capacity(count.min(MAX_PREALLOCATED_ITEMS));
        for _ in 0..count {
            let key = self.read_str()?;
            if map.contains_key(&key) {
                return Err(Error::invalid_data(format!("duplicate map key {key:?}")));
            }
            let item = spawn(self)?;
            map.insert(key, item);
        }
        Ok(map)
    }

    /// Reads a string-keyed map of spawnable items.
    pub fn read_map<T: ZioSpawn>(&mut self) -> Result<IndexMap<String, T>> {
        self.read_map_with(|input| T::zio_spawn(input))
    }

    /// Repopulates an existing map whose keys are already established.
    ///
    /// The stored count must equal `map.len()` and the key at each position
    /// must equal the map's key at that position. A mismatch fails before the
    /// offending item is read; entries before it have already been refreshed.
    pub fn read_map_into<T: ZioRead>(&mut self, map: &mut IndexMap<String, T>) -> Result<()> {
        let found = self.read_count()?;
        if found != map.len() {
            return Err(Error::count_mismatch(map.len(), found));
        }
        for (index, (expected, item)) in map.iter_mut().enumerate() {
            let key = self.read_str()?;
            if key != *expected {
                return Err(Error::key_mismatch(index, expected.as_str(), key));
            }
            item.zio_read(self)?;
        }
        Ok(())
    }

    /// Reads a presence flag, then builds the value with `spawn` only when present.
    pub fn read_nullable_with<T, F>(&mut self, spawn: F) -> Result<Option<T>>
    where
        F: FnOnce(&mut Self) -> Result<T>,
    {
        if self.read_bool()? {
            spawn(self).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Reads a nullable spawnable value.
    pub fn read_nullable<T: ZioSpawn>(&mut self) -> Result<Option<T>> {
        self.read_nullable_with(|input| T::zio_spawn(input))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::ByteSource;

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Counter {
        label: String,
        hits: i64,
    }

    impl ZioWrite for Counter {
        fn zio_write<S: Sink, D: Digest>(&self, out: &mut ZioWriter<S, D>) -> Result<()> {
            out.write_str(&self.label)?;
            out.write_long(self.hits)
        }
    }

    impl ZioRead for Counter {
        fn zio_read<S: Source, D: Digest>(&mut self, input: &mut ZioReader<S, D>) -> Result<()> {
            self.label = input.read_str()?;
            self.hits = input.read_long()?;
            Ok(())
        }
    }

    fn counter(label: &str, hits: i64) -> Counter {
        Counter {
            label: label.into(),
            hits,
        }
    }

    fn reader_for<F>(write: F) -> ZioReader<ByteSource>
    where
        F: FnOnce(&mut ZioWriter<crate::backend::ByteSink>) -> Result<()>,
    {
        let mut out = ZioWriter::in_memory();
        write(&mut out).unwrap();
        ZioReader::from_bytes(out.into_bytes().unwrap())
    }

    #[test]
    fn test_list_layout() {
        let mut out = ZioWriter::in_memory();
        out.write_list(&[true, false, true]).unwrap();
        assert_eq!(out.into_bytes().unwrap(), vec![0, 0, 0, 3, 1, 0, 1]);
    }

    #[test]
    fn test_list_with_spawner() {
        let items = vec![counter("a", 1), counter("b", 2)];
        let mut input = reader_for(|out| out.write_list(&items));
        let mut spawned = 0;
        let read = input
            .read_list_with(|r| {
                spawned += 1;
                Counter::zio_spawn(r)
            })
            .unwrap();
        assert_eq!(read, items);
        assert_eq!(spawned, 2);
    }

    #[test]
    fn test_list_into_count_mismatch_leaves_items() {
        let mut input = reader_for(|out| out.write_list(&[counter("a", 1)]));
        let mut existing = vec![counter("x", 9), counter("y", 8)];
        match input.read_list_into(&mut existing) {
            Err(Error::CountMismatch { expected, found }) => {
                assert_eq!(expected, 2);
                assert_eq!(found, 1);
            }
            other => panic!("expected CountMismatch, got {other:?}"),
        }
        assert_eq!(existing, vec![counter("x", 9), counter("y", 8)]);
    }

    #[test]
    fn test_list_into_repopulates_in_place() {
        let mut input = reader_for(|out| out.write_list(&[counter("a", 1), counter("b", 2)]));
        let mut existing = vec![Counter::default(), Counter::default()];
        let first = &existing[0] as *const Counter;
        input.read_list_into(&mut existing).unwrap();
        assert_eq!(existing, vec![counter("a", 1), counter("b", 2)]);
        assert!(std::ptr::eq(first, &existing[0]));
    }

    #[test]
    fn test_map_round_trip_preserves_order() {
        let mut map = IndexMap::new();
        map.insert("zeta".to_string(), counter("z", 26));
        map.insert("alpha".to_string(), counter("a", 1));
        let mut input = reader_for(|out| out.write_map(&map));
        let read: IndexMap<String, Counter> = input.read_map().unwrap();
        assert_eq!(read.keys().collect::<Vec<_>>(), vec!["zeta", "alpha"]);
        assert_eq!(read, map);
    }

    #[test]
    fn test_map_into_key_mismatch() {
        let mut stored = IndexMap::new();
        stored.insert("one".to_string(), 1i32);
        stored.insert("two".to_string(), 2i32);
        stored.insert("three".to_string(), 3i32);
        let mut input = reader_for(|out| out.write_map(&stored));

        let mut target = IndexMap::new();
        target.insert("one".to_string(), 0i32);
        target.insert("deux".to_string(), 0i32);
        target.insert("three".to_string(), 0i32);
        match input.read_map_into(&mut target) {
            Err(Error::KeyMismatch {
                index,
                expected,
                found,
            }) => {
                assert_eq!(index, 1);
                assert_eq!(expected, "deux");
                assert_eq!(found, "two");
            }
            other => panic!("expected KeyMismatch, got {other:?}"),
        }
        assert_eq!(target["one"], 1);
        assert_eq!(target["deux"], 0);
        assert_eq!(target["three"], 0);
    }

    #[test]
    fn test_map_into_count_mismatch() {
        let mut stored = IndexMap::new();
        stored.insert("only".to_string(), 5i32);
        let mut input = reader_for(|out| out.write_map(&stored));
        let mut target: IndexMap<String, i32> = IndexMap::new();
        assert!(matches!(
            input.read_map_into(&mut target),
            Err(Error::CountMismatch {
                expected: 0,
                found: 1
            })
        ));
    }

    #[test]
    fn test_duplicate_map_key_rejected() {
        let entries = [("k".to_string(), 1i32), ("k".to_string(), 2i32)];
        let mut input =
            reader_for(|out| out.write_entries(entries.iter().map(|(k, v)| (k, v))));
        assert!(matches!(
            input.read_map::<i32>(),
            Err(Error::InvalidData { .. })
        ));
    }

    #[test]
    fn test_nullable_absent_consumes_only_flag() {
        let mut input = reader_for(|out| {
            out.write_nullable::<Counter>(None)?;
            out.write_nullable(Some(&counter("c", 3)))?;
            out.write_int(77)
        });
        assert_eq!(input.read_nullable::<Counter>().unwrap(), None);
        assert_eq!(input.position().unwrap(), 1);
        assert_eq!(
            input.read_nullable::<Counter>().unwrap(),
            Some(counter("c", 3))
        );
        assert_eq!(input.read_int().unwrap(), 77);
    }

    #[test]
    fn test_negative_count_rejected() {
        let mut input = reader_for(|out| out.write_int(-2));
        assert!(matches!(
            input.read_list::<bool>(),
            Err(Error::InvalidData { .. })
        ));
    }
}
