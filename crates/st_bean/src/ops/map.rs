use alloc::boxed::Box;

use crate::Bean;
use crate::info::TypeInfo;

/// A keyed map.
///
/// Keys are passed as `&dyn Bean` and must have the map's key type exactly;
/// a key of another type never matches.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use st_bean::ops::Map;
///
/// let mut map: HashMap<String, u8> = HashMap::new();
/// Map::insert(&mut map, Box::new(String::from("a")), Box::new(1_u8)).unwrap();
///
/// let key = String::from("a");
/// assert_eq!(Map::get(&map, &key).unwrap().downcast_ref::<u8>(), Some(&1));
/// assert!(Map::get(&map, &1_u8).is_none());
/// ```
pub trait Map {
    /// Returns the number of entries.
    fn len(&self) -> usize;

    /// Returns the value stored under `key`.
    fn get(&self, key: &dyn Bean) -> Option<&dyn Bean>;

    /// Returns the value stored under `key` mutably.
    fn get_mut(&mut self, key: &dyn Bean) -> Option<&mut dyn Bean>;

    /// Inserts an entry, replacing any previous value.
    ///
    /// Returns whichever of the two does not fit its declared type.
    fn insert(&mut self, key: Box<dyn Bean>, value: Box<dyn Bean>) -> Result<(), Box<dyn Bean>>;

    /// Removes the entry under `key`, returning its value.
    fn remove(&mut self, key: &dyn Bean) -> Option<Box<dyn Bean>>;

    /// Removes every entry.
    fn clear(&mut self);

    /// Returns the declared key type.
    fn key_info(&self) -> &'static TypeInfo;

    /// Returns the declared value type.
    fn value_info(&self) -> &'static TypeInfo;

    /// Returns `true` if there is an entry under `key`.
    fn contains_key(&self, key: &dyn Bean) -> bool {
        self.get(key).is_some()
    }

    /// Returns `true` if the map has no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
