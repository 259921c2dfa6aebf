use alloc::boxed::Box;
use alloc::sync::Arc;
use core::any::TypeId;
use core::fmt;

use st_utils::TypeIdMap;
use st_utils::hash::HashMap;

use crate::Bean;
use crate::info::{TypeInfo, TypeKind};

/// Creates a value of one specific type.
pub type Factory = Arc<dyn Fn() -> Box<dyn Bean> + Send + Sync>;

/// Creates a value for any type of one [`TypeKind`].
pub type KindFactory = fn(&'static TypeInfo) -> Option<Box<dyn Bean>>;

/// The table used to create values for null properties.
///
/// Lookup goes from the most to the least specific entry:
///
/// 1. a factory registered for the exact type,
/// 2. the factory registered for the type's [`TypeKind`].
///
/// [`Instantiators::new`] maps every kind except [`TypeKind::Dynamic`] to the
/// type's own default: `List` to `Vec`, `Queue` to `VecDeque`, `Set` to
/// `HashSet`, `SortedSet` to `BTreeSet`, `Map` to `HashMap`, `SortedMap` to
/// `BTreeMap`, enums to their first variant and structs to their `Default`
/// when they were derived with `#[bean(default)]`. A `Box<dyn Bean>` has no
/// implementation until one is registered.
///
/// # Examples
///
/// ```
/// use st_bean::{Bean, Instantiators};
/// use st_bean::info::{TypeKind, Typed};
///
/// let mut table = Instantiators::new();
/// assert!(table.instantiate(<Box<dyn Bean> as Typed>::type_info()).is_none());
///
/// table.register_kind(TypeKind::Dynamic, |_| Some(Box::new(String::new()) as Box<dyn Bean>));
/// table.register::<u32>(|| 7);
///
/// let dynamic = table.instantiate(<Box<dyn Bean> as Typed>::type_info()).unwrap();
/// assert!(dynamic.is::<String>());
/// let number = table.instantiate(<u32 as Typed>::type_info()).unwrap();
/// assert_eq!(number.downcast_ref::<u32>(), Some(&7));
/// ```
#[derive(Clone)]
pub struct Instantiators {
    by_type: TypeIdMap<Factory>,
    by_kind: HashMap<TypeKind, KindFactory>,
}

fn declared_default(info: &'static TypeInfo) -> Option<Box<dyn Bean>> {
    info.default_value()
}

impl Instantiators {
    /// Creates a table with the standard implementation for every kind.
    pub fn new() -> Self {
        let mut table = Self::empty();
        for kind in [
            TypeKind::Scalar,
            TypeKind::Enum,
            TypeKind::Struct,
            TypeKind::List,
            TypeKind::Queue,
            TypeKind::Set,
            TypeKind::SortedSet,
            TypeKind::Map,
            TypeKind::SortedMap,
            TypeKind::Option,
        ] {
            table.register_kind(kind, declared_default);
        }
        table
    }

    /// Creates a table with no entries at all.
    pub fn empty() -> Self {
        Self {
            by_type: TypeIdMap::new(),
            by_kind: HashMap::default(),
        }
    }

    /// Registers a factory for the exact type `T`, replacing any previous one.
    pub fn register<T: Bean>(&mut self, f: impl Fn() -> T + Send + Sync + 'static) -> &mut Self {
        let factory: Factory = Arc::new(move || Box::new(f()) as Box<dyn Bean>);
        self.by_type.insert(TypeId::of::<T>(), factory);
        self
    }

    /// Registers the factory for every type of `kind`, replacing any previous one.
    pub fn register_kind(&mut self, kind: TypeKind, f: KindFactory) -> &mut Self {
        self.by_kind.insert(kind, f);
        self
    }

    /// Removes the factory registered for the exact type `T`.
    pub fn unregister<T: Bean>(&mut self) -> &mut Self {
        self.by_type.remove(&TypeId::of::<T>());
        self
    }

    /// Creates a value of the type described by `info`.
    ///
    /// Returns `None` when no factory applies.
    pub fn instantiate(&self, info: &'static TypeInfo) -> Option<Box<dyn Bean>> {
        if let Some(factory) = self.by_type.get(&info.type_id()) {
            return Some(factory());
        }
        let factory = self.by_kind.get(&info.kind())?;
        let value = factory(info);
        if value.is_some() {
            log::trace!("instantiated `{}` as {}", info.type_name(), info.kind());
        }
        value
    }
}

impl Default for Instantiators {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Instantiators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instantiators")
            .field("types", &self.by_type.len())
            .field("kinds", &self.by_kind.keys().collect::<alloc::vec::Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec::Vec;
    use std::collections::HashMap;

    use crate::Instantiators;
    use crate::info::Typed;

    #[test]
    fn defaults_cover_containers() {
        let table = Instantiators::new();
        let list = table.instantiate(<Vec<String> as Typed>::type_info()).unwrap();
        assert_eq!(list.downcast_ref::<Vec<String>>(), Some(&Vec::new()));

        let map = table
            .instantiate(<HashMap<String, u8> as Typed>::type_info())
            .unwrap();
        assert!(map.is::<HashMap<String, u8>>());
    }

    #[test]
    fn type_factory_wins_over_kind_factory() {
        let mut table = Instantiators::new();
        table.register::<Vec<u8>>(|| alloc::vec![1, 2]);
        let list = table.instantiate(<Vec<u8> as Typed>::type_info()).unwrap();
        assert_eq!(list.downcast_ref::<Vec<u8>>().unwrap(), &[1, 2]);

        table.unregister::<Vec<u8>>();
        let list = table.instantiate(<Vec<u8> as Typed>::type_info()).unwrap();
        assert!(list.downcast_ref::<Vec<u8>>().unwrap().is_empty());
    }

    #[test]
    fn empty_table_creates_nothing() {
        let table = Instantiators::empty();
        assert!(table.instantiate(<u8 as Typed>::type_info()).is_none());
        assert_eq!(
            Instantiators::new()
                .instantiate(<Option<u8> as Typed>::type_info())
                .unwrap()
                .downcast_ref::<Option<u8>>(),
            Some(&None)
        );
    }
}
