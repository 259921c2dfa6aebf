use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use core::fmt;
use core::hash::Hash;
use std::collections::HashMap;

use crate::info::{GenericTypeInfoCell, TypeInfo, TypeKind, Typed};
use crate::ops::Map;
use crate::{Bean, BeanMut, BeanRef, FromLiteral};

macro_rules! impl_map_bean {
    ($ty:ident, $kind:expr, $($bound:tt)+) => {
        impl<K, V> Typed for $ty<K, V>
        where
            K: Bean + Typed + FromLiteral + $($bound)+,
            V: Bean + Typed,
        {
            fn type_info() -> &'static TypeInfo {
                static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
                CELL.get_or_insert::<Self>(|| {
                    TypeInfo::new::<Self>($kind)
                        .with_key::<K>()
                        .with_item::<V>()
                        .with_default::<Self>()
                })
            }
        }

        impl<K, V> Bean for $ty<K, V>
        where
            K: Bean + Typed + FromLiteral + $($bound)+,
            V: Bean + Typed,
        {
            #[inline]
            fn bean_info(&self) -> &'static TypeInfo {
                <Self as Typed>::type_info()
            }

            #[inline]
            fn bean_ref(&self) -> BeanRef<'_> {
                BeanRef::Map(self)
            }

            #[inline]
            fn bean_mut(&mut self) -> BeanMut<'_> {
                BeanMut::Map(self)
            }

            fn set(&mut self, value: Box<dyn Bean>) -> Result<(), Box<dyn Bean>> {
                *self = value.take::<Self>()?;
                Ok(())
            }

            fn debug(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_map()
                    .entries(self.iter().map(|(k, v)| (k as &dyn Bean, v as &dyn Bean)))
                    .finish()
            }
        }

        impl<K, V> Map for $ty<K, V>
        where
            K: Bean + Typed + FromLiteral + $($bound)+,
            V: Bean + Typed,
        {
            #[inline]
            fn len(&self) -> usize {
                $ty::len(self)
            }

            fn get(&self, key: &dyn Bean) -> Option<&dyn Bean> {
                let key = key.downcast_ref::<K>()?;
                $ty::get(self, key).map(|value| value as &dyn Bean)
            }

            fn get_mut(&mut self, key: &dyn Bean) -> Option<&mut dyn Bean> {
                let key = key.downcast_ref::<K>()?;
                $ty::get_mut(self, key).map(|value| value as &mut dyn Bean)
            }

            fn insert(
                &mut self,
                key: Box<dyn Bean>,
                value: Box<dyn Bean>,
            ) -> Result<(), Box<dyn Bean>> {
                let key = key.take::<K>()?;
                let value = value.take::<V>()?;
                $ty::insert(self, key, value);
                Ok(())
            }

            fn remove(&mut self, key: &dyn Bean) -> Option<Box<dyn Bean>> {
                let key = key.downcast_ref::<K>()?;
                $ty::remove(self, key).map(|value| Box::new(value) as Box<dyn Bean>)
            }

            fn clear(&mut self) {
                $ty::clear(self);
            }

            fn key_info(&self) -> &'static TypeInfo {
                K::type_info()
            }

            fn value_info(&self) -> &'static TypeInfo {
                V::type_info()
            }
        }
    };
}

impl_map_bean!(HashMap, TypeKind::Map, Eq + Hash);
impl_map_bean!(BTreeMap, TypeKind::SortedMap, Ord);

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::collections::BTreeMap;
    use alloc::string::String;
    use std::collections::HashMap;

    use crate::ops::Map;

    #[test]
    fn insert_checks_both_types() {
        let mut map: HashMap<String, i64> = HashMap::new();
        assert!(Map::insert(&mut map, Box::new(1_i32), Box::new(1_i64)).is_err());
        assert!(Map::insert(&mut map, Box::new(String::from("a")), Box::new(1_i32)).is_err());
        assert!(map.is_empty());

        Map::insert(&mut map, Box::new(String::from("a")), Box::new(7_i64)).unwrap();
        assert_eq!(map["a"], 7);
    }

    #[test]
    fn remove_returns_the_value() {
        let mut map = BTreeMap::from([(1_u32, String::from("one"))]);
        let removed = Map::remove(&mut map, &1_u32).unwrap();
        assert_eq!(removed.take::<String>().unwrap(), "one");
        assert!(Map::remove(&mut map, &1_u32).is_none());
    }
}
