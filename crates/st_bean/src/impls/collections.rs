use alloc::boxed::Box;
use alloc::collections::{BTreeSet, TryReserveError, VecDeque};
use alloc::vec::Vec;
use core::fmt;
use core::hash::Hash;
use std::collections::HashSet;

use crate::info::{GenericTypeInfoCell, TypeInfo, TypeKind, Typed};
use crate::ops::{List, Set};
use crate::{Bean, BeanMut, BeanRef};

// -----------------------------------------------------------------------------
// Lists

macro_rules! impl_list_bean {
    ($ty:ident, $kind:expr) => {
        impl<T: Bean + Typed + Default> Typed for $ty<T> {
            fn type_info() -> &'static TypeInfo {
                static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
                CELL.get_or_insert::<Self>(|| {
                    TypeInfo::new::<Self>($kind)
                        .with_item::<T>()
                        .with_default::<Self>()
                })
            }
        }

        impl<T: Bean + Typed + Default> Bean for $ty<T> {
            #[inline]
            fn bean_info(&self) -> &'static TypeInfo {
                <Self as Typed>::type_info()
            }

            #[inline]
            fn bean_ref(&self) -> BeanRef<'_> {
                BeanRef::List(self)
            }

            #[inline]
            fn bean_mut(&mut self) -> BeanMut<'_> {
                BeanMut::List(self)
            }

            fn set(&mut self, value: Box<dyn Bean>) -> Result<(), Box<dyn Bean>> {
                *self = value.take::<Self>()?;
                Ok(())
            }

            fn debug(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_list()
                    .entries(self.iter().map(|item| item as &dyn Bean))
                    .finish()
            }
        }

        impl<T: Bean + Typed + Default> List for $ty<T> {
            #[inline]
            fn len(&self) -> usize {
                $ty::len(self)
            }

            fn get(&self, index: usize) -> Option<&dyn Bean> {
                if index < $ty::len(self) {
                    Some(&self[index])
                } else {
                    None
                }
            }

            fn get_mut(&mut self, index: usize) -> Option<&mut dyn Bean> {
                if index < $ty::len(self) {
                    Some(&mut self[index])
                } else {
                    None
                }
            }

            fn ensure_len(&mut self, len: usize) -> Result<(), TryReserveError> {
                let current = $ty::len(self);
                if current < len {
                    self.try_reserve(len - current)?;
                    self.resize_with(len, T::default);
                }
                Ok(())
            }

            fn clear(&mut self) {
                $ty::clear(self);
            }

            fn item_info(&self) -> &'static TypeInfo {
                T::type_info()
            }
        }
    };
}

impl_list_bean!(Vec, TypeKind::List);
impl_list_bean!(VecDeque, TypeKind::Queue);

// -----------------------------------------------------------------------------
// Sets

macro_rules! impl_set_bean {
    ($ty:ident, $kind:expr, $($bound:tt)+) => {
        impl<T: Bean + Typed + $($bound)+> Typed for $ty<T> {
            fn type_info() -> &'static TypeInfo {
                static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
                CELL.get_or_insert::<Self>(|| {
                    TypeInfo::new::<Self>($kind)
                        .with_item::<T>()
                        .with_default::<Self>()
                })
            }
        }

        impl<T: Bean + Typed + $($bound)+> Bean for $ty<T> {
            #[inline]
            fn bean_info(&self) -> &'static TypeInfo {
                <Self as Typed>::type_info()
            }

            #[inline]
            fn bean_ref(&self) -> BeanRef<'_> {
                BeanRef::Set(self)
            }

            #[inline]
            fn bean_mut(&mut self) -> BeanMut<'_> {
                BeanMut::Set(self)
            }

            fn set(&mut self, value: Box<dyn Bean>) -> Result<(), Box<dyn Bean>> {
                *self = value.take::<Self>()?;
                Ok(())
            }

            fn debug(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_set()
                    .entries(self.iter().map(|item| item as &dyn Bean))
                    .finish()
            }
        }

        impl<T: Bean + Typed + $($bound)+> Set for $ty<T> {
            #[inline]
            fn len(&self) -> usize {
                $ty::len(self)
            }

            fn insert(&mut self, value: Box<dyn Bean>) -> Result<bool, Box<dyn Bean>> {
                Ok($ty::insert(self, value.take::<T>()?))
            }

            fn clear(&mut self) {
                $ty::clear(self);
            }

            fn item_info(&self) -> &'static TypeInfo {
                T::type_info()
            }
        }
    };
}

impl_set_bean!(HashSet, TypeKind::Set, Eq + Hash);
impl_set_bean!(BTreeSet, TypeKind::SortedSet, Ord);

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::collections::{BTreeSet, VecDeque};
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;

    use crate::ops::{List, Set};

    #[test]
    fn set_pads_with_defaults() {
        let mut list: Vec<i32> = vec![1];
        List::set(&mut list, 3, Box::new(9_i32)).unwrap();
        assert_eq!(list, [1, 0, 0, 9]);
    }

    #[test]
    fn set_rejects_wrong_type_after_growing() {
        let mut list: VecDeque<Option<String>> = VecDeque::new();
        assert!(List::set(&mut list, 1, Box::new(3_u8)).is_err());
        assert_eq!(list.len(), 2);
        assert!(list.iter().all(Option::is_none));
    }

    #[test]
    fn set_beyond_capacity_hands_the_value_back() {
        let mut list: Vec<Option<String>> = vec![None];
        assert!(List::ensure_len(&mut list, usize::MAX).is_err());
        assert!(List::set(&mut list, usize::MAX, Box::new(String::from("x"))).is_err());
        assert!(List::set(&mut list, 1 << 60, Box::new(String::from("x"))).is_err());
        assert_eq!(list, [None]);
    }

    #[test]
    fn sets_insert_and_clear() {
        let mut set: BTreeSet<u32> = BTreeSet::new();
        assert!(Set::insert(&mut set, Box::new(4_u32)).unwrap());
        assert!(!Set::insert(&mut set, Box::new(4_u32)).unwrap());
        assert!(Set::insert(&mut set, Box::new(4_i32)).is_err());
        Set::clear(&mut set);
        assert!(Set::is_empty(&set));
    }
}
