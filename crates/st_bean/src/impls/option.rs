use alloc::boxed::Box;
use core::fmt;

use crate::info::{GenericTypeInfoCell, TypeInfo, TypeKind, Typed};
use crate::ops::Nullable;
use crate::{Bean, BeanMut, BeanRef};

impl<T: Bean + Typed> Typed for Option<T> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| {
            TypeInfo::new::<Self>(TypeKind::Option)
                .with_item::<T>()
                .with_default::<Self>()
        })
    }
}

impl<T: Bean + Typed> Bean for Option<T> {
    #[inline]
    fn bean_info(&self) -> &'static TypeInfo {
        <Self as Typed>::type_info()
    }

    #[inline]
    fn bean_ref(&self) -> BeanRef<'_> {
        BeanRef::Option(self)
    }

    #[inline]
    fn bean_mut(&mut self) -> BeanMut<'_> {
        BeanMut::Option(self)
    }

    /// Accepts either an `Option<T>` or a bare `T`.
    fn set(&mut self, value: Box<dyn Bean>) -> Result<(), Box<dyn Bean>> {
        match value.take::<Self>() {
            Ok(value) => *self = value,
            Err(value) => *self = Some(value.take::<T>()?),
        }
        Ok(())
    }

    fn debug(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Some(value) => {
                f.write_str("Some(")?;
                value.debug(f)?;
                f.write_str(")")
            }
            None => f.write_str("None"),
        }
    }
}

impl<T: Bean + Typed> Nullable for Option<T> {
    fn value(&self) -> Option<&dyn Bean> {
        self.as_ref().map(|value| value as &dyn Bean)
    }

    fn value_mut(&mut self) -> Option<&mut dyn Bean> {
        self.as_mut().map(|value| value as &mut dyn Bean)
    }

    fn replace(&mut self, value: Option<Box<dyn Bean>>) -> Result<(), Box<dyn Bean>> {
        match value {
            Some(value) => Bean::set(self, value),
            None => {
                *self = None;
                Ok(())
            }
        }
    }

    fn item_info(&self) -> &'static TypeInfo {
        T::type_info()
    }
}
