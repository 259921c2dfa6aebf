use alloc::boxed::Box;
use alloc::string::String;
use core::fmt;

use crate::info::{NonGenericTypeInfoCell, TypeInfo, Typed};
use crate::{Bean, BeanMut, BeanRef};

macro_rules! impl_scalar_bean {
    ($($ty:ty),* $(,)?) => {$(
        impl Typed for $ty {
            fn type_info() -> &'static TypeInfo {
                static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
                CELL.get_or_init(TypeInfo::scalar::<$ty>)
            }
        }

        impl Bean for $ty {
            #[inline]
            fn bean_info(&self) -> &'static TypeInfo {
                <Self as Typed>::type_info()
            }

            #[inline]
            fn bean_ref(&self) -> BeanRef<'_> {
                BeanRef::Scalar(self)
            }

            #[inline]
            fn bean_mut(&mut self) -> BeanMut<'_> {
                BeanMut::Scalar(self)
            }

            fn set(&mut self, value: Box<dyn Bean>) -> Result<(), Box<dyn Bean>> {
                *self = value.take::<Self>()?;
                Ok(())
            }

            fn debug(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Debug::fmt(self, f)
            }
        }
    )*};
}

impl_scalar_bean!(
    bool, char, String, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
);
