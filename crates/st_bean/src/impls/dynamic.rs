use alloc::boxed::Box;
use core::fmt;

use crate::info::{NonGenericTypeInfoCell, TypeInfo, TypeKind, Typed};
use crate::{Bean, BeanMut, BeanRef};

/// A `Box<dyn Bean>` property declares nothing about its value, so its
/// static kind is [`TypeKind::Dynamic`] and it has no default.
impl Typed for Box<dyn Bean> {
    fn type_info() -> &'static TypeInfo {
        static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
        CELL.get_or_init(|| TypeInfo::new::<Box<dyn Bean>>(TypeKind::Dynamic))
    }
}

impl Bean for Box<dyn Bean> {
    #[inline]
    fn bean_info(&self) -> &'static TypeInfo {
        (**self).bean_info()
    }

    #[inline]
    fn bean_ref(&self) -> BeanRef<'_> {
        (**self).bean_ref()
    }

    #[inline]
    fn bean_mut(&mut self) -> BeanMut<'_> {
        (**self).bean_mut()
    }

    /// Any value is accepted and replaces the boxed one. A value that is
    /// itself a `Box<dyn Bean>` is unwrapped first.
    fn set(&mut self, value: Box<dyn Bean>) -> Result<(), Box<dyn Bean>> {
        *self = match value.take::<Box<dyn Bean>>() {
            Ok(inner) => inner,
            Err(value) => value,
        };
        Ok(())
    }

    fn debug(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        (**self).debug(f)
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::string::String;

    use crate::info::{TypeKind, Typed};
    use crate::{Bean, BeanRef};

    #[test]
    fn boxed_beans_delegate_to_the_value() {
        let mut boxed: Box<dyn Bean> = Box::new(String::from("x"));
        assert!(boxed.bean_info().is::<String>());
        assert!(matches!(Bean::bean_ref(&boxed), BeanRef::Scalar(_)));
        assert_eq!(<Box<dyn Bean> as Typed>::type_info().kind(), TypeKind::Dynamic);

        Bean::set(&mut boxed, Box::new(3_u8)).unwrap();
        assert_eq!(boxed.downcast_ref::<u8>(), Some(&3));

        let nested: Box<dyn Bean> = Box::new(String::from("y"));
        Bean::set(&mut boxed, Box::new(nested)).unwrap();
        assert_eq!(boxed.downcast_ref::<String>().map(String::as_str), Some("y"));
    }

    #[test]
    fn innermost_looks_through_boxes() {
        let boxed: Box<dyn Bean> = Box::new(Box::new(1_u16) as Box<dyn Bean>);
        let outer: &dyn Bean = &boxed;
        assert!(outer.is::<Box<dyn Bean>>());
        assert_eq!(outer.innermost().downcast_ref::<u16>(), Some(&1));
    }
}
