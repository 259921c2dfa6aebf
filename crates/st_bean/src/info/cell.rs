//! Containers for static storage of [`TypeInfo`].
//!
//! Non-generic types keep their info in a [`NonGenericTypeInfoCell`], which is
//! a plain [`OnceLock`]. A `static CELL` inside a generic function is shared by
//! every instantiation, so generic types use [`GenericTypeInfoCell`], a
//! [`TypeIdMap`] behind a [`RwLock`].

use alloc::boxed::Box;
use core::any::{Any, TypeId};
use std::sync::{OnceLock, PoisonError, RwLock};

use st_utils::TypeIdMap;

use crate::info::TypeInfo;

/// Container for static storage of non-generic type information.
///
/// ## Example
///
/// ```
/// use st_bean::info::{NonGenericTypeInfoCell, TypeInfo, TypeKind};
///
/// struct Marker;
///
/// fn marker_info() -> &'static TypeInfo {
///     static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
///     CELL.get_or_init(|| TypeInfo::new::<Marker>(TypeKind::Struct))
/// }
///
/// assert!(core::ptr::eq(marker_info(), marker_info()));
/// ```
pub struct NonGenericTypeInfoCell(OnceLock<TypeInfo>);

impl NonGenericTypeInfoCell {
    /// Create an empty cell.
    #[inline]
    pub const fn new() -> Self {
        Self(OnceLock::new())
    }

    /// Returns the stored info, generating it with `f` on first access.
    #[inline]
    pub fn get_or_init(&self, f: impl FnOnce() -> TypeInfo) -> &TypeInfo {
        self.0.get_or_init(f)
    }
}

/// Container for static storage of type information with generics.
///
/// ## Example
///
/// ```
/// use st_bean::info::{GenericTypeInfoCell, TypeInfo, TypeKind};
///
/// struct Wrapper<T>(T);
///
/// fn wrapper_info<T: 'static>() -> &'static TypeInfo {
///     static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
///     CELL.get_or_insert::<Wrapper<T>>(|| TypeInfo::new::<Wrapper<T>>(TypeKind::Struct))
/// }
///
/// assert!(wrapper_info::<u8>().is::<Wrapper<u8>>());
/// assert!(wrapper_info::<u16>().is::<Wrapper<u16>>());
/// ```
pub struct GenericTypeInfoCell(RwLock<TypeIdMap<&'static TypeInfo>>);

impl GenericTypeInfoCell {
    /// Create an empty cell.
    #[inline]
    pub const fn new() -> Self {
        Self(RwLock::new(TypeIdMap::new()))
    }

    /// Returns the info stored for `G`, generating it with `f` if there is
    /// no entry yet.
    #[inline(always)]
    pub fn get_or_insert<G: Any + ?Sized>(&self, f: impl FnOnce() -> TypeInfo) -> &'static TypeInfo {
        self.get_or_insert_by_type_id(TypeId::of::<G>(), f)
    }

    // Separate to reduce code compilation times
    #[inline(never)]
    fn get_or_insert_by_type_id(
        &self,
        type_id: TypeId,
        f: impl FnOnce() -> TypeInfo,
    ) -> &'static TypeInfo {
        let found = self
            .0
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&type_id)
            .copied();
        match found {
            Some(info) => info,
            None => {
                let info = f();
                *self
                    .0
                    .write()
                    .unwrap_or_else(PoisonError::into_inner)
                    .get_or_insert(type_id, || Box::leak(Box::new(info)))
            }
        }
    }
}
